//! Monthly fee model - partner dues.

use super::Record;
use chrono::{Datelike, NaiveDate};
use expedicao_rateio::Money;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeeStatus {
    Pendente,
    Pago,
    Atrasado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Pix,
    Dinheiro,
    #[serde(rename = "Transferência")]
    Transferencia,
}

/// Dues owed by one partner for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFee {
    pub id: String,

    pub profile_id: String,

    pub year: i32,

    /// 1..=12
    pub month: u32,

    pub amount: Money,

    pub status: FeeStatus,

    pub payment_date: Option<NaiveDate>,

    pub payment_method: Option<PaymentMethod>,

    pub notes: Option<String>,
}

impl MonthlyFee {
    pub fn new(id: String, profile_id: String, year: i32, month: u32, amount: Money) -> Self {
        Self {
            id,
            profile_id,
            year,
            month,
            amount,
            status: FeeStatus::Pendente,
            payment_date: None,
            payment_method: None,
            notes: None,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == FeeStatus::Pago
    }

    /// Status as of `today`: unpaid fees from a past month are late.
    pub fn derived_status(&self, today: NaiveDate) -> FeeStatus {
        if self.is_paid() {
            return FeeStatus::Pago;
        }
        let (year, month) = (today.year(), today.month());
        if self.year < year || (self.year == year && self.month < month) {
            FeeStatus::Atrasado
        } else {
            FeeStatus::Pendente
        }
    }

    pub fn mark_paid(
        &mut self,
        amount: Money,
        payment_date: NaiveDate,
        method: PaymentMethod,
        notes: Option<String>,
    ) {
        self.status = FeeStatus::Pago;
        self.amount = amount;
        self.payment_date = Some(payment_date);
        self.payment_method = Some(method);
        self.notes = notes;
    }

    /// Back to pending, forgetting the payment.
    pub fn reset(&mut self) {
        self.status = FeeStatus::Pendente;
        self.payment_date = None;
        self.payment_method = None;
        self.notes = None;
    }
}

impl Record for MonthlyFee {
    const PREFIX: &'static str = "fee";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Partial fee update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeePatch {
    pub amount: Option<Money>,
    pub status: Option<FeeStatus>,
    pub payment_date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    pub notes: Option<String>,
}

impl FeePatch {
    pub fn apply(self, fee: &mut MonthlyFee) {
        if let Some(amount) = self.amount {
            fee.amount = amount;
        }
        if let Some(status) = self.status {
            fee.status = status;
        }
        if let Some(date) = self.payment_date {
            fee.payment_date = Some(date);
        }
        if let Some(method) = self.payment_method {
            fee.payment_method = Some(method);
        }
        if let Some(notes) = self.notes {
            fee.notes = Some(notes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn past_months_are_late() {
        let fee = MonthlyFee::new("f".into(), "p".into(), 2025, 3, Money::from_cents(10_000));
        assert_eq!(fee.derived_status(date(2025, 3, 31)), FeeStatus::Pendente);
        assert_eq!(fee.derived_status(date(2025, 4, 1)), FeeStatus::Atrasado);
        assert_eq!(fee.derived_status(date(2026, 1, 1)), FeeStatus::Atrasado);
        assert_eq!(fee.derived_status(date(2024, 12, 1)), FeeStatus::Pendente);
    }

    #[test]
    fn pay_then_reset() {
        let mut fee = MonthlyFee::new("f".into(), "p".into(), 2025, 1, Money::from_cents(10_000));
        fee.mark_paid(
            Money::from_cents(12_000),
            date(2025, 5, 2),
            PaymentMethod::Pix,
            Some("atrasado".into()),
        );
        assert_eq!(fee.derived_status(date(2026, 1, 1)), FeeStatus::Pago);
        assert_eq!(fee.amount, Money::from_cents(12_000));

        fee.reset();
        assert_eq!(fee.status, FeeStatus::Pendente);
        assert!(fee.payment_date.is_none() && fee.payment_method.is_none() && fee.notes.is_none());
    }

    #[test]
    fn method_label() {
        let json = serde_json::to_value(PaymentMethod::Transferencia).unwrap();
        assert_eq!(json, "Transferência");
    }
}
