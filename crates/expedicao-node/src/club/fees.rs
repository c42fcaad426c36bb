use super::Club;
use crate::error::{Error, Result};
use crate::models::{
    new_id, require_amount, EntryKind, EntrySource, EntryStatus, FeePatch, FeeStatus, LedgerEntry, MonthlyFee,
    PaymentMethod, Profile,
};
use chrono::NaiveDate;
use expedicao_rateio::Money;
use serde::Serialize;

const MONTHS: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

fn month_name(month: u32) -> &'static str {
    MONTHS
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("?")
}

/// A fee with its status as of the summary date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeLine {
    #[serde(flatten)]
    pub fee: MonthlyFee,
    pub derived_status: FeeStatus,
}

/// Active partner with at least one late fee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelayedPartner {
    pub profile_id: String,
    pub name: String,
    pub late_months: Vec<u32>,
    pub late_amount: Money,
}

/// Dues for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeSummary {
    pub year: i32,
    pub fees: Vec<FeeLine>,
    pub expected: Money,
    pub collected: Money,
    pub pending: Money,
    /// Collected over expected, percent with one decimal
    pub compliance: f64,
    pub delayed_partners: Vec<DelayedPartner>,
}

fn check_fee_amount(amount: Money) -> Result<()> {
    if amount.is_negative() {
        return Err(Error::InvalidInput(format!("negative fee amount {}", amount)));
    }
    require_amount("amount", amount)
}

impl Club {
    /// Create missing fees for every active partner.
    ///
    /// `months` defaults to the whole year. Returns only the fees created.
    pub fn generate_fees(
        &self,
        year: i32,
        amount: Money,
        months: Option<Vec<u32>>,
    ) -> Result<Vec<MonthlyFee>> {
        let months = months.unwrap_or_else(|| (1..=12).collect());
        if let Some(bad) = months.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(Error::InvalidInput(format!("invalid month {}", bad)));
        }
        check_fee_amount(amount)?;

        let partners = self.storage.list_where(Profile::owes_dues)?;
        let existing = self.storage.list_where(|f: &MonthlyFee| f.year == year)?;

        let mut batch = self.storage.batch();
        let mut created = Vec::new();
        for partner in &partners {
            for &month in &months {
                let exists = existing
                    .iter()
                    .chain(created.iter())
                    .any(|f| f.profile_id == partner.id && f.month == month);
                if exists {
                    continue;
                }
                let fee = MonthlyFee::new(new_id(&partner.id), partner.id.clone(), year, month, amount);
                batch.put(&fee)?;
                created.push(fee);
            }
        }
        batch.commit()?;

        tracing::info!(
            year,
            partners = partners.len(),
            created = created.len(),
            "Generated monthly fees"
        );
        Ok(created)
    }

    pub fn get_fee(&self, id: &str) -> Result<MonthlyFee> {
        self.storage.require(id)
    }

    /// Fees sorted by year and month, optionally for a single year.
    pub fn list_fees(&self, year: Option<i32>) -> Result<Vec<MonthlyFee>> {
        let mut fees = self
            .storage
            .list_where(|f: &MonthlyFee| year.map_or(true, |y| f.year == y))?;
        fees.sort_by_key(|f| (f.year, f.month));
        Ok(fees)
    }

    /// Mark a fee paid and book the receipt in the cash ledger.
    pub fn pay_fee(
        &self,
        id: &str,
        amount: Money,
        payment_date: NaiveDate,
        method: PaymentMethod,
        notes: Option<String>,
    ) -> Result<MonthlyFee> {
        check_fee_amount(amount)?;
        let mut fee: MonthlyFee = self.storage.require(id)?;
        if fee.is_paid() {
            return Err(Error::Conflict(format!("fee {} is already paid", id)));
        }

        let name = self
            .storage
            .get::<Profile>(&fee.profile_id)?
            .map(|p| p.name)
            .unwrap_or_else(|| "Sócio".to_string());

        fee.mark_paid(amount, payment_date, method, notes.clone());
        let entry = LedgerEntry {
            id: new_id(&fee.id),
            kind: EntryKind::Entrada,
            description: format!("Mensalidade {} - {}/{}", name, month_name(fee.month), fee.year),
            amount,
            category: "Mensalidade".to_string(),
            date: payment_date,
            payment_date: Some(payment_date),
            status: EntryStatus::Recebido,
            profile_id: Some(fee.profile_id.clone()),
            provider: None,
            expedition_id: None,
            source: EntrySource::Mensalidade,
            notes,
            attachment_url: None,
            monthly_fee_id: Some(fee.id.clone()),
            purchase_id: None,
        };

        let mut batch = self.storage.batch();
        batch.put(&fee)?;
        batch.put(&entry)?;
        batch.commit()?;

        tracing::info!(fee = %id, amount = %amount, "Fee paid: {}", entry.description);
        Ok(fee)
    }

    fn fee_entries(&self, fee_id: &str) -> Result<Vec<LedgerEntry>> {
        self.storage
            .list_where(|e: &LedgerEntry| e.monthly_fee_id.as_deref() == Some(fee_id))
    }

    /// Revert a payment: drop its ledger receipts and reset the fee.
    pub fn undo_fee_payment(&self, id: &str) -> Result<MonthlyFee> {
        let mut fee: MonthlyFee = self.storage.require(id)?;
        if !fee.is_paid() {
            return Err(Error::Conflict(format!("fee {} is not paid", id)));
        }

        let mut batch = self.storage.batch();
        for entry in self.fee_entries(id)? {
            batch.delete::<LedgerEntry>(&entry.id);
        }
        fee.reset();
        batch.put(&fee)?;
        batch.commit()?;

        tracing::info!(fee = %id, "Fee payment undone");
        Ok(fee)
    }

    pub fn update_fee(&self, id: &str, patch: FeePatch) -> Result<MonthlyFee> {
        let mut fee: MonthlyFee = self.storage.require(id)?;
        if let Some(amount) = patch.amount {
            check_fee_amount(amount)?;
        }
        patch.apply(&mut fee);
        self.storage.put(&fee)?;
        Ok(fee)
    }

    /// Delete a fee and the ledger receipts that paid it.
    pub fn delete_fee(&self, id: &str) -> Result<()> {
        self.storage.require::<MonthlyFee>(id)?;
        let mut batch = self.storage.batch();
        for entry in self.fee_entries(id)? {
            batch.delete::<LedgerEntry>(&entry.id);
        }
        batch.delete::<MonthlyFee>(id);
        batch.commit()
    }

    /// Delete every fee of `year` with its receipts. Returns how many fees went.
    pub fn clear_fees_for_year(&self, year: i32) -> Result<usize> {
        let fees = self.storage.list_where(|f: &MonthlyFee| f.year == year)?;
        let mut batch = self.storage.batch();
        for entry in self.storage.list_where(|e: &LedgerEntry| {
            e.monthly_fee_id
                .as_deref()
                .is_some_and(|id| fees.iter().any(|f| f.id == id))
        })? {
            batch.delete::<LedgerEntry>(&entry.id);
        }
        for fee in &fees {
            batch.delete::<MonthlyFee>(&fee.id);
        }
        batch.commit()?;

        tracing::warn!(year, fees = fees.len(), "Cleared monthly fees");
        Ok(fees.len())
    }

    pub fn fee_summary(&self, year: i32, today: NaiveDate) -> Result<FeeSummary> {
        let fees: Vec<FeeLine> = self
            .list_fees(Some(year))?
            .into_iter()
            .map(|fee| FeeLine {
                derived_status: fee.derived_status(today),
                fee,
            })
            .collect();

        let expected: Money = fees.iter().map(|l| l.fee.amount).sum();
        let collected: Money = fees
            .iter()
            .filter(|l| l.derived_status == FeeStatus::Pago)
            .map(|l| l.fee.amount)
            .sum();
        let pending = expected - collected;
        let compliance = if expected.is_zero() {
            0.0
        } else {
            (collected.cents() as f64 / expected.cents() as f64 * 1000.0).round() / 10.0
        };

        let mut partners = self.storage.list_where(Profile::owes_dues)?;
        partners.sort_by_key(|p| p.name.to_lowercase());
        let delayed_partners = partners
            .into_iter()
            .filter_map(|partner| {
                let late: Vec<&FeeLine> = fees
                    .iter()
                    .filter(|l| {
                        l.fee.profile_id == partner.id && l.derived_status == FeeStatus::Atrasado
                    })
                    .collect();
                if late.is_empty() {
                    return None;
                }
                Some(DelayedPartner {
                    late_months: late.iter().map(|l| l.fee.month).collect(),
                    late_amount: late.iter().map(|l| l.fee.amount).sum(),
                    profile_id: partner.id,
                    name: partner.name,
                })
            })
            .collect();

        Ok(FeeSummary {
            year,
            fees,
            expected,
            collected,
            pending,
            compliance,
            delayed_partners,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{club, date, member};
    use super::*;
    use crate::models::{NewProfile, ProfileKind, ProfilePatch};

    fn reais(r: i64) -> Money {
        Money::from_cents(r * 100)
    }

    #[test]
    fn generate_only_for_active_partners() {
        let (_dir, club) = club();
        let ana = member(&club, "Ana", true);
        let bruno = member(&club, "Bruno", true);
        club.update_profile(
            &bruno,
            ProfilePatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
        club.create_profile(NewProfile {
            name: "Convidado".into(),
            kind: ProfileKind::Convidado,
            phone: String::new(),
            email: None,
            drinks_alcohol: false,
            is_active: true,
        })
        .unwrap();

        let created = club.generate_fees(2025, reais(100), None).unwrap();
        assert_eq!(created.len(), 12);
        assert!(created.iter().all(|f| f.profile_id == ana));

        // second run fills only the gaps
        let again = club
            .generate_fees(2025, reais(100), Some(vec![1, 2, 3]))
            .unwrap();
        assert!(again.is_empty());
        assert!(matches!(
            club.generate_fees(2025, reais(100), Some(vec![13])),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn pay_books_receipt_and_undo_reverts() {
        let (_dir, club) = club();
        member(&club, "Ana Souza", true);
        let fee = club
            .generate_fees(2025, reais(100), Some(vec![3]))
            .unwrap()
            .remove(0);

        let overpaid = club.pay_fee(
            &fee.id,
            Money::from_cents(i64::MAX),
            date(2025, 3, 10),
            PaymentMethod::Pix,
            None,
        );
        assert!(matches!(overpaid, Err(Error::InvalidInput(_))));
        let paid = club
            .pay_fee(&fee.id, reais(120), date(2025, 3, 10), PaymentMethod::Pix, None)
            .unwrap();
        assert!(paid.is_paid());
        assert_eq!(paid.amount, reais(120));

        let ledger = club.list_ledger(None).unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].description, "Mensalidade Ana Souza - Março/2025");
        assert_eq!(ledger[0].monthly_fee_id.as_deref(), Some(fee.id.as_str()));
        assert_eq!(ledger[0].status, EntryStatus::Recebido);

        assert!(matches!(
            club.pay_fee(&fee.id, reais(120), date(2025, 3, 10), PaymentMethod::Pix, None),
            Err(Error::Conflict(_))
        ));

        let huge = Money::from_cents(i64::MAX);
        let patch = FeePatch {
            amount: Some(huge),
            ..Default::default()
        };
        assert!(matches!(club.update_fee(&fee.id, patch), Err(Error::InvalidInput(_))));
        assert!(matches!(
            club.generate_fees(2026, huge, None),
            Err(Error::InvalidInput(_))
        ));

        let undone = club.undo_fee_payment(&fee.id).unwrap();
        assert_eq!(undone.status, FeeStatus::Pendente);
        assert!(undone.payment_date.is_none());
        assert!(club.list_ledger(None).unwrap().is_empty());
        assert!(matches!(club.undo_fee_payment(&fee.id), Err(Error::Conflict(_))));
    }

    #[test]
    fn missing_profile_named_partner() {
        let (_dir, club) = club();
        let ana = member(&club, "Ana", true);
        let fee = club
            .generate_fees(2025, reais(50), Some(vec![12]))
            .unwrap()
            .remove(0);
        club.storage().delete::<Profile>(&ana).unwrap();

        club.pay_fee(&fee.id, reais(50), date(2025, 12, 1), PaymentMethod::Dinheiro, None)
            .unwrap();
        assert_eq!(
            club.list_ledger(None).unwrap()[0].description,
            "Mensalidade Sócio - Dezembro/2025"
        );
    }

    #[test]
    fn summary_numbers() {
        let (_dir, club) = club();
        let ana = member(&club, "Ana", true);
        let bruno = member(&club, "Bruno", false);
        let fees = club
            .generate_fees(2025, reais(100), Some(vec![1, 2, 3]))
            .unwrap();
        let ana_jan = fees
            .iter()
            .find(|f| f.profile_id == ana && f.month == 1)
            .unwrap();
        club.pay_fee(&ana_jan.id, reais(100), date(2025, 1, 5), PaymentMethod::Pix, None)
            .unwrap();

        let summary = club.fee_summary(2025, date(2025, 2, 15)).unwrap();
        assert_eq!(summary.expected, reais(600));
        assert_eq!(summary.collected, reais(100));
        assert_eq!(summary.pending, reais(500));
        assert_eq!(summary.compliance, 16.7);

        // only Bruno's January is late; February and March are still open
        assert_eq!(summary.delayed_partners.len(), 1);
        assert_eq!(summary.delayed_partners[0].profile_id, bruno);
        assert_eq!(summary.delayed_partners[0].late_months, vec![1]);

        let empty = club.fee_summary(2030, date(2025, 2, 15)).unwrap();
        assert_eq!(empty.compliance, 0.0);
    }

    #[test]
    fn clear_year_takes_receipts() {
        let (_dir, club) = club();
        member(&club, "Ana", true);
        let fee = club
            .generate_fees(2024, reais(100), Some(vec![5]))
            .unwrap()
            .remove(0);
        club.generate_fees(2025, reais(100), Some(vec![5])).unwrap();
        club.pay_fee(&fee.id, reais(100), date(2024, 5, 1), PaymentMethod::Pix, None)
            .unwrap();

        assert_eq!(club.clear_fees_for_year(2024).unwrap(), 1);
        assert!(club.list_ledger(None).unwrap().is_empty());
        assert_eq!(club.list_fees(None).unwrap().len(), 1);
    }

    #[test]
    fn month_names() {
        assert_eq!(month_name(1), "Janeiro");
        assert_eq!(month_name(12), "Dezembro");
        assert_eq!(month_name(0), "?");
    }
}
