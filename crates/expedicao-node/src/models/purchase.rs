//! Purchase model - what the group buys for an expedition.

use super::Record;
use chrono::NaiveDate;
use expedicao_rateio::{Expense, Money};
use serde::{Deserialize, Serialize};

/// Purchases in this category always go to the drinkers pool.
pub const ALCOHOL_CATEGORY: &str = "Bebida Alcoólica";

/// Who paid for a purchase.
///
/// Serialized as a single string: a profile ID, `"caixa"` for the
/// expedition cash box, or `""` when nobody was recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Payer {
    Profile(String),
    Caixa,
    #[default]
    Unassigned,
}

impl Payer {
    const CAIXA: &'static str = "caixa";

    pub fn profile_id(&self) -> Option<&str> {
        match self {
            Payer::Profile(id) => Some(id),
            _ => None,
        }
    }
}

impl From<String> for Payer {
    fn from(s: String) -> Self {
        match s.as_str() {
            "" => Payer::Unassigned,
            Payer::CAIXA => Payer::Caixa,
            _ => Payer::Profile(s),
        }
    }
}

impl From<Payer> for String {
    fn from(p: Payer) -> Self {
        match p {
            Payer::Profile(id) => id,
            Payer::Caixa => Payer::CAIXA.to_string(),
            Payer::Unassigned => String::new(),
        }
    }
}

/// A transaction recorded against an expedition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: String,

    pub expedition_id: String,

    pub description: String,

    /// Quantity bought (may be fractional: kilos, liters)
    pub quantity: f64,

    pub unit_price: Money,

    /// `unit_price × quantity`
    pub total_price: Money,

    pub purchase_date: NaiveDate,

    #[serde(default)]
    pub purchased_by: Payer,

    pub category: String,

    #[serde(default = "default_true")]
    pub is_expense: bool,

    #[serde(default)]
    pub is_for_drinkers_only: bool,

    #[serde(default)]
    pub is_paid: bool,
}

fn default_true() -> bool {
    true
}

impl Purchase {
    /// Belongs to the drinkers-only pool.
    pub fn is_drinkers_only(&self) -> bool {
        self.is_for_drinkers_only || self.category == ALCOHOL_CATEGORY
    }

    /// Engine input for this purchase, `None` when it is not an expense.
    pub fn to_expense(&self) -> Option<Expense> {
        if !self.is_expense {
            return None;
        }
        Some(Expense {
            total: self.total_price,
            drinkers_only: self.is_drinkers_only(),
            purchased_by: self.purchased_by.profile_id().map(str::to_string),
        })
    }

    fn recompute_total(&mut self) -> crate::Result<()> {
        self.total_price = self.unit_price.times(self.quantity)?;
        Ok(())
    }
}

impl Record for Purchase {
    const PREFIX: &'static str = "purchase";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Fields for a new purchase.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPurchase {
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    pub unit_price: Money,
    pub purchase_date: NaiveDate,
    #[serde(default)]
    pub purchased_by: Payer,
    pub category: String,
    #[serde(default = "default_true")]
    pub is_expense: bool,
    #[serde(default)]
    pub is_for_drinkers_only: bool,
    #[serde(default)]
    pub is_paid: bool,
}

fn default_quantity() -> f64 {
    1.0
}

impl NewPurchase {
    pub fn validate(&self) -> crate::Result<()> {
        super::require_text("description", &self.description)?;
        super::require_amount("unit_price", self.unit_price)?;
        check_quantity(self.quantity)
    }

    pub fn into_purchase(self, id: String, expedition_id: String) -> crate::Result<Purchase> {
        let mut purchase = Purchase {
            id,
            expedition_id,
            description: self.description,
            quantity: self.quantity,
            unit_price: self.unit_price,
            total_price: Money::ZERO,
            purchase_date: self.purchase_date,
            purchased_by: self.purchased_by,
            category: self.category,
            is_expense: self.is_expense,
            is_for_drinkers_only: self.is_for_drinkers_only,
            is_paid: self.is_paid,
        };
        purchase.recompute_total()?;
        Ok(purchase)
    }
}

/// Partial purchase update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchasePatch {
    pub description: Option<String>,
    pub quantity: Option<f64>,
    pub unit_price: Option<Money>,
    pub purchase_date: Option<NaiveDate>,
    pub purchased_by: Option<Payer>,
    pub category: Option<String>,
    pub is_expense: Option<bool>,
    pub is_for_drinkers_only: Option<bool>,
    pub is_paid: Option<bool>,
}

impl PurchasePatch {
    pub fn apply(self, purchase: &mut Purchase) -> crate::Result<()> {
        if let Some(quantity) = self.quantity {
            check_quantity(quantity)?;
            purchase.quantity = quantity;
        }
        if let Some(description) = self.description {
            super::require_text("description", &description)?;
            purchase.description = description;
        }
        if let Some(unit_price) = self.unit_price {
            super::require_amount("unit_price", unit_price)?;
            purchase.unit_price = unit_price;
        }
        if let Some(date) = self.purchase_date {
            purchase.purchase_date = date;
        }
        if let Some(payer) = self.purchased_by {
            purchase.purchased_by = payer;
        }
        if let Some(category) = self.category {
            purchase.category = category;
        }
        if let Some(is_expense) = self.is_expense {
            purchase.is_expense = is_expense;
        }
        if let Some(drinkers) = self.is_for_drinkers_only {
            purchase.is_for_drinkers_only = drinkers;
        }
        if let Some(paid) = self.is_paid {
            purchase.is_paid = paid;
        }
        purchase.recompute_total()
    }
}

fn check_quantity(quantity: f64) -> crate::Result<()> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(crate::Error::InvalidInput(format!(
            "invalid quantity {}",
            quantity
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beer() -> Purchase {
        NewPurchase {
            description: "Cerveja".into(),
            quantity: 3.0,
            unit_price: Money::from_cents(8_990),
            purchase_date: NaiveDate::from_ymd_opt(2025, 7, 9).unwrap(),
            purchased_by: Payer::Profile("ana".into()),
            category: ALCOHOL_CATEGORY.into(),
            is_expense: true,
            is_for_drinkers_only: false,
            is_paid: false,
        }
        .into_purchase("t1".into(), "e1".into())
        .unwrap()
    }

    #[test]
    fn total_is_quantity_times_price() {
        assert_eq!(beer().total_price, Money::from_cents(26_970));
    }

    #[test]
    fn alcohol_category_counts_as_drinkers_only() {
        let expense = beer().to_expense().unwrap();
        assert!(expense.drinkers_only);
        assert_eq!(expense.purchased_by.as_deref(), Some("ana"));
    }

    #[test]
    fn non_expense_not_shared() {
        let mut p = beer();
        p.is_expense = false;
        assert!(p.to_expense().is_none());
    }

    #[test]
    fn payer_wire_format() {
        assert_eq!(Payer::from("caixa".to_string()), Payer::Caixa);
        assert_eq!(Payer::from(String::new()), Payer::Unassigned);
        let json = serde_json::to_value(Payer::Caixa).unwrap();
        assert_eq!(json, "caixa");
        let p: Payer = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(p.profile_id(), Some("abc"));
    }

    #[test]
    fn patch_recomputes_total() {
        let mut p = beer();
        PurchasePatch {
            quantity: Some(1.0),
            ..Default::default()
        }
        .apply(&mut p)
        .unwrap();
        assert_eq!(p.total_price, Money::from_cents(8_990));

        let bad = PurchasePatch {
            quantity: Some(-1.0),
            ..Default::default()
        };
        assert!(bad.apply(&mut p).is_err());
    }

    #[test]
    fn patch_rejects_blank_description() {
        let mut p = beer();
        let blank = PurchasePatch {
            description: Some("   ".into()),
            ..Default::default()
        };
        assert!(matches!(blank.apply(&mut p), Err(crate::Error::InvalidInput(_))));
        assert_eq!(p.description, "Cerveja");
    }

    #[test]
    fn runaway_totals_rejected() {
        let mut p = beer();
        let huge = PurchasePatch {
            quantity: Some(1e300),
            ..Default::default()
        };
        assert!(matches!(
            huge.apply(&mut p),
            Err(crate::Error::Rateio(expedicao_rateio::Error::InvalidAmount(_)))
        ));

        let mut new = NewPurchase {
            description: "Barco".into(),
            quantity: 1.0,
            unit_price: Money::from_cents(i64::MAX),
            purchase_date: NaiveDate::from_ymd_opt(2025, 7, 9).unwrap(),
            purchased_by: Payer::Unassigned,
            category: "Outros".into(),
            is_expense: true,
            is_for_drinkers_only: false,
            is_paid: false,
        };
        assert!(matches!(new.validate(), Err(crate::Error::InvalidInput(_))));
        new.unit_price = Money::MAX;
        new.quantity = 3.0;
        assert!(new.validate().is_ok());
        assert!(new.into_purchase("t2".into(), "e1".into()).is_err());
    }
}
