//! Club domain operations.
//!
//! [`Club`] wraps the shared [`Storage`] and implements everything the API
//! exposes. Each area lives in its own module as an `impl Club` block.
//! Operations that write more than one record go through a single
//! [`crate::storage::Batch`].
//!
//! Callers serialize mutations (the node holds the club behind an async
//! `RwLock`), so read-modify-write sequences here do not race each other.

mod checklist;
mod expeditions;
mod fees;
mod ledger;
mod profiles;
mod purchases;
mod settings;
mod tasks;
mod teams;
mod tshirts;
mod users;

pub use checklist::{ChecklistProgress, SuggestedItem};
pub use expeditions::Overview;
pub use fees::{DelayedPartner, FeeLine, FeeSummary};
pub use ledger::CashSummary;
pub use settings::{BrandingPatch, CategoryList};
pub use tasks::{TaskBoard, TaskColumn};
pub use tshirts::TShirtSummary;

use crate::error::Result;
use crate::models::{EntryKind, EntrySource, EntryStatus, LedgerEntry, Purchase};
use crate::storage::Storage;
use std::sync::Arc;

/// Provider recorded on ledger entries paid out of the expedition cash box.
pub const CASH_BOX_PROVIDER: &str = "Caixa da Expedição";

/// Entry point for club operations.
#[derive(Clone)]
pub struct Club {
    storage: Arc<Storage>,
}

impl Club {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }
}

/// Ledger payment for a purchase taken from the cash box.
fn cash_box_entry(purchase: &Purchase) -> LedgerEntry {
    LedgerEntry {
        id: crate::models::new_id(&purchase.id),
        kind: EntryKind::Saida,
        description: purchase.description.clone(),
        amount: purchase.total_price,
        category: purchase.category.clone(),
        date: purchase.purchase_date,
        payment_date: Some(purchase.purchase_date),
        status: EntryStatus::Pago,
        profile_id: None,
        provider: Some(CASH_BOX_PROVIDER.to_string()),
        expedition_id: Some(purchase.expedition_id.clone()),
        source: EntrySource::ContaAPagar,
        notes: None,
        attachment_url: None,
        monthly_fee_id: None,
        purchase_id: Some(purchase.id.clone()),
    }
}

/// Percentage rounded to the nearest integer, zero for an empty set.
fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fixtures shared by the club tests.

    use super::Club;
    use crate::models::{NewExpedition, NewProfile, ProfileKind};
    use crate::storage::Storage;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use tempfile::TempDir;

    pub fn club() -> (TempDir, Club) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        (dir, Club::new(Arc::new(storage)))
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn member(club: &Club, name: &str, drinks: bool) -> String {
        club.create_profile(NewProfile {
            name: name.into(),
            kind: ProfileKind::Socio,
            phone: String::new(),
            email: None,
            drinks_alcohol: drinks,
            is_active: true,
        })
        .unwrap()
        .id
    }

    pub fn trip(club: &Club, participants: &[&String]) -> String {
        club.create_expedition(NewExpedition {
            name: "Rio Araguaia".into(),
            year: 2025,
            start_date: date(2025, 7, 10),
            end_date: date(2025, 7, 17),
            location: "São Félix do Araguaia".into(),
            participants: participants.iter().map(|p| p.to_string()).collect(),
        })
        .unwrap()
        .id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(4, 4), 100);
    }
}
