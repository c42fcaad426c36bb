//! Club data models.
//!
//! Every record is stored as JSON under its own key prefix and carries a
//! string `id`. Enum variants serialize to the labels the club uses day to
//! day (`"Sócio"`, `"Em Andamento"`, `"ENTRADA"`, ...).
//!
//! # People
//!
//! - [`Profile`] - club member or guest
//! - [`User`] - someone who can sign in, with a [`Role`]
//!
//! # Expeditions
//!
//! - [`Expedition`] - a trip and its participants
//! - [`Purchase`] - something bought for a trip
//! - [`Task`], [`Boat`], [`Team`], [`ChecklistItem`], [`TShirtOrder`]
//!
//! # Club finances
//!
//! - [`MonthlyFee`] - dues owed by a partner for one month
//! - [`LedgerEntry`] - a line in the general cash ledger

mod checklist;
mod expedition;
mod fee;
mod ledger;
mod profile;
mod purchase;
mod settings;
mod task;
mod team;
mod tshirt;
mod user;

pub use checklist::{
    ChecklistCategory, ChecklistItem, ChecklistItemPatch, ChecklistTemplate, ChecklistTemplatePatch,
    NewChecklistItem, NewChecklistTemplate,
};
pub use expedition::{Expedition, ExpeditionPatch, NewExpedition};
pub use fee::{FeeStatus, FeePatch, MonthlyFee, PaymentMethod};
pub use ledger::{EntryKind, EntrySource, EntryStatus, LedgerEntry, LedgerPatch, NewLedgerEntry};
pub use profile::{NewProfile, Profile, ProfileKind, ProfilePatch};
pub use purchase::{NewPurchase, Payer, Purchase, PurchasePatch, ALCOHOL_CATEGORY};
pub use settings::Settings;
pub use task::{NewTask, Task, TaskCategory, TaskPatch, TaskPriority, TaskStatus};
pub use team::{Boat, NewBoat, NewTeam, Team};
pub use tshirt::{NewTShirtOrder, ShirtSize, TShirtOrder, TShirtPatch};
pub use user::{NewUser, Role, User};

use expedicao_rateio::Money;
use serde::{de::DeserializeOwned, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// A persisted record with its own key prefix.
pub trait Record: Serialize + DeserializeOwned {
    /// Key prefix in storage, without the trailing colon.
    const PREFIX: &'static str;

    fn id(&self) -> &str;
}

/// Generate a record ID.
///
/// 16 hex digits of creation time in nanoseconds followed by 16 hex digits of
/// a blake3 hash over the seed and a random nonce. Keys therefore sort in
/// creation order, which is the order [`crate::Storage::list`] returns.
pub fn new_id(seed: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let nonce: u64 = rand::random();

    let mut hasher = blake3::Hasher::new();
    hasher.update(seed.as_bytes());
    hasher.update(&nonce.to_le_bytes());

    let mut id = format!("{:016x}", nanos);
    id.push_str(&hex::encode(&hasher.finalize().as_bytes()[..8]));
    id
}

/// Reject blank required text fields.
pub(crate) fn require_text(field: &str, value: &str) -> crate::Result<()> {
    if value.trim().is_empty() {
        return Err(crate::Error::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Reject amounts beyond [`Money::MAX`] either side of zero.
pub(crate) fn require_amount(field: &str, amount: Money) -> crate::Result<()> {
    if amount.in_range().is_err() {
        return Err(crate::Error::InvalidInput(format!(
            "{} out of range: {}",
            field, amount
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_hex() {
        let a = new_id("same");
        let b = new_id("same");
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn ids_sort_by_creation() {
        let first = new_id("x");
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = new_id("x");
        assert!(first < second);
    }

    #[test]
    fn blank_text_rejected() {
        assert!(require_text("name", "  ").is_err());
        assert!(require_text("name", "Pesca 2025").is_ok());
    }

    #[test]
    fn huge_amounts_rejected() {
        assert!(require_amount("amount", Money::MAX).is_ok());
        assert!(require_amount("amount", -Money::MAX).is_ok());
        assert!(matches!(
            require_amount("amount", Money::from_cents(i64::MAX)),
            Err(crate::Error::InvalidInput(_))
        ));
    }
}
