use super::Club;
use crate::error::{Error, Result};
use crate::models::{
    new_id, require_amount, require_text, EntryKind, Expedition, LedgerEntry, LedgerPatch, MonthlyFee,
    NewLedgerEntry, Profile,
};
use chrono::NaiveDate;
use expedicao_rateio::Money;
use serde::Serialize;

/// Settled money in and out of the club cash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CashSummary {
    pub received: Money,
    pub paid: Money,
    pub balance: Money,
}

impl Club {
    fn check_entry_links(&self, entry: &LedgerEntry) -> Result<()> {
        require_text("description", &entry.description)?;
        if entry.amount.is_negative() {
            return Err(Error::InvalidInput(format!(
                "negative amount {}",
                entry.amount
            )));
        }
        require_amount("amount", entry.amount)?;
        if let Some(profile_id) = &entry.profile_id {
            self.storage.require::<Profile>(profile_id)?;
        }
        if let Some(expedition_id) = &entry.expedition_id {
            self.storage.require::<Expedition>(expedition_id)?;
        }
        Ok(())
    }

    pub fn add_ledger_entry(&self, new: NewLedgerEntry) -> Result<LedgerEntry> {
        let entry = new.into_entry(new_id("ledger"));
        self.check_entry_links(&entry)?;
        self.storage.put(&entry)?;
        tracing::info!(
            entry = %entry.id,
            kind = ?entry.kind,
            amount = %entry.amount,
            "Ledger entry added"
        );
        Ok(entry)
    }

    pub fn get_ledger_entry(&self, id: &str) -> Result<LedgerEntry> {
        self.storage.require(id)
    }

    /// Entries newest first, optionally only inflows or outflows.
    pub fn list_ledger(&self, kind: Option<EntryKind>) -> Result<Vec<LedgerEntry>> {
        let mut entries = self
            .storage
            .list_where(|e: &LedgerEntry| kind.map_or(true, |k| e.kind == k))?;
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(entries)
    }

    pub fn update_ledger_entry(&self, id: &str, patch: LedgerPatch) -> Result<LedgerEntry> {
        let mut entry: LedgerEntry = self.storage.require(id)?;
        patch.apply(&mut entry);
        self.check_entry_links(&entry)?;
        self.storage.put(&entry)?;
        Ok(entry)
    }

    /// Delete an entry. A fee it paid goes back to pending.
    pub fn delete_ledger_entry(&self, id: &str) -> Result<()> {
        let entry: LedgerEntry = self.storage.require(id)?;

        let mut batch = self.storage.batch();
        if let Some(fee_id) = &entry.monthly_fee_id {
            if let Some(mut fee) = self.storage.get::<MonthlyFee>(fee_id)? {
                fee.reset();
                batch.put(&fee)?;
                tracing::info!(fee = %fee_id, "Fee reset after its receipt was deleted");
            }
        }
        batch.delete::<LedgerEntry>(id);
        batch.commit()
    }

    /// Settle an entry as of `today`.
    pub fn mark_entry_done(&self, id: &str, today: NaiveDate) -> Result<LedgerEntry> {
        let mut entry: LedgerEntry = self.storage.require(id)?;
        entry.mark_done(today);
        self.storage.put(&entry)?;
        Ok(entry)
    }

    pub fn cash_summary(&self) -> Result<CashSummary> {
        let entries: Vec<LedgerEntry> = self.storage.list()?;
        let received: Money = entries
            .iter()
            .filter(|e| e.is_receipt())
            .map(|e| e.amount)
            .sum();
        let paid: Money = entries
            .iter()
            .filter(|e| e.is_payment())
            .map(|e| e.amount)
            .sum();
        Ok(CashSummary {
            received,
            paid,
            balance: received - paid,
        })
    }
}
