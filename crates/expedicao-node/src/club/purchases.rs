use super::{cash_box_entry, Club};
use crate::error::Result;
use crate::models::{
    new_id, ChecklistItem, Expedition, LedgerEntry, NewPurchase, Payer, Profile, Purchase,
    PurchasePatch,
};
use crate::storage::Batch;
use expedicao_rateio::{settle, Contribution, Participant, Settlement};

impl Club {
    pub(crate) fn check_payer(&self, payer: &Payer) -> Result<()> {
        if let Payer::Profile(id) = payer {
            self.storage.require::<Profile>(id)?;
        }
        Ok(())
    }

    /// Bring the cash-box ledger entry of a purchase in line with its payer.
    pub(crate) fn sync_cash_box(&self, batch: &mut Batch<'_>, purchase: &Purchase) -> Result<()> {
        let existing = self
            .storage
            .list_where(|e: &LedgerEntry| e.purchase_id.as_deref() == Some(purchase.id.as_str()))?;

        if purchase.purchased_by == Payer::Caixa {
            let mut entry = cash_box_entry(purchase);
            if let Some(current) = existing.first() {
                entry.id = current.id.clone();
                entry.description = current.description.clone();
                entry.notes = current.notes.clone();
                entry.attachment_url = current.attachment_url.clone();
            }
            batch.put(&entry)?;
            for extra in existing.iter().skip(1) {
                batch.delete::<LedgerEntry>(&extra.id);
            }
        } else {
            for entry in &existing {
                batch.delete::<LedgerEntry>(&entry.id);
            }
        }
        Ok(())
    }

    /// Record a purchase. Paying from the cash box also books the outflow.
    pub fn add_purchase(&self, expedition_id: &str, new: NewPurchase) -> Result<Purchase> {
        self.storage.require::<Expedition>(expedition_id)?;
        new.validate()?;
        self.check_payer(&new.purchased_by)?;

        let purchase = new.into_purchase(new_id("purchase"), expedition_id.to_string())?;
        let mut batch = self.storage.batch();
        batch.put(&purchase)?;
        self.sync_cash_box(&mut batch, &purchase)?;
        batch.commit()?;

        tracing::info!(
            expedition = %expedition_id,
            purchase = %purchase.id,
            total = %purchase.total_price,
            "Added purchase {}",
            purchase.description
        );
        Ok(purchase)
    }

    pub fn get_purchase(&self, id: &str) -> Result<Purchase> {
        self.storage.require(id)
    }

    /// Purchases of an expedition in the order they were recorded.
    pub fn list_purchases(&self, expedition_id: &str) -> Result<Vec<Purchase>> {
        self.storage.require::<Expedition>(expedition_id)?;
        self.storage
            .list_where(|p: &Purchase| p.expedition_id == expedition_id)
    }

    /// Update a purchase and mirror the changed fields onto its checklist item.
    pub fn update_purchase(&self, id: &str, patch: PurchasePatch) -> Result<Purchase> {
        let mut purchase: Purchase = self.storage.require(id)?;
        if let Some(payer) = &patch.purchased_by {
            self.check_payer(payer)?;
        }

        let renamed = patch.description.is_some();
        let requantified = patch.quantity.is_some();
        let repriced = patch.quantity.is_some() || patch.unit_price.is_some();
        let paid_changed = patch.is_paid.is_some();
        patch.apply(&mut purchase)?;

        let mut batch = self.storage.batch();
        batch.put(&purchase)?;
        for mut item in self.linked_items(&purchase.id)? {
            if renamed {
                item.name = purchase.description.clone();
            }
            if requantified {
                item.quantity = Some(purchase.quantity);
            }
            if repriced {
                item.unit_price = Some(purchase.unit_price);
                item.total_price = Some(purchase.total_price);
            }
            if paid_changed {
                item.is_checked = purchase.is_paid;
            }
            batch.put(&item)?;
        }
        self.sync_cash_box(&mut batch, &purchase)?;
        batch.commit()?;

        Ok(purchase)
    }

    /// Delete a purchase. Linked checklist items are unlinked and unchecked.
    pub fn delete_purchase(&self, id: &str) -> Result<()> {
        self.storage.require::<Purchase>(id)?;

        let mut batch = self.storage.batch();
        self.remove_purchase(&mut batch, id, None)?;
        batch.commit()?;

        tracing::info!(purchase = %id, "Deleted purchase");
        Ok(())
    }

    /// Queue a purchase and its cash-box ledger entries for deletion.
    ///
    /// Checklist items launched as the purchase are unlinked and unchecked,
    /// except `deleted_item`, which the caller removes in the same batch.
    pub(crate) fn remove_purchase(
        &self,
        batch: &mut Batch<'_>,
        purchase_id: &str,
        deleted_item: Option<&str>,
    ) -> Result<()> {
        for mut item in self.linked_items(purchase_id)? {
            if Some(item.id.as_str()) == deleted_item {
                continue;
            }
            item.purchase_id = None;
            item.is_checked = false;
            batch.put(&item)?;
        }
        for entry in self
            .storage
            .list_where(|e: &LedgerEntry| e.purchase_id.as_deref() == Some(purchase_id))?
        {
            batch.delete::<LedgerEntry>(&entry.id);
        }
        batch.delete::<Purchase>(purchase_id);
        Ok(())
    }

    fn linked_items(&self, purchase_id: &str) -> Result<Vec<ChecklistItem>> {
        self.storage
            .list_where(|i: &ChecklistItem| i.purchase_id.as_deref() == Some(purchase_id))
    }

    /// Split the expedition's expenses and compute every participant's balance.
    ///
    /// Participants whose profile no longer exists are left out.
    pub fn settlement(&self, expedition_id: &str) -> Result<Settlement> {
        let expedition: Expedition = self.storage.require(expedition_id)?;

        let mut participants = Vec::with_capacity(expedition.participants.len());
        for id in &expedition.participants {
            match self.storage.get::<Profile>(id)? {
                Some(profile) => participants.push(Participant::new(id, profile.drinks_alcohol)),
                None => tracing::warn!(
                    expedition = %expedition_id,
                    profile = %id,
                    "Participant has no profile, leaving out of settlement"
                ),
            }
        }

        let expenses: Vec<_> = self
            .storage
            .list_where(|p: &Purchase| p.expedition_id == expedition_id)?
            .iter()
            .filter_map(Purchase::to_expense)
            .collect();

        let contributions: Vec<_> = self
            .storage
            .list_where(|e: &LedgerEntry| {
                e.is_receipt() && e.expedition_id.as_deref() == Some(expedition_id)
            })?
            .into_iter()
            .filter_map(|e| e.profile_id.map(|p| Contribution::new(p, e.amount)))
            .collect();

        let settlement = settle(&participants, &expenses, &contributions)?;
        tracing::debug!(
            expedition = %expedition_id,
            participants = participants.len(),
            expenses = expenses.len(),
            outstanding = %settlement.outstanding(),
            "Computed settlement"
        );
        Ok(settlement)
    }
}
