use super::{percent, Club};
use crate::error::{Error, Result};
use crate::models::{
    new_id, Boat, ChecklistItem, ChecklistTemplate, Expedition, ExpeditionPatch, LedgerEntry,
    NewExpedition, Profile, Purchase, Record, TShirtOrder, Task, TaskStatus, Team,
};
use expedicao_rateio::Money;
use serde::Serialize;

/// Dashboard numbers for one expedition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub expedition: Expedition,
    pub participant_count: usize,
    pub total_expense: Money,
    /// Zero when nobody is going
    pub cost_per_person: Money,
    pub checklist_progress: u32,
    /// Up to four open tasks
    pub pending_tasks: Vec<Task>,
    /// Up to four purchases, newest first
    pub recent_purchases: Vec<Purchase>,
}

const OVERVIEW_LIMIT: usize = 4;

impl Club {
    fn check_profiles_exist(&self, ids: &[String]) -> Result<()> {
        for id in ids {
            if !self.storage.exists::<Profile>(id)? {
                return Err(Error::not_found(Profile::PREFIX, id));
            }
        }
        Ok(())
    }

    /// Create an expedition and seed its checklist from the templates.
    pub fn create_expedition(&self, new: NewExpedition) -> Result<Expedition> {
        new.validate()?;
        self.check_profiles_exist(&new.participants)?;

        let expedition = new.into_expedition(new_id("expedition"));
        let templates: Vec<ChecklistTemplate> = self.storage.list()?;

        let mut batch = self.storage.batch();
        batch.put(&expedition)?;
        for template in &templates {
            let item = ChecklistItem::from_template(
                new_id(&template.name),
                expedition.id.clone(),
                template,
            );
            batch.put(&item)?;
        }
        batch.commit()?;

        tracing::info!(
            expedition = %expedition.id,
            checklist_items = templates.len(),
            "Created expedition {}",
            expedition.name
        );
        Ok(expedition)
    }

    pub fn get_expedition(&self, id: &str) -> Result<Expedition> {
        self.storage.require(id)
    }

    /// All expeditions, most recent start date first.
    pub fn list_expeditions(&self) -> Result<Vec<Expedition>> {
        let mut expeditions: Vec<Expedition> = self.storage.list()?;
        expeditions.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(expeditions)
    }

    pub fn update_expedition(&self, id: &str, patch: ExpeditionPatch) -> Result<Expedition> {
        let mut expedition: Expedition = self.storage.require(id)?;
        if let Some(participants) = &patch.participants {
            self.check_profiles_exist(participants)?;
        }
        patch.apply(&mut expedition)?;
        self.storage.put(&expedition)?;
        Ok(expedition)
    }

    /// Delete an expedition and everything that belongs to it.
    pub fn delete_expedition(&self, id: &str) -> Result<()> {
        self.storage.require::<Expedition>(id)?;

        let purchases = self.storage.list_where(|p: &Purchase| p.expedition_id == id)?;
        let mut batch = self.storage.batch();
        for entry in self.storage.list_where(|e: &LedgerEntry| {
            e.purchase_id
                .as_deref()
                .is_some_and(|pid| purchases.iter().any(|p| p.id == pid))
        })? {
            batch.delete::<LedgerEntry>(&entry.id);
        }
        for purchase in &purchases {
            batch.delete::<Purchase>(&purchase.id);
        }
        for item in self.storage.list_where(|i: &ChecklistItem| i.expedition_id == id)? {
            batch.delete::<ChecklistItem>(&item.id);
        }
        for order in self.storage.list_where(|o: &TShirtOrder| o.expedition_id == id)? {
            batch.delete::<TShirtOrder>(&order.id);
        }
        for task in self.storage.list_where(|t: &Task| t.expedition_id == id)? {
            batch.delete::<Task>(&task.id);
        }
        for team in self.storage.list_where(|t: &Team| t.expedition_id == id)? {
            batch.delete::<Team>(&team.id);
        }
        for boat in self.storage.list_where(|b: &Boat| b.expedition_id == id)? {
            batch.delete::<Boat>(&boat.id);
        }
        batch.delete::<Expedition>(id);

        let removed = batch.len();
        batch.commit()?;
        tracing::info!(expedition = %id, records = removed, "Deleted expedition");
        Ok(())
    }

    /// Add or remove a profile from the expedition. Returns the updated expedition.
    pub fn toggle_participant(&self, expedition_id: &str, profile_id: &str) -> Result<Expedition> {
        let mut expedition: Expedition = self.storage.require(expedition_id)?;
        self.storage.require::<Profile>(profile_id)?;

        let joined = expedition.toggle_participant(profile_id);
        self.storage.put(&expedition)?;
        tracing::debug!(
            expedition = %expedition_id,
            profile = %profile_id,
            joined,
            "Toggled participant"
        );
        Ok(expedition)
    }

    pub fn overview(&self, expedition_id: &str) -> Result<Overview> {
        let expedition: Expedition = self.storage.require(expedition_id)?;

        let purchases = self
            .storage
            .list_where(|p: &Purchase| p.expedition_id == expedition_id)?;
        let total_expense: Money = purchases
            .iter()
            .filter(|p| p.is_expense)
            .map(|p| p.total_price)
            .sum();
        let participant_count = expedition.participants.len();
        let cost_per_person = total_expense.split(participant_count);

        let items = self
            .storage
            .list_where(|i: &ChecklistItem| i.expedition_id == expedition_id)?;
        let checked = items.iter().filter(|i| i.is_checked).count();

        let pending_tasks = self
            .storage
            .list_where(|t: &Task| t.expedition_id == expedition_id && t.status != TaskStatus::Concluido)?
            .into_iter()
            .take(OVERVIEW_LIMIT)
            .collect();

        let recent_purchases = purchases.into_iter().rev().take(OVERVIEW_LIMIT).collect();

        Ok(Overview {
            expedition,
            participant_count,
            total_expense,
            cost_per_person,
            checklist_progress: percent(checked, items.len()),
            pending_tasks,
            recent_purchases,
        })
    }
}
