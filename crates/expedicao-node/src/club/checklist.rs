use super::{percent, Club};
use crate::error::{Error, Result};
use crate::models::{
    new_id, require_text, ChecklistCategory, ChecklistItem, ChecklistItemPatch,
    ChecklistTemplate, ChecklistTemplatePatch, Expedition, NewChecklistItem,
    NewChecklistTemplate, Payer, Profile, Purchase, PurchasePatch,
};
use chrono::NaiveDate;
use serde::Serialize;

/// One line of the default shopping or camping list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestedItem {
    pub name: &'static str,
    pub quantity: f64,
    pub unit: &'static str,
}

impl SuggestedItem {
    fn new(name: &'static str, quantity: f64, unit: &'static str) -> Self {
        Self { name, quantity, unit }
    }

    /// The club's usual list for `category`, scaled to the group.
    pub fn defaults(category: ChecklistCategory, participants: usize, drinkers: usize) -> Vec<Self> {
        let people = participants as f64;
        match category {
            ChecklistCategory::Mercado => vec![
                Self::new("Carne para Churrasco", people * 0.5, "KG"),
                Self::new("Carvão", 2.0, "PCT"),
                Self::new("Cerveja", drinkers as f64 * 2.0, "CX"),
                Self::new("Refrigerante / Suco", people, "UN"),
                Self::new("Arroz", 5.0, "KG"),
                Self::new("Sal e Temperos", 1.0, "UN"),
            ],
            ChecklistCategory::Acampamento => vec![
                Self::new("Barracas", participants.div_ceil(2) as f64, "UN"),
                Self::new("Gerador de Energia", 1.0, "UN"),
                Self::new("Gasolina p/ Gerador", 20.0, "L"),
                Self::new("Freezer / Caixas Térmicas", 2.0, "UN"),
                Self::new("Panela de Ferro", 1.0, "UN"),
            ],
        }
    }
}

/// Checked items out of the total for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistProgress {
    pub category: ChecklistCategory,
    pub total: usize,
    pub checked: usize,
    pub percent: u32,
}

fn launch_description(item: &ChecklistItem) -> String {
    let label = item.category.label();
    match (item.quantity, item.unit.as_deref()) {
        (Some(q), Some(unit)) => format!("[{}] {} ({} {})", label, item.name, q, unit),
        (Some(q), None) => format!("[{}] {} ({})", label, item.name, q),
        _ => format!("[{}] {}", label, item.name),
    }
}

impl Club {
    pub fn add_checklist_item(
        &self,
        expedition_id: &str,
        new: NewChecklistItem,
    ) -> Result<ChecklistItem> {
        self.storage.require::<Expedition>(expedition_id)?;
        require_text("name", &new.name)?;
        let item = new.into_item(new_id("checklist"), expedition_id.to_string())?;
        self.storage.put(&item)?;
        Ok(item)
    }

    pub fn get_checklist_item(&self, id: &str) -> Result<ChecklistItem> {
        self.storage.require(id)
    }

    pub fn list_checklist(&self, expedition_id: &str) -> Result<Vec<ChecklistItem>> {
        self.storage.require::<Expedition>(expedition_id)?;
        self.storage
            .list_where(|i: &ChecklistItem| i.expedition_id == expedition_id)
    }

    /// Update an item and mirror the changed fields onto its launched purchase.
    pub fn update_checklist_item(
        &self,
        id: &str,
        patch: ChecklistItemPatch,
    ) -> Result<ChecklistItem> {
        let mut item: ChecklistItem = self.storage.require(id)?;
        if let Some(name) = &patch.name {
            require_text("name", name)?;
        }

        let mut mirror = PurchasePatch {
            description: patch.name.clone(),
            is_paid: patch.is_checked,
            ..Default::default()
        };
        let repriced = patch.quantity.is_some() || patch.unit_price.is_some();
        patch.apply(&mut item)?;
        if repriced {
            mirror.quantity = item.quantity;
            mirror.unit_price = item.unit_price;
        }

        let mut batch = self.storage.batch();
        batch.put(&item)?;
        if let Some(purchase_id) = &item.purchase_id {
            if let Some(mut purchase) = self.storage.get::<Purchase>(purchase_id)? {
                mirror.apply(&mut purchase)?;
                batch.put(&purchase)?;
                self.sync_cash_box(&mut batch, &purchase)?;
            }
        }
        batch.commit()?;
        Ok(item)
    }

    /// Delete an item along with the purchase it was launched as.
    pub fn delete_checklist_item(&self, id: &str) -> Result<()> {
        let item: ChecklistItem = self.storage.require(id)?;

        let mut batch = self.storage.batch();
        if let Some(purchase_id) = &item.purchase_id {
            if self.storage.exists::<Purchase>(purchase_id)? {
                self.remove_purchase(&mut batch, purchase_id, Some(id))?;
            }
        }
        batch.delete::<ChecklistItem>(id);
        batch.commit()?;

        tracing::info!(item = %id, purchase = ?item.purchase_id, "Deleted checklist item");
        Ok(())
    }

    /// Flip the checked flag. A launched item carries it to the purchase's paid flag.
    pub fn toggle_checklist_item(&self, id: &str) -> Result<ChecklistItem> {
        let checked = !self.storage.require::<ChecklistItem>(id)?.is_checked;
        self.update_checklist_item(
            id,
            ChecklistItemPatch {
                is_checked: Some(checked),
                ..Default::default()
            },
        )
    }

    /// Add the default list for `category`, sized to the expedition.
    pub fn suggest_items(
        &self,
        expedition_id: &str,
        category: ChecklistCategory,
    ) -> Result<Vec<ChecklistItem>> {
        let expedition: Expedition = self.storage.require(expedition_id)?;
        let mut drinkers = 0;
        for id in &expedition.participants {
            if self
                .storage
                .get::<Profile>(id)?
                .is_some_and(|p| p.drinks_alcohol)
            {
                drinkers += 1;
            }
        }

        let mut batch = self.storage.batch();
        let mut items = Vec::new();
        for suggestion in SuggestedItem::defaults(category, expedition.participants.len(), drinkers) {
            let item = ChecklistItem {
                id: new_id(suggestion.name),
                expedition_id: expedition_id.to_string(),
                category,
                name: suggestion.name.to_string(),
                quantity: Some(suggestion.quantity),
                unit: Some(suggestion.unit.to_string()),
                unit_price: None,
                total_price: None,
                purchase_id: None,
                is_checked: false,
            };
            batch.put(&item)?;
            items.push(item);
        }
        batch.commit()?;
        Ok(items)
    }

    /// Turn a priced item into an expedition purchase and link the two.
    pub fn launch_item(
        &self,
        item_id: &str,
        payer: Payer,
        drinkers_only: bool,
        today: NaiveDate,
    ) -> Result<(ChecklistItem, Purchase)> {
        let mut item: ChecklistItem = self.storage.require(item_id)?;
        if item.purchase_id.is_some() {
            return Err(Error::Conflict(format!("item {} already launched", item_id)));
        }
        let total = item
            .total_price
            .filter(|t| !t.is_zero())
            .ok_or_else(|| Error::InvalidInput(format!("item {} has no price", item_id)))?;
        self.check_payer(&payer)?;
        let expedition: Expedition = self.storage.require(&item.expedition_id)?;

        let purchase = Purchase {
            id: new_id("purchase"),
            expedition_id: item.expedition_id.clone(),
            description: launch_description(&item),
            quantity: 1.0,
            unit_price: total,
            total_price: total,
            purchase_date: today,
            purchased_by: payer,
            category: item.category.purchase_category().to_string(),
            is_expense: true,
            is_for_drinkers_only: drinkers_only,
            is_paid: false,
        };
        item.purchase_id = Some(purchase.id.clone());

        let mut batch = self.storage.batch();
        batch.put(&purchase)?;
        batch.put(&item)?;
        if purchase.purchased_by == Payer::Caixa {
            let mut entry = super::cash_box_entry(&purchase);
            entry.description = format!("Despesa Expedição {} - {}", expedition.name, item.name);
            batch.put(&entry)?;
        }
        batch.commit()?;

        tracing::info!(
            item = %item.id,
            purchase = %purchase.id,
            total = %total,
            "Launched checklist item as expense"
        );
        Ok((item, purchase))
    }

    pub fn checklist_progress(&self, expedition_id: &str) -> Result<Vec<ChecklistProgress>> {
        let items = self.list_checklist(expedition_id)?;
        Ok([ChecklistCategory::Mercado, ChecklistCategory::Acampamento]
            .into_iter()
            .map(|category| {
                let total = items.iter().filter(|i| i.category == category).count();
                let checked = items
                    .iter()
                    .filter(|i| i.category == category && i.is_checked)
                    .count();
                ChecklistProgress {
                    category,
                    total,
                    checked,
                    percent: percent(checked, total),
                }
            })
            .collect())
    }

    // --- Templates ---

    pub fn create_template(&self, new: NewChecklistTemplate) -> Result<ChecklistTemplate> {
        require_text("name", &new.name)?;
        let template = new.into_template(new_id("template"))?;
        self.storage.put(&template)?;
        Ok(template)
    }

    pub fn update_template(
        &self,
        id: &str,
        patch: ChecklistTemplatePatch,
    ) -> Result<ChecklistTemplate> {
        let mut template: ChecklistTemplate = self.storage.require(id)?;
        patch.apply(&mut template)?;
        self.storage.put(&template)?;
        Ok(template)
    }

    pub fn delete_template(&self, id: &str) -> Result<()> {
        self.storage.require::<ChecklistTemplate>(id)?;
        self.storage.delete::<ChecklistTemplate>(id)
    }

    pub fn list_templates(&self) -> Result<Vec<ChecklistTemplate>> {
        self.storage.list()
    }

    /// Replace every template with the expedition's current checklist.
    pub fn save_as_templates(&self, expedition_id: &str) -> Result<Vec<ChecklistTemplate>> {
        let items = self.list_checklist(expedition_id)?;

        let mut batch = self.storage.batch();
        for old in self.storage.list::<ChecklistTemplate>()? {
            batch.delete::<ChecklistTemplate>(&old.id);
        }
        let templates: Vec<_> = items
            .iter()
            .map(|item| ChecklistTemplate::from_item(new_id(&item.name), item))
            .collect();
        for template in &templates {
            batch.put(template)?;
        }
        batch.commit()?;

        tracing::info!(
            expedition = %expedition_id,
            templates = templates.len(),
            "Saved checklist as templates"
        );
        Ok(templates)
    }
}
