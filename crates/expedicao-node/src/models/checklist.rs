//! Supply checklist items and reusable templates.

use super::Record;
use expedicao_rateio::Money;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChecklistCategory {
    /// Groceries
    Mercado,
    /// Camping gear
    Acampamento,
}

impl ChecklistCategory {
    /// Purchase category used when an item is launched as an expense.
    pub fn purchase_category(self) -> &'static str {
        match self {
            ChecklistCategory::Mercado => "Mercado",
            ChecklistCategory::Acampamento => "Camping",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChecklistCategory::Mercado => "Mercado",
            ChecklistCategory::Acampamento => "Acampamento",
        }
    }
}

/// `quantity × unit_price` when both are known.
fn line_total(quantity: Option<f64>, unit_price: Option<Money>) -> crate::Result<Option<Money>> {
    if let Some(price) = unit_price {
        super::require_amount("unit_price", price)?;
    }
    match (quantity, unit_price) {
        (Some(q), Some(p)) if q > 0.0 && !p.is_zero() => Ok(Some(p.times(q)?)),
        _ => Ok(None),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub expedition_id: String,
    pub category: ChecklistCategory,
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub unit_price: Option<Money>,
    pub total_price: Option<Money>,
    /// Purchase created when the item was launched as an expense
    pub purchase_id: Option<String>,
    #[serde(default)]
    pub is_checked: bool,
}

impl ChecklistItem {
    pub fn from_template(id: String, expedition_id: String, template: &ChecklistTemplate) -> Self {
        Self {
            id,
            expedition_id,
            category: template.category,
            name: template.name.clone(),
            quantity: template.quantity,
            unit: template.unit.clone(),
            unit_price: template.unit_price,
            total_price: template.total_price,
            purchase_id: None,
            is_checked: false,
        }
    }
}

impl Record for ChecklistItem {
    const PREFIX: &'static str = "checklist";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewChecklistItem {
    pub category: ChecklistCategory,
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub unit_price: Option<Money>,
}

impl NewChecklistItem {
    pub fn into_item(self, id: String, expedition_id: String) -> crate::Result<ChecklistItem> {
        Ok(ChecklistItem {
            id,
            expedition_id,
            category: self.category,
            name: self.name,
            quantity: self.quantity,
            unit: self.unit,
            unit_price: self.unit_price,
            total_price: line_total(self.quantity, self.unit_price)?,
            purchase_id: None,
            is_checked: false,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChecklistItemPatch {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub unit_price: Option<Money>,
    pub is_checked: Option<bool>,
}

impl ChecklistItemPatch {
    pub fn apply(self, item: &mut ChecklistItem) -> crate::Result<()> {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(quantity) = self.quantity {
            item.quantity = Some(quantity);
        }
        if let Some(unit) = self.unit {
            item.unit = Some(unit);
        }
        if let Some(price) = self.unit_price {
            item.unit_price = Some(price);
        }
        if let Some(checked) = self.is_checked {
            item.is_checked = checked;
        }
        item.total_price = line_total(item.quantity, item.unit_price)?;
        Ok(())
    }
}

/// A checklist line copied into every new expedition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistTemplate {
    pub id: String,
    pub category: ChecklistCategory,
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub unit_price: Option<Money>,
    pub total_price: Option<Money>,
}

impl ChecklistTemplate {
    pub fn from_item(id: String, item: &ChecklistItem) -> Self {
        Self {
            id,
            category: item.category,
            name: item.name.clone(),
            quantity: item.quantity,
            unit: item.unit.clone(),
            unit_price: item.unit_price,
            total_price: item.total_price,
        }
    }
}

impl Record for ChecklistTemplate {
    const PREFIX: &'static str = "template";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewChecklistTemplate {
    pub category: ChecklistCategory,
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub unit_price: Option<Money>,
}

impl NewChecklistTemplate {
    pub fn into_template(self, id: String) -> crate::Result<ChecklistTemplate> {
        Ok(ChecklistTemplate {
            id,
            category: self.category,
            name: self.name,
            quantity: self.quantity,
            unit: self.unit,
            unit_price: self.unit_price,
            total_price: line_total(self.quantity, self.unit_price)?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChecklistTemplatePatch {
    pub category: Option<ChecklistCategory>,
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub unit_price: Option<Money>,
}

impl ChecklistTemplatePatch {
    pub fn apply(self, template: &mut ChecklistTemplate) -> crate::Result<()> {
        if let Some(category) = self.category {
            template.category = category;
        }
        if let Some(name) = self.name {
            template.name = name;
        }
        if let Some(quantity) = self.quantity {
            template.quantity = Some(quantity);
        }
        if let Some(unit) = self.unit {
            template.unit = Some(unit);
        }
        if let Some(price) = self.unit_price {
            template.unit_price = Some(price);
        }
        template.total_price = line_total(template.quantity, template.unit_price)?;
        Ok(())
    }
}
