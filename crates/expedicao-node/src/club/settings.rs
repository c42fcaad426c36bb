use super::Club;
use crate::error::{Error, Result};
use crate::models::Settings;
use serde::Deserialize;

/// Which category list a change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryList {
    Purchase,
    Ledger,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrandingPatch {
    /// Empty string clears it
    pub site_logo: Option<String>,
    pub favicon: Option<String>,
}

fn list_mut(settings: &mut Settings, list: CategoryList) -> &mut Vec<String> {
    match list {
        CategoryList::Purchase => &mut settings.purchase_categories,
        CategoryList::Ledger => &mut settings.ledger_categories,
    }
}

impl Club {
    pub fn settings(&self) -> Result<Settings> {
        self.storage.get_settings()
    }

    pub fn update_branding(&self, patch: BrandingPatch) -> Result<Settings> {
        let mut settings = self.storage.get_settings()?;
        if let Some(logo) = patch.site_logo {
            settings.site_logo = Some(logo).filter(|l| !l.is_empty());
        }
        if let Some(favicon) = patch.favicon {
            settings.favicon = Some(favicon).filter(|f| !f.is_empty());
        }
        self.storage.put_settings(&settings)?;
        Ok(settings)
    }

    pub fn add_category(&self, list: CategoryList, name: &str) -> Result<Settings> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("category must not be empty".into()));
        }
        let mut settings = self.storage.get_settings()?;
        let categories = list_mut(&mut settings, list);
        if categories.iter().any(|c| c == name) {
            return Err(Error::Conflict(format!("category {} already exists", name)));
        }
        categories.push(name.to_string());
        self.storage.put_settings(&settings)?;
        Ok(settings)
    }

    pub fn remove_category(&self, list: CategoryList, name: &str) -> Result<Settings> {
        let mut settings = self.storage.get_settings()?;
        let categories = list_mut(&mut settings, list);
        let before = categories.len();
        categories.retain(|c| c != name);
        if categories.len() == before {
            return Err(Error::not_found("category", name));
        }
        self.storage.put_settings(&settings)?;
        Ok(settings)
    }
}
