//! Profile model - club members and guests.

use super::Record;
use serde::{Deserialize, Serialize};

/// Membership kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileKind {
    /// Partner: pays monthly dues
    #[serde(rename = "Sócio")]
    Socio,
    #[serde(rename = "Convidado")]
    Convidado,
}

/// A person known to the club.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,

    pub name: String,

    #[serde(rename = "type")]
    pub kind: ProfileKind,

    #[serde(default)]
    pub phone: String,

    pub email: Option<String>,

    /// Shares the drinkers-only expense pool
    #[serde(default)]
    pub drinks_alcohol: bool,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Profile {
    /// Active partners owe monthly dues.
    pub fn owes_dues(&self) -> bool {
        self.kind == ProfileKind::Socio && self.is_active
    }

    /// Case-insensitive name search.
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

impl Record for Profile {
    const PREFIX: &'static str = "profile";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Fields for a new profile.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProfile {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProfileKind,
    #[serde(default)]
    pub phone: String,
    pub email: Option<String>,
    #[serde(default)]
    pub drinks_alcohol: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl NewProfile {
    pub fn into_profile(self, id: String) -> Profile {
        Profile {
            id,
            name: self.name,
            kind: self.kind,
            phone: self.phone,
            email: self.email,
            drinks_alcohol: self.drinks_alcohol,
            is_active: self.is_active,
        }
    }
}

/// Partial profile update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ProfileKind>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub drinks_alcohol: Option<bool>,
    pub is_active: Option<bool>,
}

impl ProfilePatch {
    pub fn apply(self, profile: &mut Profile) {
        if let Some(name) = self.name {
            profile.name = name;
        }
        if let Some(kind) = self.kind {
            profile.kind = kind;
        }
        if let Some(phone) = self.phone {
            profile.phone = phone;
        }
        if let Some(email) = self.email {
            profile.email = Some(email);
        }
        if let Some(drinks) = self.drinks_alcohol {
            profile.drinks_alcohol = drinks;
        }
        if let Some(active) = self.is_active {
            profile.is_active = active;
        }
    }
}
