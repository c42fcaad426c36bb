//! Boats and fishing teams.

use super::Record;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boat {
    pub id: String,
    pub expedition_id: String,
    /// Registration or call sign
    pub code_name: String,
    pub nickname: Option<String>,
}

impl Record for Boat {
    const PREFIX: &'static str = "boat";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBoat {
    pub code_name: String,
    pub nickname: Option<String>,
}

/// A fishing team, optionally assigned to a boat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub expedition_id: String,
    pub boat_id: Option<String>,
    pub name: String,
    #[serde(default = "default_color")]
    pub color_hex: String,
    /// Profile IDs
    #[serde(default)]
    pub members: Vec<String>,
}

fn default_color() -> String {
    "#0ea5e9".to_string()
}

impl Team {
    pub fn has_member(&self, profile_id: &str) -> bool {
        self.members.iter().any(|m| m == profile_id)
    }
}

impl Record for Team {
    const PREFIX: &'static str = "team";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTeam {
    pub name: String,
    pub boat_id: Option<String>,
    #[serde(default = "default_color")]
    pub color_hex: String,
}

impl NewTeam {
    pub fn validate(&self) -> crate::Result<()> {
        super::require_text("name", &self.name)?;
        let hex = self.color_hex.strip_prefix('#').unwrap_or("");
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(crate::Error::InvalidInput(format!(
                "invalid color {}",
                self.color_hex
            )));
        }
        Ok(())
    }
}
