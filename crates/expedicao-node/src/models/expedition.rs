//! Expedition model - one yearly trip of the club.

use super::Record;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A trip and the people going on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expedition {
    pub id: String,

    pub name: String,

    pub year: i32,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    #[serde(default)]
    pub location: String,

    /// Profile IDs, in the order they joined
    #[serde(default)]
    pub participants: Vec<String>,
}

impl Expedition {
    pub fn has_participant(&self, profile_id: &str) -> bool {
        self.participants.iter().any(|p| p == profile_id)
    }

    /// Add the profile if absent, remove it if present.
    /// Returns whether the profile is now a participant.
    pub fn toggle_participant(&mut self, profile_id: &str) -> bool {
        if self.has_participant(profile_id) {
            self.participants.retain(|p| p != profile_id);
            false
        } else {
            self.participants.push(profile_id.to_string());
            true
        }
    }
}

impl Record for Expedition {
    const PREFIX: &'static str = "expedition";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Fields for a new expedition.
#[derive(Debug, Clone, Deserialize)]
pub struct NewExpedition {
    pub name: String,
    pub year: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub participants: Vec<String>,
}

impl NewExpedition {
    pub fn validate(&self) -> crate::Result<()> {
        super::require_text("name", &self.name)?;
        check_dates(self.start_date, self.end_date)
    }

    pub fn into_expedition(self, id: String) -> Expedition {
        let mut participants: Vec<String> = Vec::with_capacity(self.participants.len());
        for p in self.participants {
            if !participants.contains(&p) {
                participants.push(p);
            }
        }

        Expedition {
            id,
            name: self.name,
            year: self.year,
            start_date: self.start_date,
            end_date: self.end_date,
            location: self.location,
            participants,
        }
    }
}

/// Partial expedition update. `participants`, when given, replaces the set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpeditionPatch {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub participants: Option<Vec<String>>,
}

impl ExpeditionPatch {
    pub fn apply(self, expedition: &mut Expedition) -> crate::Result<()> {
        let start = self.start_date.unwrap_or(expedition.start_date);
        let end = self.end_date.unwrap_or(expedition.end_date);
        check_dates(start, end)?;

        if let Some(name) = self.name {
            super::require_text("name", &name)?;
            expedition.name = name;
        }
        if let Some(year) = self.year {
            expedition.year = year;
        }
        expedition.start_date = start;
        expedition.end_date = end;
        if let Some(location) = self.location {
            expedition.location = location;
        }
        if let Some(participants) = self.participants {
            expedition.participants.clear();
            for p in participants {
                if !expedition.participants.contains(&p) {
                    expedition.participants.push(p);
                }
            }
        }
        Ok(())
    }
}

fn check_dates(start: NaiveDate, end: NaiveDate) -> crate::Result<()> {
    if end < start {
        return Err(crate::Error::InvalidInput(format!(
            "end_date {} is before start_date {}",
            end, start
        )));
    }
    Ok(())
}
