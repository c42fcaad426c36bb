use super::Club;
use crate::error::Result;
use crate::models::{new_id, require_text, Expedition, NewProfile, Profile, ProfilePatch, Team};

impl Club {
    pub fn create_profile(&self, new: NewProfile) -> Result<Profile> {
        require_text("name", &new.name)?;
        let profile = new.into_profile(new_id("profile"));
        self.storage.put(&profile)?;
        tracing::info!(profile = %profile.id, "Created profile {}", profile.name);
        Ok(profile)
    }

    pub fn get_profile(&self, id: &str) -> Result<Profile> {
        self.storage.require(id)
    }

    pub fn update_profile(&self, id: &str, patch: ProfilePatch) -> Result<Profile> {
        let mut profile: Profile = self.storage.require(id)?;
        if let Some(name) = &patch.name {
            require_text("name", name)?;
        }
        patch.apply(&mut profile);
        self.storage.put(&profile)?;
        Ok(profile)
    }

    /// Delete a profile and drop it from expedition and team rosters.
    pub fn delete_profile(&self, id: &str) -> Result<()> {
        self.storage.require::<Profile>(id)?;

        let mut batch = self.storage.batch();
        for mut expedition in self.storage.list_where(|e: &Expedition| e.has_participant(id))? {
            expedition.participants.retain(|p| p != id);
            batch.put(&expedition)?;
        }
        for mut team in self.storage.list_where(|t: &Team| t.has_member(id))? {
            team.members.retain(|m| m != id);
            batch.put(&team)?;
        }
        batch.delete::<Profile>(id);
        batch.commit()?;

        tracing::info!(profile = %id, "Deleted profile");
        Ok(())
    }

    /// Profiles sorted by name, optionally filtered by a name search.
    pub fn list_profiles(&self, query: Option<&str>) -> Result<Vec<Profile>> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        let mut profiles = self
            .storage
            .list_where(|p: &Profile| query.map_or(true, |q| p.matches(q)))?;
        profiles.sort_by_key(|p| p.name.to_lowercase());
        Ok(profiles)
    }
}
