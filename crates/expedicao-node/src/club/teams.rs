use super::Club;
use crate::error::{Error, Result};
use crate::models::{new_id, require_text, Boat, Expedition, NewBoat, NewTeam, Profile, Team};

impl Club {
    pub fn add_boat(&self, expedition_id: &str, new: NewBoat) -> Result<Boat> {
        self.storage.require::<Expedition>(expedition_id)?;
        require_text("code_name", &new.code_name)?;
        let boat = Boat {
            id: new_id(&new.code_name),
            expedition_id: expedition_id.to_string(),
            code_name: new.code_name,
            nickname: new.nickname.filter(|n| !n.trim().is_empty()),
        };
        self.storage.put(&boat)?;
        Ok(boat)
    }

    pub fn list_boats(&self, expedition_id: &str) -> Result<Vec<Boat>> {
        self.storage.require::<Expedition>(expedition_id)?;
        self.storage.list_where(|b: &Boat| b.expedition_id == expedition_id)
    }

    /// Delete a boat; teams on it are left without one.
    pub fn delete_boat(&self, id: &str) -> Result<()> {
        self.storage.require::<Boat>(id)?;
        let mut batch = self.storage.batch();
        for mut team in self
            .storage
            .list_where(|t: &Team| t.boat_id.as_deref() == Some(id))?
        {
            team.boat_id = None;
            batch.put(&team)?;
        }
        batch.delete::<Boat>(id);
        batch.commit()
    }

    pub fn add_team(&self, expedition_id: &str, new: NewTeam) -> Result<Team> {
        self.storage.require::<Expedition>(expedition_id)?;
        new.validate()?;
        let boat_id = new.boat_id.filter(|b| !b.is_empty());
        if let Some(boat_id) = &boat_id {
            let boat: Boat = self.storage.require(boat_id)?;
            if boat.expedition_id != expedition_id {
                return Err(Error::InvalidInput(format!(
                    "boat {} belongs to another expedition",
                    boat_id
                )));
            }
        }

        let team = Team {
            id: new_id(&new.name),
            expedition_id: expedition_id.to_string(),
            boat_id,
            name: new.name,
            color_hex: new.color_hex,
            members: Vec::new(),
        };
        self.storage.put(&team)?;
        Ok(team)
    }

    pub fn list_teams(&self, expedition_id: &str) -> Result<Vec<Team>> {
        self.storage.require::<Expedition>(expedition_id)?;
        self.storage.list_where(|t: &Team| t.expedition_id == expedition_id)
    }

    pub fn delete_team(&self, id: &str) -> Result<()> {
        self.storage.require::<Team>(id)?;
        self.storage.delete::<Team>(id)
    }

    /// Allocate a participant to a team. A participant sits in one team per expedition.
    pub fn add_team_member(&self, team_id: &str, profile_id: &str) -> Result<Team> {
        let mut team: Team = self.storage.require(team_id)?;
        let expedition: Expedition = self.storage.require(&team.expedition_id)?;
        if !expedition.has_participant(profile_id) {
            return Err(Error::InvalidInput(format!(
                "profile {} is not going on expedition {}",
                profile_id, expedition.id
            )));
        }
        let taken = self.storage.list_where(|t: &Team| {
            t.expedition_id == expedition.id && t.has_member(profile_id)
        })?;
        if let Some(other) = taken.first() {
            return Err(Error::Conflict(format!(
                "profile {} is already in team {}",
                profile_id, other.name
            )));
        }

        team.members.push(profile_id.to_string());
        self.storage.put(&team)?;
        Ok(team)
    }

    pub fn remove_team_member(&self, team_id: &str, profile_id: &str) -> Result<Team> {
        let mut team: Team = self.storage.require(team_id)?;
        team.members.retain(|m| m != profile_id);
        self.storage.put(&team)?;
        Ok(team)
    }

    /// Participants not yet in any team, in roster order.
    pub fn unallocated_participants(&self, expedition_id: &str) -> Result<Vec<Profile>> {
        let expedition: Expedition = self.storage.require(expedition_id)?;
        let teams = self
            .storage
            .list_where(|t: &Team| t.expedition_id == expedition_id)?;

        let mut free = Vec::new();
        for id in &expedition.participants {
            if teams.iter().any(|t| t.has_member(id)) {
                continue;
            }
            if let Some(profile) = self.storage.get::<Profile>(id)? {
                free.push(profile);
            }
        }
        Ok(free)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{club, member, trip};
    use super::*;

    fn team(name: &str, boat: Option<&str>) -> NewTeam {
        NewTeam {
            name: name.into(),
            boat_id: boat.map(str::to_string),
            color_hex: "#22c55e".into(),
        }
    }

    #[test]
    fn allocation_rules() {
        let (_dir, club) = club();
        let ana = member(&club, "Ana", true);
        let bruno = member(&club, "Bruno", false);
        let carla = member(&club, "Carla", true);
        let exp = trip(&club, &[&ana, &bruno]);

        let red = club.add_team(&exp, team("Vermelho", None)).unwrap();
        let blue = club.add_team(&exp, team("Azul", None)).unwrap();

        club.add_team_member(&red.id, &ana).unwrap();
        assert!(matches!(
            club.add_team_member(&blue.id, &ana),
            Err(Error::Conflict(_))
        ));
        assert!(matches!(
            club.add_team_member(&blue.id, &carla),
            Err(Error::InvalidInput(_))
        ));

        let free = club.unallocated_participants(&exp).unwrap();
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].id, bruno);

        club.remove_team_member(&red.id, &ana).unwrap();
        club.add_team_member(&blue.id, &ana).unwrap();
        assert_eq!(club.unallocated_participants(&exp).unwrap().len(), 1);
    }

    #[test]
    fn deleting_boat_unassigns_teams() {
        let (_dir, club) = club();
        let exp = trip(&club, &[]);
        let boat = club
            .add_boat(
                &exp,
                NewBoat {
                    code_name: "BT-01".into(),
                    nickname: Some("Tucunaré".into()),
                },
            )
            .unwrap();
        let t = club.add_team(&exp, team("Verde", Some(&boat.id))).unwrap();
        assert_eq!(t.boat_id.as_deref(), Some(boat.id.as_str()));

        club.delete_boat(&boat.id).unwrap();
        assert!(club.list_boats(&exp).unwrap().is_empty());
        assert!(club.list_teams(&exp).unwrap()[0].boat_id.is_none());
    }

    #[test]
    fn boat_from_other_expedition_rejected() {
        let (_dir, club) = club();
        let exp = trip(&club, &[]);
        let other = trip(&club, &[]);
        let boat = club
            .add_boat(
                &other,
                NewBoat {
                    code_name: "BT-02".into(),
                    nickname: None,
                },
            )
            .unwrap();
        assert!(matches!(
            club.add_team(&exp, team("Amarelo", Some(&boat.id))),
            Err(Error::InvalidInput(_))
        ));
    }
}
