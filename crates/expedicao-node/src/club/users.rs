use super::Club;
use crate::error::{Error, Result};
use crate::models::{new_id, NewUser, Role, User};

impl Club {
    pub fn add_user(&self, new: NewUser) -> Result<User> {
        let email = new.email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(Error::InvalidInput(format!("invalid email {}", new.email)));
        }
        if self.find_user_by_email(&email)?.is_some() {
            return Err(Error::Conflict(format!("user {} already exists", email)));
        }

        let user = NewUser { email, ..new }.into_user(new_id("user"));
        self.storage.put(&user)?;
        tracing::info!(user = %user.id, role = ?user.role, "Added user {}", user.email);
        Ok(user)
    }

    pub fn get_user(&self, id: &str) -> Result<User> {
        self.storage.require(id)
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.trim().to_lowercase();
        Ok(self
            .storage
            .list_where(|u: &User| u.email == email)?
            .into_iter()
            .next())
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self.storage.list()?;
        users.sort_by_key(|u| u.name.to_lowercase());
        Ok(users)
    }

    fn is_last_admin(&self, user: &User) -> Result<bool> {
        if user.role != Role::Admin {
            return Ok(false);
        }
        let admins = self.storage.list_where(|u: &User| u.role == Role::Admin)?;
        Ok(admins.len() <= 1)
    }

    /// Change a user's role. The last admin cannot be demoted.
    pub fn set_role(&self, id: &str, role: Role) -> Result<User> {
        let mut user: User = self.storage.require(id)?;
        if role != Role::Admin && self.is_last_admin(&user)? {
            return Err(Error::Conflict("cannot demote the last admin".into()));
        }
        user.role = role;
        self.storage.put(&user)?;
        tracing::info!(user = %id, role = ?role, "Changed user role");
        Ok(user)
    }

    /// Remove a user. The last admin cannot be removed.
    pub fn remove_user(&self, id: &str) -> Result<()> {
        let user: User = self.storage.require(id)?;
        if self.is_last_admin(&user)? {
            return Err(Error::Conflict("cannot remove the last admin".into()));
        }
        self.storage.delete::<User>(id)?;
        tracing::info!(user = %id, "Removed user {}", user.email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::club;
    use super::*;

    fn new_user(email: &str, role: Role) -> NewUser {
        NewUser {
            name: None,
            email: email.into(),
            role,
        }
    }

    #[test]
    fn emails_are_unique_ignoring_case() {
        let (_dir, club) = club();
        club.add_user(new_user("Ana@Clube.com", Role::Admin)).unwrap();
        assert!(matches!(
            club.add_user(new_user("ana@clube.com ", Role::User)),
            Err(Error::Conflict(_))
        ));
        assert!(matches!(
            club.add_user(new_user("sem-arroba", Role::User)),
            Err(Error::InvalidInput(_))
        ));
        assert!(club.find_user_by_email("ANA@clube.com").unwrap().is_some());
    }

    #[test]
    fn last_admin_is_protected() {
        let (_dir, club) = club();
        let admin = club.add_user(new_user("admin@clube.com", Role::Admin)).unwrap();
        assert!(matches!(
            club.set_role(&admin.id, Role::Editor),
            Err(Error::Conflict(_))
        ));
        assert!(matches!(club.remove_user(&admin.id), Err(Error::Conflict(_))));

        let second = club.add_user(new_user("vice@clube.com", Role::Editor)).unwrap();
        club.set_role(&second.id, Role::Admin).unwrap();
        club.set_role(&admin.id, Role::User).unwrap();
        club.remove_user(&admin.id).unwrap();
        assert_eq!(club.list_users().unwrap().len(), 1);
    }
}
