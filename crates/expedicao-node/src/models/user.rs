//! Users who can sign in and their roles.

use super::Record;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Editor,
    User,
}

impl Role {
    /// Editors and admins change club data; plain users only read.
    pub fn can_edit(self) -> bool {
        matches!(self, Role::Admin | Role::Editor)
    }

    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }
}

impl std::str::FromStr for Role {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "editor" => Ok(Role::Editor),
            "user" => Ok(Role::User),
            other => Err(crate::Error::InvalidInput(format!("unknown role {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub force_password_change: bool,
}

impl Record for User {
    const PREFIX: &'static str = "user";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    /// Falls back to the local part of the email
    pub name: Option<String>,
    pub email: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::User
}

impl NewUser {
    pub fn into_user(self, id: String) -> User {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| self.email.split('@').next().map(str::to_string))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Usuário".to_string());

        User {
            id,
            name,
            email: self.email,
            role: self.role,
            force_password_change: false,
        }
    }
}
