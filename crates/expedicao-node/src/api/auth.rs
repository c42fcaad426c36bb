//! Caller identity.
//!
//! Requests name their user in the `X-User-Id` header. The ID must match a
//! stored [`User`]; anything else is rejected with 401 before the handler runs.

use super::AppState;
use crate::error::{Error, Result};
use crate::models::User;
use axum::{extract::FromRequestParts, http::request::Parts};

pub const USER_HEADER: &str = "x-user-id";

/// The user making the request.
#[derive(Debug, Clone)]
pub struct Caller(pub User);

impl Caller {
    /// Editors and admins only.
    pub fn require_editor(&self) -> Result<()> {
        if self.0.role.can_edit() {
            Ok(())
        } else {
            Err(Error::Forbidden(format!("{} cannot change club data", self.0.email)))
        }
    }

    pub fn require_admin(&self) -> Result<()> {
        if self.0.role.is_admin() {
            Ok(())
        } else {
            Err(Error::Forbidden(format!("{} is not an admin", self.0.email)))
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let id = parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(Error::Unauthorized)?;

        let state = state.read().await;
        match state.club.storage().get::<User>(id)? {
            Some(user) => Ok(Caller(user)),
            None => {
                tracing::warn!(user = %id, "Rejected unknown user");
                Err(Error::Unauthorized)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::fixture;
    use super::*;
    use axum::http::Request;

    async fn extract(state: &AppState, header: Option<&str>) -> Result<Caller> {
        let mut builder = Request::builder().uri("/api/v1/me");
        if let Some(value) = header {
            builder = builder.header(USER_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Caller::from_request_parts(&mut parts, state).await
    }

    #[tokio::test]
    async fn header_resolves_stored_user() {
        let fx = fixture();
        let caller = extract(&fx.state, Some(fx.editor.0.id.as_str())).await.unwrap();
        assert_eq!(caller.0.email, "editor@clube.com");

        assert!(matches!(extract(&fx.state, None).await, Err(Error::Unauthorized)));
        assert!(matches!(
            extract(&fx.state, Some("user:nope")).await,
            Err(Error::Unauthorized)
        ));
    }

    #[test]
    fn role_checks() {
        let fx = fixture();
        assert!(fx.admin.require_admin().is_ok());
        assert!(fx.editor.require_editor().is_ok());
        assert!(matches!(fx.editor.require_admin(), Err(Error::Forbidden(_))));
        assert!(matches!(fx.user.require_editor(), Err(Error::Forbidden(_))));
    }
}
