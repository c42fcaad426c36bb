//! Profiles, users and the current caller.

use super::{AppState, Caller};
use crate::error::Result;
use crate::models::{NewProfile, Profile, ProfilePatch, Role, User};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ProfileQuery {
    /// Matches name, phone or email
    pub q: Option<String>,
}

pub async fn me(Caller(user): Caller) -> Json<User> {
    Json(user)
}

pub async fn list_profiles(
    State(state): State<AppState>,
    _caller: Caller,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<Vec<Profile>>> {
    let state = state.read().await;
    let profiles = state.club.list_profiles(query.q.as_deref())?;
    Ok(Json(profiles))
}

pub async fn get_profile(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Profile>> {
    let state = state.read().await;
    Ok(Json(state.club.get_profile(&id)?))
}

pub async fn create_profile(
    State(state): State<AppState>,
    caller: Caller,
    Json(new): Json<NewProfile>,
) -> Result<(StatusCode, Json<Profile>)> {
    caller.require_editor()?;
    let state = state.write().await;
    let profile = state.club.create_profile(new)?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn update_profile(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<Profile>> {
    caller.require_editor()?;
    let state = state.write().await;
    Ok(Json(state.club.update_profile(&id, patch)?))
}

pub async fn delete_profile(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    caller.require_editor()?;
    let state = state.write().await;
    state.club.delete_profile(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Users ---

#[derive(Debug, Deserialize)]
pub struct RoleChange {
    pub role: Role,
}

pub async fn list_users(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<User>>> {
    caller.require_admin()?;
    let state = state.read().await;
    Ok(Json(state.club.list_users()?))
}

pub async fn set_role(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(change): Json<RoleChange>,
) -> Result<Json<User>> {
    caller.require_admin()?;
    let state = state.write().await;
    Ok(Json(state.club.set_role(&id, change.role)?))
}

pub async fn remove_user(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    caller.require_admin()?;
    let state = state.write().await;
    state.club.remove_user(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::super::testing::fixture;
    use super::*;
    use crate::models::ProfileKind;
    use crate::Error;

    fn ana() -> NewProfile {
        NewProfile {
            name: "Ana".into(),
            kind: ProfileKind::Socio,
            phone: "11 99999-0000".into(),
            email: None,
            drinks_alcohol: true,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn plain_users_read_but_do_not_write() {
        let fx = fixture();
        let denied = create_profile(State(fx.state.clone()), fx.user.clone(), Json(ana())).await;
        assert!(matches!(denied, Err(Error::Forbidden(_))));

        let (status, Json(profile)) =
            create_profile(State(fx.state.clone()), fx.editor.clone(), Json(ana()))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(found) = list_profiles(
            State(fx.state.clone()),
            fx.user.clone(),
            Query(ProfileQuery { q: Some("ana".into()) }),
        )
        .await
        .unwrap();
        assert_eq!(found, vec![profile]);
    }

    #[tokio::test]
    async fn user_management_is_admin_only() {
        let fx = fixture();
        let editor_id = fx.editor.0.id.clone();
        let denied = list_users(State(fx.state.clone()), fx.editor.clone()).await;
        assert!(matches!(denied, Err(Error::Forbidden(_))));

        let Json(user) = set_role(
            State(fx.state.clone()),
            fx.admin.clone(),
            Path(editor_id.clone()),
            Json(RoleChange { role: Role::User }),
        )
        .await
        .unwrap();
        assert_eq!(user.role, Role::User);

        let status = remove_user(State(fx.state.clone()), fx.admin.clone(), Path(editor_id))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let Json(users) = list_users(State(fx.state.clone()), fx.admin.clone()).await.unwrap();
        assert_eq!(users.len(), 2);
    }
}
