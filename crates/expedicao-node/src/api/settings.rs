//! Club settings: branding and category lists.

use super::{AppState, Caller};
use crate::club::{BrandingPatch, CategoryList};
use crate::error::Result;
use crate::models::Settings;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

pub async fn get_settings(State(state): State<AppState>, _caller: Caller) -> Result<Json<Settings>> {
    let state = state.read().await;
    Ok(Json(state.club.settings()?))
}

pub async fn update_branding(
    State(state): State<AppState>,
    caller: Caller,
    Json(patch): Json<BrandingPatch>,
) -> Result<Json<Settings>> {
    caller.require_admin()?;
    let state = state.write().await;
    Ok(Json(state.club.update_branding(patch)?))
}

pub async fn add_category(
    State(state): State<AppState>,
    caller: Caller,
    Path(list): Path<CategoryList>,
    Json(new): Json<NewCategory>,
) -> Result<Json<Settings>> {
    caller.require_admin()?;
    let state = state.write().await;
    Ok(Json(state.club.add_category(list, &new.name)?))
}

pub async fn remove_category(
    State(state): State<AppState>,
    caller: Caller,
    Path((list, name)): Path<(CategoryList, String)>,
) -> Result<Json<Settings>> {
    caller.require_admin()?;
    let state = state.write().await;
    Ok(Json(state.club.remove_category(list, &name)?))
}

#[cfg(test)]
mod tests {
    use super::super::testing::fixture;
    use super::*;
    use crate::Error;

    #[tokio::test]
    async fn only_admins_change_settings() {
        let fx = fixture();
        let denied = add_category(
            State(fx.state.clone()),
            fx.editor.clone(),
            Path(CategoryList::Purchase),
            Json(NewCategory { name: "Gelo".into() }),
        )
        .await;
        assert!(matches!(denied, Err(Error::Forbidden(_))));

        let Json(settings) = add_category(
            State(fx.state.clone()),
            fx.admin.clone(),
            Path(CategoryList::Purchase),
            Json(NewCategory { name: "Gelo".into() }),
        )
        .await
        .unwrap();
        assert!(settings.purchase_categories.iter().any(|c| c == "Gelo"));

        let Json(settings) = remove_category(
            State(fx.state.clone()),
            fx.admin.clone(),
            Path((CategoryList::Purchase, "Gelo".into())),
        )
        .await
        .unwrap();
        assert!(!settings.purchase_categories.iter().any(|c| c == "Gelo"));

        let Json(read) = get_settings(State(fx.state.clone()), fx.user.clone()).await.unwrap();
        assert_eq!(read, settings);
    }
}
