//! Supply checklist, templates and T-shirt orders.

use super::{AppState, Caller};
use crate::club::{ChecklistProgress, TShirtSummary};
use crate::error::Result;
use crate::models::{
    ChecklistCategory, ChecklistItem, ChecklistItemPatch, ChecklistTemplate,
    ChecklistTemplatePatch, NewChecklistItem, NewChecklistTemplate, NewTShirtOrder, Payer,
    Purchase, TShirtOrder, TShirtPatch,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct Suggest {
    pub category: ChecklistCategory,
}

#[derive(Debug, Deserialize)]
pub struct Launch {
    #[serde(default)]
    pub purchased_by: Payer,
    #[serde(default)]
    pub is_for_drinkers_only: bool,
}

#[derive(Debug, Serialize)]
pub struct Launched {
    pub item: ChecklistItem,
    pub purchase: Purchase,
}

pub async fn list_checklist(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Vec<ChecklistItem>>> {
    let state = state.read().await;
    Ok(Json(state.club.list_checklist(&id)?))
}

pub async fn add_checklist_item(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(new): Json<NewChecklistItem>,
) -> Result<(StatusCode, Json<ChecklistItem>)> {
    caller.require_editor()?;
    let state = state.write().await;
    let item = state.club.add_checklist_item(&id, new)?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn suggest_items(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(req): Json<Suggest>,
) -> Result<(StatusCode, Json<Vec<ChecklistItem>>)> {
    caller.require_editor()?;
    let state = state.write().await;
    let items = state.club.suggest_items(&id, req.category)?;
    Ok((StatusCode::CREATED, Json(items)))
}

pub async fn checklist_progress(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Vec<ChecklistProgress>>> {
    let state = state.read().await;
    Ok(Json(state.club.checklist_progress(&id)?))
}

pub async fn save_as_templates(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Vec<ChecklistTemplate>>> {
    caller.require_editor()?;
    let state = state.write().await;
    Ok(Json(state.club.save_as_templates(&id)?))
}

pub async fn get_checklist_item(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<ChecklistItem>> {
    let state = state.read().await;
    Ok(Json(state.club.get_checklist_item(&id)?))
}

pub async fn update_checklist_item(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(patch): Json<ChecklistItemPatch>,
) -> Result<Json<ChecklistItem>> {
    caller.require_editor()?;
    let state = state.write().await;
    Ok(Json(state.club.update_checklist_item(&id, patch)?))
}

pub async fn delete_checklist_item(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    caller.require_editor()?;
    let state = state.write().await;
    state.club.delete_checklist_item(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_checklist_item(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<ChecklistItem>> {
    caller.require_editor()?;
    let state = state.write().await;
    Ok(Json(state.club.toggle_checklist_item(&id)?))
}

pub async fn launch_item(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(req): Json<Launch>,
) -> Result<(StatusCode, Json<Launched>)> {
    caller.require_editor()?;
    let today = chrono::Local::now().date_naive();
    let state = state.write().await;
    let (item, purchase) =
        state
            .club
            .launch_item(&id, req.purchased_by, req.is_for_drinkers_only, today)?;
    Ok((StatusCode::CREATED, Json(Launched { item, purchase })))
}

// --- Templates ---

pub async fn list_templates(
    State(state): State<AppState>,
    _caller: Caller,
) -> Result<Json<Vec<ChecklistTemplate>>> {
    let state = state.read().await;
    Ok(Json(state.club.list_templates()?))
}

pub async fn create_template(
    State(state): State<AppState>,
    caller: Caller,
    Json(new): Json<NewChecklistTemplate>,
) -> Result<(StatusCode, Json<ChecklistTemplate>)> {
    caller.require_editor()?;
    let state = state.write().await;
    let template = state.club.create_template(new)?;
    Ok((StatusCode::CREATED, Json(template)))
}

pub async fn update_template(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(patch): Json<ChecklistTemplatePatch>,
) -> Result<Json<ChecklistTemplate>> {
    caller.require_editor()?;
    let state = state.write().await;
    Ok(Json(state.club.update_template(&id, patch)?))
}

pub async fn delete_template(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    caller.require_editor()?;
    let state = state.write().await;
    state.club.delete_template(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

// --- T-shirts ---

pub async fn list_tshirts(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Vec<TShirtOrder>>> {
    let state = state.read().await;
    Ok(Json(state.club.list_tshirt_orders(&id)?))
}

pub async fn add_tshirt_order(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(new): Json<NewTShirtOrder>,
) -> Result<(StatusCode, Json<TShirtOrder>)> {
    caller.require_editor()?;
    let state = state.write().await;
    let order = state.club.add_tshirt_order(&id, new)?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn tshirt_summary(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<TShirtSummary>> {
    let state = state.read().await;
    Ok(Json(state.club.tshirt_summary(&id)?))
}

pub async fn update_tshirt_order(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(patch): Json<TShirtPatch>,
) -> Result<Json<TShirtOrder>> {
    caller.require_editor()?;
    let state = state.write().await;
    Ok(Json(state.club.update_tshirt_order(&id, patch)?))
}

pub async fn delete_tshirt_order(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    caller.require_editor()?;
    let state = state.write().await;
    state.club.delete_tshirt_order(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::super::testing::fixture;
    use super::*;
    use crate::models::NewExpedition;
    use crate::Error;
    use chrono::NaiveDate;
    use expedicao_rateio::Money;

    #[tokio::test]
    async fn launch_priced_item_into_purchases() {
        let fx = fixture();
        let exp = {
            let state = fx.state.read().await;
            state
                .club
                .create_expedition(NewExpedition {
                    name: "Xingu".into(),
                    year: 2025,
                    start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                    end_date: NaiveDate::from_ymd_opt(2025, 6, 5).unwrap(),
                    location: String::new(),
                    participants: Vec::new(),
                })
                .unwrap()
        };

        let (_, Json(item)) = add_checklist_item(
            State(fx.state.clone()),
            fx.editor.clone(),
            Path(exp.id.clone()),
            Json(NewChecklistItem {
                category: ChecklistCategory::Acampamento,
                name: "Lona".into(),
                quantity: Some(2.0),
                unit: Some("UN".into()),
                unit_price: Some(Money::from_cents(4_500)),
            }),
        )
        .await
        .unwrap();

        let denied = launch_item(
            State(fx.state.clone()),
            fx.user.clone(),
            Path(item.id.clone()),
            Json(Launch {
                purchased_by: Payer::Caixa,
                is_for_drinkers_only: false,
            }),
        )
        .await;
        assert!(matches!(denied, Err(Error::Forbidden(_))));

        let (status, Json(launched)) = launch_item(
            State(fx.state.clone()),
            fx.editor.clone(),
            Path(item.id.clone()),
            Json(Launch {
                purchased_by: Payer::Caixa,
                is_for_drinkers_only: false,
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(launched.purchase.total_price, Money::from_cents(9_000));
        assert_eq!(launched.purchase.category, "Camping");
        assert_eq!(launched.item.purchase_id.as_deref(), Some(launched.purchase.id.as_str()));

        let Json(purchases) = super::super::finance::list_purchases(
            State(fx.state.clone()),
            fx.user.clone(),
            Path(exp.id),
        )
        .await
        .unwrap();
        assert_eq!(purchases.len(), 1);
    }
}
