//! Expeditions, their roster, tasks, boats and teams.

use super::{AppState, Caller};
use crate::club::{Overview, TaskBoard};
use crate::error::Result;
use crate::models::{
    Boat, Expedition, ExpeditionPatch, NewBoat, NewExpedition, NewTask, NewTeam, Profile, Task,
    TaskPatch, Team,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

pub async fn list(State(state): State<AppState>, _caller: Caller) -> Result<Json<Vec<Expedition>>> {
    let state = state.read().await;
    Ok(Json(state.club.list_expeditions()?))
}

pub async fn get(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Expedition>> {
    let state = state.read().await;
    Ok(Json(state.club.get_expedition(&id)?))
}

pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    Json(new): Json<NewExpedition>,
) -> Result<(StatusCode, Json<Expedition>)> {
    caller.require_editor()?;
    let state = state.write().await;
    let expedition = state.club.create_expedition(new)?;
    Ok((StatusCode::CREATED, Json(expedition)))
}

pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(patch): Json<ExpeditionPatch>,
) -> Result<Json<Expedition>> {
    caller.require_editor()?;
    let state = state.write().await;
    Ok(Json(state.club.update_expedition(&id, patch)?))
}

pub async fn delete(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    caller.require_editor()?;
    let state = state.write().await;
    state.club.delete_expedition(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_participant(
    State(state): State<AppState>,
    caller: Caller,
    Path((id, profile_id)): Path<(String, String)>,
) -> Result<Json<Expedition>> {
    caller.require_editor()?;
    let state = state.write().await;
    Ok(Json(state.club.toggle_participant(&id, &profile_id)?))
}

pub async fn overview(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Overview>> {
    let state = state.read().await;
    Ok(Json(state.club.overview(&id)?))
}

// --- Tasks ---
//
// Anyone signed in may create and move tasks; deleting one needs an editor.

pub async fn task_board(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<TaskBoard>> {
    let state = state.read().await;
    Ok(Json(state.club.task_board(&id)?))
}

pub async fn create_task(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<String>,
    Json(new): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>)> {
    let state = state.write().await;
    let task = state.club.create_task(&id, new)?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Task>> {
    let state = state.read().await;
    Ok(Json(state.club.get_task(&id)?))
}

pub async fn update_task(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Task>> {
    let state = state.write().await;
    Ok(Json(state.club.update_task(&id, patch)?))
}

pub async fn delete_task(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    caller.require_editor()?;
    let state = state.write().await;
    state.club.delete_task(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Boats and teams ---

pub async fn list_boats(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Vec<Boat>>> {
    let state = state.read().await;
    Ok(Json(state.club.list_boats(&id)?))
}

pub async fn add_boat(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(new): Json<NewBoat>,
) -> Result<(StatusCode, Json<Boat>)> {
    caller.require_editor()?;
    let state = state.write().await;
    let boat = state.club.add_boat(&id, new)?;
    Ok((StatusCode::CREATED, Json(boat)))
}

pub async fn delete_boat(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    caller.require_editor()?;
    let state = state.write().await;
    state.club.delete_boat(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_teams(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Vec<Team>>> {
    let state = state.read().await;
    Ok(Json(state.club.list_teams(&id)?))
}

pub async fn add_team(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(new): Json<NewTeam>,
) -> Result<(StatusCode, Json<Team>)> {
    caller.require_editor()?;
    let state = state.write().await;
    let team = state.club.add_team(&id, new)?;
    Ok((StatusCode::CREATED, Json(team)))
}

pub async fn delete_team(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    caller.require_editor()?;
    let state = state.write().await;
    state.club.delete_team(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_member(
    State(state): State<AppState>,
    caller: Caller,
    Path((id, profile_id)): Path<(String, String)>,
) -> Result<Json<Team>> {
    caller.require_editor()?;
    let state = state.write().await;
    Ok(Json(state.club.add_team_member(&id, &profile_id)?))
}

pub async fn remove_member(
    State(state): State<AppState>,
    caller: Caller,
    Path((id, profile_id)): Path<(String, String)>,
) -> Result<Json<Team>> {
    caller.require_editor()?;
    let state = state.write().await;
    Ok(Json(state.club.remove_team_member(&id, &profile_id)?))
}

pub async fn unallocated(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Vec<Profile>>> {
    let state = state.read().await;
    Ok(Json(state.club.unallocated_participants(&id)?))
}

#[cfg(test)]
mod tests {
    use super::super::testing::fixture;
    use super::*;
    use crate::models::{TaskCategory, TaskPriority, TaskStatus};
    use crate::Error;
    use chrono::NaiveDate;

    fn trip() -> NewExpedition {
        NewExpedition {
            name: "Pantanal".into(),
            year: 2025,
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 9, 8).unwrap(),
            location: "Corumbá".into(),
            participants: Vec::new(),
        }
    }

    #[tokio::test]
    async fn any_user_works_the_task_board() {
        let fx = fixture();
        let (_, Json(exp)) = create(State(fx.state.clone()), fx.editor.clone(), Json(trip()))
            .await
            .unwrap();

        let new = NewTask {
            title: "Comprar iscas".into(),
            description: None,
            assigned_to: None,
            status: TaskStatus::Fazer,
            priority: TaskPriority::Alta,
            category: TaskCategory::Pesca,
            due_date: None,
        };
        let (status, Json(task)) = create_task(
            State(fx.state.clone()),
            fx.user.clone(),
            Path(exp.id.clone()),
            Json(new),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        update_task(
            State(fx.state.clone()),
            fx.user.clone(),
            Path(task.id.clone()),
            Json(TaskPatch {
                status: Some(TaskStatus::Concluido),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let Json(board) = task_board(State(fx.state.clone()), fx.user.clone(), Path(exp.id))
            .await
            .unwrap();
        assert_eq!(board.column(TaskStatus::Concluido).len(), 1);

        let denied = delete_task(State(fx.state.clone()), fx.user.clone(), Path(task.id)).await;
        assert!(matches!(denied, Err(Error::Forbidden(_))));
    }

    #[tokio::test]
    async fn expedition_changes_need_an_editor() {
        let fx = fixture();
        let denied = create(State(fx.state.clone()), fx.user.clone(), Json(trip())).await;
        assert!(matches!(denied, Err(Error::Forbidden(_))));

        let (_, Json(exp)) = create(State(fx.state.clone()), fx.admin.clone(), Json(trip()))
            .await
            .unwrap();
        let status = delete(State(fx.state.clone()), fx.editor.clone(), Path(exp.id.clone()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let gone = get(State(fx.state.clone()), fx.user.clone(), Path(exp.id)).await;
        assert!(matches!(gone, Err(Error::NotFound(_))));
    }
}
