use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use goalsaver_core::goals::{Goal, NewGoal};

async fn get_goals(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Goal>>> {
    let goals = state.goal_service.get_goals()?;
    Ok(Json(goals))
}

async fn get_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Goal>> {
    Ok(Json(state.goal_service.get_goal(&id)?))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewGoal>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Goal>)> {
    let Json(goal) = payload?;
    let created = state.goal_service.create_goal(goal).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Persistence boundary of the goal editor: the body is the full projection.
async fn update_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Goal>, JsonRejection>,
) -> ApiResult<Json<Goal>> {
    let Json(goal) = payload?;
    let updated = state.goal_service.update_goal(&id, goal).await?;
    Ok(Json(updated))
}

async fn get_user_goals(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Goal>>> {
    Ok(Json(state.goal_service.get_goals_for_user(&user_id)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/goals", get(get_goals).post(create_goal))
        .route("/goals/{id}", get(get_goal).put(update_goal))
        .route("/users/{user_id}/goals", get(get_user_goals))
}
