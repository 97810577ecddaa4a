//! Axum route handlers for the Roadmap API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::roadmap::models::{NewRoadmapProfile, ProfileUpdate, RoadmapProfile};
use crate::roadmap::progress::Progress;
use crate::roadmap::service;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CompletionToggle {
    pub completed: bool,
}

/// POST /api/v1/roadmap
///
/// Creates the caller's profile. A roadmap is generated when the body has none.
pub async fn handle_create_roadmap(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<NewRoadmapProfile>,
) -> Result<(StatusCode, Json<RoadmapProfile>), AppError> {
    let profile = service::create_roadmap(
        state.store.as_ref(),
        state.advisor.as_ref(),
        user_id,
        request,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /api/v1/roadmap
pub async fn handle_get_roadmap(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<RoadmapProfile>, AppError> {
    let profile = service::get_roadmap(state.store.as_ref(), user_id).await?;
    Ok(Json(profile))
}

/// GET /api/v1/roadmap/progress
pub async fn handle_get_progress(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Progress>, AppError> {
    let progress = service::get_progress(state.store.as_ref(), user_id).await?;
    Ok(Json(progress))
}

/// PUT /api/v1/roadmap
///
/// Partial update. Only fields and collections present in the body change.
pub async fn handle_update_roadmap(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<RoadmapProfile>, AppError> {
    let profile = service::update_roadmap(state.store.as_ref(), user_id, update).await?;
    Ok(Json(profile))
}

/// POST /api/v1/roadmap/regenerate
pub async fn handle_regenerate_roadmap(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<RoadmapProfile>, AppError> {
    let profile =
        service::regenerate_roadmap(state.store.as_ref(), state.advisor.as_ref(), user_id).await?;
    Ok(Json(profile))
}

/// PATCH /api/v1/roadmap/goals/:category/:index
///
/// Both path segments arrive as text so that a bad index is reported in the
/// JSON error envelope rather than as a bare extractor rejection.
pub async fn handle_set_goal_completion(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((category, index)): Path<(String, String)>,
    Json(toggle): Json<CompletionToggle>,
) -> Result<Json<RoadmapProfile>, AppError> {
    let profile = service::set_goal_completion(
        state.store.as_ref(),
        user_id,
        &category,
        &index,
        toggle.completed,
    )
    .await?;
    Ok(Json(profile))
}
