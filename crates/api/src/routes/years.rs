//! Tax-year routes: summaries, lock and unlock.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use milebook_db::YearLockRepository;
use milebook_shared::types::UserId;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::ApiError;
use crate::{AppState, middleware::AuthUser};

/// Creates the year routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/years/{year}", get(get_year))
        .route("/years/{year}/lock", get(get_lock_state).post(lock_year))
        .route("/years/{year}/unlock", post(unlock_year))
        .route("/years/{year}/history", get(get_history))
}

/// Request body for locking a year.
#[derive(Debug, Deserialize, Validate)]
pub struct LockYearRequest {
    /// Why the year is locked, e.g. "Filed with tax return".
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

/// Request body for unlocking a year.
#[derive(Debug, Deserialize, Validate)]
pub struct UnlockYearRequest {
    /// Owner of the year being unlocked.
    pub user_id: Uuid,
    /// Why the year is reopened.
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

/// GET `/years/{year}` - Summary with counters.
async fn get_year(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(year): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let overview = YearLockRepository::new((*state.db).clone())
        .get_year_overview(auth.user_id(), year)
        .await?;
    Ok(Json(overview))
}

/// GET `/years/{year}/lock` - Whether the year is locked.
async fn get_lock_state(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(year): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let is_locked = YearLockRepository::new((*state.db).clone())
        .is_year_locked(auth.user_id(), year)
        .await?;
    Ok(Json(json!({ "year": year, "is_locked": is_locked })))
}

/// POST `/years/{year}/lock` - Lock the caller's year.
async fn lock_year(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(year): Path<i32>,
    Json(payload): Json<LockYearRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let locked = YearLockRepository::new((*state.db).clone())
        .lock_year(auth.user_id(), year, payload.reason)
        .await?;
    Ok(Json(json!({ "year": year, "locked": locked })))
}

/// POST `/years/{year}/unlock` - Reopen a user's year (administrators only).
async fn unlock_year(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(year): Path<i32>,
    Json(payload): Json<UnlockYearRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let unlocked = YearLockRepository::new((*state.db).clone())
        .unlock_year(
            UserId::from_uuid(payload.user_id),
            year,
            &auth.actor(),
            payload.reason,
        )
        .await?;
    Ok(Json(json!({ "year": year, "unlocked": unlocked })))
}

/// GET `/years/{year}/history` - Lock and unlock events, oldest first.
async fn get_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(year): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let events = YearLockRepository::new((*state.db).clone())
        .get_lock_history(auth.user_id(), year)
        .await?;
    Ok(Json(json!({ "year": year, "events": events })))
}
