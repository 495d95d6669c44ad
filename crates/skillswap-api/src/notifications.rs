use axum::Json;
use axum::extract::{Path, State};
use axum_extra::extract::WithRejection;

use skillswap_core::dispatcher;
use skillswap_types::api::{SuccessResponse, UnreadCountResponse};
use skillswap_types::models::{Notification, NotificationId, UserId};

use crate::error::AppResult;
use crate::extract::PathParam;
use crate::state::{AppState, blocking};

/// GET /notifications/{user_id}: newest first, at most 50.
pub async fn list_notifications(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): PathParam<UserId>,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications = blocking(&state, move |db| dispatcher::list(db, user_id)).await?;
    Ok(Json(notifications))
}

/// PUT /notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    WithRejection(Path(id), _): PathParam<i64>,
) -> AppResult<Json<SuccessResponse>> {
    blocking(&state, move |db| dispatcher::mark_read(db, NotificationId(id))).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// PUT /notifications/{user_id}/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): PathParam<UserId>,
) -> AppResult<Json<SuccessResponse>> {
    blocking(&state, move |db| dispatcher::mark_all_read(db, user_id)).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// GET /notifications/{user_id}/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): PathParam<UserId>,
) -> AppResult<Json<UnreadCountResponse>> {
    let count = blocking(&state, move |db| dispatcher::unread_count(db, user_id)).await?;
    Ok(Json(UnreadCountResponse { count }))
}
