use axum::Json;
use axum::extract::{Path, State};
use axum_extra::extract::WithRejection;

use skillswap_core::users;
use skillswap_types::api::{CreateUserRequest, CreatedUserResponse, SetUserStatusRequest, SuccessResponse};
use skillswap_types::models::{ModerationEntry, User, UserId};

use crate::error::AppResult;
use crate::extract::{JsonBody, PathParam};
use crate::state::{AppState, blocking};

pub async fn create_user(
    State(state): State<AppState>,
    WithRejection(Json(req), _): JsonBody<CreateUserRequest>,
) -> AppResult<Json<CreatedUserResponse>> {
    let user = blocking(&state, move |db| users::create(db, req)).await?;

    Ok(Json(CreatedUserResponse {
        id: user.id,
        name: user.name,
        email: user.email,
    }))
}

pub async fn get_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): PathParam<UserId>,
) -> AppResult<Json<User>> {
    Ok(Json(blocking(&state, move |db| users::get(db, id)).await?))
}

pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(blocking(&state, users::list).await?))
}

/// PUT /users/{id}/status with `{"status": "active" | "flagged" | "banned"}`
pub async fn set_user_status(
    State(state): State<AppState>,
    WithRejection(Path(id), _): PathParam<UserId>,
    WithRejection(Json(req), _): JsonBody<SetUserStatusRequest>,
) -> AppResult<Json<SuccessResponse>> {
    let user = blocking(&state, move |db| users::set_status(db, id, req.status.as_deref())).await?;
    Ok(Json(SuccessResponse::with_message(format!(
        "User status changed to {}",
        user.status.as_str()
    ))))
}

/// GET /admin/logs: newest first, at most 50.
pub async fn moderation_log(State(state): State<AppState>) -> AppResult<Json<Vec<ModerationEntry>>> {
    Ok(Json(blocking(&state, users::moderation_log).await?))
}
