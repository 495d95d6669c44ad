use axum::Json;
use axum::extract::{Path, State};
use axum_extra::extract::WithRejection;

use skillswap_core::lifecycle;
use skillswap_types::api::{
    CreateSwapRequest, CreatedResponse, ReceivedSwapRequest, SentSwapRequest, SuccessResponse,
    TransitionRequest,
};
use skillswap_types::models::{SwapRequestId, UserId};

use crate::error::AppResult;
use crate::extract::{JsonBody, PathParam};
use crate::state::{AppState, blocking};

/// POST /swap-requests
pub async fn create_swap_request(
    State(state): State<AppState>,
    WithRejection(Json(req), _): JsonBody<CreateSwapRequest>,
) -> AppResult<Json<CreatedResponse>> {
    let created = blocking(&state, move |db| lifecycle::create(db, req)).await?;

    Ok(Json(CreatedResponse {
        success: true,
        id: created.id.0,
        message: "Swap request sent successfully".into(),
    }))
}

/// GET /swap-requests/received/{user_id}
pub async fn list_received(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): PathParam<UserId>,
) -> AppResult<Json<Vec<ReceivedSwapRequest>>> {
    let requests = blocking(&state, move |db| lifecycle::list_received(db, user_id)).await?;
    Ok(Json(requests))
}

/// GET /swap-requests/sent/{user_id}
pub async fn list_sent(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): PathParam<UserId>,
) -> AppResult<Json<Vec<SentSwapRequest>>> {
    let requests = blocking(&state, move |db| lifecycle::list_sent(db, user_id)).await?;
    Ok(Json(requests))
}

/// PUT /swap-requests/{id} with `{"status": "accepted" | "rejected"}`
pub async fn update_swap_request(
    State(state): State<AppState>,
    WithRejection(Path(id), _): PathParam<i64>,
    WithRejection(Json(req), _): JsonBody<TransitionRequest>,
) -> AppResult<Json<SuccessResponse>> {
    let updated = blocking(&state, move |db| {
        lifecycle::transition(db, SwapRequestId(id), req.status.as_deref())
    })
    .await?;

    Ok(Json(SuccessResponse::with_message(format!(
        "Swap request {}",
        updated.status
    ))))
}
