use axum::Json;
use axum::extract::{Path, State};
use axum_extra::extract::WithRejection;

use skillswap_core::chat_gate;
use skillswap_types::api::{ChatMessageView, ConversationSummary, CreatedResponse, PostMessageRequest};
use skillswap_types::models::{SwapRequestId, UserId};

use crate::error::AppResult;
use crate::extract::{JsonBody, PathParam};
use crate::state::{AppState, blocking};

/// GET /chat/{swap_request_id}: oldest first.
pub async fn list_messages(
    State(state): State<AppState>,
    WithRejection(Path(swap_request_id), _): PathParam<i64>,
) -> AppResult<Json<Vec<ChatMessageView>>> {
    let messages = blocking(&state, move |db| {
        chat_gate::list_messages(db, SwapRequestId(swap_request_id))
    })
    .await?;
    Ok(Json(messages))
}

/// POST /chat/{swap_request_id}
pub async fn post_message(
    State(state): State<AppState>,
    WithRejection(Path(swap_request_id), _): PathParam<i64>,
    WithRejection(Json(req), _): JsonBody<PostMessageRequest>,
) -> AppResult<Json<CreatedResponse>> {
    let message = blocking(&state, move |db| {
        chat_gate::post_message(db, SwapRequestId(swap_request_id), req)
    })
    .await?;

    Ok(Json(CreatedResponse {
        success: true,
        id: message.id.0,
        message: "Message sent successfully".into(),
    }))
}

/// GET /chat/user/{user_id}
pub async fn list_conversations(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): PathParam<UserId>,
) -> AppResult<Json<Vec<ConversationSummary>>> {
    let conversations = blocking(&state, move |db| chat_gate::list_conversations(db, user_id)).await?;
    Ok(Json(conversations))
}
