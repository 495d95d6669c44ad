use axum::Json;
use axum::extract::{Path, State};
use axum_extra::extract::WithRejection;

use skillswap_core::reporting;
use skillswap_types::api::{SwapStats, UserSwapSummary};
use skillswap_types::models::UserId;

use crate::error::AppResult;
use crate::extract::PathParam;
use crate::state::{AppState, blocking};

pub async fn swap_stats(State(state): State<AppState>) -> AppResult<Json<SwapStats>> {
    Ok(Json(blocking(&state, reporting::swap_stats).await?))
}

pub async fn user_summary(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): PathParam<UserId>,
) -> AppResult<Json<UserSwapSummary>> {
    Ok(Json(
        blocking(&state, move |db| reporting::user_summary(db, user_id)).await?,
    ))
}
