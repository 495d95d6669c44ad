use axum::Json;
use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use skillswap_types::api::HealthResponse;

use crate::state::AppState;
use crate::{chat, notifications, stats, swaps, users};

/// Routes served under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}/status", put(users::set_user_status))
        .route("/admin/logs", get(users::moderation_log))
        .route("/swap-requests", post(swaps::create_swap_request))
        .route("/swap-requests/received/{user_id}", get(swaps::list_received))
        .route("/swap-requests/sent/{user_id}", get(swaps::list_sent))
        .route("/swap-requests/{id}", put(swaps::update_swap_request))
        // `{id}` is a user id for listing, read-all and unread-count, and a
        // notification id for read; the router needs one name per position.
        .route("/notifications/{id}", get(notifications::list_notifications))
        .route("/notifications/{id}/read", put(notifications::mark_read))
        .route("/notifications/{id}/read-all", put(notifications::mark_all_read))
        .route("/notifications/{id}/unread-count", get(notifications::unread_count))
        .route("/chat/user/{user_id}", get(chat::list_conversations))
        .route(
            "/chat/{swap_request_id}",
            get(chat::list_messages).post(chat::post_message),
        )
        .route("/stats/swaps", get(stats::swap_stats))
        .route("/stats/users/{user_id}", get(stats::user_summary))
}

/// Full application: health check, API routes, CORS and request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
