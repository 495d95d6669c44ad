use std::sync::Arc;

use skillswap_core::CoreResult;
use skillswap_db::Database;
use tracing::error;

use crate::error::{AppError, AppResult};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

impl AppStateInner {
    pub fn new(db: Database) -> AppState {
        Arc::new(Self { db })
    }
}

/// Run a core operation off the async runtime. Every store call blocks on
/// the SQLite connection, so handlers never call core directly.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> AppResult<T>
where
    F: FnOnce(&Database) -> CoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            AppError::Task(e.to_string())
        })?
        .map_err(AppError::from)
}
