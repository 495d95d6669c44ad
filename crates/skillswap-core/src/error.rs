/// Failures a core operation can report. Handlers map these onto HTTP
/// statuses; nothing here knows about HTTP.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// The entity exists but its current state forbids the operation.
    #[error("{0}")]
    Conflict(String),

    /// The store failed. The message is passed through unchanged.
    #[error("{0:#}")]
    Store(#[from] anyhow::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;

pub(crate) const MISSING_FIELDS: &str = "Missing required fields";

/// Ids arrive as JSON numbers; zero is treated like an absent value.
pub(crate) fn required_id(value: Option<i64>) -> Option<i64> {
    value.filter(|id| *id != 0)
}

pub(crate) fn required_text(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
