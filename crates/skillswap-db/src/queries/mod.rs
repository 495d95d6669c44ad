//! Typed statements, one module per table. Every function takes a
//! [`Gateway`](crate::Gateway) so callers decide whether it runs inside a
//! transaction.

pub mod admin_logs;
pub mod chat;
pub mod notifications;
pub mod stats;
pub mod swaps;
pub mod users;

use anyhow::{Result, anyhow};

use crate::Execution;

/// Store-side timestamp expression, millisecond precision, UTC.
pub(crate) const NOW: &str = "strftime('%Y-%m-%d %H:%M:%f', 'now')";

pub(crate) fn generated_id(exec: Execution, table: &str) -> Result<i64> {
    exec.generated_id
        .ok_or_else(|| anyhow!("insert into {table} returned no id"))
}
