use anyhow::Result;
use rusqlite::params;

use crate::Gateway;
use crate::models::AdminLogRow;
use crate::queries::generated_id;

const COLUMNS: &str = "id, action, target_type, target_id, details, created_at";

pub fn insert(
    gw: &Gateway<'_>,
    action: &str,
    target_type: &str,
    target_id: i64,
    details: &str,
) -> Result<i64> {
    let exec = gw.execute(
        "INSERT INTO admin_logs (action, target_type, target_id, details) VALUES (?, ?, ?, ?)",
        params![action, target_type, target_id, details],
    )?;
    generated_id(exec, "admin_logs")
}

/// Newest first.
pub fn list_recent(gw: &Gateway<'_>, limit: i64) -> Result<Vec<AdminLogRow>> {
    gw.query_all(
        &format!(
            "SELECT {COLUMNS} FROM admin_logs
             ORDER BY created_at DESC, id DESC
             LIMIT ?"
        ),
        params![limit],
        AdminLogRow::read,
    )
}
