use anyhow::Result;
use rusqlite::params;

use skillswap_types::models::NotificationTarget;

use crate::Gateway;
use crate::models::NotificationRow;
use crate::queries::generated_id;

const COLUMNS: &str = "id, user_id, type, title, message, related_id, is_read, created_at";

pub fn insert(
    gw: &Gateway<'_>,
    user_id: i64,
    target: &NotificationTarget,
    title: &str,
    message: &str,
) -> Result<i64> {
    let exec = gw.execute(
        "INSERT INTO notifications (user_id, type, title, message, related_id) VALUES (?, ?, ?, ?, ?)",
        params![user_id, target.kind(), title, message, target.related_id()],
    )?;
    generated_id(exec, "notifications")
}

/// Newest first, capped at `limit`.
pub fn list_for_user(gw: &Gateway<'_>, user_id: i64, limit: u32) -> Result<Vec<NotificationRow>> {
    gw.query_all(
        &format!(
            "SELECT {COLUMNS} FROM notifications
             WHERE user_id = ?
             ORDER BY created_at DESC, id DESC
             LIMIT ?"
        ),
        params![user_id, limit],
        NotificationRow::read,
    )
}

pub fn mark_read(gw: &Gateway<'_>, id: i64) -> Result<usize> {
    let exec = gw.execute("UPDATE notifications SET is_read = 1 WHERE id = ?", params![id])?;
    Ok(exec.affected_rows)
}

pub fn mark_all_read(gw: &Gateway<'_>, user_id: i64) -> Result<usize> {
    let exec = gw.execute(
        "UPDATE notifications SET is_read = 1 WHERE user_id = ? AND is_read = 0",
        params![user_id],
    )?;
    Ok(exec.affected_rows)
}

pub fn unread_count(gw: &Gateway<'_>, user_id: i64) -> Result<i64> {
    let count = gw.query_one(
        "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND is_read = 0",
        params![user_id],
        |row| row.get(0),
    )?;
    Ok(count.unwrap_or(0))
}
