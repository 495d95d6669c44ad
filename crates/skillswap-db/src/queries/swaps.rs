use anyhow::Result;
use rusqlite::params;

use skillswap_types::models::SwapStatus;

use crate::Gateway;
use crate::models::{SwapRequestRow, SwapRequestWithUserRow};
use crate::queries::{NOW, generated_id};

const COLUMNS: &str = "sr.id, sr.from_user_id, sr.to_user_id, sr.offered_skill, sr.wanted_skill, \
                       sr.message, sr.status, sr.created_at, sr.updated_at";

pub fn insert(
    gw: &Gateway<'_>,
    from_user_id: i64,
    to_user_id: i64,
    offered_skill: &str,
    wanted_skill: &str,
    message: Option<&str>,
) -> Result<i64> {
    let exec = gw.execute(
        "INSERT INTO swap_requests (from_user_id, to_user_id, offered_skill, wanted_skill, message)
         VALUES (?, ?, ?, ?, ?)",
        params![from_user_id, to_user_id, offered_skill, wanted_skill, message],
    )?;
    generated_id(exec, "swap_requests")
}

pub fn find(gw: &Gateway<'_>, id: i64) -> Result<Option<SwapRequestRow>> {
    gw.query_one(
        &format!("SELECT {COLUMNS} FROM swap_requests sr WHERE sr.id = ?"),
        params![id],
        SwapRequestRow::read,
    )
}

/// Sets the status and refreshes `updated_at`. Returns the affected row count.
pub fn update_status(gw: &Gateway<'_>, id: i64, status: SwapStatus) -> Result<usize> {
    let exec = gw.execute(
        &format!("UPDATE swap_requests SET status = ?, updated_at = {NOW} WHERE id = ?"),
        params![status.as_str(), id],
    )?;
    Ok(exec.affected_rows)
}

/// Requests addressed to `user_id`, joined with the sender, newest first.
pub fn list_received(gw: &Gateway<'_>, user_id: i64) -> Result<Vec<SwapRequestWithUserRow>> {
    gw.query_all(
        &format!(
            "SELECT {COLUMNS}, u.name, u.email
             FROM swap_requests sr
             JOIN users u ON sr.from_user_id = u.id
             WHERE sr.to_user_id = ?
             ORDER BY sr.created_at DESC, sr.id DESC"
        ),
        params![user_id],
        SwapRequestWithUserRow::read,
    )
}

/// Requests sent by `user_id`, joined with the recipient, newest first.
pub fn list_sent(gw: &Gateway<'_>, user_id: i64) -> Result<Vec<SwapRequestWithUserRow>> {
    gw.query_all(
        &format!(
            "SELECT {COLUMNS}, u.name, u.email
             FROM swap_requests sr
             JOIN users u ON sr.to_user_id = u.id
             WHERE sr.from_user_id = ?
             ORDER BY sr.created_at DESC, sr.id DESC"
        ),
        params![user_id],
        SwapRequestWithUserRow::read,
    )
}
