use anyhow::Result;
use rusqlite::params;

use crate::Gateway;
use crate::models::UserRow;
use crate::queries::generated_id;

const COLUMNS: &str = "id, name, email, password, status, created_at";

pub fn insert(gw: &Gateway<'_>, name: &str, email: &str, password_hash: &str) -> Result<i64> {
    let exec = gw.execute(
        "INSERT INTO users (name, email, password) VALUES (?, ?, ?)",
        params![name, email, password_hash],
    )?;
    generated_id(exec, "users")
}

pub fn find(gw: &Gateway<'_>, id: i64) -> Result<Option<UserRow>> {
    gw.query_one(
        &format!("SELECT {COLUMNS} FROM users WHERE id = ?"),
        params![id],
        UserRow::read,
    )
}

pub fn find_by_email(gw: &Gateway<'_>, email: &str) -> Result<Option<UserRow>> {
    gw.query_one(
        &format!("SELECT {COLUMNS} FROM users WHERE email = ?"),
        params![email],
        UserRow::read,
    )
}

/// Returns the number of rows changed (0 when the user does not exist).
pub fn update_status(gw: &Gateway<'_>, id: i64, status: &str) -> Result<usize> {
    let exec = gw.execute("UPDATE users SET status = ? WHERE id = ?", params![status, id])?;
    Ok(exec.affected_rows)
}

pub fn list(gw: &Gateway<'_>) -> Result<Vec<UserRow>> {
    gw.query_all(
        &format!("SELECT {COLUMNS} FROM users ORDER BY id"),
        params![],
        UserRow::read,
    )
}
