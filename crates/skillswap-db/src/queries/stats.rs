use anyhow::Result;
use rusqlite::params;

use crate::Gateway;

/// `(status, count)` for every status that has at least one swap request.
pub fn swap_status_counts(gw: &Gateway<'_>) -> Result<Vec<(String, i64)>> {
    gw.query_all(
        "SELECT status, COUNT(*) FROM swap_requests GROUP BY status ORDER BY status",
        params![],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
}

pub struct UserSwapCounts {
    pub sent: i64,
    pub received: i64,
    pub accepted: i64,
}

pub fn user_swap_counts(gw: &Gateway<'_>, user_id: i64) -> Result<UserSwapCounts> {
    let counts = gw.query_one(
        "SELECT
             COALESCE(SUM(CASE WHEN from_user_id = ? THEN 1 ELSE 0 END), 0),
             COALESCE(SUM(CASE WHEN to_user_id = ? THEN 1 ELSE 0 END), 0),
             COALESCE(SUM(CASE WHEN status = 'accepted' THEN 1 ELSE 0 END), 0)
         FROM swap_requests
         WHERE from_user_id = ? OR to_user_id = ?",
        params![user_id, user_id, user_id, user_id],
        |row| {
            Ok(UserSwapCounts {
                sent: row.get(0)?,
                received: row.get(1)?,
                accepted: row.get(2)?,
            })
        },
    )?;

    Ok(counts.unwrap_or(UserSwapCounts {
        sent: 0,
        received: 0,
        accepted: 0,
    }))
}
