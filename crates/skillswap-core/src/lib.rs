//! Business rules of the marketplace: the swap request state machine, the
//! notifications it fans out, and the chat that opens once a swap is accepted.

pub mod chat_gate;
pub mod dispatcher;
pub mod error;
pub mod lifecycle;
pub mod reporting;
pub mod users;

pub use error::{CoreError, CoreResult};

#[cfg(test)]
pub(crate) mod testing {
    use skillswap_db::{Database, queries};
    use skillswap_types::models::{Notification, NotificationId, NotificationTarget, SwapRequestId, parse_timestamp};

    pub fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    /// Inserts a user directly, bypassing password hashing.
    pub fn user(db: &Database, name: &str) -> i64 {
        db.with_gateway(|gw| {
            queries::users::insert(gw, name, &format!("{}@example.com", name.to_lowercase()), "x")
        })
        .unwrap()
    }

    /// Notifications of one type pointing at one entity, oldest first.
    pub fn notifications_for(db: &Database, target: NotificationTarget) -> Vec<Notification> {
        db.with_gateway(|gw| {
            gw.query_all(
                "SELECT id, user_id, title, message, is_read, created_at FROM notifications
                 WHERE type = ? AND related_id = ?
                 ORDER BY id",
                &[&target.kind(), &target.related_id()],
                |row| {
                    Ok(Notification {
                        id: NotificationId(row.get(0)?),
                        user_id: row.get(1)?,
                        target,
                        title: row.get(2)?,
                        message: row.get(3)?,
                        is_read: row.get(4)?,
                        created_at: parse_timestamp(&row.get::<_, String>(5)?).unwrap(),
                    })
                },
            )
        })
        .unwrap()
    }

    pub fn message_count(db: &Database, swap: SwapRequestId) -> i64 {
        db.with_gateway(|gw| {
            gw.query_one(
                "SELECT COUNT(*) FROM chat_messages WHERE swap_request_id = ?",
                &[&swap.0],
                |row| row.get(0),
            )
        })
        .unwrap()
        .unwrap_or(0)
    }
}
