//! User-visible notifications. Lifecycle and chat events call [`emit`];
//! clients only ever read them or flip their read state.

use tracing::{debug, warn};

use skillswap_db::{Database, Gateway, queries};
use skillswap_types::models::{Notification, NotificationId, NotificationTarget, UserId};

use crate::error::CoreResult;

/// Most notifications returned by [`list`].
pub const LIST_LIMIT: u32 = 50;

/// Best-effort insert. A failure is logged and swallowed so it never undoes
/// the event that triggered it.
pub fn emit(
    gw: &Gateway<'_>,
    user_id: UserId,
    target: NotificationTarget,
    title: &str,
    message: &str,
) -> Option<NotificationId> {
    match queries::notifications::insert(gw, user_id, &target, title, message) {
        Ok(id) => {
            debug!(user_id, kind = target.kind(), related_id = target.related_id(), "notification {} created", id);
            Some(NotificationId(id))
        }
        Err(e) => {
            warn!(
                user_id,
                kind = target.kind(),
                related_id = target.related_id(),
                "dropping notification: {:#}",
                e
            );
            None
        }
    }
}

/// Newest first, at most [`LIST_LIMIT`].
pub fn list(db: &Database, user_id: UserId) -> CoreResult<Vec<Notification>> {
    let rows = db.with_gateway(|gw| queries::notifications::list_for_user(gw, user_id, LIST_LIMIT))?;
    let notifications = rows
        .into_iter()
        .map(Notification::try_from)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(notifications)
}

/// Unknown ids are a silent no-op.
pub fn mark_read(db: &Database, id: NotificationId) -> CoreResult<()> {
    let affected = db.with_gateway(|gw| queries::notifications::mark_read(gw, id.0))?;
    debug!(notification_id = id.0, affected, "mark read");
    Ok(())
}

pub fn mark_all_read(db: &Database, user_id: UserId) -> CoreResult<()> {
    let affected = db.with_gateway(|gw| queries::notifications::mark_all_read(gw, user_id))?;
    debug!(user_id, affected, "mark all read");
    Ok(())
}

/// Zero for a user with no notifications.
pub fn unread_count(db: &Database, user_id: UserId) -> CoreResult<i64> {
    Ok(db.with_gateway(|gw| queries::notifications::unread_count(gw, user_id))?)
}
