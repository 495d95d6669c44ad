use anyhow::Result;
use rusqlite::params;

use crate::Gateway;
use crate::models::{ChatMessageRow, ChatMessageWithSenderRow, ConversationRow};
use crate::queries::generated_id;

pub fn insert(
    gw: &Gateway<'_>,
    swap_request_id: i64,
    sender_id: i64,
    receiver_id: i64,
    message: &str,
) -> Result<i64> {
    let exec = gw.execute(
        "INSERT INTO chat_messages (swap_request_id, sender_id, receiver_id, message) VALUES (?, ?, ?, ?)",
        params![swap_request_id, sender_id, receiver_id, message],
    )?;
    generated_id(exec, "chat_messages")
}

pub fn find(gw: &Gateway<'_>, id: i64) -> Result<Option<ChatMessageRow>> {
    gw.query_one(
        "SELECT id, swap_request_id, sender_id, receiver_id, message, created_at
         FROM chat_messages WHERE id = ?",
        params![id],
        ChatMessageRow::read,
    )
}

/// Oldest first: conversations read top to bottom.
pub fn list_for_request(gw: &Gateway<'_>, swap_request_id: i64) -> Result<Vec<ChatMessageWithSenderRow>> {
    gw.query_all(
        "SELECT cm.id, cm.swap_request_id, cm.sender_id, cm.receiver_id, cm.message, cm.created_at, u.name
         FROM chat_messages cm
         JOIN users u ON cm.sender_id = u.id
         WHERE cm.swap_request_id = ?
         ORDER BY cm.created_at ASC, cm.id ASC",
        params![swap_request_id],
        ChatMessageWithSenderRow::read,
    )
}

/// Accepted swaps involving `user_id`, each with the counterpart and the
/// number of messages to `user_id` whose chat notification is not yet read.
/// Most recently resolved first.
pub fn conversations_for_user(gw: &Gateway<'_>, user_id: i64) -> Result<Vec<ConversationRow>> {
    gw.query_all(
        "SELECT sr.id, sr.offered_skill, sr.wanted_skill, sr.created_at, u.id, u.name,
                (SELECT COUNT(*) FROM chat_messages cm
                  WHERE cm.swap_request_id = sr.id
                    AND cm.receiver_id = ?
                    AND cm.id NOT IN (
                        SELECT n.related_id FROM notifications n
                         WHERE n.user_id = ?
                           AND n.type = 'chat_message'
                           AND n.is_read = 1)) AS unread_count
         FROM swap_requests sr
         JOIN users u ON (sr.from_user_id = u.id OR sr.to_user_id = u.id)
         WHERE sr.status = 'accepted'
           AND (sr.from_user_id = ? OR sr.to_user_id = ?)
           AND u.id != ?
         ORDER BY sr.updated_at DESC, sr.id DESC",
        params![user_id, user_id, user_id, user_id, user_id],
        ConversationRow::read,
    )
}
