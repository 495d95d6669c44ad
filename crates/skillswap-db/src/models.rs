//! Database row types. These map directly to SQLite rows and stay separate
//! from the skillswap-types models so the storage layer can evolve on its own.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use rusqlite::Row;

use skillswap_types::api::{ChatMessageView, ConversationSummary, ReceivedSwapRequest, SentSwapRequest};
use skillswap_types::models::{
    ChatMessage, ChatMessageId, ModerationEntry, Notification, NotificationId, NotificationTarget,
    SwapRequest, SwapRequestId, User, parse_timestamp,
};

pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub status: String,
    pub created_at: String,
}

pub struct SwapRequestRow {
    pub id: i64,
    pub from_user_id: i64,
    pub to_user_id: i64,
    pub offered_skill: String,
    pub wanted_skill: String,
    pub message: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A swap request joined with the name/email of the other party.
pub struct SwapRequestWithUserRow {
    pub request: SwapRequestRow,
    pub user_name: String,
    pub user_email: String,
}

pub struct NotificationRow {
    pub id: i64,
    pub user_id: i64,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub related_id: i64,
    pub is_read: bool,
    pub created_at: String,
}

pub struct ChatMessageRow {
    pub id: i64,
    pub swap_request_id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub message: String,
    pub created_at: String,
}

pub struct ChatMessageWithSenderRow {
    pub message: ChatMessageRow,
    pub sender_name: String,
}

pub struct AdminLogRow {
    pub id: i64,
    pub action: String,
    pub target_type: String,
    pub target_id: i64,
    pub details: String,
    pub created_at: String,
}

pub struct ConversationRow {
    pub swap_request_id: i64,
    pub offered_skill: String,
    pub wanted_skill: String,
    pub request_date: String,
    pub other_user_id: i64,
    pub other_user_name: String,
    pub unread_count: i64,
}

// -- Column readers (column order matches the SELECT lists in `queries`) --

impl UserRow {
    pub(crate) fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            password: row.get(3)?,
            status: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl SwapRequestRow {
    pub(crate) const COLUMN_COUNT: usize = 9;

    pub(crate) fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            from_user_id: row.get(1)?,
            to_user_id: row.get(2)?,
            offered_skill: row.get(3)?,
            wanted_skill: row.get(4)?,
            message: row.get(5)?,
            status: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}

impl SwapRequestWithUserRow {
    pub(crate) fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        let offset = SwapRequestRow::COLUMN_COUNT;
        Ok(Self {
            request: SwapRequestRow::read(row)?,
            user_name: row.get(offset)?,
            user_email: row.get(offset + 1)?,
        })
    }
}

impl NotificationRow {
    pub(crate) fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            kind: row.get(2)?,
            title: row.get(3)?,
            message: row.get(4)?,
            related_id: row.get(5)?,
            is_read: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}

impl ChatMessageRow {
    pub(crate) const COLUMN_COUNT: usize = 6;

    pub(crate) fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            swap_request_id: row.get(1)?,
            sender_id: row.get(2)?,
            receiver_id: row.get(3)?,
            message: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl ChatMessageWithSenderRow {
    pub(crate) fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            message: ChatMessageRow::read(row)?,
            sender_name: row.get(ChatMessageRow::COLUMN_COUNT)?,
        })
    }
}

impl AdminLogRow {
    pub(crate) fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            action: row.get(1)?,
            target_type: row.get(2)?,
            target_id: row.get(3)?,
            details: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl ConversationRow {
    pub(crate) fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            swap_request_id: row.get(0)?,
            offered_skill: row.get(1)?,
            wanted_skill: row.get(2)?,
            request_date: row.get(3)?,
            other_user_id: row.get(4)?,
            other_user_name: row.get(5)?,
            unread_count: row.get(6)?,
        })
    }
}

// -- Row -> model conversions --

fn timestamp(raw: &str, column: &str) -> Result<DateTime<Utc>> {
    parse_timestamp(raw).ok_or_else(|| anyhow!("corrupt {column} '{raw}'"))
}

impl TryFrom<UserRow> for User {
    type Error = anyhow::Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            status: row
                .status
                .parse()
                .with_context(|| format!("user {}", row.id))?,
            created_at: timestamp(&row.created_at, "created_at")?,
            name: row.name,
            email: row.email,
        })
    }
}

impl TryFrom<AdminLogRow> for ModerationEntry {
    type Error = anyhow::Error;

    fn try_from(row: AdminLogRow) -> Result<Self> {
        Ok(Self {
            created_at: timestamp(&row.created_at, "created_at")?,
            id: row.id,
            action: row.action,
            target_type: row.target_type,
            target_id: row.target_id,
            details: row.details,
        })
    }
}

impl TryFrom<SwapRequestRow> for SwapRequest {
    type Error = anyhow::Error;

    fn try_from(row: SwapRequestRow) -> Result<Self> {
        Ok(Self {
            id: SwapRequestId(row.id),
            from_user_id: row.from_user_id,
            to_user_id: row.to_user_id,
            status: row
                .status
                .parse()
                .with_context(|| format!("swap request {}", row.id))?,
            created_at: timestamp(&row.created_at, "created_at")?,
            updated_at: timestamp(&row.updated_at, "updated_at")?,
            offered_skill: row.offered_skill,
            wanted_skill: row.wanted_skill,
            message: row.message,
        })
    }
}

impl TryFrom<SwapRequestWithUserRow> for ReceivedSwapRequest {
    type Error = anyhow::Error;

    fn try_from(row: SwapRequestWithUserRow) -> Result<Self> {
        Ok(Self {
            request: row.request.try_into()?,
            from_user_name: row.user_name,
            from_user_email: row.user_email,
        })
    }
}

impl TryFrom<SwapRequestWithUserRow> for SentSwapRequest {
    type Error = anyhow::Error;

    fn try_from(row: SwapRequestWithUserRow) -> Result<Self> {
        Ok(Self {
            request: row.request.try_into()?,
            to_user_name: row.user_name,
            to_user_email: row.user_email,
        })
    }
}

impl TryFrom<NotificationRow> for Notification {
    type Error = anyhow::Error;

    fn try_from(row: NotificationRow) -> Result<Self> {
        Ok(Self {
            id: NotificationId(row.id),
            user_id: row.user_id,
            target: NotificationTarget::from_parts(&row.kind, row.related_id)
                .with_context(|| format!("notification {}", row.id))?,
            created_at: timestamp(&row.created_at, "created_at")?,
            title: row.title,
            message: row.message,
            is_read: row.is_read,
        })
    }
}

impl TryFrom<ChatMessageRow> for ChatMessage {
    type Error = anyhow::Error;

    fn try_from(row: ChatMessageRow) -> Result<Self> {
        Ok(Self {
            id: ChatMessageId(row.id),
            swap_request_id: SwapRequestId(row.swap_request_id),
            sender_id: row.sender_id,
            receiver_id: row.receiver_id,
            created_at: timestamp(&row.created_at, "created_at")?,
            message: row.message,
        })
    }
}

impl TryFrom<ChatMessageWithSenderRow> for ChatMessageView {
    type Error = anyhow::Error;

    fn try_from(row: ChatMessageWithSenderRow) -> Result<Self> {
        Ok(Self {
            message: row.message.try_into()?,
            sender_name: row.sender_name,
        })
    }
}

impl TryFrom<ConversationRow> for ConversationSummary {
    type Error = anyhow::Error;

    fn try_from(row: ConversationRow) -> Result<Self> {
        Ok(Self {
            swap_request_id: SwapRequestId(row.swap_request_id),
            request_date: timestamp(&row.request_date, "request_date")?,
            other_user_id: row.other_user_id,
            other_user_name: row.other_user_name,
            offered_skill: row.offered_skill,
            wanted_skill: row.wanted_skill,
            unread_count: row.unread_count,
        })
    }
}
