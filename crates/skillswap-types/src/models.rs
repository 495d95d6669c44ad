use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = i64;

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

id_newtype!(
    /// Primary key of a row in `swap_requests`.
    SwapRequestId
);
id_newtype!(
    /// Primary key of a row in `chat_messages`.
    ChatMessageId
);
id_newtype!(NotificationId);

/// Returned when a stored enum column holds a value this build does not know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

// -- Users --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Flagged,
    Banned,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Flagged => "flagged",
            Self::Banned => "banned",
        }
    }
}

impl FromStr for UserStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "flagged" => Ok(Self::Flagged),
            "banned" => Ok(Self::Banned),
            other => Err(UnknownVariant {
                kind: "user status",
                value: other.to_string(),
            }),
        }
    }
}

/// A marketplace member. The stored credential never leaves the database layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

/// One recorded moderation action, e.g. a user being flagged or banned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationEntry {
    pub id: i64,
    pub action: String,
    pub target_type: String,
    pub target_id: i64,
    pub details: String,
    pub created_at: DateTime<Utc>,
}

// -- Swap requests --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
    Pending,
    Accepted,
    Rejected,
}

impl SwapStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwapStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(UnknownVariant {
                kind: "swap status",
                value: other.to_string(),
            }),
        }
    }
}

/// The two outcomes a pending swap request can be resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDecision {
    Accept,
    Reject,
}

impl SwapDecision {
    /// Parses the wire value of a transition. Only `accepted` and `rejected` resolve.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "accepted" => Some(Self::Accept),
            "rejected" => Some(Self::Reject),
            _ => None,
        }
    }

    pub fn status(&self) -> SwapStatus {
        match self {
            Self::Accept => SwapStatus::Accepted,
            Self::Reject => SwapStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub id: SwapRequestId,
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub offered_skill: String,
    pub wanted_skill: String,
    pub message: Option<String>,
    pub status: SwapStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// -- Notifications --

/// What a notification points at. The `type` column decides which table
/// `related_id` refers to, so each variant carries its own id type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationTarget {
    SwapRequest { related_id: SwapRequestId },
    SwapResponse { related_id: SwapRequestId },
    ChatMessage { related_id: ChatMessageId },
}

impl NotificationTarget {
    pub const SWAP_REQUEST: &'static str = "swap_request";
    pub const SWAP_RESPONSE: &'static str = "swap_response";
    pub const CHAT_MESSAGE: &'static str = "chat_message";

    pub fn kind(&self) -> &'static str {
        match self {
            Self::SwapRequest { .. } => Self::SWAP_REQUEST,
            Self::SwapResponse { .. } => Self::SWAP_RESPONSE,
            Self::ChatMessage { .. } => Self::CHAT_MESSAGE,
        }
    }

    pub fn related_id(&self) -> i64 {
        match self {
            Self::SwapRequest { related_id } | Self::SwapResponse { related_id } => related_id.0,
            Self::ChatMessage { related_id } => related_id.0,
        }
    }

    /// Rebuilds the target from its stored `(type, related_id)` columns.
    pub fn from_parts(kind: &str, related_id: i64) -> Result<Self, UnknownVariant> {
        match kind {
            Self::SWAP_REQUEST => Ok(Self::SwapRequest {
                related_id: SwapRequestId(related_id),
            }),
            Self::SWAP_RESPONSE => Ok(Self::SwapResponse {
                related_id: SwapRequestId(related_id),
            }),
            Self::CHAT_MESSAGE => Ok(Self::ChatMessage {
                related_id: ChatMessageId(related_id),
            }),
            other => Err(UnknownVariant {
                kind: "notification type",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub target: NotificationTarget,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

// -- Chat --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: ChatMessageId,
    pub swap_request_id: SwapRequestId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Parses a stored timestamp. SQLite hands back `YYYY-MM-DD HH:MM:SS[.fff]`
/// without a zone; those are UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>().ok().or_else(|| {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
            .ok()
            .map(|ndt| ndt.and_utc())
    })
}
