use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::models::{ChatMessage, SwapRequest, SwapRequestId, UserId};

/// Clients send ids either as JSON numbers or as numeric strings (form
/// fields). A blank string counts as absent.
fn optional_id<'de, D>(deserializer: D) -> Result<Option<UserId>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Number(id)) => Ok(Some(id)),
        Some(RawId::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(RawId::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid id '{text}'"))),
    }
}

// -- Swap requests --

/// Body of `POST /swap-requests`. Fields are optional on the wire so a
/// missing one surfaces as a validation error instead of a decode failure.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSwapRequest {
    #[serde(default, deserialize_with = "optional_id")]
    pub from_user_id: Option<UserId>,
    #[serde(default, deserialize_with = "optional_id")]
    pub to_user_id: Option<UserId>,
    pub offered_skill: Option<String>,
    pub wanted_skill: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TransitionRequest {
    pub status: Option<String>,
}

/// A swap request as seen by its recipient.
#[derive(Debug, Clone, Serialize)]
pub struct ReceivedSwapRequest {
    #[serde(flatten)]
    pub request: SwapRequest,
    pub from_user_name: String,
    pub from_user_email: String,
}

/// A swap request as seen by its sender.
#[derive(Debug, Clone, Serialize)]
pub struct SentSwapRequest {
    #[serde(flatten)]
    pub request: SwapRequest,
    pub to_user_name: String,
    pub to_user_email: String,
}

// -- Chat --

#[derive(Debug, Default, Deserialize)]
pub struct PostMessageRequest {
    #[serde(default, deserialize_with = "optional_id")]
    pub sender_id: Option<UserId>,
    #[serde(default, deserialize_with = "optional_id")]
    pub receiver_id: Option<UserId>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessageView {
    #[serde(flatten)]
    pub message: ChatMessage,
    pub sender_name: String,
}

/// One accepted swap the viewer takes part in, with the counterpart and the
/// number of messages addressed to the viewer that are still unread.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationSummary {
    pub swap_request_id: SwapRequestId,
    pub offered_skill: String,
    pub wanted_skill: String,
    pub request_date: DateTime<Utc>,
    pub other_user_id: UserId,
    pub other_user_name: String,
    pub unread_count: i64,
}

// -- Users --

#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body of `PUT /users/{id}/status`.
#[derive(Debug, Default, Deserialize)]
pub struct SetUserStatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

// -- Reporting --

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SwapStats {
    pub total: i64,
    pub pending: i64,
    pub accepted: i64,
    pub rejected: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserSwapSummary {
    pub user_id: UserId,
    pub sent: i64,
    pub received: i64,
    pub accepted: i64,
    pub unread_notifications: i64,
}

// -- Generic envelopes --

/// `{success, id, message}` returned when a swap request or chat message is created.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub id: i64,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_accept_numbers_and_numeric_strings() {
        let req: CreateSwapRequest = serde_json::from_str(
            r#"{"from_user_id": 1, "to_user_id": " 2 ", "offered_skill": "JS"}"#,
        )
        .unwrap();
        assert_eq!(req.from_user_id, Some(1));
        assert_eq!(req.to_user_id, Some(2));
        assert_eq!(req.wanted_skill, None);
    }

    #[test]
    fn blank_or_null_ids_are_absent() {
        let req: PostMessageRequest =
            serde_json::from_str(r#"{"sender_id": "", "receiver_id": null}"#).unwrap();
        assert_eq!(req.sender_id, None);
        assert_eq!(req.receiver_id, None);
        assert_eq!(req.message, None);
    }

    #[test]
    fn non_numeric_id_is_a_decode_error() {
        let err = serde_json::from_str::<CreateSwapRequest>(r#"{"from_user_id": "abc"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("invalid id 'abc'"), "{err}");
    }
}
