//! Messaging between the two parties of a swap. Only accepted requests
//! have a chat; each message notifies its receiver.

use tracing::{debug, info};

use skillswap_db::{Database, queries};
use skillswap_types::api::{ChatMessageView, ConversationSummary, PostMessageRequest};
use skillswap_types::models::{
    ChatMessage, ChatMessageId, NotificationTarget, SwapRequest, SwapRequestId, SwapStatus, UserId,
};

use crate::dispatcher;
use crate::error::{CoreError, CoreResult, MISSING_FIELDS, required_id, required_text};

pub const CHAT_UNAVAILABLE: &str = "Chat is only available for accepted swap requests";

pub fn post_message(
    db: &Database,
    swap_request_id: SwapRequestId,
    req: PostMessageRequest,
) -> CoreResult<ChatMessage> {
    let missing = || CoreError::Validation(MISSING_FIELDS.into());
    let sender_id = required_id(req.sender_id).ok_or_else(missing)?;
    let receiver_id = required_id(req.receiver_id).ok_or_else(missing)?;
    let body = required_text(req.message).ok_or_else(missing)?;
    if swap_request_id.0 == 0 {
        return Err(missing());
    }

    let message = db.with_tx(|gw| -> CoreResult<ChatMessage> {
        let request: SwapRequest = queries::swaps::find(gw, swap_request_id.0)?
            .ok_or(CoreError::NotFound {
                entity: "Swap request",
                id: swap_request_id.0,
            })?
            .try_into()?;
        if request.status != SwapStatus::Accepted {
            return Err(CoreError::Conflict(CHAT_UNAVAILABLE.into()));
        }

        let id = queries::chat::insert(gw, swap_request_id.0, sender_id, receiver_id, &body)?;
        let id = ChatMessageId(id);

        dispatcher::emit(
            gw,
            receiver_id,
            NotificationTarget::ChatMessage { related_id: id },
            "New Message",
            &format!("You have a new message from user {}", sender_id),
        );

        let row = queries::chat::find(gw, id.0)?.ok_or(CoreError::NotFound {
            entity: "Chat message",
            id: id.0,
        })?;
        Ok(row.try_into()?)
    })?;

    info!(
        swap_request_id = swap_request_id.0,
        chat_message_id = message.id.0,
        sender_id,
        receiver_id,
        "chat message posted"
    );
    Ok(message)
}

/// Every message of the conversation, oldest first.
pub fn list_messages(db: &Database, swap_request_id: SwapRequestId) -> CoreResult<Vec<ChatMessageView>> {
    let rows = db.with_gateway(|gw| queries::chat::list_for_request(gw, swap_request_id.0))?;
    debug!(swap_request_id = swap_request_id.0, count = rows.len(), "listing chat messages");
    let messages = rows
        .into_iter()
        .map(ChatMessageView::try_from)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(messages)
}

/// Accepted swaps `user_id` takes part in. Unread counts are recomputed from
/// the chat notifications on every call.
pub fn list_conversations(db: &Database, user_id: UserId) -> CoreResult<Vec<ConversationSummary>> {
    let rows = db.with_gateway(|gw| queries::chat::conversations_for_user(gw, user_id))?;
    let conversations = rows
        .into_iter()
        .map(ConversationSummary::try_from)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(conversations)
}
