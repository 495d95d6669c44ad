//! Swap request state machine: `pending` resolves exactly once, to either
//! `accepted` or `rejected`.

use tracing::{debug, info};

use skillswap_db::{Database, queries};
use skillswap_types::api::{CreateSwapRequest, ReceivedSwapRequest, SentSwapRequest};
use skillswap_types::models::{NotificationTarget, SwapDecision, SwapRequest, SwapRequestId, UserId};

use crate::dispatcher;
use crate::error::{CoreError, CoreResult, MISSING_FIELDS, required_id, required_text};

pub const INVALID_STATUS: &str = "Invalid status. Must be \"accepted\" or \"rejected\"";

/// A validated proposal, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSwapRequest {
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub offered_skill: String,
    pub wanted_skill: String,
    pub message: Option<String>,
}

impl TryFrom<CreateSwapRequest> for NewSwapRequest {
    type Error = CoreError;

    fn try_from(req: CreateSwapRequest) -> CoreResult<Self> {
        let missing = || CoreError::Validation(MISSING_FIELDS.into());
        Ok(Self {
            from_user_id: required_id(req.from_user_id).ok_or_else(missing)?,
            to_user_id: required_id(req.to_user_id).ok_or_else(missing)?,
            offered_skill: required_text(req.offered_skill).ok_or_else(missing)?,
            wanted_skill: required_text(req.wanted_skill).ok_or_else(missing)?,
            message: required_text(req.message),
        })
    }
}

fn not_found(id: SwapRequestId) -> CoreError {
    CoreError::NotFound {
        entity: "Swap request",
        id: id.0,
    }
}

/// Title and body of the notification sent back to the proposer.
pub fn response_wording(decision: SwapDecision) -> (&'static str, &'static str) {
    match decision {
        SwapDecision::Accept => ("Swap Request Accepted", "Your swap request has been accepted!"),
        SwapDecision::Reject => ("Swap Request Rejected", "Your swap request has been rejected."),
    }
}

/// Persists a pending request and tells the recipient about it.
///
/// Neither user is checked beyond what the schema enforces, and a user may
/// address a request to themselves.
pub fn create(db: &Database, req: CreateSwapRequest) -> CoreResult<SwapRequest> {
    let new = NewSwapRequest::try_from(req)?;

    let created = db.with_tx(|gw| -> CoreResult<SwapRequest> {
        let id = queries::swaps::insert(
            gw,
            new.from_user_id,
            new.to_user_id,
            &new.offered_skill,
            &new.wanted_skill,
            new.message.as_deref(),
        )?;
        let id = SwapRequestId(id);

        dispatcher::emit(
            gw,
            new.to_user_id,
            NotificationTarget::SwapRequest { related_id: id },
            "New Swap Request",
            &format!("You have a new swap request from {}", new.from_user_id),
        );

        let row = queries::swaps::find(gw, id.0)?.ok_or_else(|| not_found(id))?;
        Ok(row.try_into()?)
    })?;

    info!(
        swap_request_id = created.id.0,
        from_user_id = created.from_user_id,
        to_user_id = created.to_user_id,
        "swap request created"
    );
    Ok(created)
}

pub fn get(db: &Database, id: SwapRequestId) -> CoreResult<SwapRequest> {
    let row = db
        .with_gateway(|gw| queries::swaps::find(gw, id.0))?
        .ok_or_else(|| not_found(id))?;
    Ok(row.try_into()?)
}

/// Resolves a pending request and notifies the proposer.
///
/// `requested` is the raw wire value; anything but `accepted`/`rejected` is a
/// validation error and touches nothing. A request that is no longer pending
/// is a conflict. The state check, the update and the notification share one
/// transaction.
pub fn transition(db: &Database, id: SwapRequestId, requested: Option<&str>) -> CoreResult<SwapRequest> {
    let decision = requested
        .and_then(SwapDecision::parse)
        .ok_or_else(|| CoreError::Validation(INVALID_STATUS.into()))?;

    let updated = db.with_tx(|gw| -> CoreResult<SwapRequest> {
        let row = queries::swaps::find(gw, id.0)?.ok_or_else(|| not_found(id))?;
        let current = SwapRequest::try_from(row)?;
        if !current.status.is_pending() {
            return Err(CoreError::Conflict(format!(
                "Swap request has already been {}",
                current.status
            )));
        }

        if queries::swaps::update_status(gw, id.0, decision.status())? == 0 {
            return Err(not_found(id));
        }

        let (title, body) = response_wording(decision);
        dispatcher::emit(
            gw,
            current.from_user_id,
            NotificationTarget::SwapResponse { related_id: id },
            title,
            body,
        );

        let row = queries::swaps::find(gw, id.0)?.ok_or_else(|| not_found(id))?;
        Ok(row.try_into()?)
    })?;

    info!(swap_request_id = id.0, status = %updated.status, "swap request resolved");
    Ok(updated)
}

/// Requests addressed to `user_id`, newest first.
pub fn list_received(db: &Database, user_id: UserId) -> CoreResult<Vec<ReceivedSwapRequest>> {
    let rows = db.with_gateway(|gw| queries::swaps::list_received(gw, user_id))?;
    debug!(user_id, count = rows.len(), "listing received swap requests");
    let requests = rows
        .into_iter()
        .map(ReceivedSwapRequest::try_from)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(requests)
}

/// Requests sent by `user_id`, newest first.
pub fn list_sent(db: &Database, user_id: UserId) -> CoreResult<Vec<SentSwapRequest>> {
    let rows = db.with_gateway(|gw| queries::swaps::list_sent(gw, user_id))?;
    debug!(user_id, count = rows.len(), "listing sent swap requests");
    let requests = rows
        .into_iter()
        .map(SentSwapRequest::try_from)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use skillswap_types::models::SwapStatus;

    fn request(from: i64, to: i64) -> CreateSwapRequest {
        CreateSwapRequest {
            from_user_id: Some(from),
            to_user_id: Some(to),
            offered_skill: Some("JS".into()),
            wanted_skill: Some("Design".into()),
            message: None,
        }
    }

    #[test]
    fn create_persists_pending_and_notifies_recipient() {
        let db = testing::db();
        let ann = testing::user(&db, "Ann");
        let bob = testing::user(&db, "Bob");

        let created = create(&db, request(ann, bob)).unwrap();
        assert_eq!(created.status, SwapStatus::Pending);
        assert_eq!(created.offered_skill, "JS");
        assert_eq!(created.wanted_skill, "Design");
        assert_eq!(created.created_at, created.updated_at);

        let sent = testing::notifications_for(&db, NotificationTarget::SwapRequest { related_id: created.id });
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].user_id, bob);
        assert_eq!(sent[0].title, "New Swap Request");
        assert!(!sent[0].is_read);
    }

    #[test]
    fn create_rejects_missing_fields() {
        let db = testing::db();

        for req in [
            CreateSwapRequest { from_user_id: None, ..request(1, 2) },
            CreateSwapRequest { to_user_id: Some(0), ..request(1, 2) },
            CreateSwapRequest { offered_skill: None, ..request(1, 2) },
            CreateSwapRequest { wanted_skill: Some("  ".into()), ..request(1, 2) },
        ] {
            let err = create(&db, req).unwrap_err();
            assert!(matches!(err, CoreError::Validation(_)), "{err:?}");
        }
    }

    #[test]
    fn create_with_unknown_user_is_a_store_error() {
        let db = testing::db();
        let ann = testing::user(&db, "Ann");

        let err = create(&db, request(ann, 77)).unwrap_err();
        assert!(matches!(err, CoreError::Store(_)), "{err:?}");
        assert!(list_sent(&db, ann).unwrap().is_empty());
    }

    #[test]
    fn accept_notifies_the_proposer() {
        let db = testing::db();
        let ann = testing::user(&db, "Ann");
        let bob = testing::user(&db, "Bob");
        let created = create(&db, request(ann, bob)).unwrap();

        let accepted = transition(&db, created.id, Some("accepted")).unwrap();
        assert_eq!(accepted.status, SwapStatus::Accepted);
        assert!(accepted.updated_at >= created.updated_at);

        let responses = testing::notifications_for(&db, NotificationTarget::SwapResponse { related_id: created.id });
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].user_id, ann);
        assert_eq!(responses[0].title, "Swap Request Accepted");
        assert_eq!(responses[0].message, "Your swap request has been accepted!");
    }

    #[test]
    fn reject_uses_rejection_wording() {
        let db = testing::db();
        let ann = testing::user(&db, "Ann");
        let bob = testing::user(&db, "Bob");
        let created = create(&db, request(ann, bob)).unwrap();

        let rejected = transition(&db, created.id, Some("rejected")).unwrap();
        assert_eq!(rejected.status, SwapStatus::Rejected);

        let responses = testing::notifications_for(&db, NotificationTarget::SwapResponse { related_id: created.id });
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].title, "Swap Request Rejected");
        assert_eq!(responses[0].message, "Your swap request has been rejected.");
    }

    #[test]
    fn invalid_status_changes_nothing() {
        let db = testing::db();
        let ann = testing::user(&db, "Ann");
        let bob = testing::user(&db, "Bob");
        let created = create(&db, request(ann, bob)).unwrap();

        for status in [Some("cancelled"), Some("pending"), None] {
            let err = transition(&db, created.id, status).unwrap_err();
            assert!(matches!(err, CoreError::Validation(_)), "{err:?}");
        }

        assert_eq!(get(&db, created.id).unwrap().status, SwapStatus::Pending);
        assert!(testing::notifications_for(&db, NotificationTarget::SwapResponse { related_id: created.id }).is_empty());
    }

    #[test]
    fn unknown_request_is_not_found() {
        let db = testing::db();

        let err = transition(&db, SwapRequestId(404), Some("accepted")).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { id: 404, .. }), "{err:?}");
    }

    #[test]
    fn resolved_request_cannot_be_resolved_again() {
        let db = testing::db();
        let ann = testing::user(&db, "Ann");
        let bob = testing::user(&db, "Bob");
        let created = create(&db, request(ann, bob)).unwrap();
        transition(&db, created.id, Some("accepted")).unwrap();

        let err = transition(&db, created.id, Some("rejected")).unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)), "{err:?}");

        assert_eq!(get(&db, created.id).unwrap().status, SwapStatus::Accepted);
        let responses = testing::notifications_for(&db, NotificationTarget::SwapResponse { related_id: created.id });
        assert_eq!(responses.len(), 1);
    }

    #[test]
    fn listings_join_the_counterpart_newest_first() {
        let db = testing::db();
        let ann = testing::user(&db, "Ann");
        let bob = testing::user(&db, "Bob");
        let cy = testing::user(&db, "Cy");

        let first = create(&db, request(ann, bob)).unwrap();
        let second = create(&db, request(cy, bob)).unwrap();

        let received = list_received(&db, bob).unwrap();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].request.id, second.id);
        assert_eq!(received[0].from_user_name, "Cy");
        assert_eq!(received[1].request.id, first.id);
        assert_eq!(received[1].from_user_email, "ann@example.com");

        let sent = list_sent(&db, ann).unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to_user_name, "Bob");
        assert!(list_sent(&db, bob).unwrap().is_empty());
    }
}
