//! Read-only counts over the swap tables for dashboards.

use tracing::warn;

use skillswap_db::{Database, queries};
use skillswap_types::api::{SwapStats, UserSwapSummary};
use skillswap_types::models::{SwapStatus, UserId};

use crate::error::CoreResult;

pub fn swap_stats(db: &Database) -> CoreResult<SwapStats> {
    let counts = db.with_gateway(|gw| queries::stats::swap_status_counts(gw))?;

    let mut stats = SwapStats::default();
    for (status, count) in counts {
        match status.parse::<SwapStatus>() {
            Ok(SwapStatus::Pending) => stats.pending = count,
            Ok(SwapStatus::Accepted) => stats.accepted = count,
            Ok(SwapStatus::Rejected) => stats.rejected = count,
            Err(e) => warn!("skipping {} swap requests: {}", count, e),
        }
        stats.total += count;
    }
    Ok(stats)
}

pub fn user_summary(db: &Database, user_id: UserId) -> CoreResult<UserSwapSummary> {
    db.with_gateway(|gw| -> CoreResult<UserSwapSummary> {
        let counts = queries::stats::user_swap_counts(gw, user_id)?;
        let unread_notifications = queries::notifications::unread_count(gw, user_id)?;
        Ok(UserSwapSummary {
            user_id,
            sent: counts.sent,
            received: counts.received,
            accepted: counts.accepted,
            unread_notifications,
        })
    })
}
