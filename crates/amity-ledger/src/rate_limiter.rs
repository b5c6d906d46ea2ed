//! Fixed-window rate limiting with lazy reset.
//!
//! The window only advances when a counter is accessed; there is no
//! timer.  [`check`] is **not** side-effect free: when the window has
//! lapsed it writes the reset row and passes.  [`commit`] is a separate
//! call the dispatcher makes only after the whole operation succeeded, so
//! a check that reset-and-passed may stand without a matching increment
//! when a later precondition fails.  That under-count is part of the
//! published semantics; do not merge the two steps.

use amity_shared::constants::{
    MAX_DAILY_ACTIONS, MAX_FRIEND_REQUESTS, MAX_STATUS_UPDATES, RATE_WINDOW_SECS,
};
use amity_shared::Principal;
use amity_store::{Database, RateLimit};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};

/// Which per-window ceiling an action counts against, besides the daily
/// total.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RateCategory {
    Generic,
    FriendRequest,
    Profile,
}

/// Enforce the ceilings for one action, lazily resetting a lapsed window.
///
/// On reset the counters are seeded to 1 for the daily total and for the
/// requested category, and the check passes regardless of the old values.
pub fn check(
    db: &Database,
    principal: &Principal,
    category: RateCategory,
    now: DateTime<Utc>,
) -> Result<()> {
    let limit = db.get_rate_limit_or_default(principal, now)?;
    let elapsed = (now - limit.last_reset).num_seconds();

    if elapsed > RATE_WINDOW_SECS {
        tracing::debug!(principal = %principal.short(), "rate window lapsed, resetting");
        db.upsert_rate_limit(&RateLimit {
            principal: *principal,
            daily_actions: 1,
            friend_requests: u32::from(category == RateCategory::FriendRequest),
            status_updates: u32::from(category == RateCategory::Profile),
            last_reset: now,
        })?;
        return Ok(());
    }

    if limit.daily_actions >= MAX_DAILY_ACTIONS {
        return Err(LedgerError::RateLimited);
    }
    if category == RateCategory::FriendRequest && limit.friend_requests >= MAX_FRIEND_REQUESTS {
        return Err(LedgerError::RateLimited);
    }
    if category == RateCategory::Profile && limit.status_updates >= MAX_STATUS_UPDATES {
        return Err(LedgerError::RateLimited);
    }
    Ok(())
}

/// Count one successful action: the daily total plus the category counter.
pub fn commit(
    db: &Database,
    principal: &Principal,
    category: RateCategory,
    now: DateTime<Utc>,
) -> Result<()> {
    let mut limit = db.get_rate_limit_or_default(principal, now)?;
    limit.daily_actions += 1;
    match category {
        RateCategory::FriendRequest => limit.friend_requests += 1,
        RateCategory::Profile => limit.status_updates += 1,
        RateCategory::Generic => {}
    }
    db.upsert_rate_limit(&limit)?;
    Ok(())
}
