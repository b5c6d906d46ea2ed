//! Directional block relation.
//!
//! Blocking severs any friendship between the pair in both directions;
//! it never implies the reverse block.

use amity_shared::Principal;
use amity_store::{Block, Database};
use chrono::{DateTime, Utc};

use crate::error::{LedgerError, Result};
use crate::events::Event;

/// Block `target`, deleting any friendship rows between the pair.
pub fn block(
    db: &Database,
    caller: &Principal,
    target: &Principal,
    reason: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Event> {
    if caller == target {
        return Err(LedgerError::InvalidInput("cannot block yourself".into()));
    }

    db.delete_friendship_pair(caller, target)?;
    db.upsert_block(&Block {
        blocker: *caller,
        blocked: *target,
        created_at: now,
        reason: reason.map(str::to_string),
    })?;

    Ok(Event::UserBlocked {
        principal: *caller,
        target: *target,
        timestamp: now,
    })
}

/// Remove the caller's block on `target`.
pub fn unblock(
    db: &Database,
    caller: &Principal,
    target: &Principal,
    now: DateTime<Utc>,
) -> Result<Event> {
    if !db.delete_block(caller, target)? {
        return Err(LedgerError::NotFound);
    }

    Ok(Event::UserUnblocked {
        principal: *caller,
        target: *target,
        timestamp: now,
    })
}
