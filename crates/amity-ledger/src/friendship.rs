//! Friendship request/accept/remove state machine over directional rows.
//!
//! States per directional pair: absent -> pending -> active, with removal
//! and blocking forcing back to absent.  The checks are deliberately
//! asymmetric: `send_request` inspects only the caller's forward
//! direction, so reciprocal pending requests from both sides may coexist.
//! That is documented behavior, not something to repair here.

use amity_shared::Principal;
use amity_store::{AccountStatus, Database, Friendship, FriendshipStatus};
use chrono::{DateTime, Utc};

use crate::error::{LedgerError, Result};
use crate::events::Event;
use crate::identity;

/// Create a pending request caller -> target.
pub fn send_request(
    db: &Database,
    caller: &Principal,
    target: &Principal,
    now: DateTime<Utc>,
) -> Result<Event> {
    if caller == target {
        return Err(LedgerError::InvalidInput(
            "cannot send a friend request to yourself".into(),
        ));
    }

    let target_user = identity::resolve_user(db, target)?;
    if target_user.status != AccountStatus::Active {
        return Err(LedgerError::Unauthorized);
    }
    if db.is_blocked(target, caller)? {
        return Err(LedgerError::Blocked);
    }
    // Forward direction only, and only an active relation bars the send;
    // a still-pending request is simply rewritten.
    if db.has_active_friendship(caller, target)? {
        return Err(LedgerError::AlreadyExists);
    }

    db.upsert_friendship(&Friendship {
        source: *caller,
        target: *target,
        status: FriendshipStatus::Pending,
        created_at: now,
        last_interaction: now,
    })?;

    Ok(Event::FriendRequestSent {
        principal: *caller,
        target: *target,
        timestamp: now,
    })
}

/// Accept a pending request origin -> caller, writing the mirrored row.
///
/// After this, both directional rows are active: symmetric friendship is
/// always two rows.
pub fn accept_request(
    db: &Database,
    caller: &Principal,
    origin: &Principal,
    now: DateTime<Utc>,
) -> Result<Event> {
    let request = match db.get_friendship(origin, caller)? {
        Some(f) if f.status == FriendshipStatus::Pending => f,
        _ => return Err(LedgerError::NotFound),
    };

    db.upsert_friendship(&Friendship {
        status: FriendshipStatus::Active,
        last_interaction: now,
        ..request
    })?;
    db.upsert_friendship(&Friendship {
        source: *caller,
        target: *origin,
        status: FriendshipStatus::Active,
        created_at: now,
        last_interaction: now,
    })?;

    Ok(Event::FriendRequestAccepted {
        principal: *caller,
        origin: *origin,
        timestamp: now,
    })
}

/// Remove an active friendship.
///
/// Only the caller's own direction is checked; both rows are then deleted
/// unconditionally, whatever the reverse row's status.
pub fn remove(
    db: &Database,
    caller: &Principal,
    friend: &Principal,
    now: DateTime<Utc>,
) -> Result<Event> {
    if !db.has_active_friendship(caller, friend)? {
        return Err(LedgerError::NotFound);
    }
    db.delete_friendship_pair(caller, friend)?;

    Ok(Event::FriendRemoved {
        principal: *caller,
        friend: *friend,
        timestamp: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_registry;

    fn db_with_users(users: &[(Principal, &str)]) -> Database {
        let db = Database::open_in_memory().unwrap();
        let now = Utc::now();
        for (p, name) in users {
            identity::register(&db, p, name, None, now).unwrap();
        }
        db
    }

    const A: Principal = Principal([1; 32]);
    const B: Principal = Principal([2; 32]);

    #[test]
    fn request_then_accept_yields_two_active_rows() {
        let db = db_with_users(&[(A, "alice"), (B, "bob")]);
        let now = Utc::now();

        send_request(&db, &A, &B, now).unwrap();
        let row = db.get_friendship(&A, &B).unwrap().unwrap();
        assert_eq!(row.status, FriendshipStatus::Pending);
        assert!(db.get_friendship(&B, &A).unwrap().is_none());

        accept_request(&db, &B, &A, now).unwrap();
        assert!(db.has_active_friendship(&A, &B).unwrap());
        assert!(db.has_active_friendship(&B, &A).unwrap());
    }

    #[test]
    fn accept_is_not_idempotent() {
        let db = db_with_users(&[(A, "alice"), (B, "bob")]);
        let now = Utc::now();

        send_request(&db, &A, &B, now).unwrap();
        accept_request(&db, &B, &A, now).unwrap();

        // No longer pending from that direction.
        assert!(matches!(
            accept_request(&db, &B, &A, now).unwrap_err(),
            LedgerError::NotFound
        ));
    }

    #[test]
    fn reciprocal_pending_requests_may_coexist() {
        let db = db_with_users(&[(A, "alice"), (B, "bob")]);
        let now = Utc::now();

        send_request(&db, &A, &B, now).unwrap();
        send_request(&db, &B, &A, now).unwrap();

        assert_eq!(
            db.get_friendship(&A, &B).unwrap().unwrap().status,
            FriendshipStatus::Pending
        );
        assert_eq!(
            db.get_friendship(&B, &A).unwrap().unwrap().status,
            FriendshipStatus::Pending
        );
    }

    #[test]
    fn request_to_existing_friend_is_rejected() {
        let db = db_with_users(&[(A, "alice"), (B, "bob")]);
        let now = Utc::now();

        send_request(&db, &A, &B, now).unwrap();
        accept_request(&db, &B, &A, now).unwrap();

        assert!(matches!(
            send_request(&db, &A, &B, now).unwrap_err(),
            LedgerError::AlreadyExists
        ));
    }

    #[test]
    fn resending_a_pending_request_rewrites_the_row() {
        let db = db_with_users(&[(A, "alice"), (B, "bob")]);
        let now = Utc::now();

        send_request(&db, &A, &B, now).unwrap();
        let later = now + chrono::Duration::seconds(30);
        send_request(&db, &A, &B, later).unwrap();

        let row = db.get_friendship(&A, &B).unwrap().unwrap();
        assert_eq!(row.status, FriendshipStatus::Pending);
        assert_eq!(row.last_interaction, later);
    }

    #[test]
    fn blocked_caller_cannot_request() {
        let db = db_with_users(&[(A, "alice"), (B, "bob")]);
        let now = Utc::now();

        block_registry::block(&db, &B, &A, None, now).unwrap();
        assert!(matches!(
            send_request(&db, &A, &B, now).unwrap_err(),
            LedgerError::Blocked
        ));
        // The reverse direction is not blocked.
        send_request(&db, &B, &A, now).unwrap();
    }

    #[test]
    fn self_request_is_invalid() {
        let db = db_with_users(&[(A, "alice")]);
        assert!(matches!(
            send_request(&db, &A, &A, Utc::now()).unwrap_err(),
            LedgerError::InvalidInput(_)
        ));
    }

    #[test]
    fn request_to_unregistered_target_is_not_found() {
        let db = db_with_users(&[(A, "alice")]);
        assert!(matches!(
            send_request(&db, &A, &B, Utc::now()).unwrap_err(),
            LedgerError::NotFound
        ));
    }

    #[test]
    fn remove_checks_forward_direction_and_deletes_both() {
        let db = db_with_users(&[(A, "alice"), (B, "bob")]);
        let now = Utc::now();

        send_request(&db, &A, &B, now).unwrap();
        accept_request(&db, &B, &A, now).unwrap();

        remove(&db, &A, &B, now).unwrap();
        assert!(db.get_friendship(&A, &B).unwrap().is_none());
        assert!(db.get_friendship(&B, &A).unwrap().is_none());

        // Nothing left to remove.
        assert!(matches!(
            remove(&db, &A, &B, now).unwrap_err(),
            LedgerError::NotFound
        ));
    }

    #[test]
    fn pending_request_cannot_be_removed() {
        let db = db_with_users(&[(A, "alice"), (B, "bob")]);
        let now = Utc::now();

        send_request(&db, &A, &B, now).unwrap();
        assert!(matches!(
            remove(&db, &A, &B, now).unwrap_err(),
            LedgerError::NotFound
        ));
    }
}
