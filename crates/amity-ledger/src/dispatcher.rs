//! The operation dispatcher.
//!
//! [`Ledger::apply`] turns `(caller, operation, now)` into one atomic
//! state transition: caller resolution, authorization, rate check,
//! mutation, rate commit and activity stamp all run inside a single
//! SQLite transaction that commits on success and rolls back on any
//! error, so a rejected operation leaves no observable change.
//!
//! `now` is supplied by the embedding ledger and shared by every
//! operation of one external commit unit; nothing here reads a clock.

use amity_shared::Principal;
use amity_store::{Database, StoreError, User};
use chrono::{DateTime, Utc};

use crate::error::{LedgerError, Result};
use crate::events::Event;
use crate::ops::{FriendshipStatusView, OnlineStatus, Operation, ProfileView, Query, QueryReply};
use crate::rate_limiter::RateCategory;
use crate::{activity, batch, block_registry, friendship, identity, privacy_gate, rate_limiter};

/// The social ledger: a deterministic reducer over the backing store.
pub struct Ledger {
    db: Database,
}

impl Ledger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// A ledger over a fresh in-memory store; the form every replay test
    /// uses.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// Direct read access to the backing store.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Apply one mutating operation atomically.
    ///
    /// Returns the emitted event on success.  On any error the
    /// transaction is rolled back and the store is exactly as before the
    /// call.
    pub fn apply(&self, caller: Principal, op: Operation, now: DateTime<Utc>) -> Result<Event> {
        let tx = self.db.begin()?;
        match self.apply_inner(&caller, &op, now) {
            Ok(event) => {
                tx.commit().map_err(StoreError::from)?;
                tracing::info!(
                    caller = %caller.short(),
                    kind = event.kind(),
                    timestamp = %now,
                    "operation applied"
                );
                Ok(event)
            }
            Err(e) => {
                tracing::debug!(caller = %caller.short(), error = %e, "operation rejected");
                drop(tx); // rollback
                Err(e)
            }
        }
    }

    fn apply_inner(&self, caller: &Principal, op: &Operation, now: DateTime<Utc>) -> Result<Event> {
        let db = &self.db;
        let event = match op {
            Operation::Register { name, metadata } => {
                identity::register(db, caller, name, metadata.as_deref(), now)?
            }
            Operation::Deactivate => identity::deactivate(db, caller, now)?,
            Operation::Reactivate => identity::reactivate(db, caller, now)?,
            Operation::UpdateProfile {
                name,
                metadata,
                profile_image,
            } => self.rated(caller, RateCategory::Profile, now, |db, user| {
                identity::update_profile(
                    db,
                    user,
                    name.as_deref(),
                    metadata.as_deref(),
                    profile_image.as_deref(),
                    now,
                )
            })?,
            Operation::UpdatePrivacySettings(update) => {
                self.rated(caller, RateCategory::Generic, now, |db, _| {
                    privacy_gate::update_settings(db, caller, update, now)
                })?
            }
            Operation::SendFriendRequest { target } => {
                self.rated(caller, RateCategory::FriendRequest, now, |db, _| {
                    friendship::send_request(db, caller, target, now)
                })?
            }
            Operation::AcceptFriendRequest { origin } => {
                self.rated(caller, RateCategory::FriendRequest, now, |db, _| {
                    friendship::accept_request(db, caller, origin, now)
                })?
            }
            Operation::RemoveFriend { friend } => {
                self.rated(caller, RateCategory::Generic, now, |db, _| {
                    friendship::remove(db, caller, friend, now)
                })?
            }
            Operation::BlockUser { target, reason } => {
                self.rated(caller, RateCategory::Generic, now, |db, _| {
                    block_registry::block(db, caller, target, reason.as_deref(), now)
                })?
            }
            Operation::UnblockUser { target } => {
                self.rated(caller, RateCategory::Generic, now, |db, _| {
                    block_registry::unblock(db, caller, target, now)
                })?
            }
            Operation::OptimizeBatchSize => {
                self.rated(caller, RateCategory::Generic, now, |db, _| {
                    batch::optimize(db, caller, now)
                })?
            }
            Operation::SetBatchSize { size } => {
                self.rated(caller, RateCategory::Generic, now, |db, _| {
                    batch::set_size(db, caller, *size, now)
                })?
            }
            Operation::RecordLogin => self.rated(caller, RateCategory::Generic, now, |db, _| {
                activity::record_login(db, caller, now)
            })?,
        };

        // Step 5: every successful mutating operation stamps activity.
        activity::touch(db, caller, now)?;
        Ok(event)
    }

    /// The common path of a rate-limited operation: active caller, rate
    /// check, mutation, rate commit -- in that order.  The rate check may
    /// itself reset a lapsed window before later preconditions inside
    /// `f` run.
    fn rated<F>(
        &self,
        caller: &Principal,
        category: RateCategory,
        now: DateTime<Utc>,
        f: F,
    ) -> Result<Event>
    where
        F: FnOnce(&Database, &User) -> Result<Event>,
    {
        let user = identity::ensure_active(&self.db, caller)?;
        rate_limiter::check(&self.db, caller, category, now)?;
        let event = f(&self.db, &user)?;
        rate_limiter::commit(&self.db, caller, category, now)?;
        Ok(event)
    }

    /// Answer one read query.  Reads are gated by the privacy predicates
    /// only: no rate limiting, no activity stamp, no event.
    pub fn query(&self, viewer: Principal, query: Query, now: DateTime<Utc>) -> Result<QueryReply> {
        let db = &self.db;
        match query {
            Query::GetUserProfile { target } => {
                let user = identity::resolve_user(db, &target)?;
                if !privacy_gate::can_view_profile(db, &viewer, &target, now)? {
                    return Err(LedgerError::Unauthorized);
                }
                let last_seen = if privacy_gate::can_view_last_seen(db, &viewer, &target, now)? {
                    db.get_activity(&target)?.map(|a| a.last_seen)
                } else {
                    None
                };
                Ok(QueryReply::Profile(ProfileView {
                    principal: user.principal,
                    name: user.name,
                    status: user.status,
                    created_at: user.created_at,
                    metadata: user.metadata,
                    profile_image: user.profile_image,
                    encryption_key: user.encryption_key,
                    last_seen,
                }))
            }
            Query::GetFriendList { target } => {
                identity::resolve_user(db, &target)?;
                if !privacy_gate::can_view_friend_list(db, &viewer, &target, now)? {
                    return Err(LedgerError::Unauthorized);
                }
                Ok(QueryReply::FriendList(db.list_friends(&target)?))
            }
            Query::GetOnlineStatus { target } => {
                let user = identity::resolve_user(db, &target)?;
                if !privacy_gate::can_view_last_seen(db, &viewer, &target, now)? {
                    return Err(LedgerError::Unauthorized);
                }
                let last_seen = db
                    .get_activity(&target)?
                    .map(|a| a.last_seen)
                    .unwrap_or(user.created_at);
                Ok(QueryReply::OnlineStatus(OnlineStatus {
                    online: activity::is_online(last_seen, now),
                    last_seen,
                }))
            }
            Query::GetFriendshipStatus { a, b } => {
                // Only the two participants may inspect the pair.
                if viewer != a && viewer != b {
                    return Err(LedgerError::Unauthorized);
                }
                Ok(QueryReply::FriendshipStatus(FriendshipStatusView {
                    forward: db.get_friendship(&a, &b)?.map(|f| f.status),
                    reverse: db.get_friendship(&b, &a)?.map(|f| f.status),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Principal = Principal([1; 32]);
    const B: Principal = Principal([2; 32]);

    fn ledger() -> Ledger {
        Ledger::open_in_memory().unwrap()
    }

    #[test]
    fn failed_operation_rolls_back_every_write() {
        let ledger = ledger();
        let now = Utc::now();
        ledger
            .apply(
                A,
                Operation::Register {
                    name: "alice".into(),
                    metadata: None,
                },
                now,
            )
            .unwrap();

        let before_actions = ledger.db().get_activity(&A).unwrap().unwrap().total_actions;

        // Passes the active and rate checks, then fails on the missing
        // target: the rate counters and activity must be untouched.
        let err = ledger
            .apply(A, Operation::SendFriendRequest { target: B }, now)
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound));

        assert!(ledger.db().get_rate_limit(&A).unwrap().is_none());
        assert_eq!(
            ledger.db().get_activity(&A).unwrap().unwrap().total_actions,
            before_actions
        );
    }

    #[test]
    fn deactivated_caller_always_fails_with_deactivated() {
        let ledger = ledger();
        let now = Utc::now();
        ledger
            .apply(
                A,
                Operation::Register {
                    name: "alice".into(),
                    metadata: None,
                },
                now,
            )
            .unwrap();
        ledger.apply(A, Operation::Deactivate, now).unwrap();

        let gated = [
            Operation::UpdateProfile {
                name: Some("x".into()),
                metadata: None,
                profile_image: None,
            },
            Operation::UpdatePrivacySettings(Default::default()),
            Operation::SendFriendRequest { target: B },
            Operation::AcceptFriendRequest { origin: B },
            Operation::RemoveFriend { friend: B },
            Operation::BlockUser {
                target: B,
                reason: None,
            },
            Operation::UnblockUser { target: B },
            Operation::OptimizeBatchSize,
            Operation::SetBatchSize { size: 20 },
            Operation::RecordLogin,
        ];
        for op in gated {
            assert!(
                matches!(
                    ledger.apply(A, op.clone(), now).unwrap_err(),
                    LedgerError::Deactivated
                ),
                "operation {op:?} must fail Deactivated"
            );
        }
    }

    #[test]
    fn successful_operation_touches_activity() {
        let ledger = ledger();
        let now = Utc::now();
        ledger
            .apply(
                A,
                Operation::Register {
                    name: "alice".into(),
                    metadata: None,
                },
                now,
            )
            .unwrap();

        let activity = ledger.db().get_activity(&A).unwrap().unwrap();
        assert_eq!(activity.total_actions, 1);
        assert_eq!(activity.last_seen, now);
    }

    #[test]
    fn friendship_status_is_participants_only() {
        let ledger = ledger();
        let now = Utc::now();
        for (p, name) in [(A, "alice"), (B, "bob")] {
            ledger
                .apply(
                    p,
                    Operation::Register {
                        name: name.into(),
                        metadata: None,
                    },
                    now,
                )
                .unwrap();
        }

        let stranger = Principal([9; 32]);
        assert!(matches!(
            ledger
                .query(stranger, Query::GetFriendshipStatus { a: A, b: B }, now)
                .unwrap_err(),
            LedgerError::Unauthorized
        ));

        let reply = ledger
            .query(A, Query::GetFriendshipStatus { a: A, b: B }, now)
            .unwrap();
        assert_eq!(
            reply,
            QueryReply::FriendshipStatus(FriendshipStatusView {
                forward: None,
                reverse: None,
            })
        );
    }
}
