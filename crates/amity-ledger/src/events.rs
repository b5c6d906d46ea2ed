//! Structured events, one per successful mutating operation.
//!
//! The event stream is append-only and consumed by external indexers and
//! UIs; the reducer never reads it back.  Serialized form carries a
//! kebab-case `kind` tag plus the fields relevant to the operation.

use amity_shared::Principal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An emitted ledger event.  `principal` is always the caller that
/// performed the operation; `timestamp` is the externally supplied `now`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Event {
    UserRegistered {
        principal: Principal,
        name: String,
        timestamp: DateTime<Utc>,
    },
    AccountDeactivated {
        principal: Principal,
        timestamp: DateTime<Utc>,
    },
    AccountReactivated {
        principal: Principal,
        timestamp: DateTime<Utc>,
    },
    ProfileUpdated {
        principal: Principal,
        timestamp: DateTime<Utc>,
    },
    PrivacyUpdated {
        principal: Principal,
        timestamp: DateTime<Utc>,
    },
    FriendRequestSent {
        principal: Principal,
        target: Principal,
        timestamp: DateTime<Utc>,
    },
    FriendRequestAccepted {
        principal: Principal,
        origin: Principal,
        timestamp: DateTime<Utc>,
    },
    FriendRemoved {
        principal: Principal,
        friend: Principal,
        timestamp: DateTime<Utc>,
    },
    UserBlocked {
        principal: Principal,
        target: Principal,
        timestamp: DateTime<Utc>,
    },
    UserUnblocked {
        principal: Principal,
        target: Principal,
        timestamp: DateTime<Utc>,
    },
    BatchOptimized {
        principal: Principal,
        batch_size: u32,
        timestamp: DateTime<Utc>,
    },
    BatchSizeSet {
        principal: Principal,
        batch_size: u32,
        timestamp: DateTime<Utc>,
    },
    LoginRecorded {
        principal: Principal,
        login_count: u64,
        timestamp: DateTime<Utc>,
    },
}

impl Event {
    /// The serialized `kind` tag, for log lines and indexer routing.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::UserRegistered { .. } => "user-registered",
            Event::AccountDeactivated { .. } => "account-deactivated",
            Event::AccountReactivated { .. } => "account-reactivated",
            Event::ProfileUpdated { .. } => "profile-updated",
            Event::PrivacyUpdated { .. } => "privacy-updated",
            Event::FriendRequestSent { .. } => "friend-request-sent",
            Event::FriendRequestAccepted { .. } => "friend-request-accepted",
            Event::FriendRemoved { .. } => "friend-removed",
            Event::UserBlocked { .. } => "user-blocked",
            Event::UserUnblocked { .. } => "user-unblocked",
            Event::BatchOptimized { .. } => "batch-optimized",
            Event::BatchSizeSet { .. } => "batch-size-set",
            Event::LoginRecorded { .. } => "login-recorded",
        }
    }
}
