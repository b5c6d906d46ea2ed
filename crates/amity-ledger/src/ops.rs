//! The call surface: mutating operations, read queries and their typed
//! replies.
//!
//! Both enums are serde-tagged so an embedding dispatcher can decode them
//! straight off a wire.  The caller principal and the timestamp are *not*
//! part of the payload; the external ledger supplies them alongside.

use amity_shared::Principal;
use amity_store::{AccountStatus, FriendshipStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Mutating operations
// ---------------------------------------------------------------------------

/// A mutating call.  Applied via [`Ledger::apply`](crate::Ledger::apply).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Operation {
    Register {
        name: String,
        metadata: Option<String>,
    },
    Deactivate,
    Reactivate,
    UpdateProfile {
        name: Option<String>,
        metadata: Option<String>,
        profile_image: Option<String>,
    },
    UpdatePrivacySettings(PrivacyUpdate),
    SendFriendRequest {
        target: Principal,
    },
    AcceptFriendRequest {
        origin: Principal,
    },
    RemoveFriend {
        friend: Principal,
    },
    BlockUser {
        target: Principal,
        reason: Option<String>,
    },
    UnblockUser {
        target: Principal,
    },
    OptimizeBatchSize,
    SetBatchSize {
        size: u32,
    },
    RecordLogin,
}

/// Partial privacy-settings update; `None` fields keep their stored value.
///
/// `encryption_key` lands on the caller's user record, the flags on the
/// privacy record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrivacyUpdate {
    pub profile_visible: Option<bool>,
    pub metadata_visible: Option<bool>,
    pub friend_list_visible: Option<bool>,
    pub status_visible: Option<bool>,
    pub last_seen_visible: Option<bool>,
    pub allow_messages: Option<bool>,
    pub encryption_enabled: Option<bool>,
    pub encryption_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Read queries
// ---------------------------------------------------------------------------

/// A read-only call.  Answered via [`Ledger::query`](crate::Ledger::query);
/// never rate limited, never touches activity, never emits events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "query", rename_all = "kebab-case")]
pub enum Query {
    GetUserProfile { target: Principal },
    GetFriendList { target: Principal },
    GetOnlineStatus { target: Principal },
    GetFriendshipStatus { a: Principal, b: Principal },
}

/// Reply to a [`Query`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum QueryReply {
    Profile(ProfileView),
    FriendList(Vec<Principal>),
    OnlineStatus(OnlineStatus),
    FriendshipStatus(FriendshipStatusView),
}

/// Viewer-visible projection of a user profile.
///
/// `last_seen` is only populated when the last-seen gate passes for this
/// viewer; the rest of the fields are gated as a whole by the profile
/// predicate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileView {
    pub principal: Principal,
    pub name: String,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub metadata: Option<String>,
    pub profile_image: Option<String>,
    pub encryption_key: Option<String>,
    pub last_seen: Option<DateTime<Utc>>,
}

/// Presence snapshot for one principal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OnlineStatus {
    pub online: bool,
    pub last_seen: DateTime<Utc>,
}

/// Both directional rows between a pair, as seen by a participant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FriendshipStatusView {
    /// Status of the `a -> b` row, if any.
    pub forward: Option<FriendshipStatus>,
    /// Status of the `b -> a` row, if any.
    pub reverse: Option<FriendshipStatus>,
}
