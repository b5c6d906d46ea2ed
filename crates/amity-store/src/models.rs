//! Domain model structs persisted in the ledger database.
//!
//! Every struct derives `Serialize` and `Deserialize` so records can be
//! handed directly to an embedding host or indexer.

use amity_shared::constants::DEFAULT_BATCH_SIZE;
use amity_shared::Principal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Account status
// ---------------------------------------------------------------------------

/// Lifecycle state of a registered account.
///
/// `Suspended` is reserved for an administrative transition; no public
/// operation currently produces it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AccountStatus {
    Active,
    Deactivated,
    Suspended,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Deactivated => "deactivated",
            AccountStatus::Suspended => "suspended",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(AccountStatus::Active),
            "deactivated" => Some(AccountStatus::Deactivated),
            "suspended" => Some(AccountStatus::Suspended),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered account.  The primary key is the principal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub principal: Principal,
    /// Display name; never empty for a registered account.
    pub name: String,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    /// Optional free-form profile metadata (JSON, URI, ...), opaque here.
    pub metadata: Option<String>,
    /// Set iff `status` is [`AccountStatus::Deactivated`].
    pub deactivated_at: Option<DateTime<Utc>>,
    /// Optional public encryption key published by the account.
    pub encryption_key: Option<String>,
    /// Optional profile image reference (content hash or URI).
    pub profile_image: Option<String>,
}

// ---------------------------------------------------------------------------
// Privacy settings
// ---------------------------------------------------------------------------

/// Per-account visibility flags.
///
/// An absent row reads as [`PrivacySettings::default_for`]: everything
/// visible, encryption disabled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrivacySettings {
    pub principal: Principal,
    pub profile_visible: bool,
    pub metadata_visible: bool,
    pub friend_list_visible: bool,
    pub status_visible: bool,
    pub last_seen_visible: bool,
    pub allow_messages: bool,
    pub encryption_enabled: bool,
    pub last_updated: DateTime<Utc>,
}

impl PrivacySettings {
    /// The documented defaults for an account that never touched its
    /// privacy settings.
    pub fn default_for(principal: Principal, now: DateTime<Utc>) -> Self {
        Self {
            principal,
            profile_visible: true,
            metadata_visible: true,
            friend_list_visible: true,
            status_visible: true,
            last_seen_visible: true,
            allow_messages: true,
            encryption_enabled: false,
            last_updated: now,
        }
    }
}

// ---------------------------------------------------------------------------
// Rate limit
// ---------------------------------------------------------------------------

/// Fixed-window action counters, lazily reset on access.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateLimit {
    pub principal: Principal,
    pub daily_actions: u32,
    pub friend_requests: u32,
    pub status_updates: u32,
    pub last_reset: DateTime<Utc>,
}

impl RateLimit {
    /// Zeroed counters with the window anchored at `now`; the shape a
    /// principal has before its first rate-checked action.
    pub fn default_for(principal: Principal, now: DateTime<Utc>) -> Self {
        Self {
            principal,
            daily_actions: 0,
            friend_requests: 0,
            status_updates: 0,
            last_reset: now,
        }
    }
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// Adaptive message-batch bookkeeping for one principal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Batch {
    pub principal: Principal,
    pub message_counter: u64,
    pub last_batch_at: DateTime<Utc>,
    /// Always within `[MIN_BATCH_SIZE, MAX_BATCH_SIZE]`.
    pub batch_size: u32,
    pub current_items: u32,
    pub total_batches: u64,
}

impl Batch {
    pub fn default_for(principal: Principal, now: DateTime<Utc>) -> Self {
        Self {
            principal,
            message_counter: 0,
            last_batch_at: now,
            batch_size: DEFAULT_BATCH_SIZE,
            current_items: 0,
            total_batches: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Activity
// ---------------------------------------------------------------------------

/// Presence bookkeeping; `last_seen` only ever moves forward.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Activity {
    pub principal: Principal,
    pub last_seen: DateTime<Utc>,
    pub login_count: u64,
    pub total_actions: u64,
    pub last_action: DateTime<Utc>,
}

impl Activity {
    pub fn default_for(principal: Principal, now: DateTime<Utc>) -> Self {
        Self {
            principal,
            last_seen: now,
            login_count: 0,
            total_actions: 0,
            last_action: now,
        }
    }
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// A directional block relation.  Blocking does not imply the reverse
/// direction is also blocked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Block {
    pub blocker: Principal,
    pub blocked: Principal,
    pub created_at: DateTime<Utc>,
    pub reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Friendship
// ---------------------------------------------------------------------------

/// State of one directional friendship row.
///
/// `Blocked` is a legacy value kept for schema compatibility; the block
/// registry deletes friendship rows instead of writing it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FriendshipStatus {
    Pending,
    Active,
    Blocked,
}

impl FriendshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendshipStatus::Pending => "pending",
            FriendshipStatus::Active => "active",
            FriendshipStatus::Blocked => "blocked",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(FriendshipStatus::Pending),
            "active" => Some(FriendshipStatus::Active),
            "blocked" => Some(FriendshipStatus::Blocked),
            _ => None,
        }
    }
}

/// One directional friendship row.
///
/// A pending request is a single `source -> target` row; an accepted
/// friendship is represented by two mirrored `Active` rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Friendship {
    pub source: Principal,
    pub target: Principal,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
    pub last_interaction: DateTime<Utc>,
}
