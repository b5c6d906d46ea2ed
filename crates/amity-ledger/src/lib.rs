//! # amity-ledger
//!
//! The deterministic reducer of the Amity social ledger: user accounts,
//! friendship relations, privacy-gated visibility, directional blocks,
//! fixed-window rate limiting and an adaptive message-batching control
//! loop, applied as atomic state transitions over [`amity_store`].
//!
//! Every call carries the caller principal (already authenticated by the
//! embedding ledger), typed arguments and an externally supplied `now`
//! timestamp; the reducer never reads a clock, so a sequence of calls
//! replays identically.  Mutations go through [`Ledger::apply`], reads
//! through [`Ledger::query`].

pub mod activity;
pub mod batch;
pub mod block_registry;
pub mod dispatcher;
pub mod events;
pub mod friendship;
pub mod identity;
pub mod ops;
pub mod privacy_gate;
pub mod rate_limiter;

mod error;

pub use dispatcher::Ledger;
pub use error::{LedgerError, Result};
pub use events::Event;
pub use ops::{
    FriendshipStatusView, OnlineStatus, Operation, PrivacyUpdate, ProfileView, Query, QueryReply,
};
pub use rate_limiter::RateCategory;
