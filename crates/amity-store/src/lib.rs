//! # amity-store
//!
//! SQLite-backed persistence for the Amity social ledger.
//!
//! The crate exposes a synchronous [`Database`] handle that wraps a
//! `rusqlite::Connection` and provides typed CRUD helpers for each of the
//! seven record collections (users, privacy, rate limits, batches,
//! activity, blocks, friendships). The reducer brackets every mutating
//! operation in one transaction obtained from the same handle, so a
//! failed operation leaves no partial rows behind.

pub mod activity;
pub mod batches;
pub mod blocks;
pub mod database;
pub mod friendships;
pub mod migrations;
pub mod models;
pub mod privacy;
pub mod rate_limits;
pub mod users;

mod error;
mod row;

pub use database::Database;
pub use error::StoreError;
pub use models::*;
