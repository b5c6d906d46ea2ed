//! # amity-shared
//!
//! Types and constants shared by every Amity crate: the [`Principal`]
//! identity type and the tunable limits of the social ledger.

pub mod constants;
pub mod principal;

pub use principal::Principal;
