use amity_store::StoreError;
use thiserror::Error;

/// The ledger's error taxonomy.  Every operation fails synchronously with
/// exactly one of these; state is unchanged on any failure path.
///
/// `BatchFull`, `BatchExpired` and `CantMessage` are reserved for future
/// operations; nothing in the current surface raises them.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// A user, friendship or block record expected to exist is missing.
    #[error("Record not found")]
    NotFound,

    /// Duplicate registration, or a duplicate friendship row.
    #[error("Record already exists")]
    AlreadyExists,

    /// The caller lacks the privilege or view permission for this call.
    #[error("Caller is not authorized")]
    Unauthorized,

    /// Malformed argument: empty name, self-reference, out-of-range size.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The target has blocked the caller.
    #[error("Target has blocked the caller")]
    Blocked,

    /// The caller's account is deactivated.
    #[error("Account is deactivated")]
    Deactivated,

    /// A rate-limit ceiling was exceeded within the current window.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Reserved: the current batch cannot take more items.
    #[error("Batch is full")]
    BatchFull,

    /// Reserved: the current batch has expired.
    #[error("Batch has expired")]
    BatchExpired,

    /// Reserved: messaging this principal is not possible.
    #[error("Cannot message this principal")]
    CantMessage,

    /// Storage backend failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LedgerError>;
