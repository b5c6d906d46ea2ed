//! Identity lifecycle: registration, activation transitions, profile
//! mutation.
//!
//! Registration is the only operation a principal can perform without an
//! existing user record, and it is exactly-once: a second attempt fails
//! `AlreadyExists` with the first record untouched.

use amity_shared::Principal;
use amity_store::{
    AccountStatus, Batch, Database, PrivacySettings, StoreError, User,
};
use chrono::{DateTime, Utc};

use crate::error::{LedgerError, Result};
use crate::events::Event;

/// Fetch the caller's user record, mapping a missing row to the ledger's
/// own `NotFound`.
pub fn resolve_user(db: &Database, principal: &Principal) -> Result<User> {
    match db.get_user(principal) {
        Ok(user) => Ok(user),
        Err(StoreError::NotFound) => Err(LedgerError::NotFound),
        Err(e) => Err(e.into()),
    }
}

/// Resolve the caller and require an active account.
///
/// Error mapping: missing record -> `NotFound`, deactivated ->
/// `Deactivated` (never any other kind), suspended -> `Unauthorized`.
pub fn ensure_active(db: &Database, principal: &Principal) -> Result<User> {
    let user = resolve_user(db, principal)?;
    match user.status {
        AccountStatus::Active => Ok(user),
        AccountStatus::Deactivated => Err(LedgerError::Deactivated),
        AccountStatus::Suspended => Err(LedgerError::Unauthorized),
    }
}

/// Register the caller, seeding default privacy and batch records.
pub fn register(
    db: &Database,
    caller: &Principal,
    name: &str,
    metadata: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Event> {
    if name.is_empty() {
        return Err(LedgerError::InvalidInput("name must not be empty".into()));
    }
    if db.user_exists(caller)? {
        return Err(LedgerError::AlreadyExists);
    }

    db.create_user(&User {
        principal: *caller,
        name: name.to_string(),
        status: AccountStatus::Active,
        created_at: now,
        metadata: metadata.map(str::to_string),
        deactivated_at: None,
        encryption_key: None,
        profile_image: None,
    })?;
    db.upsert_privacy(&PrivacySettings::default_for(*caller, now))?;
    db.upsert_batch(&Batch::default_for(*caller, now))?;

    Ok(Event::UserRegistered {
        principal: *caller,
        name: name.to_string(),
        timestamp: now,
    })
}

/// Deactivate the caller's active account.
pub fn deactivate(db: &Database, caller: &Principal, now: DateTime<Utc>) -> Result<Event> {
    let mut user = ensure_active(db, caller)?;
    user.status = AccountStatus::Deactivated;
    user.deactivated_at = Some(now);
    db.update_user(&user)?;

    Ok(Event::AccountDeactivated {
        principal: *caller,
        timestamp: now,
    })
}

/// Reactivate a deactivated account.
pub fn reactivate(db: &Database, caller: &Principal, now: DateTime<Utc>) -> Result<Event> {
    let mut user = resolve_user(db, caller)?;
    if user.status != AccountStatus::Deactivated {
        return Err(LedgerError::Unauthorized);
    }
    user.status = AccountStatus::Active;
    user.deactivated_at = None;
    db.update_user(&user)?;

    Ok(Event::AccountReactivated {
        principal: *caller,
        timestamp: now,
    })
}

/// Replace the profile fields that are present; retain the rest.
pub fn update_profile(
    db: &Database,
    user: &User,
    name: Option<&str>,
    metadata: Option<&str>,
    profile_image: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Event> {
    let mut user = user.clone();
    if let Some(name) = name {
        if name.is_empty() {
            return Err(LedgerError::InvalidInput("name must not be empty".into()));
        }
        user.name = name.to_string();
    }
    if let Some(metadata) = metadata {
        user.metadata = Some(metadata.to_string());
    }
    if let Some(profile_image) = profile_image {
        user.profile_image = Some(profile_image.to_string());
    }
    db.update_user(&user)?;

    Ok(Event::ProfileUpdated {
        principal: user.principal,
        timestamp: now,
    })
}
