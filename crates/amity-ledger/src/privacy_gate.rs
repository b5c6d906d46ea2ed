//! Privacy gate: viewer-visible projections and the settings update.
//!
//! The predicates are evaluated against the target's stored settings
//! (all-visible defaults when absent) and the directional block relation
//! target -> viewer.  Every read query calls the relevant predicate and
//! fails `Unauthorized` on false.

use amity_shared::Principal;
use amity_store::Database;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::events::Event;
use crate::identity;
use crate::ops::PrivacyUpdate;

/// Whether `viewer` may see `target`'s profile.
///
/// Self-view is always allowed; otherwise the metadata flag must be on
/// and the target must not have blocked the viewer.
pub fn can_view_profile(
    db: &Database,
    viewer: &Principal,
    target: &Principal,
    now: DateTime<Utc>,
) -> Result<bool> {
    if viewer == target {
        return Ok(true);
    }
    let settings = db.get_privacy_or_default(target, now)?;
    Ok(settings.metadata_visible && !db.is_blocked(target, viewer)?)
}

/// Whether `viewer` may see `target`'s friend list.
pub fn can_view_friend_list(
    db: &Database,
    viewer: &Principal,
    target: &Principal,
    now: DateTime<Utc>,
) -> Result<bool> {
    if viewer == target {
        return Ok(true);
    }
    let settings = db.get_privacy_or_default(target, now)?;
    Ok(settings.friend_list_visible && !db.is_blocked(target, viewer)?)
}

/// Whether `viewer` may see `target`'s last-seen / online state.
///
/// No self shortcut here: the predicate is the stored flag combined with
/// friendship or status visibility, exactly as published.
pub fn can_view_last_seen(
    db: &Database,
    viewer: &Principal,
    target: &Principal,
    now: DateTime<Utc>,
) -> Result<bool> {
    let settings = db.get_privacy_or_default(target, now)?;
    let friends = db.has_active_friendship(viewer, target)?;
    Ok(settings.last_seen_visible && (friends || settings.status_visible))
}

/// Apply a partial settings update for the caller.
///
/// Present flags replace stored values, absent flags are retained.  An
/// `encryption_key` travels with the user record rather than the privacy
/// row.
pub fn update_settings(
    db: &Database,
    caller: &Principal,
    update: &PrivacyUpdate,
    now: DateTime<Utc>,
) -> Result<Event> {
    let mut settings = db.get_privacy_or_default(caller, now)?;

    if let Some(v) = update.profile_visible {
        settings.profile_visible = v;
    }
    if let Some(v) = update.metadata_visible {
        settings.metadata_visible = v;
    }
    if let Some(v) = update.friend_list_visible {
        settings.friend_list_visible = v;
    }
    if let Some(v) = update.status_visible {
        settings.status_visible = v;
    }
    if let Some(v) = update.last_seen_visible {
        settings.last_seen_visible = v;
    }
    if let Some(v) = update.allow_messages {
        settings.allow_messages = v;
    }
    if let Some(v) = update.encryption_enabled {
        settings.encryption_enabled = v;
    }
    settings.last_updated = now;
    db.upsert_privacy(&settings)?;

    if let Some(key) = &update.encryption_key {
        let mut user = identity::resolve_user(db, caller)?;
        user.encryption_key = Some(key.clone());
        db.update_user(&user)?;
    }

    Ok(Event::PrivacyUpdated {
        principal: *caller,
        timestamp: now,
    })
}
