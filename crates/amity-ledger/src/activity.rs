//! Presence bookkeeping feeding the online-status query.

use amity_shared::constants::ONLINE_WINDOW_SECS;
use amity_shared::Principal;
use amity_store::Database;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::events::Event;

/// Count a login for the caller.
///
/// The dispatcher's [`touch`] afterwards stamps `last_seen`/`last_action`
/// and the total like for any other mutating operation.
pub fn record_login(db: &Database, caller: &Principal, now: DateTime<Utc>) -> Result<Event> {
    let mut activity = db.get_activity_or_default(caller, now)?;
    activity.login_count += 1;
    db.upsert_activity(&activity)?;

    Ok(Event::LoginRecorded {
        principal: *caller,
        login_count: activity.login_count,
        timestamp: now,
    })
}

/// Stamp activity after a successful mutating operation.
///
/// `last_seen` only ever advances; a stale `now` (shared by an external
/// commit unit) never moves it backwards.
pub fn touch(db: &Database, principal: &Principal, now: DateTime<Utc>) -> Result<()> {
    let mut activity = db.get_activity_or_default(principal, now)?;
    if now > activity.last_seen {
        activity.last_seen = now;
    }
    activity.last_action = now;
    activity.total_actions += 1;
    db.upsert_activity(&activity)?;
    Ok(())
}

/// Whether the principal was seen within the online window.
pub fn is_online(last_seen: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    (now - last_seen).num_seconds() < ONLINE_WINDOW_SECS
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    const P: Principal = Principal([1; 32]);

    #[test]
    fn touch_creates_and_counts() {
        let db = db();
        let now = Utc::now();

        touch(&db, &P, now).unwrap();
        touch(&db, &P, now + Duration::seconds(5)).unwrap();

        let activity = db.get_activity(&P).unwrap().unwrap();
        assert_eq!(activity.total_actions, 2);
        assert_eq!(activity.last_seen, now + Duration::seconds(5));
    }

    #[test]
    fn last_seen_never_goes_backwards() {
        let db = db();
        let now = Utc::now();

        touch(&db, &P, now).unwrap();
        touch(&db, &P, now - Duration::seconds(60)).unwrap();

        let activity = db.get_activity(&P).unwrap().unwrap();
        assert_eq!(activity.last_seen, now);
        // last_action still records the most recent call's timestamp.
        assert_eq!(activity.last_action, now - Duration::seconds(60));
    }

    #[test]
    fn login_increments_counter() {
        let db = db();
        let now = Utc::now();

        record_login(&db, &P, now).unwrap();
        record_login(&db, &P, now).unwrap();
        assert_eq!(db.get_activity(&P).unwrap().unwrap().login_count, 2);
    }

    #[test]
    fn online_window_is_strict() {
        let now = Utc::now();
        assert!(is_online(now, now));
        assert!(is_online(now - Duration::seconds(ONLINE_WINDOW_SECS - 1), now));
        assert!(!is_online(now - Duration::seconds(ONLINE_WINDOW_SECS), now));
    }
}
