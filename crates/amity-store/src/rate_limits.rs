//! CRUD operations for [`RateLimit`] records.
//!
//! A row appears the first time a principal performs a rate-checked
//! action; before that, readers see the zeroed default anchored at `now`.

use amity_shared::Principal;
use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::RateLimit;
use crate::row;

impl Database {
    /// Fetch the stored counters, if any.
    pub fn get_rate_limit(&self, principal: &Principal) -> Result<Option<RateLimit>> {
        let result = self.conn().query_row(
            "SELECT principal, daily_actions, friend_requests, status_updates, last_reset
             FROM rate_limits
             WHERE principal = ?1",
            params![principal.to_hex()],
            row_to_rate_limit,
        );
        match result {
            Ok(limit) => Ok(Some(limit)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(other) => Err(StoreError::Sqlite(other)),
        }
    }

    /// Stored counters, or the zeroed default when absent.  Does not write.
    pub fn get_rate_limit_or_default(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<RateLimit> {
        Ok(self
            .get_rate_limit(principal)?
            .unwrap_or_else(|| RateLimit::default_for(*principal, now)))
    }

    /// Insert or replace the counters row.
    pub fn upsert_rate_limit(&self, limit: &RateLimit) -> Result<()> {
        self.conn().execute(
            "INSERT INTO rate_limits (principal, daily_actions, friend_requests,
                                      status_updates, last_reset)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(principal) DO UPDATE SET
                 daily_actions = excluded.daily_actions,
                 friend_requests = excluded.friend_requests,
                 status_updates = excluded.status_updates,
                 last_reset = excluded.last_reset",
            params![
                limit.principal.to_hex(),
                limit.daily_actions,
                limit.friend_requests,
                limit.status_updates,
                limit.last_reset.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`RateLimit`].
fn row_to_rate_limit(r: &rusqlite::Row<'_>) -> rusqlite::Result<RateLimit> {
    Ok(RateLimit {
        principal: row::principal(r, 0)?,
        daily_actions: r.get(1)?,
        friend_requests: r.get(2)?,
        status_updates: r.get(3)?,
        last_reset: row::timestamp(r, 4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zeroed_and_unwritten() {
        let db = Database::open_in_memory().unwrap();
        let p = Principal([4; 32]);
        let now = Utc::now();

        let limit = db.get_rate_limit_or_default(&p, now).unwrap();
        assert_eq!(limit.daily_actions, 0);
        assert_eq!(limit.last_reset, now);
        assert!(db.get_rate_limit(&p).unwrap().is_none());
    }

    #[test]
    fn upsert_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let p = Principal([4; 32]);
        let now = Utc::now();

        let mut limit = RateLimit::default_for(p, now);
        limit.daily_actions = 3;
        limit.friend_requests = 1;
        db.upsert_rate_limit(&limit).unwrap();

        let got = db.get_rate_limit(&p).unwrap().unwrap();
        assert_eq!(got.daily_actions, 3);
        assert_eq!(got.friend_requests, 1);
        assert_eq!(got.status_updates, 0);
    }
}
