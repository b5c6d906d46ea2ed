//! CRUD operations for [`Activity`] records.

use amity_shared::Principal;
use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::Activity;
use crate::row;

impl Database {
    /// Fetch the stored presence record, if any.
    pub fn get_activity(&self, principal: &Principal) -> Result<Option<Activity>> {
        let result = self.conn().query_row(
            "SELECT principal, last_seen, login_count, total_actions, last_action
             FROM activity
             WHERE principal = ?1",
            params![principal.to_hex()],
            row_to_activity,
        );
        match result {
            Ok(activity) => Ok(Some(activity)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(other) => Err(StoreError::Sqlite(other)),
        }
    }

    /// Stored record, or zeroed counters anchored at `now`.
    pub fn get_activity_or_default(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<Activity> {
        Ok(self
            .get_activity(principal)?
            .unwrap_or_else(|| Activity::default_for(*principal, now)))
    }

    /// Insert or replace the presence row.
    pub fn upsert_activity(&self, activity: &Activity) -> Result<()> {
        self.conn().execute(
            "INSERT INTO activity (principal, last_seen, login_count,
                                   total_actions, last_action)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(principal) DO UPDATE SET
                 last_seen = excluded.last_seen,
                 login_count = excluded.login_count,
                 total_actions = excluded.total_actions,
                 last_action = excluded.last_action",
            params![
                activity.principal.to_hex(),
                activity.last_seen.to_rfc3339(),
                activity.login_count,
                activity.total_actions,
                activity.last_action.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to an [`Activity`].
fn row_to_activity(r: &rusqlite::Row<'_>) -> rusqlite::Result<Activity> {
    Ok(Activity {
        principal: row::principal(r, 0)?,
        last_seen: row::timestamp(r, 1)?,
        login_count: r.get(2)?,
        total_actions: r.get(3)?,
        last_action: row::timestamp(r, 4)?,
    })
}
