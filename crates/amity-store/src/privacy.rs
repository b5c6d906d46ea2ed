//! CRUD operations for [`PrivacySettings`] records.
//!
//! A principal that never touched its settings has no row; readers use
//! [`Database::get_privacy_or_default`], which does **not** materialize
//! the defaults into the store.

use amity_shared::Principal;
use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::PrivacySettings;
use crate::row;

impl Database {
    /// Fetch the stored settings, if any.
    pub fn get_privacy(&self, principal: &Principal) -> Result<Option<PrivacySettings>> {
        let result = self.conn().query_row(
            "SELECT principal, profile_visible, metadata_visible, friend_list_visible,
                    status_visible, last_seen_visible, allow_messages,
                    encryption_enabled, last_updated
             FROM privacy
             WHERE principal = ?1",
            params![principal.to_hex()],
            row_to_privacy,
        );
        match result {
            Ok(settings) => Ok(Some(settings)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(other) => Err(StoreError::Sqlite(other)),
        }
    }

    /// Stored settings, or the all-visible defaults when absent.
    pub fn get_privacy_or_default(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<PrivacySettings> {
        Ok(self
            .get_privacy(principal)?
            .unwrap_or_else(|| PrivacySettings::default_for(*principal, now)))
    }

    /// Insert or replace the settings row.
    pub fn upsert_privacy(&self, settings: &PrivacySettings) -> Result<()> {
        self.conn().execute(
            "INSERT INTO privacy (principal, profile_visible, metadata_visible,
                                  friend_list_visible, status_visible, last_seen_visible,
                                  allow_messages, encryption_enabled, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(principal) DO UPDATE SET
                 profile_visible = excluded.profile_visible,
                 metadata_visible = excluded.metadata_visible,
                 friend_list_visible = excluded.friend_list_visible,
                 status_visible = excluded.status_visible,
                 last_seen_visible = excluded.last_seen_visible,
                 allow_messages = excluded.allow_messages,
                 encryption_enabled = excluded.encryption_enabled,
                 last_updated = excluded.last_updated",
            params![
                settings.principal.to_hex(),
                settings.profile_visible,
                settings.metadata_visible,
                settings.friend_list_visible,
                settings.status_visible,
                settings.last_seen_visible,
                settings.allow_messages,
                settings.encryption_enabled,
                settings.last_updated.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`PrivacySettings`].
fn row_to_privacy(r: &rusqlite::Row<'_>) -> rusqlite::Result<PrivacySettings> {
    Ok(PrivacySettings {
        principal: row::principal(r, 0)?,
        profile_visible: r.get(1)?,
        metadata_visible: r.get(2)?,
        friend_list_visible: r.get(3)?,
        status_visible: r.get(4)?,
        last_seen_visible: r.get(5)?,
        allow_messages: r.get(6)?,
        encryption_enabled: r.get(7)?,
        last_updated: row::timestamp(r, 8)?,
    })
}
