//! CRUD operations for [`Batch`] records.

use amity_shared::Principal;
use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::Batch;
use crate::row;

impl Database {
    /// Fetch the stored batch bookkeeping, if any.
    pub fn get_batch(&self, principal: &Principal) -> Result<Option<Batch>> {
        let result = self.conn().query_row(
            "SELECT principal, message_counter, last_batch_at, batch_size,
                    current_items, total_batches
             FROM batches
             WHERE principal = ?1",
            params![principal.to_hex()],
            row_to_batch,
        );
        match result {
            Ok(batch) => Ok(Some(batch)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(other) => Err(StoreError::Sqlite(other)),
        }
    }

    /// Stored bookkeeping, or the default (size 50) anchored at `now`.
    pub fn get_batch_or_default(&self, principal: &Principal, now: DateTime<Utc>) -> Result<Batch> {
        Ok(self
            .get_batch(principal)?
            .unwrap_or_else(|| Batch::default_for(*principal, now)))
    }

    /// Insert or replace the batch row.
    pub fn upsert_batch(&self, batch: &Batch) -> Result<()> {
        self.conn().execute(
            "INSERT INTO batches (principal, message_counter, last_batch_at,
                                  batch_size, current_items, total_batches)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(principal) DO UPDATE SET
                 message_counter = excluded.message_counter,
                 last_batch_at = excluded.last_batch_at,
                 batch_size = excluded.batch_size,
                 current_items = excluded.current_items,
                 total_batches = excluded.total_batches",
            params![
                batch.principal.to_hex(),
                batch.message_counter,
                batch.last_batch_at.to_rfc3339(),
                batch.batch_size,
                batch.current_items,
                batch.total_batches,
            ],
        )?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`Batch`].
fn row_to_batch(r: &rusqlite::Row<'_>) -> rusqlite::Result<Batch> {
    Ok(Batch {
        principal: row::principal(r, 0)?,
        message_counter: r.get(1)?,
        last_batch_at: row::timestamp(r, 2)?,
        batch_size: r.get(3)?,
        current_items: r.get(4)?,
        total_batches: r.get(5)?,
    })
}
