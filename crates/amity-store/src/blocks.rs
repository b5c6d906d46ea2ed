//! CRUD operations for [`Block`] records.
//!
//! Blocks are directional: a `(blocker, blocked)` row says nothing about
//! the reverse direction.

use amity_shared::Principal;
use rusqlite::params;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::Block;
use crate::row;

impl Database {
    /// Insert a block row.  Replaces an existing one, refreshing the
    /// timestamp and reason.
    pub fn upsert_block(&self, block: &Block) -> Result<()> {
        self.conn().execute(
            "INSERT INTO blocks (blocker, blocked, created_at, reason)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(blocker, blocked) DO UPDATE SET
                 created_at = excluded.created_at,
                 reason = excluded.reason",
            params![
                block.blocker.to_hex(),
                block.blocked.to_hex(),
                block.created_at.to_rfc3339(),
                block.reason,
            ],
        )?;
        Ok(())
    }

    /// Fetch a block row, if present.
    pub fn get_block(&self, blocker: &Principal, blocked: &Principal) -> Result<Option<Block>> {
        let result = self.conn().query_row(
            "SELECT blocker, blocked, created_at, reason
             FROM blocks
             WHERE blocker = ?1 AND blocked = ?2",
            params![blocker.to_hex(), blocked.to_hex()],
            row_to_block,
        );
        match result {
            Ok(block) => Ok(Some(block)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(other) => Err(StoreError::Sqlite(other)),
        }
    }

    /// Whether `blocker` has blocked `blocked`.
    pub fn is_blocked(&self, blocker: &Principal, blocked: &Principal) -> Result<bool> {
        Ok(self.get_block(blocker, blocked)?.is_some())
    }

    /// Delete a block row.  Returns `true` if a row was deleted.
    pub fn delete_block(&self, blocker: &Principal, blocked: &Principal) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM blocks WHERE blocker = ?1 AND blocked = ?2",
            params![blocker.to_hex(), blocked.to_hex()],
        )?;
        Ok(affected > 0)
    }

    /// List everyone `blocker` has blocked, newest first.
    pub fn list_blocks(&self, blocker: &Principal) -> Result<Vec<Block>> {
        let mut stmt = self.conn().prepare(
            "SELECT blocker, blocked, created_at, reason
             FROM blocks
             WHERE blocker = ?1
             ORDER BY created_at DESC",
        )?;

        let rows = stmt.query_map(params![blocker.to_hex()], row_to_block)?;

        let mut blocks = Vec::new();
        for r in rows {
            blocks.push(r?);
        }
        Ok(blocks)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`Block`].
fn row_to_block(r: &rusqlite::Row<'_>) -> rusqlite::Result<Block> {
    Ok(Block {
        blocker: row::principal(r, 0)?,
        blocked: row::principal(r, 1)?,
        created_at: row::timestamp(r, 2)?,
        reason: r.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn block_is_directional() {
        let db = Database::open_in_memory().unwrap();
        let a = Principal([1; 32]);
        let b = Principal([2; 32]);

        db.upsert_block(&Block {
            blocker: a,
            blocked: b,
            created_at: Utc::now(),
            reason: Some("spam".into()),
        })
        .unwrap();

        assert!(db.is_blocked(&a, &b).unwrap());
        assert!(!db.is_blocked(&b, &a).unwrap());
    }

    #[test]
    fn delete_reports_presence() {
        let db = Database::open_in_memory().unwrap();
        let a = Principal([1; 32]);
        let b = Principal([2; 32]);

        assert!(!db.delete_block(&a, &b).unwrap());

        db.upsert_block(&Block {
            blocker: a,
            blocked: b,
            created_at: Utc::now(),
            reason: None,
        })
        .unwrap();
        assert!(db.delete_block(&a, &b).unwrap());
        assert!(!db.is_blocked(&a, &b).unwrap());
    }
}
