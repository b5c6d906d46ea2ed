//! CRUD operations for [`Friendship`] records.
//!
//! Rows are directional `(source, target)` pairs.  A pending request is
//! one row; an accepted friendship is two mirrored active rows.  The
//! engine checks and mutates specific directions on purpose, so nothing
//! here collapses a pair to an unordered edge.

use amity_shared::Principal;
use rusqlite::params;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{Friendship, FriendshipStatus};
use crate::row;

impl Database {
    /// Insert or replace one directional friendship row.
    pub fn upsert_friendship(&self, friendship: &Friendship) -> Result<()> {
        self.conn().execute(
            "INSERT INTO friendships (source, target, status, created_at, last_interaction)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(source, target) DO UPDATE SET
                 status = excluded.status,
                 last_interaction = excluded.last_interaction",
            params![
                friendship.source.to_hex(),
                friendship.target.to_hex(),
                friendship.status.as_str(),
                friendship.created_at.to_rfc3339(),
                friendship.last_interaction.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Fetch one directional row, if present.
    pub fn get_friendship(
        &self,
        source: &Principal,
        target: &Principal,
    ) -> Result<Option<Friendship>> {
        let result = self.conn().query_row(
            "SELECT source, target, status, created_at, last_interaction
             FROM friendships
             WHERE source = ?1 AND target = ?2",
            params![source.to_hex(), target.to_hex()],
            row_to_friendship,
        );
        match result {
            Ok(friendship) => Ok(Some(friendship)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(other) => Err(StoreError::Sqlite(other)),
        }
    }

    /// Delete one directional row.  Returns `true` if a row was deleted.
    pub fn delete_friendship(&self, source: &Principal, target: &Principal) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM friendships WHERE source = ?1 AND target = ?2",
            params![source.to_hex(), target.to_hex()],
        )?;
        Ok(affected > 0)
    }

    /// Delete both directional rows between a pair, whatever their status.
    pub fn delete_friendship_pair(&self, a: &Principal, b: &Principal) -> Result<()> {
        self.conn().execute(
            "DELETE FROM friendships
             WHERE (source = ?1 AND target = ?2) OR (source = ?2 AND target = ?1)",
            params![a.to_hex(), b.to_hex()],
        )?;
        Ok(())
    }

    /// Whether an active row `source -> target` exists (forward direction
    /// only; the engine relies on this asymmetry).
    pub fn has_active_friendship(&self, source: &Principal, target: &Principal) -> Result<bool> {
        Ok(matches!(
            self.get_friendship(source, target)?,
            Some(f) if f.status == FriendshipStatus::Active
        ))
    }

    /// List principals `source` holds an active row towards, oldest first.
    pub fn list_friends(&self, source: &Principal) -> Result<Vec<Principal>> {
        let mut stmt = self.conn().prepare(
            "SELECT source, target, status, created_at, last_interaction
             FROM friendships
             WHERE source = ?1 AND status = 'active'
             ORDER BY created_at ASC",
        )?;

        let rows = stmt.query_map(params![source.to_hex()], row_to_friendship)?;

        let mut friends = Vec::new();
        for r in rows {
            friends.push(r?.target);
        }
        Ok(friends)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`Friendship`].
fn row_to_friendship(r: &rusqlite::Row<'_>) -> rusqlite::Result<Friendship> {
    Ok(Friendship {
        source: row::principal(r, 0)?,
        target: row::principal(r, 1)?,
        status: row::enum_text(r, 2, FriendshipStatus::parse)?,
        created_at: row::timestamp(r, 3)?,
        last_interaction: row::timestamp(r, 4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn pending(source: Principal, target: Principal) -> Friendship {
        let now = Utc::now();
        Friendship {
            source,
            target,
            status: FriendshipStatus::Pending,
            created_at: now,
            last_interaction: now,
        }
    }

    #[test]
    fn rows_are_directional() {
        let db = Database::open_in_memory().unwrap();
        let a = Principal([1; 32]);
        let b = Principal([2; 32]);

        db.upsert_friendship(&pending(a, b)).unwrap();

        assert!(db.get_friendship(&a, &b).unwrap().is_some());
        assert!(db.get_friendship(&b, &a).unwrap().is_none());
        assert!(!db.has_active_friendship(&a, &b).unwrap());
    }

    #[test]
    fn pair_delete_removes_both_directions() {
        let db = Database::open_in_memory().unwrap();
        let a = Principal([1; 32]);
        let b = Principal([2; 32]);

        let mut fwd = pending(a, b);
        fwd.status = FriendshipStatus::Active;
        let mut rev = pending(b, a);
        rev.status = FriendshipStatus::Active;
        db.upsert_friendship(&fwd).unwrap();
        db.upsert_friendship(&rev).unwrap();

        db.delete_friendship_pair(&a, &b).unwrap();
        assert!(db.get_friendship(&a, &b).unwrap().is_none());
        assert!(db.get_friendship(&b, &a).unwrap().is_none());
    }

    #[test]
    fn list_friends_only_sees_active_rows() {
        let db = Database::open_in_memory().unwrap();
        let a = Principal([1; 32]);
        let b = Principal([2; 32]);
        let c = Principal([3; 32]);

        let mut active = pending(a, b);
        active.status = FriendshipStatus::Active;
        db.upsert_friendship(&active).unwrap();
        db.upsert_friendship(&pending(a, c)).unwrap();

        assert_eq!(db.list_friends(&a).unwrap(), vec![b]);
    }
}
