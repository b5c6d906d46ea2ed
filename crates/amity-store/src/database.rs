//! Database connection management.
//!
//! The [`Database`] struct owns a [`rusqlite::Connection`] and guarantees
//! that migrations are run before any other operation.
//!
//! The reducer applies each operation inside one transaction obtained via
//! [`Database::begin`]; dropping the transaction without committing rolls
//! every write of the operation back.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::{Connection, Transaction};

use crate::error::{Result, StoreError};
use crate::migrations;

/// Wrapper around a [`rusqlite::Connection`].
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the default application database.
    ///
    /// The database file is placed in the platform-appropriate data directory:
    /// - Linux:   `~/.local/share/amity/amity.db`
    /// - macOS:   `~/Library/Application Support/com.amity.amity/amity.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\amity\amity\data\amity.db`
    pub fn new() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("com", "amity", "amity").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join("amity.db");

        tracing::info!(path = %db_path.display(), "opening database");

        Self::open_at(&db_path)
    }

    /// Open (or create) a database at an explicit path.
    ///
    /// This is useful for tests and for embedding the store inside custom
    /// directory layouts.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Recommended SQLite settings.
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        // Run schema migrations.
        migrations::run_migrations(&conn)?;

        Ok(Self { conn })
    }

    /// Open an in-memory database. Every reducer test runs on one of these
    /// so state is rebuilt from scratch per test.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrations::run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Begin a transaction on the shared connection.
    ///
    /// `unchecked_transaction` takes `&self`, so the typed CRUD helpers
    /// remain callable while the transaction is open; their writes land
    /// inside it and are discarded if it is dropped without commit.
    pub fn begin(&self) -> Result<Transaction<'_>> {
        Ok(self.conn.unchecked_transaction()?)
    }

    /// Return a reference to the underlying `rusqlite::Connection`.
    ///
    /// Callers should prefer the typed CRUD helpers, but direct access is
    /// occasionally needed for ad-hoc queries.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn.path().map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");

        let db = Database::open_at(&path).expect("should open");
        assert!(db.path().is_some());
    }

    #[test]
    fn rollback_discards_writes() {
        use amity_shared::Principal;
        use chrono::Utc;

        let db = Database::open_in_memory().unwrap();
        let p = Principal([1u8; 32]);

        let tx = db.begin().unwrap();
        db.upsert_activity(
            &crate::models::Activity {
                principal: p,
                last_seen: Utc::now(),
                login_count: 1,
                total_actions: 1,
                last_action: Utc::now(),
            },
        )
        .unwrap();
        drop(tx); // rollback

        assert!(db.get_activity(&p).unwrap().is_none());
    }
}
