//! CRUD operations for [`User`] records.
//!
//! Users are created exactly once by registration and never deleted;
//! lifecycle changes are status transitions on the existing row.

use amity_shared::Principal;
use rusqlite::params;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{AccountStatus, User};
use crate::row;

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new user.  Fails with a constraint error if the principal
    /// is already registered; callers check existence first.
    pub fn create_user(&self, user: &User) -> Result<()> {
        self.conn().execute(
            "INSERT INTO users (principal, name, status, created_at, metadata,
                                deactivated_at, encryption_key, profile_image)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                user.principal.to_hex(),
                user.name,
                user.status.as_str(),
                user.created_at.to_rfc3339(),
                user.metadata,
                user.deactivated_at.map(|t| t.to_rfc3339()),
                user.encryption_key,
                user.profile_image,
            ],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single user.  [`StoreError::NotFound`] if unregistered.
    pub fn get_user(&self, principal: &Principal) -> Result<User> {
        self.conn()
            .query_row(
                "SELECT principal, name, status, created_at, metadata,
                        deactivated_at, encryption_key, profile_image
                 FROM users
                 WHERE principal = ?1",
                params![principal.to_hex()],
                row_to_user,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// Whether a principal has a user record.
    pub fn user_exists(&self, principal: &Principal) -> Result<bool> {
        let count: u32 = self.conn().query_row(
            "SELECT COUNT(*) FROM users WHERE principal = ?1",
            params![principal.to_hex()],
            |r| r.get(0),
        )?;
        Ok(count > 0)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Rewrite every mutable column of an existing user row.
    pub fn update_user(&self, user: &User) -> Result<()> {
        let affected = self.conn().execute(
            "UPDATE users
             SET name = ?2, status = ?3, metadata = ?4, deactivated_at = ?5,
                 encryption_key = ?6, profile_image = ?7
             WHERE principal = ?1",
            params![
                user.principal.to_hex(),
                user.name,
                user.status.as_str(),
                user.metadata,
                user.deactivated_at.map(|t| t.to_rfc3339()),
                user.encryption_key,
                user.profile_image,
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`User`].
fn row_to_user(r: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        principal: row::principal(r, 0)?,
        name: r.get(1)?,
        status: row::enum_text(r, 2, AccountStatus::parse)?,
        created_at: row::timestamp(r, 3)?,
        metadata: r.get(4)?,
        deactivated_at: row::opt_timestamp(r, 5)?,
        encryption_key: r.get(6)?,
        profile_image: r.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(principal: Principal) -> User {
        User {
            principal,
            name: "alice".into(),
            status: AccountStatus::Active,
            created_at: Utc::now(),
            metadata: Some("{}".into()),
            deactivated_at: None,
            encryption_key: None,
            profile_image: None,
        }
    }

    #[test]
    fn create_then_get() {
        let db = Database::open_in_memory().unwrap();
        let p = Principal([7; 32]);
        db.create_user(&sample(p)).unwrap();

        let got = db.get_user(&p).unwrap();
        assert_eq!(got.name, "alice");
        assert_eq!(got.status, AccountStatus::Active);
        assert!(db.user_exists(&p).unwrap());
    }

    #[test]
    fn get_missing_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let err = db.get_user(&Principal([9; 32])).unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let p = Principal([7; 32]);
        db.create_user(&sample(p)).unwrap();
        assert!(db.create_user(&sample(p)).is_err());
    }

    #[test]
    fn corrupt_timestamp_surfaces_as_sqlite_error() {
        let db = Database::open_in_memory().unwrap();
        let p = Principal([7; 32]);
        db.conn()
            .execute(
                "INSERT INTO users (principal, name, status, created_at)
                 VALUES (?1, 'alice', 'active', 'not-a-timestamp')",
                rusqlite::params![p.to_hex()],
            )
            .unwrap();

        let err = db.get_user(&p).unwrap_err();
        assert!(matches!(err, StoreError::Sqlite(_)));
    }

    #[test]
    fn update_rewrites_status() {
        let db = Database::open_in_memory().unwrap();
        let p = Principal([7; 32]);
        let mut user = sample(p);
        db.create_user(&user).unwrap();

        user.status = AccountStatus::Deactivated;
        user.deactivated_at = Some(Utc::now());
        db.update_user(&user).unwrap();

        let got = db.get_user(&p).unwrap();
        assert_eq!(got.status, AccountStatus::Deactivated);
        assert!(got.deactivated_at.is_some());
    }
}
