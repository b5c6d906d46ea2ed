//! v001 -- Initial schema creation.
//!
//! Creates the seven collections of the social ledger: `users`,
//! `privacy`, `rate_limits`, `batches`, `activity`, `blocks` and
//! `friendships`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Users
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    principal      TEXT PRIMARY KEY NOT NULL,  -- hex-encoded 32-byte key
    name           TEXT NOT NULL,
    status         TEXT NOT NULL,              -- active | deactivated | suspended
    created_at     TEXT NOT NULL,              -- ISO-8601 / RFC-3339
    metadata       TEXT,
    deactivated_at TEXT,                       -- set iff status = deactivated
    encryption_key TEXT,
    profile_image  TEXT
);

-- ----------------------------------------------------------------
-- Privacy settings (absent row = all-visible, encryption off)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS privacy (
    principal           TEXT PRIMARY KEY NOT NULL,
    profile_visible     INTEGER NOT NULL DEFAULT 1,  -- boolean 0/1
    metadata_visible    INTEGER NOT NULL DEFAULT 1,
    friend_list_visible INTEGER NOT NULL DEFAULT 1,
    status_visible      INTEGER NOT NULL DEFAULT 1,
    last_seen_visible   INTEGER NOT NULL DEFAULT 1,
    allow_messages      INTEGER NOT NULL DEFAULT 1,
    encryption_enabled  INTEGER NOT NULL DEFAULT 0,
    last_updated        TEXT NOT NULL
);

-- ----------------------------------------------------------------
-- Rate limits (created on first rate-checked action)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS rate_limits (
    principal       TEXT PRIMARY KEY NOT NULL,
    daily_actions   INTEGER NOT NULL DEFAULT 0,
    friend_requests INTEGER NOT NULL DEFAULT 0,
    status_updates  INTEGER NOT NULL DEFAULT 0,
    last_reset      TEXT NOT NULL
);

-- ----------------------------------------------------------------
-- Adaptive message batches
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS batches (
    principal       TEXT PRIMARY KEY NOT NULL,
    message_counter INTEGER NOT NULL DEFAULT 0,
    last_batch_at   TEXT NOT NULL,
    batch_size      INTEGER NOT NULL,           -- clamped to [10, 100]
    current_items   INTEGER NOT NULL DEFAULT 0,
    total_batches   INTEGER NOT NULL DEFAULT 0
);

-- ----------------------------------------------------------------
-- Activity / presence
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS activity (
    principal     TEXT PRIMARY KEY NOT NULL,
    last_seen     TEXT NOT NULL,
    login_count   INTEGER NOT NULL DEFAULT 0,
    total_actions INTEGER NOT NULL DEFAULT 0,
    last_action   TEXT NOT NULL
);

-- ----------------------------------------------------------------
-- Blocks (directional: blocker -> blocked)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS blocks (
    blocker    TEXT NOT NULL,
    blocked    TEXT NOT NULL,
    created_at TEXT NOT NULL,
    reason     TEXT,

    PRIMARY KEY (blocker, blocked)
);

-- ----------------------------------------------------------------
-- Friendships (directional: source -> target; an accepted friendship
-- is two mirrored active rows)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS friendships (
    source           TEXT NOT NULL,
    target           TEXT NOT NULL,
    status           TEXT NOT NULL,             -- pending | active | blocked
    created_at       TEXT NOT NULL,
    last_interaction TEXT NOT NULL,

    PRIMARY KEY (source, target)
);

CREATE INDEX IF NOT EXISTS idx_friendships_target ON friendships(target, status);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
