//! v001 -- Initial schema creation.
//!
//! Creates the four core tables: `users`, `rooms`, `messages`, and `bans`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Users
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id            TEXT PRIMARY KEY NOT NULL,  -- six-digit account number
    username      TEXT UNIQUE NOT NULL,
    password_salt TEXT NOT NULL DEFAULT '',   -- hex; empty = no password set
    password_hash TEXT NOT NULL DEFAULT '',   -- hex-encoded salted BLAKE3
    friends       TEXT NOT NULL DEFAULT '[]', -- JSON array of user ids
    status        TEXT NOT NULL DEFAULT 'Online',
    is_online     INTEGER NOT NULL DEFAULT 0, -- boolean 0/1
    bio           TEXT NOT NULL DEFAULT '',
    photos        TEXT NOT NULL DEFAULT '[]', -- JSON array, index 0 = avatar
    created_at    INTEGER NOT NULL            -- unix millis
);

-- ----------------------------------------------------------------
-- Rooms
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS rooms (
    id         TEXT PRIMARY KEY NOT NULL,     -- room-{millis}
    name       TEXT NOT NULL,
    topic      TEXT,                          -- nullable
    admin_id   TEXT NOT NULL,                 -- creator, never transferred
    users      TEXT NOT NULL DEFAULT '[]',    -- JSON array of member ids
    is_private INTEGER NOT NULL DEFAULT 0,    -- boolean 0/1
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_rooms_created_at ON rooms(created_at DESC);

-- ----------------------------------------------------------------
-- Messages
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS messages (
    -- Client-minted and time-derived; NOT globally unique under
    -- concurrent senders, so no uniqueness constraint here.
    id              TEXT NOT NULL,
    conversation_id TEXT NOT NULL,             -- room id or sorted-pair DM id
    sender_id       TEXT NOT NULL,
    sender_name     TEXT NOT NULL,             -- snapshot at send time
    content         TEXT NOT NULL,
    timestamp       INTEGER NOT NULL,          -- unix millis, ordering key
    kind            TEXT NOT NULL,             -- TEXT | SYSTEM | CMD_RESPONSE | ACTION
    is_read         INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_messages_conversation_ts
    ON messages(conversation_id, timestamp ASC);

-- ----------------------------------------------------------------
-- Bans (append-only, no expiry)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS bans (
    room_id   TEXT NOT NULL,
    user_id   TEXT NOT NULL,
    banned_at INTEGER NOT NULL,

    PRIMARY KEY (room_id, user_id)
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
