//! Ban records: append-only, keyed by `(room_id, user_id)`, no expiry.

use chrono::Utc;
use rusqlite::params;

use parley_shared::{RoomId, UserId};

use crate::database::Database;
use crate::error::Result;

impl Database {
    /// Record a ban. Idempotent: re-banning an already banned user is a
    /// no-op and keeps the original `banned_at`.
    pub fn create_ban(&self, room: &RoomId, user: &UserId) -> Result<()> {
        self.conn().execute(
            "INSERT OR IGNORE INTO bans (room_id, user_id, banned_at)
             VALUES (?1, ?2, ?3)",
            params![
                room.as_str(),
                user.as_str(),
                Utc::now().timestamp_millis()
            ],
        )?;
        Ok(())
    }

    /// Check whether a user is banned from a room.
    pub fn is_banned(&self, room: &RoomId, user: &UserId) -> Result<bool> {
        let banned: bool = self.conn().query_row(
            "SELECT EXISTS(SELECT 1 FROM bans WHERE room_id = ?1 AND user_id = ?2)",
            params![room.as_str(), user.as_str()],
            |row| row.get(0),
        )?;
        Ok(banned)
    }
}
