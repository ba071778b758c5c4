//! CRUD operations for [`Room`] records.
//!
//! The member set is stored as a JSON array column; add/remove are
//! read-modify-write and idempotent.

use rusqlite::params;

use parley_shared::constants::ROOM_LIST_LIMIT;
use parley_shared::{RoomId, UserId};

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::Room;

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new room.
    pub fn create_room(&self, room: &Room) -> Result<()> {
        self.conn().execute(
            "INSERT INTO rooms (id, name, topic, admin_id, users, is_private, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                room.id.as_str(),
                room.name,
                room.topic,
                room.admin_id.as_str(),
                serde_json::to_string(&room.users)?,
                room.is_private,
                room.created_at,
            ],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single room by id.
    pub fn get_room(&self, id: &RoomId) -> Result<Room> {
        self.conn()
            .query_row(
                "SELECT id, name, topic, admin_id, users, is_private, created_at
                 FROM rooms
                 WHERE id = ?1",
                params![id.as_str()],
                row_to_room,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// List rooms, most recently created first, bounded by the room-list
    /// limit.
    pub fn list_rooms(&self) -> Result<Vec<Room>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, name, topic, admin_id, users, is_private, created_at
             FROM rooms
             ORDER BY created_at DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![ROOM_LIST_LIMIT], row_to_room)?;

        let mut rooms = Vec::new();
        for row in rows {
            rooms.push(row?);
        }
        Ok(rooms)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Update a room's name and topic.
    pub fn update_room_details(
        &self,
        id: &RoomId,
        name: &str,
        topic: Option<&str>,
    ) -> Result<()> {
        self.conn().execute(
            "UPDATE rooms SET name = ?1, topic = ?2 WHERE id = ?3",
            params![name, topic, id.as_str()],
        )?;
        Ok(())
    }

    /// Add a user to a room's member set. No-op if already present or if
    /// the room does not exist.
    pub fn add_room_member(&self, id: &RoomId, user: &UserId) -> Result<()> {
        let mut users = match self.get_room_members(id)? {
            Some(users) => users,
            None => return Ok(()),
        };

        if !users.contains(user) {
            users.push(user.clone());
            self.set_room_members(id, &users)?;
        }
        Ok(())
    }

    /// Remove a user from a room's member set. No-op if absent or if the
    /// room does not exist.
    pub fn remove_room_member(&self, id: &RoomId, user: &UserId) -> Result<()> {
        let users = match self.get_room_members(id)? {
            Some(users) => users,
            None => return Ok(()),
        };

        if users.contains(user) {
            let remaining: Vec<UserId> = users.into_iter().filter(|u| u != user).collect();
            self.set_room_members(id, &remaining)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete a room by id.  Returns `true` if a row was deleted.
    ///
    /// Messages and ban records are deliberately left behind; clients in
    /// the room observe the deletion on their next poll.
    pub fn delete_room(&self, id: &RoomId) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM rooms WHERE id = ?1", params![id.as_str()])?;
        Ok(affected > 0)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn get_room_members(&self, id: &RoomId) -> Result<Option<Vec<UserId>>> {
        let result: rusqlite::Result<String> = self.conn().query_row(
            "SELECT users FROM rooms WHERE id = ?1",
            params![id.as_str()],
            |row| row.get(0),
        );

        match result {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Sqlite(e)),
        }
    }

    fn set_room_members(&self, id: &RoomId, users: &[UserId]) -> Result<()> {
        self.conn().execute(
            "UPDATE rooms SET users = ?1 WHERE id = ?2",
            params![serde_json::to_string(users)?, id.as_str()],
        )?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`Room`].
fn row_to_room(row: &rusqlite::Row<'_>) -> rusqlite::Result<Room> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let topic: Option<String> = row.get(2)?;
    let admin_id: String = row.get(3)?;
    let users_json: String = row.get(4)?;
    let is_private: bool = row.get(5)?;
    let created_at: i64 = row.get(6)?;

    let users: Vec<UserId> = serde_json::from_str(&users_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Room {
        id: RoomId::new(id),
        name,
        topic,
        admin_id: UserId::new(admin_id),
        users,
        is_private,
        created_at,
    })
}
