//! The narrow async interface the client core programs against.
//!
//! [`StorageGateway`] is the authoritative store's entire surface: user,
//! room, ban, and message operations, all asynchronous. The client never
//! touches [`Database`] directly, which keeps it testable against in-memory
//! fakes.

use std::sync::Mutex;

use async_trait::async_trait;

use parley_shared::{ConversationId, RoomId, UserId, UserStatus};

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{Message, Room, User};

/// Narrow CRUD interface to the authoritative store.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    // --- Users ---

    /// Create an account with a server-assigned id and a salted credential
    /// hash.
    async fn create_user(&self, username: &str, password: &str) -> Result<User>;

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>>;

    /// Batch lookup; unknown ids are skipped, input order is preserved.
    async fn get_users_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>>;

    async fn update_user_friends(&self, id: &UserId, friends: &[UserId]) -> Result<()>;

    async fn update_user_profile(
        &self,
        id: &UserId,
        bio: &str,
        photos: &[String],
        status: UserStatus,
        is_online: bool,
    ) -> Result<()>;

    // --- Rooms ---

    /// Most-recent-first, bounded by the room-list limit.
    async fn list_rooms(&self) -> Result<Vec<Room>>;

    async fn get_room(&self, id: &RoomId) -> Result<Option<Room>>;

    async fn create_room(&self, room: &Room) -> Result<()>;

    async fn update_room_details(&self, id: &RoomId, name: &str, topic: Option<&str>)
        -> Result<()>;

    async fn delete_room(&self, id: &RoomId) -> Result<()>;

    /// Idempotent: no-op if the user is already a member.
    async fn add_room_member(&self, id: &RoomId, user: &UserId) -> Result<()>;

    /// Idempotent: no-op if the user is not a member.
    async fn remove_room_member(&self, id: &RoomId, user: &UserId) -> Result<()>;

    // --- Bans ---

    /// Idempotent: re-banning is a no-op.
    async fn create_ban(&self, room: &RoomId, user: &UserId) -> Result<()>;

    async fn is_banned(&self, room: &RoomId, user: &UserId) -> Result<bool>;

    // --- Messages ---

    /// Chronological ascending, bounded by the message fetch limit.
    async fn list_messages(&self, conversation: &ConversationId) -> Result<Vec<Message>>;

    async fn create_message(&self, message: &Message) -> Result<()>;

    /// Mark all messages in the conversation not sent by `reader` as read.
    async fn mark_messages_read(
        &self,
        conversation: &ConversationId,
        reader: &UserId,
    ) -> Result<()>;
}

/// [`StorageGateway`] backed by a local SQLite [`Database`].
///
/// Statements are single-row or small-list operations, so they run directly
/// under a short-lived mutex instead of going through `spawn_blocking`.
pub struct SqliteGateway {
    db: Mutex<Database>,
}

impl SqliteGateway {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    fn with_db<T>(&self, f: impl FnOnce(&Database) -> Result<T>) -> Result<T> {
        let guard = self.db.lock().map_err(|_| StoreError::Poisoned)?;
        f(&guard)
    }
}

/// Collapse the store's `NotFound` into `None` for the optional lookups.
fn optional<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(StoreError::NotFound) => Ok(None),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl StorageGateway for SqliteGateway {
    async fn create_user(&self, username: &str, password: &str) -> Result<User> {
        self.with_db(|db| db.create_user(username, password))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        optional(self.with_db(|db| db.get_user_by_username(username)))
    }

    async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>> {
        optional(self.with_db(|db| db.get_user_by_id(id)))
    }

    async fn get_users_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>> {
        self.with_db(|db| db.get_users_by_ids(ids))
    }

    async fn update_user_friends(&self, id: &UserId, friends: &[UserId]) -> Result<()> {
        self.with_db(|db| db.update_user_friends(id, friends))
    }

    async fn update_user_profile(
        &self,
        id: &UserId,
        bio: &str,
        photos: &[String],
        status: UserStatus,
        is_online: bool,
    ) -> Result<()> {
        self.with_db(|db| db.update_user_profile(id, bio, photos, status, is_online))
    }

    async fn list_rooms(&self) -> Result<Vec<Room>> {
        self.with_db(|db| db.list_rooms())
    }

    async fn get_room(&self, id: &RoomId) -> Result<Option<Room>> {
        optional(self.with_db(|db| db.get_room(id)))
    }

    async fn create_room(&self, room: &Room) -> Result<()> {
        self.with_db(|db| db.create_room(room))
    }

    async fn update_room_details(
        &self,
        id: &RoomId,
        name: &str,
        topic: Option<&str>,
    ) -> Result<()> {
        self.with_db(|db| db.update_room_details(id, name, topic))
    }

    async fn delete_room(&self, id: &RoomId) -> Result<()> {
        self.with_db(|db| db.delete_room(id).map(|_| ()))
    }

    async fn add_room_member(&self, id: &RoomId, user: &UserId) -> Result<()> {
        self.with_db(|db| db.add_room_member(id, user))
    }

    async fn remove_room_member(&self, id: &RoomId, user: &UserId) -> Result<()> {
        self.with_db(|db| db.remove_room_member(id, user))
    }

    async fn create_ban(&self, room: &RoomId, user: &UserId) -> Result<()> {
        self.with_db(|db| db.create_ban(room, user))
    }

    async fn is_banned(&self, room: &RoomId, user: &UserId) -> Result<bool> {
        self.with_db(|db| db.is_banned(room, user))
    }

    async fn list_messages(&self, conversation: &ConversationId) -> Result<Vec<Message>> {
        self.with_db(|db| db.list_messages(conversation))
    }

    async fn create_message(&self, message: &Message) -> Result<()> {
        self.with_db(|db| db.create_message(message))
    }

    async fn mark_messages_read(
        &self,
        conversation: &ConversationId,
        reader: &UserId,
    ) -> Result<()> {
        self.with_db(|db| db.mark_messages_read(conversation, reader))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> SqliteGateway {
        SqliteGateway::new(Database::open_in_memory().unwrap())
    }

    #[tokio::test]
    async fn optional_lookups_collapse_not_found() {
        let gw = gateway();

        assert!(gw.get_user_by_username("nobody").await.unwrap().is_none());
        assert!(gw
            .get_user_by_id(&UserId::new("000000"))
            .await
            .unwrap()
            .is_none());
        assert!(gw.get_room(&RoomId::new("room-ghost")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn user_round_trip_through_gateway() {
        let gw = gateway();

        let created = gw.create_user("alice", "pw").await.unwrap();
        let fetched = gw.get_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(created, fetched);
    }

    #[tokio::test]
    async fn ban_round_trip_through_gateway() {
        let gw = gateway();

        let room = RoomId::new("room-1");
        let user = UserId::new("100001");

        assert!(!gw.is_banned(&room, &user).await.unwrap());
        gw.create_ban(&room, &user).await.unwrap();
        assert!(gw.is_banned(&room, &user).await.unwrap());
    }
}
