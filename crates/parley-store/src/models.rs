//! Domain model structs persisted in the store.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to a UI layer.

use serde::{Deserialize, Serialize};

use parley_shared::{ConversationId, MessageId, MessageKind, RoomId, UserId, UserStatus};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Server-assigned six-digit id, immutable after creation.
    pub id: UserId,
    /// Unique human-chosen name.
    pub username: String,
    /// Hex-encoded credential salt; empty when no password was set.
    pub password_salt: String,
    /// Hex-encoded salted BLAKE3 credential hash; empty when no password was set.
    pub password_hash: String,
    /// Friend user ids, insertion order preserved for deterministic display.
    pub friends: Vec<UserId>,
    /// Self-reported availability.
    pub status: UserStatus,
    /// Liveness flag, independent of `status`.
    pub is_online: bool,
    /// Free-text bio, at most 150 characters by convention.
    pub bio: String,
    /// Photo references; index 0 is the avatar, at most 6 entries.
    pub photos: Vec<String>,
    /// Creation time, unix millis.
    pub created_at: i64,
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// A named group conversation with a persistent member set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Room {
    /// Room id, minted client-side from the creation timestamp.
    pub id: RoomId,
    /// Display name.
    pub name: String,
    /// Optional topic line.
    pub topic: Option<String>,
    /// The creator. Exactly one admin per room, never transferred.
    pub admin_id: UserId,
    /// Member ids. The admin is written in at creation time.
    pub users: Vec<UserId>,
    /// Reserved visibility flag, false in practice.
    pub is_private: bool,
    /// Creation time, unix millis.
    pub created_at: i64,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single chat message in a room or DM conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Time-derived id minted by the sending client.
    pub id: MessageId,
    /// Room id or canonical two-party DM id.
    pub conversation_id: ConversationId,
    /// Sender's user id (or a synthetic id for system/AI senders).
    pub sender_id: UserId,
    /// Sender's username snapshot at send time; never updated retroactively.
    pub sender_name: String,
    /// Message body.
    pub content: String,
    /// Sender-local clock, unix millis. Ordering key.
    pub timestamp: i64,
    /// Message kind.
    pub kind: MessageKind,
    /// Read flag, meaningful only in DM conversations.
    pub read: bool,
}

// ---------------------------------------------------------------------------
// Ban record
// ---------------------------------------------------------------------------

/// A sticky room ban. Append-only, no expiry, no unban.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BanRecord {
    pub room_id: RoomId,
    pub user_id: UserId,
    /// When the ban was recorded, unix millis.
    pub banned_at: i64,
}
