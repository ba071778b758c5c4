//! Shared identity types, constants, and credential hashing for parley.

pub mod constants;
pub mod credentials;
pub mod types;

pub use types::{ConversationId, MessageId, MessageKind, RoomId, UserId, UserStatus};
