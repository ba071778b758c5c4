//! The client's view of the world.
//!
//! [`SessionState`] is an explicit struct owned by the [`Session`]
//! controller; the reconciliation loop and the command interpreter mutate it
//! through short-lived lock guards, never concurrently across an await.
//! Everything here is a cache of the authoritative store with staleness
//! bounded by the poll interval, except the clear-cutoff overlay which is
//! local-only by design.
//!
//! [`Session`]: crate::session::Session

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use parley_shared::{ConversationId, UserId};
use parley_store::{Message, Room, User};

/// Navigational mode. The two poll timers are keyed to disjoint modes:
/// the lobby poll runs in `Lobby`, the active poll in `Room` and `Dm`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Mode {
    Auth,
    Lobby,
    Room,
    Dm,
    Profile,
}

/// Central session state.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// The authenticated user. `None` until login/register succeeds.
    pub current_user: Option<User>,

    /// Current navigational mode.
    pub mode: Mode,

    /// The conversation the active poll is watching: a room id in `Room`
    /// mode, a canonical pair id in `Dm` mode.
    pub active_conversation: Option<ConversationId>,

    /// The other party when in a DM.
    pub active_dm_user: Option<User>,

    /// The profile being viewed in `Profile` mode.
    pub viewed_profile: Option<User>,

    /// Cached room list, replaced wholesale by the lobby poll.
    pub rooms: Vec<Room>,

    /// Messages of the active conversation, merged on every active tick.
    pub messages: Vec<Message>,

    /// Member details for the active room, refreshed on every active tick.
    pub active_room_users: Vec<User>,

    /// Directory of users seen so far (friends, looked-up names).
    pub user_cache: Vec<User>,

    /// Local-only clear-history overlay: messages at or before the cutoff
    /// are hidden, never deleted remotely.
    pub clear_cutoffs: HashMap<ConversationId, i64>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            current_user: None,
            mode: Mode::Auth,
            active_conversation: None,
            active_dm_user: None,
            viewed_profile: None,
            rooms: Vec::new(),
            messages: Vec::new(),
            active_room_users: Vec::new(),
            user_cache: Vec::new(),
            clear_cutoffs: HashMap::new(),
        }
    }

    /// The clear cutoff for a conversation, 0 when never cleared.
    pub fn clear_cutoff(&self, conversation: &ConversationId) -> i64 {
        self.clear_cutoffs.get(conversation).copied().unwrap_or(0)
    }

    /// Merge a polled message list into the active view.
    ///
    /// The polled copy is truth: it is filtered by the clear cutoff and then
    /// keyed by message id, so a polled copy replaces an optimistic local
    /// copy with the same id instead of rendering twice. Optimistic messages
    /// from the current user that have not round-tripped yet (id not in the
    /// polled set, newer than anything polled) are kept; transient local
    /// notices from synthetic senders are dropped, matching wholesale
    /// replacement.
    pub fn merge_polled_messages(&mut self, conversation: &ConversationId, polled: Vec<Message>) {
        let cutoff = self.clear_cutoff(conversation);

        let mut merged: Vec<Message> =
            polled.into_iter().filter(|m| m.timestamp > cutoff).collect();
        let newest_polled = merged.last().map(|m| m.timestamp).unwrap_or(i64::MIN);

        if let Some(me) = &self.current_user {
            for local in std::mem::take(&mut self.messages) {
                let pending = local.conversation_id == *conversation
                    && local.sender_id == me.id
                    && local.timestamp > newest_polled
                    && local.timestamp > cutoff
                    && !merged.iter().any(|m| m.id == local.id);
                if pending {
                    merged.push(local);
                }
            }
        }

        merged.sort_by_key(|m| m.timestamp);
        self.messages = merged;
    }

    /// Patch a freshly fetched room record into the cached room list in
    /// place. No-op when the list does not contain the room.
    pub fn patch_room(&mut self, room: Room) {
        if let Some(slot) = self.rooms.iter_mut().find(|r| r.id == room.id) {
            *slot = room;
        }
    }

    /// Find a cached user by name, case-insensitively.
    pub fn find_cached_user(&self, username: &str) -> Option<&User> {
        self.user_cache
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
    }

    /// Insert or refresh a user in the directory cache.
    pub fn cache_user(&mut self, user: User) {
        match self.user_cache.iter_mut().find(|u| u.id == user.id) {
            Some(slot) => *slot = user,
            None => self.user_cache.push(user),
        }
    }

    /// Unread messages in the cached view that were sent to `reader`.
    /// Meaningful in DM mode, where the read flag is maintained.
    pub fn unread_count(&self, reader: &UserId) -> usize {
        self.messages
            .iter()
            .filter(|m| !m.read && m.sender_id != *reader)
            .count()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
