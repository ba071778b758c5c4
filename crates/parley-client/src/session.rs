//! The session controller.
//!
//! [`Session`] owns the [`SessionState`], the gateway and AI collaborators,
//! the poll task handles, and the event channel. It is the single writer of
//! session state: the reconciliation loop, the command interpreter, and the
//! user-action methods all go through it. Lock guards are never held across
//! an await; callers clone what they need out, drop the guard, then await.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::sync::mpsc;

use parley_shared::constants::{SYSTEM_SENDER_ID, SYSTEM_SENDER_NAME};
use parley_shared::{ConversationId, MessageId, MessageKind, UserId};
use parley_store::{Message, StorageGateway, User};

use crate::ai::AiProvider;
use crate::error::{ClientError, Result};
use crate::events::SessionEvent;
use crate::prefs::Preferences;
use crate::state::SessionState;
use crate::sync::PollHandles;

/// Buffered events before the emitter starts dropping with a warning.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Knobs for embedding and testing.
pub struct SessionConfig {
    /// Preferences file location; `None` resolves the platform default.
    pub prefs_path: Option<PathBuf>,

    /// Whether mode changes spawn the background poll tasks. Tests drive
    /// ticks manually with this off.
    pub spawn_polls: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prefs_path: None,
            spawn_polls: true,
        }
    }
}

/// Central controller owning the session state.
pub struct Session {
    pub(crate) state: Mutex<SessionState>,
    pub(crate) gateway: Arc<dyn StorageGateway>,
    pub(crate) ai: Arc<dyn AiProvider>,
    pub(crate) events: mpsc::Sender<SessionEvent>,
    pub(crate) polls: Mutex<PollHandles>,
    pub(crate) spawn_polls: bool,
    prefs: Mutex<Preferences>,
    prefs_path: Option<PathBuf>,
    /// Last issued message-id millis; bumped monotonically so two locally
    /// consecutive messages never collide.
    id_clock: Mutex<i64>,
}

impl Session {
    /// Create a session with default configuration. Returns the controller
    /// and the receiving end of the event stream.
    pub fn new(
        gateway: Arc<dyn StorageGateway>,
        ai: Arc<dyn AiProvider>,
    ) -> (Arc<Self>, mpsc::Receiver<SessionEvent>) {
        Self::with_config(gateway, ai, SessionConfig::default())
    }

    /// Create a session with explicit configuration.
    pub fn with_config(
        gateway: Arc<dyn StorageGateway>,
        ai: Arc<dyn AiProvider>,
        config: SessionConfig,
    ) -> (Arc<Self>, mpsc::Receiver<SessionEvent>) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let prefs = match &config.prefs_path {
            Some(path) => Preferences::load_from(path),
            None => Preferences::default_path()
                .map(|p| Preferences::load_from(&p))
                .unwrap_or_default(),
        };

        let session = Arc::new(Self {
            state: Mutex::new(SessionState::new()),
            gateway,
            ai,
            events: tx,
            polls: Mutex::new(PollHandles::default()),
            spawn_polls: config.spawn_polls,
            prefs: Mutex::new(prefs),
            prefs_path: config.prefs_path,
            id_clock: Mutex::new(0),
        });

        (session, rx)
    }

    // ------------------------------------------------------------------
    // State access
    // ------------------------------------------------------------------

    /// Lock the session state. Poisoning is ignored: state mutations are
    /// small field writes that stay consistent even if a holder panicked.
    pub(crate) fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A clone of the current state for rendering.
    pub fn snapshot(&self) -> SessionState {
        self.state().clone()
    }

    /// The authenticated user, or a validation error when signed out.
    pub(crate) fn require_user(&self) -> Result<User> {
        self.state()
            .current_user
            .clone()
            .ok_or_else(|| ClientError::Validation("Not signed in.".to_string()))
    }

    /// The conversation the session is currently looking at.
    pub(crate) fn require_conversation(&self) -> Result<ConversationId> {
        self.state()
            .active_conversation
            .clone()
            .ok_or_else(|| ClientError::Validation("No active conversation.".to_string()))
    }

    // ------------------------------------------------------------------
    // Preferences
    // ------------------------------------------------------------------

    pub fn preferences(&self) -> Preferences {
        self.prefs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn update_preferences(
        &self,
        f: impl FnOnce(&mut Preferences),
    ) -> Result<Preferences> {
        let updated = {
            let mut guard = self.prefs.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut guard);
            guard.clone()
        };

        let path = match &self.prefs_path {
            Some(path) => path.clone(),
            None => Preferences::default_path()?,
        };
        updated.save_to(&path)?;
        Ok(updated)
    }

    // ------------------------------------------------------------------
    // Message construction
    // ------------------------------------------------------------------

    /// Current wall-clock time in unix millis.
    pub(crate) fn now_millis() -> i64 {
        Utc::now().timestamp_millis()
    }

    /// Issue a time-derived message stamp, bumped past the previous one so
    /// locally consecutive messages get distinct ids.
    pub(crate) fn next_stamp(&self) -> i64 {
        let now = Self::now_millis();
        let mut last = self.id_clock.lock().unwrap_or_else(PoisonError::into_inner);
        *last = now.max(*last + 1);
        *last
    }

    /// Build a message from the current user. Fails when signed out.
    pub(crate) fn own_message(
        &self,
        conversation: &ConversationId,
        content: impl Into<String>,
        kind: MessageKind,
    ) -> Result<Message> {
        let me = self.require_user()?;
        let stamp = self.next_stamp();
        Ok(Message {
            id: MessageId::from_timestamp(stamp),
            conversation_id: conversation.clone(),
            sender_id: me.id,
            sender_name: me.username,
            content: content.into(),
            timestamp: stamp,
            kind,
            read: false,
        })
    }

    /// Build a message from a synthetic sender (SYSTEM, the AI bot).
    pub(crate) fn synthetic_message(
        &self,
        conversation: &ConversationId,
        sender_id: &str,
        sender_name: &str,
        content: impl Into<String>,
        kind: MessageKind,
    ) -> Message {
        let stamp = self.next_stamp();
        Message {
            id: MessageId::from_timestamp(stamp),
            conversation_id: conversation.clone(),
            sender_id: UserId::new(sender_id),
            sender_name: sender_name.to_string(),
            content: content.into(),
            timestamp: stamp,
            kind,
            read: false,
        }
    }

    /// Build a persisted SYSTEM announcement (joins, leaves, kicks, bans).
    pub(crate) fn system_message(
        &self,
        conversation: &ConversationId,
        content: impl Into<String>,
    ) -> Message {
        self.synthetic_message(
            conversation,
            SYSTEM_SENDER_ID,
            SYSTEM_SENDER_NAME,
            content,
            MessageKind::System,
        )
    }

    /// Append a local-only CMD_RESPONSE notice to the visible list. Never
    /// persisted remotely.
    pub(crate) fn local_notice(&self, conversation: &ConversationId, text: impl Into<String>) {
        let notice = self.synthetic_message(
            conversation,
            SYSTEM_SENDER_ID,
            SYSTEM_SENDER_NAME,
            text,
            MessageKind::CommandResponse,
        );
        self.state().messages.push(notice);
    }

    // ------------------------------------------------------------------
    // User directory
    // ------------------------------------------------------------------

    /// Resolve a username to a user: local cache first, then the store.
    /// Successful remote lookups are cached.
    pub(crate) async fn resolve_username(&self, username: &str) -> Result<Option<User>> {
        if let Some(user) = self.state().find_cached_user(username).cloned() {
            return Ok(Some(user));
        }

        match self.gateway.get_user_by_username(username).await? {
            Some(user) => {
                self.state().cache_user(user.clone());
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Resolve a user id to a user: cache, self, then the store.
    pub(crate) async fn resolve_user_id(&self, id: &UserId) -> Result<Option<User>> {
        {
            let state = self.state();
            if let Some(user) = state.user_cache.iter().find(|u| u.id == *id) {
                return Ok(Some(user.clone()));
            }
            if let Some(user) = state.active_room_users.iter().find(|u| u.id == *id) {
                return Ok(Some(user.clone()));
            }
            if let Some(me) = &state.current_user {
                if me.id == *id {
                    return Ok(Some(me.clone()));
                }
            }
        }

        match self.gateway.get_user_by_id(id).await? {
            Some(user) => {
                self.state().cache_user(user.clone());
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }
}
