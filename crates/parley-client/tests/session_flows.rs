//! End-to-end session flows over a shared in-memory store.
//!
//! Several sessions share one gateway, standing in for several clients
//! against the same backend. Polling is driven manually through the tick
//! methods so every test is deterministic.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::mpsc;

use parley_client::{
    AiProvider, ClientError, Mode, Session, SessionConfig, SessionEvent, StorageGateway,
    UnconfiguredAi,
};
use parley_shared::{ConversationId, MessageKind, RoomId, UserId, UserStatus};
use parley_store::{Database, Message, Room, SqliteGateway, User};

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

fn store() -> Arc<SqliteGateway> {
    Arc::new(SqliteGateway::new(Database::open_in_memory().unwrap()))
}

fn session_over(
    gateway: Arc<dyn StorageGateway>,
    dir: &TempDir,
    name: &str,
) -> (Arc<Session>, mpsc::Receiver<SessionEvent>) {
    session_with_ai(gateway, dir, name, Arc::new(UnconfiguredAi))
}

fn session_with_ai(
    gateway: Arc<dyn StorageGateway>,
    dir: &TempDir,
    name: &str,
    ai: Arc<dyn AiProvider>,
) -> (Arc<Session>, mpsc::Receiver<SessionEvent>) {
    Session::with_config(
        gateway,
        ai,
        SessionConfig {
            prefs_path: Some(dir.path().join(format!("{name}-prefs.json"))),
            spawn_polls: false,
        },
    )
}

fn drain(rx: &mut mpsc::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// A fixed-reply AI provider.
struct ScriptedAi(&'static str);

#[async_trait]
impl AiProvider for ScriptedAi {
    async fn complete(&self, _prompt: &str) -> String {
        self.0.to_string()
    }
}

/// Gateway decorator counting every write, for asserting that refused
/// actions touch nothing.
struct CountingGateway {
    inner: Arc<SqliteGateway>,
    writes: AtomicUsize,
}

impl CountingGateway {
    fn new(inner: Arc<SqliteGateway>) -> Self {
        Self {
            inner,
            writes: AtomicUsize::new(0),
        }
    }

    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl StorageGateway for CountingGateway {
    async fn create_user(&self, username: &str, password: &str) -> parley_store::Result<User> {
        self.bump();
        self.inner.create_user(username, password).await
    }

    async fn get_user_by_username(&self, username: &str) -> parley_store::Result<Option<User>> {
        self.inner.get_user_by_username(username).await
    }

    async fn get_user_by_id(&self, id: &UserId) -> parley_store::Result<Option<User>> {
        self.inner.get_user_by_id(id).await
    }

    async fn get_users_by_ids(&self, ids: &[UserId]) -> parley_store::Result<Vec<User>> {
        self.inner.get_users_by_ids(ids).await
    }

    async fn update_user_friends(
        &self,
        id: &UserId,
        friends: &[UserId],
    ) -> parley_store::Result<()> {
        self.bump();
        self.inner.update_user_friends(id, friends).await
    }

    async fn update_user_profile(
        &self,
        id: &UserId,
        bio: &str,
        photos: &[String],
        status: UserStatus,
        is_online: bool,
    ) -> parley_store::Result<()> {
        self.bump();
        self.inner
            .update_user_profile(id, bio, photos, status, is_online)
            .await
    }

    async fn list_rooms(&self) -> parley_store::Result<Vec<Room>> {
        self.inner.list_rooms().await
    }

    async fn get_room(&self, id: &RoomId) -> parley_store::Result<Option<Room>> {
        self.inner.get_room(id).await
    }

    async fn create_room(&self, room: &Room) -> parley_store::Result<()> {
        self.bump();
        self.inner.create_room(room).await
    }

    async fn update_room_details(
        &self,
        id: &RoomId,
        name: &str,
        topic: Option<&str>,
    ) -> parley_store::Result<()> {
        self.bump();
        self.inner.update_room_details(id, name, topic).await
    }

    async fn delete_room(&self, id: &RoomId) -> parley_store::Result<()> {
        self.bump();
        self.inner.delete_room(id).await
    }

    async fn add_room_member(&self, id: &RoomId, user: &UserId) -> parley_store::Result<()> {
        self.bump();
        self.inner.add_room_member(id, user).await
    }

    async fn remove_room_member(&self, id: &RoomId, user: &UserId) -> parley_store::Result<()> {
        self.bump();
        self.inner.remove_room_member(id, user).await
    }

    async fn create_ban(&self, room: &RoomId, user: &UserId) -> parley_store::Result<()> {
        self.bump();
        self.inner.create_ban(room, user).await
    }

    async fn is_banned(&self, room: &RoomId, user: &UserId) -> parley_store::Result<bool> {
        self.inner.is_banned(room, user).await
    }

    async fn list_messages(
        &self,
        conversation: &ConversationId,
    ) -> parley_store::Result<Vec<Message>> {
        self.inner.list_messages(conversation).await
    }

    async fn create_message(&self, message: &Message) -> parley_store::Result<()> {
        self.bump();
        self.inner.create_message(message).await
    }

    async fn mark_messages_read(
        &self,
        conversation: &ConversationId,
        reader: &UserId,
    ) -> parley_store::Result<()> {
        self.bump();
        self.inner.mark_messages_read(conversation, reader).await
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_then_login_round_trip() {
    let gateway = store();
    let dir = TempDir::new().unwrap();
    let (alice, _rx) = session_over(gateway.clone(), &dir, "alice");

    let registered = alice.register("alice", "hunter2").await.unwrap();
    assert_eq!(registered.username, "alice");
    assert_eq!(alice.snapshot().mode, Mode::Lobby);

    alice.logout().await;
    assert_eq!(alice.snapshot().mode, Mode::Auth);
    assert!(alice.snapshot().current_user.is_none());

    let logged_in = alice.login("alice", "hunter2").await.unwrap();
    assert_eq!(logged_in.id, registered.id);
    assert!(logged_in.is_online);
    assert_eq!(alice.snapshot().mode, Mode::Lobby);
}

#[tokio::test]
async fn wrong_password_and_duplicate_name_are_rejected() {
    let gateway = store();
    let dir = TempDir::new().unwrap();
    let (alice, _rx) = session_over(gateway.clone(), &dir, "alice");

    alice.register("alice", "hunter2").await.unwrap();

    let (imposter, _rx2) = session_over(gateway.clone(), &dir, "imposter");
    assert!(matches!(
        imposter.register("alice", "other").await,
        Err(ClientError::Validation(msg)) if msg == "Username taken"
    ));
    assert!(matches!(
        imposter.login("alice", "wrong").await,
        Err(ClientError::Validation(msg)) if msg == "Invalid password"
    ));
    assert!(matches!(
        imposter.login("nobody", "pw").await,
        Err(ClientError::NotFound(_))
    ));
}

// ---------------------------------------------------------------------------
// Moderation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ban_is_sticky_across_rejoin_attempts() {
    let gateway = store();
    let dir = TempDir::new().unwrap();
    let (alice, _arx) = session_over(gateway.clone(), &dir, "alice");
    let (bob, mut brx) = session_over(gateway.clone(), &dir, "bob");

    alice.register("alice", "pw").await.unwrap();
    let bob_user = bob.register("bob", "pw").await.unwrap();

    let room = alice.create_room("general").await.unwrap();
    bob.lobby_tick().await.unwrap();
    bob.join_room(&room.id).await.unwrap();
    drain(&mut brx);

    alice.ban_user(&bob_user.id).await.unwrap();

    // Bob's next poll notices the removal and forces him out.
    assert!(bob.active_tick().await.unwrap());
    assert_eq!(bob.snapshot().mode, Mode::Lobby);
    assert_eq!(
        drain(&mut brx),
        vec![SessionEvent::RemovedFromRoom {
            room_id: room.id.to_string()
        }]
    );

    // Every rejoin attempt is refused at the door.
    for _ in 0..2 {
        let attempt = bob.join_room(&room.id).await;
        assert!(matches!(
            attempt,
            Err(ClientError::Authorization(msg)) if msg == "You are banned from this room."
        ));
        assert_eq!(
            drain(&mut brx),
            vec![SessionEvent::BannedFromRoom {
                room_id: room.id.to_string()
            }]
        );
    }
}

#[tokio::test]
async fn kicked_user_may_rejoin() {
    let gateway = store();
    let dir = TempDir::new().unwrap();
    let (alice, _arx) = session_over(gateway.clone(), &dir, "alice");
    let (bob, mut brx) = session_over(gateway.clone(), &dir, "bob");

    alice.register("alice", "pw").await.unwrap();
    let bob_user = bob.register("bob", "pw").await.unwrap();

    let room = alice.create_room("general").await.unwrap();
    bob.lobby_tick().await.unwrap();
    bob.join_room(&room.id).await.unwrap();

    alice.kick_user(&bob_user.id).await.unwrap();

    assert!(bob.active_tick().await.unwrap());
    assert_eq!(bob.snapshot().mode, Mode::Lobby);
    drain(&mut brx);

    // No ban record, so the door is open again.
    bob.join_room(&room.id).await.unwrap();
    assert_eq!(bob.snapshot().mode, Mode::Room);
    assert!(drain(&mut brx).is_empty());
}

#[tokio::test]
async fn non_admin_kick_is_refused_without_touching_the_store() {
    let counting = Arc::new(CountingGateway::new(store()));
    let dir = TempDir::new().unwrap();
    let (alice, _arx) = session_over(counting.clone(), &dir, "alice");
    let (bob, _brx) = session_over(counting.clone(), &dir, "bob");

    alice.register("alice", "pw").await.unwrap();
    bob.register("bob", "pw").await.unwrap();

    let room = alice.create_room("general").await.unwrap();
    bob.lobby_tick().await.unwrap();
    bob.join_room(&room.id).await.unwrap();

    let writes_before = counting.writes();
    let messages_before = bob.snapshot().messages.len();

    bob.send_message("/kick alice").await.unwrap();

    let state = bob.snapshot();
    assert_eq!(state.messages.len(), messages_before + 1);
    let notice = state.messages.last().unwrap();
    assert_eq!(notice.kind, MessageKind::CommandResponse);
    assert_eq!(notice.content, "Only admins can kick.");
    assert_eq!(counting.writes(), writes_before);
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn forced_exit_fires_exactly_once() {
    let gateway = store();
    let dir = TempDir::new().unwrap();
    let (alice, _arx) = session_over(gateway.clone(), &dir, "alice");
    let (bob, mut brx) = session_over(gateway.clone(), &dir, "bob");

    alice.register("alice", "pw").await.unwrap();
    let bob_user = bob.register("bob", "pw").await.unwrap();

    let room = alice.create_room("general").await.unwrap();
    bob.lobby_tick().await.unwrap();
    bob.join_room(&room.id).await.unwrap();
    drain(&mut brx);

    // Out-of-band removal, as another client's admin would do it.
    gateway
        .remove_room_member(&room.id, &bob_user.id)
        .await
        .unwrap();

    assert!(bob.active_tick().await.unwrap());
    assert_eq!(bob.snapshot().mode, Mode::Lobby);
    assert_eq!(
        drain(&mut brx),
        vec![SessionEvent::RemovedFromRoom {
            room_id: room.id.to_string()
        }]
    );

    // Back in the lobby the active tick is inert; nothing re-fires.
    assert!(!bob.active_tick().await.unwrap());
    assert!(drain(&mut brx).is_empty());
}

#[tokio::test]
async fn deleted_room_forces_viewers_to_the_lobby() {
    let gateway = store();
    let dir = TempDir::new().unwrap();
    let (alice, _arx) = session_over(gateway.clone(), &dir, "alice");
    let (bob, mut brx) = session_over(gateway.clone(), &dir, "bob");

    alice.register("alice", "pw").await.unwrap();
    bob.register("bob", "pw").await.unwrap();

    let room = alice.create_room("general").await.unwrap();
    bob.lobby_tick().await.unwrap();
    bob.join_room(&room.id).await.unwrap();
    drain(&mut brx);

    alice.delete_room(&room.id).await.unwrap();

    assert!(bob.active_tick().await.unwrap());
    assert_eq!(bob.snapshot().mode, Mode::Lobby);
    assert_eq!(
        drain(&mut brx),
        vec![SessionEvent::RoomDeleted {
            room_id: room.id.to_string()
        }]
    );
}

#[tokio::test]
async fn polled_copy_replaces_the_optimistic_echo() {
    let gateway = store();
    let dir = TempDir::new().unwrap();
    let (alice, _arx) = session_over(gateway.clone(), &dir, "alice");

    alice.register("alice", "pw").await.unwrap();
    alice.create_room("general").await.unwrap();

    alice.send_message("hello room").await.unwrap();
    alice.active_tick().await.unwrap();

    let snapshot = alice.snapshot();
    let texts: Vec<&str> = snapshot
        .messages
        .iter()
        .filter(|m| m.kind == MessageKind::Text)
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(texts, vec!["hello room"]);
}

// ---------------------------------------------------------------------------
// Slash commands
// ---------------------------------------------------------------------------

#[tokio::test]
async fn clear_hides_history_locally_only() {
    let gateway = store();
    let dir = TempDir::new().unwrap();
    let (alice, _arx) = session_over(gateway.clone(), &dir, "alice");

    alice.register("alice", "pw").await.unwrap();
    let room = alice.create_room("general").await.unwrap();

    alice.send_message("first").await.unwrap();
    alice.send_message("second").await.unwrap();

    alice.send_message("/clear").await.unwrap();
    let state = alice.snapshot();
    assert_eq!(state.messages.len(), 1);
    assert_eq!(state.messages[0].content, "Chat history cleared locally.");

    // The next poll yields nothing: everything predates the cutoff and the
    // local notice is transient.
    alice.active_tick().await.unwrap();
    assert!(alice.snapshot().messages.is_empty());

    // Other clients still see the full history.
    let remote = gateway
        .list_messages(&ConversationId::room(&room.id))
        .await
        .unwrap();
    let texts: Vec<&str> = remote.iter().map(|m| m.content.as_str()).collect();
    assert!(texts.contains(&"first"));
    assert!(texts.contains(&"second"));
}

#[tokio::test]
async fn roll_appends_one_bounded_text_message() {
    let gateway = store();
    let dir = TempDir::new().unwrap();
    let (alice, _arx) = session_over(gateway.clone(), &dir, "alice");

    alice.register("alice", "pw").await.unwrap();
    alice.create_room("general").await.unwrap();

    let before = alice.snapshot().messages.len();
    alice.send_message("/roll").await.unwrap();

    let state = alice.snapshot();
    assert_eq!(state.messages.len(), before + 1);

    let rolled = state.messages.last().unwrap();
    assert_eq!(rolled.kind, MessageKind::Text);
    let value: i64 = rolled
        .content
        .strip_prefix("\u{1F3B2} rolled a ")
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=100).contains(&value));
}

#[tokio::test]
async fn me_formats_an_action_message() {
    let gateway = store();
    let dir = TempDir::new().unwrap();
    let (alice, _arx) = session_over(gateway.clone(), &dir, "alice");

    alice.register("alice", "pw").await.unwrap();
    alice.create_room("general").await.unwrap();

    alice.send_message("/me waves").await.unwrap();

    let state = alice.snapshot();
    let action = state.messages.last().unwrap();
    assert_eq!(action.kind, MessageKind::Action);
    assert_eq!(action.content, "alice waves");
}

#[tokio::test]
async fn msg_command_lands_in_the_dm_conversation() {
    let gateway = store();
    let dir = TempDir::new().unwrap();
    let (alice, _arx) = session_over(gateway.clone(), &dir, "alice");
    let (bob, _brx) = session_over(gateway.clone(), &dir, "bob");

    let alice_user = alice.register("alice", "pw").await.unwrap();
    let bob_user = bob.register("bob", "pw").await.unwrap();

    alice.create_room("general").await.unwrap();
    alice.send_message("/msg bob psst over here").await.unwrap();

    // Confirmation notice in the room view.
    let state = alice.snapshot();
    let notice = state.messages.last().unwrap();
    assert_eq!(notice.kind, MessageKind::CommandResponse);
    assert_eq!(notice.content, "Sent DM to bob");

    // Marked private message in the canonical DM conversation.
    let dm = ConversationId::direct(&alice_user.id, &bob_user.id);
    let remote = gateway.list_messages(&dm).await.unwrap();
    assert_eq!(remote.len(), 1);
    assert_eq!(remote[0].content, "(PM) psst over here");
}

#[tokio::test]
async fn unknown_and_malformed_commands_yield_local_notices() {
    let counting = Arc::new(CountingGateway::new(store()));
    let dir = TempDir::new().unwrap();
    let (alice, _arx) = session_over(counting.clone(), &dir, "alice");

    alice.register("alice", "pw").await.unwrap();
    alice.create_room("general").await.unwrap();

    let writes_before = counting.writes();

    alice.send_message("/frobnicate").await.unwrap();
    alice.send_message("/msg bob").await.unwrap();

    let state = alice.snapshot();
    let notices: Vec<&str> = state
        .messages
        .iter()
        .filter(|m| m.kind == MessageKind::CommandResponse)
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(notices, vec!["Unknown command.", "Usage: /msg <username> <text>"]);
    assert_eq!(counting.writes(), writes_before);
}

#[tokio::test]
async fn ai_reply_replaces_the_thinking_placeholder() {
    let gateway = store();
    let dir = TempDir::new().unwrap();
    let (alice, _arx) = session_with_ai(
        gateway.clone(),
        &dir,
        "alice",
        Arc::new(ScriptedAi("forty-two")),
    );

    alice.register("alice", "pw").await.unwrap();
    alice.create_room("general").await.unwrap();

    alice.send_message("/ai meaning of life").await.unwrap();

    let state = alice.snapshot();
    assert!(!state.messages.iter().any(|m| m.content == "Thinking..."));

    let reply = state.messages.last().unwrap();
    assert_eq!(reply.sender_name, "ParleyBot");
    assert_eq!(reply.kind, MessageKind::Text);
    assert_eq!(reply.content, "forty-two");
}

// ---------------------------------------------------------------------------
// Rooms
// ---------------------------------------------------------------------------

#[tokio::test]
async fn room_creation_cap_refuses_the_sixth_room() {
    let gateway = store();
    let dir = TempDir::new().unwrap();
    let (alice, _arx) = session_over(gateway.clone(), &dir, "alice");

    alice.register("alice", "pw").await.unwrap();
    for i in 0..5 {
        alice.create_room(&format!("room {i}")).await.unwrap();
    }

    let attempt = alice.create_room("one too many").await;
    assert!(matches!(
        attempt,
        Err(ClientError::Validation(msg)) if msg == "You can only create 5 rooms."
    ));
    assert_eq!(gateway.list_rooms().await.unwrap().len(), 5);
}

#[tokio::test]
async fn leaving_a_room_announces_and_returns_to_the_lobby() {
    let gateway = store();
    let dir = TempDir::new().unwrap();
    let (alice, _arx) = session_over(gateway.clone(), &dir, "alice");
    let (bob, _brx) = session_over(gateway.clone(), &dir, "bob");

    alice.register("alice", "pw").await.unwrap();
    let bob_user = bob.register("bob", "pw").await.unwrap();

    let room = alice.create_room("general").await.unwrap();
    bob.lobby_tick().await.unwrap();
    bob.join_room(&room.id).await.unwrap();

    bob.leave().await;
    assert_eq!(bob.snapshot().mode, Mode::Lobby);

    let remote_room = gateway.get_room(&room.id).await.unwrap().unwrap();
    assert!(!remote_room.users.contains(&bob_user.id));

    let remote = gateway
        .list_messages(&ConversationId::room(&room.id))
        .await
        .unwrap();
    assert!(remote
        .iter()
        .any(|m| m.content == "bob has left the room."));
}

#[tokio::test]
async fn only_the_admin_can_edit_room_details() {
    let gateway = store();
    let dir = TempDir::new().unwrap();
    let (alice, _arx) = session_over(gateway.clone(), &dir, "alice");
    let (bob, _brx) = session_over(gateway.clone(), &dir, "bob");

    alice.register("alice", "pw").await.unwrap();
    bob.register("bob", "pw").await.unwrap();

    let room = alice.create_room("general").await.unwrap();
    bob.lobby_tick().await.unwrap();
    bob.join_room(&room.id).await.unwrap();

    assert!(matches!(
        bob.update_room_details("hijacked", None).await,
        Err(ClientError::Authorization(_))
    ));

    alice
        .update_room_details("general chat", Some("all topics welcome"))
        .await
        .unwrap();

    let remote_room = gateway.get_room(&room.id).await.unwrap().unwrap();
    assert_eq!(remote_room.name, "general chat");
    assert_eq!(remote_room.topic.as_deref(), Some("all topics welcome"));
}

// ---------------------------------------------------------------------------
// Direct messages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dm_conversation_is_shared_between_both_parties() {
    let gateway = store();
    let dir = TempDir::new().unwrap();
    let (alice, _arx) = session_over(gateway.clone(), &dir, "alice");
    let (bob, _brx) = session_over(gateway.clone(), &dir, "bob");

    let alice_user = alice.register("alice", "pw").await.unwrap();
    let bob_user = bob.register("bob", "pw").await.unwrap();

    alice.open_dm(&bob_user.id).await.unwrap();
    assert_eq!(alice.snapshot().mode, Mode::Dm);
    alice.send_message("hi bob").await.unwrap();

    bob.open_dm(&alice_user.id).await.unwrap();
    bob.active_tick().await.unwrap();

    let state = bob.snapshot();
    assert_eq!(state.messages.len(), 1);
    assert_eq!(state.messages[0].content, "hi bob");
    // open_dm marked the incoming side as read.
    assert!(state.messages[0].read);
    assert_eq!(state.unread_count(&bob_user.id), 0);
}

// ---------------------------------------------------------------------------
// Friends and profiles
// ---------------------------------------------------------------------------

#[tokio::test]
async fn friend_list_round_trip() {
    let gateway = store();
    let dir = TempDir::new().unwrap();
    let (alice, _arx) = session_over(gateway.clone(), &dir, "alice");
    let (bob, _brx) = session_over(gateway.clone(), &dir, "bob");

    let alice_user = alice.register("alice", "pw").await.unwrap();
    let bob_user = bob.register("bob", "pw").await.unwrap();

    assert!(matches!(
        alice.add_friend(&alice_user.id).await,
        Err(ClientError::Validation(_))
    ));
    assert!(matches!(
        alice.add_friend(&UserId::new("000000")).await,
        Err(ClientError::NotFound(msg)) if msg == "User ID not found."
    ));

    alice.add_friend(&bob_user.id).await.unwrap();
    assert!(matches!(
        alice.add_friend(&bob_user.id).await,
        Err(ClientError::Validation(msg)) if msg == "Already friends."
    ));

    let friends = alice.friends().await.unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].username, "bob");

    alice.remove_friend(&bob_user.id).await.unwrap();
    assert!(alice.friends().await.unwrap().is_empty());
}

#[tokio::test]
async fn profile_updates_validate_and_persist() {
    let gateway = store();
    let dir = TempDir::new().unwrap();
    let (alice, _arx) = session_over(gateway.clone(), &dir, "alice");

    let alice_user = alice.register("alice", "pw").await.unwrap();

    let long_bio = "x".repeat(151);
    assert!(matches!(
        alice.update_profile(&long_bio, &[], UserStatus::Online).await,
        Err(ClientError::Validation(_))
    ));

    let seven_photos: Vec<String> = (0..7).map(|i| format!("photo-{i}")).collect();
    assert!(matches!(
        alice
            .update_profile("hi", &seven_photos, UserStatus::Online)
            .await,
        Err(ClientError::Validation(_))
    ));

    alice
        .update_profile("gardener", &["me.png".to_string()], UserStatus::Away)
        .await
        .unwrap();

    let stored = gateway
        .get_user_by_id(&alice_user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.bio, "gardener");
    assert_eq!(stored.photos, vec!["me.png".to_string()]);
    assert_eq!(stored.status, UserStatus::Away);

    let viewed = alice.view_profile(&alice_user.id).await.unwrap();
    assert_eq!(viewed.bio, "gardener");
    assert_eq!(alice.snapshot().mode, Mode::Profile);
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

#[tokio::test]
async fn enabling_notifications_requests_permission() {
    let gateway = store();
    let dir = TempDir::new().unwrap();
    let (alice, mut arx) = session_over(gateway.clone(), &dir, "alice");

    let prefs = alice.set_notifications_enabled(false).unwrap();
    assert!(!prefs.notifications_enabled);
    assert!(drain(&mut arx).is_empty());

    let prefs = alice.set_notifications_enabled(true).unwrap();
    assert!(prefs.notifications_enabled);
    assert_eq!(
        drain(&mut arx),
        vec![SessionEvent::NotificationPermissionRequested]
    );

    let prefs = alice.set_sound_enabled(false).unwrap();
    assert!(!prefs.sound_enabled);
    assert_eq!(alice.preferences(), prefs);
}
