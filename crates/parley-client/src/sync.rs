//! The reconciliation loop.
//!
//! Two interval-driven poll tasks keep the cached view eventually
//! consistent with the store. The lobby poll (4s) replaces the room list
//! wholesale while the session sits in the lobby; the active poll (2s)
//! merges the active conversation's messages and, in room mode, watches the
//! room record for deletion and for the current user's removal from the
//! member set — that is where kick/ban enforcement becomes visible to the
//! affected client.
//!
//! A failed tick is logged and skipped; the loop never stops on error. A
//! tick may race an in-flight fetch from a cancelled task; last write wins.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use parley_shared::constants::{ACTIVE_POLL_INTERVAL_MS, LOBBY_POLL_INTERVAL_MS};
use parley_shared::RoomId;

use crate::error::Result;
use crate::events::{emit, SessionEvent};
use crate::session::Session;
use crate::state::Mode;

/// Handles of the two poll tasks. Replacing a handle aborts its
/// predecessor; in-flight gateway calls are not chased down.
#[derive(Default)]
pub(crate) struct PollHandles {
    lobby: Option<JoinHandle<()>>,
    active: Option<JoinHandle<()>>,
}

impl Session {
    // ------------------------------------------------------------------
    // Task lifecycle
    // ------------------------------------------------------------------

    /// Switch to lobby mode: stop the active poll, start the lobby poll.
    pub(crate) fn enter_lobby(self: &Arc<Self>) {
        {
            let mut state = self.state();
            state.mode = Mode::Lobby;
            state.active_conversation = None;
            state.active_dm_user = None;
            state.viewed_profile = None;
            state.messages.clear();
            state.active_room_users.clear();
        }
        self.stop_active_poll();
        self.start_lobby_poll();
    }

    pub(crate) fn start_lobby_poll(self: &Arc<Self>) {
        if !self.spawn_polls {
            return;
        }

        let weak = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_millis(LOBBY_POLL_INTERVAL_MS));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(session) = weak.upgrade() else { break };
                if let Err(e) = session.lobby_tick().await {
                    warn!(error = %e, "lobby poll tick failed");
                }
            }
        });

        self.replace_lobby_handle(Some(handle));
    }

    pub(crate) fn start_active_poll(self: &Arc<Self>) {
        if !self.spawn_polls {
            return;
        }

        let weak = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_millis(ACTIVE_POLL_INTERVAL_MS));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(session) = weak.upgrade() else { break };
                match session.active_tick().await {
                    // Forced exit: the session is back in the lobby and
                    // this task's work is over.
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(e) => warn!(error = %e, "active poll tick failed"),
                }
            }
        });

        self.replace_active_handle(Some(handle));
    }

    pub(crate) fn stop_lobby_poll(&self) {
        self.replace_lobby_handle(None);
    }

    pub(crate) fn stop_active_poll(&self) {
        self.replace_active_handle(None);
    }

    fn replace_lobby_handle(&self, handle: Option<JoinHandle<()>>) {
        let mut polls = self
            .polls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(old) = std::mem::replace(&mut polls.lobby, handle) {
            old.abort();
        }
    }

    fn replace_active_handle(&self, handle: Option<JoinHandle<()>>) {
        let mut polls = self
            .polls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(old) = std::mem::replace(&mut polls.active, handle) {
            old.abort();
        }
    }

    // ------------------------------------------------------------------
    // Ticks
    // ------------------------------------------------------------------

    /// One lobby tick: fetch all rooms and replace the cached list
    /// wholesale. Stale entries vanish silently.
    pub async fn lobby_tick(&self) -> Result<()> {
        let rooms = self.gateway.list_rooms().await?;
        debug!(count = rooms.len(), "lobby poll refreshed room list");
        self.state().rooms = rooms;
        Ok(())
    }

    /// One active tick. Returns `true` when a consistency condition forced
    /// the session back to the lobby.
    pub async fn active_tick(self: &Arc<Self>) -> Result<bool> {
        let (mode, conversation, me) = {
            let state = self.state();
            (
                state.mode,
                state.active_conversation.clone(),
                state.current_user.clone(),
            )
        };

        let (Some(conversation), Some(me)) = (conversation, me) else {
            return Ok(false);
        };
        if mode != Mode::Room && mode != Mode::Dm {
            return Ok(false);
        }

        let polled = self.gateway.list_messages(&conversation).await?;
        self.state().merge_polled_messages(&conversation, polled);

        if mode != Mode::Room {
            return Ok(false);
        }

        // Room mode: watch the authoritative room record.
        let room_id = RoomId::new(conversation.as_str());
        let Some(room) = self.gateway.get_room(&room_id).await? else {
            warn!(room = %room_id, "viewed room no longer exists");
            emit(
                &self.events,
                SessionEvent::RoomDeleted {
                    room_id: room_id.to_string(),
                },
            );
            self.enter_lobby();
            return Ok(true);
        };

        if !room.users.contains(&me.id) {
            warn!(room = %room_id, user = %me.id, "user removed from viewed room");
            emit(
                &self.events,
                SessionEvent::RemovedFromRoom {
                    room_id: room_id.to_string(),
                },
            );
            self.enter_lobby();
            return Ok(true);
        }

        let members = self.gateway.get_users_by_ids(&room.users).await?;
        let mut state = self.state();
        state.active_room_users = members;
        state.patch_room(room);
        Ok(false)
    }
}
