//! Room lifecycle: create, join, leave, edit, delete.

use std::sync::Arc;

use tracing::{info, warn};

use parley_shared::constants::MAX_ROOMS_PER_USER;
use parley_shared::{ConversationId, RoomId};
use parley_store::Room;

use crate::error::{ClientError, Result};
use crate::events::{emit, SessionEvent};
use crate::session::Session;
use crate::state::Mode;

impl Session {
    /// Create a room and join it as admin.
    ///
    /// The room-count cap is checked against a fresh room list before any
    /// remote create is issued.
    pub async fn create_room(self: &Arc<Self>, name: &str) -> Result<Room> {
        let me = self.require_user()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::Validation(
                "Room name is required.".to_string(),
            ));
        }

        let current_rooms = self.gateway.list_rooms().await?;
        let administered = current_rooms
            .iter()
            .filter(|r| r.admin_id == me.id)
            .count();
        if administered >= MAX_ROOMS_PER_USER {
            return Err(ClientError::Validation(format!(
                "You can only create {MAX_ROOMS_PER_USER} rooms."
            )));
        }

        // The stamp clock keeps ids distinct for back-to-back creates
        // within one millisecond.
        let stamp = self.next_stamp();
        let room = Room {
            id: RoomId::from_timestamp(stamp),
            name: name.to_string(),
            topic: None,
            admin_id: me.id.clone(),
            users: vec![me.id.clone()],
            is_private: false,
            created_at: stamp,
        };

        self.gateway.create_room(&room).await?;
        info!(room = %room.id, name, "created room");

        // Optimistic prepend; the next lobby poll confirms it.
        self.state().rooms.insert(0, room.clone());

        self.join_room(&room.id).await?;
        Ok(room)
    }

    /// Join a room: ban check first, then membership, the entered notice,
    /// and the switch into room mode.
    pub async fn join_room(self: &Arc<Self>, room_id: &RoomId) -> Result<()> {
        let me = self.require_user()?;

        if self.gateway.is_banned(room_id, &me.id).await? {
            emit(
                &self.events,
                SessionEvent::BannedFromRoom {
                    room_id: room_id.to_string(),
                },
            );
            return Err(ClientError::Authorization(
                "You are banned from this room.".to_string(),
            ));
        }

        {
            let mut state = self.state();
            state.mode = Mode::Room;
            state.active_conversation = Some(ConversationId::room(room_id));
            state.active_dm_user = None;
            state.messages.clear();
            state.active_room_users.clear();
        }
        self.stop_lobby_poll();
        self.start_active_poll();

        let conversation = ConversationId::room(room_id);
        let entered = self.system_message(
            &conversation,
            format!("{} has entered the room.", me.username),
        );

        self.gateway.add_room_member(room_id, &me.id).await?;
        self.gateway.create_message(&entered).await?;

        info!(room = %room_id, user = %me.id, "joined room");
        Ok(())
    }

    /// Leave the current context and return to the lobby.
    ///
    /// Only a group room gets the departure notice and the membership
    /// removal; from a DM or profile view this just navigates back.
    pub async fn leave(self: &Arc<Self>) {
        let (me, mode, conversation) = {
            let state = self.state();
            (
                state.current_user.clone(),
                state.mode,
                state.active_conversation.clone(),
            )
        };

        if let (Some(me), Mode::Room, Some(conversation)) = (me, mode, conversation) {
            let room_id = RoomId::new(conversation.as_str());
            let left = self.system_message(
                &conversation,
                format!("{} has left the room.", me.username),
            );

            if let Err(e) = self.gateway.create_message(&left).await {
                warn!(error = %e, "failed to persist departure notice");
            }
            if let Err(e) = self.gateway.remove_room_member(&room_id, &me.id).await {
                warn!(error = %e, "failed to remove member on leave");
            }
            info!(room = %room_id, user = %me.id, "left room");
        }

        self.enter_lobby();
    }

    /// Rename a room and set its topic. Admin only.
    pub async fn update_room_details(&self, name: &str, topic: Option<&str>) -> Result<()> {
        let me = self.require_user()?;
        let conversation = self.require_conversation()?;
        let room_id = RoomId::new(conversation.as_str());

        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::Validation(
                "Room name is required.".to_string(),
            ));
        }

        let room = self
            .state()
            .rooms
            .iter()
            .find(|r| r.id == room_id)
            .cloned();
        let Some(room) = room else {
            return Err(ClientError::NotFound("Room not found.".to_string()));
        };
        if room.admin_id != me.id {
            return Err(ClientError::Authorization(
                "Only the admin can edit this room.".to_string(),
            ));
        }

        self.gateway
            .update_room_details(&room_id, name, topic)
            .await?;

        let patched = Room {
            name: name.to_string(),
            topic: topic.map(str::to_string),
            ..room
        };
        self.state().patch_room(patched);
        Ok(())
    }

    /// Delete a room. Admin only; clients inside observe the deletion on
    /// their next poll and are forced back to the lobby.
    pub async fn delete_room(&self, room_id: &RoomId) -> Result<()> {
        let me = self.require_user()?;

        let admin_id = self
            .state()
            .rooms
            .iter()
            .find(|r| r.id == *room_id)
            .map(|r| r.admin_id.clone());
        if admin_id.as_ref() != Some(&me.id) {
            return Err(ClientError::Authorization(
                "Only the admin can delete this room.".to_string(),
            ));
        }

        self.gateway.delete_room(room_id).await?;
        info!(room = %room_id, "deleted room");

        self.state().rooms.retain(|r| r.id != *room_id);
        Ok(())
    }
}
