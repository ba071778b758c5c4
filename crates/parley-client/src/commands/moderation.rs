//! Room moderation: kick and ban.
//!
//! Per (room, user) the states are member, removed, and banned. Kick
//! removes membership and allows rejoin; ban additionally writes a sticky
//! ban record that the join path checks forever after. Both are
//! admin-only, enforced here before any gateway call. Neither flow is
//! atomic: a failure between the membership write and the announcement
//! leaves partial state, tolerated under eventual consistency.

use tracing::info;

use parley_shared::{RoomId, UserId};

use crate::error::{ClientError, Result};
use crate::session::Session;

impl Session {
    /// Remove a user from the active room's member set. The target may
    /// rejoin; no ban record is written.
    pub async fn kick_user(&self, target: &UserId) -> Result<()> {
        let (room_id, target_user) = self.authorize_moderation(target).await?;

        self.gateway.remove_room_member(&room_id, target).await?;

        let announcement = self.system_message(
            &parley_shared::ConversationId::room(&room_id),
            format!("{} has been kicked by Admin.", target_user.username),
        );
        self.gateway.create_message(&announcement).await?;

        info!(room = %room_id, target = %target, "kicked user");
        Ok(())
    }

    /// Ban a user from the active room: sticky ban record plus removal
    /// from the member set. There is no unban.
    pub async fn ban_user(&self, target: &UserId) -> Result<()> {
        let (room_id, target_user) = self.authorize_moderation(target).await?;

        self.gateway.create_ban(&room_id, target).await?;
        self.gateway.remove_room_member(&room_id, target).await?;

        let announcement = self.system_message(
            &parley_shared::ConversationId::room(&room_id),
            format!("{} has been banned by Admin.", target_user.username),
        );
        self.gateway.create_message(&announcement).await?;

        info!(room = %room_id, target = %target, "banned user");
        Ok(())
    }

    /// Common moderation preamble: the caller must administer the active
    /// room and the target must exist.
    async fn authorize_moderation(
        &self,
        target: &UserId,
    ) -> Result<(RoomId, parley_store::User)> {
        let me = self.require_user()?;
        let conversation = self.require_conversation()?;
        let room_id = RoomId::new(conversation.as_str());

        let admin_id = self
            .state()
            .rooms
            .iter()
            .find(|r| r.id == room_id)
            .map(|r| r.admin_id.clone());
        if admin_id.as_ref() != Some(&me.id) {
            return Err(ClientError::Authorization(
                "Only the room admin can do that.".to_string(),
            ));
        }

        let Some(target_user) = self.resolve_user_id(target).await? else {
            return Err(ClientError::NotFound("User not found.".to_string()));
        };

        Ok((room_id, target_user))
    }
}
