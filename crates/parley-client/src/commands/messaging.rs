//! Sending messages and direct-message conversations.

use std::sync::Arc;

use tracing::{info, warn};

use parley_shared::{ConversationId, MessageKind, UserId};

use crate::error::{ClientError, Result};
use crate::interpreter::ChatCommand;
use crate::session::Session;
use crate::state::Mode;

impl Session {
    /// Send a raw input line to the active conversation.
    ///
    /// Slash-prefixed input goes through the command interpreter. Anything
    /// else is wrapped as a TEXT message, appended optimistically, then
    /// persisted; a failed persist is logged and the optimistic append is
    /// not rolled back.
    pub async fn send_message(self: &Arc<Self>, content: &str) -> Result<()> {
        let conversation = self.require_conversation()?;

        if let Some(command) = ChatCommand::parse(content) {
            self.run_command(command, &conversation).await;
            return Ok(());
        }

        let message = self.own_message(&conversation, content, MessageKind::Text)?;
        self.state().messages.push(message.clone());

        if let Err(e) = self.gateway.create_message(&message).await {
            warn!(error = %e, "failed to persist message");
        }
        Ok(())
    }

    /// Open the DM conversation with another user and mark their messages
    /// as read.
    pub async fn open_dm(self: &Arc<Self>, other_id: &UserId) -> Result<()> {
        let me = self.require_user()?;

        let Some(other) = self.resolve_user_id(other_id).await? else {
            return Err(ClientError::NotFound("User not found.".to_string()));
        };

        let conversation = ConversationId::direct(&me.id, &other.id);
        {
            let mut state = self.state();
            state.mode = Mode::Dm;
            state.active_conversation = Some(conversation.clone());
            state.active_dm_user = Some(other.clone());
            state.messages.clear();
            state.active_room_users.clear();
        }
        self.stop_lobby_poll();
        self.start_active_poll();

        info!(conversation = %conversation, "opened DM");
        self.mark_read(&conversation).await
    }

    /// Mark everything in a conversation not sent by the current user as
    /// read, remotely and in the cached copy.
    pub async fn mark_read(&self, conversation: &ConversationId) -> Result<()> {
        let me = self.require_user()?;

        self.gateway.mark_messages_read(conversation, &me.id).await?;

        // Optimistic local overlay; the next poll confirms it.
        let mut state = self.state();
        for message in &mut state.messages {
            if message.conversation_id == *conversation && message.sender_id != me.id {
                message.read = true;
            }
        }
        Ok(())
    }
}
