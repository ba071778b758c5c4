//! The in-band command interpreter.
//!
//! Input starting with `/` is parsed into a [`ChatCommand`] and executed
//! against the session. Commands differ in consistency: some only touch
//! local state (`/clear`, error notices), some write through to the store
//! with a local echo (`/me`, `/roll`, `/ai`), and `/kick` delegates to the
//! moderation path.

use std::sync::Arc;

use rand::Rng;
use tracing::warn;

use parley_shared::constants::{AI_SENDER_ID, AI_SENDER_NAME, COMMAND_PREFIX, PM_MARKER};
use parley_shared::{ConversationId, MessageKind};

use crate::error::{ClientError, Result};
use crate::session::Session;

/// A recognized slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Join,
    Clear,
    Msg { target: String, text: String },
    Kick { target: String },
    Me { action: String },
    Roll,
    Ai { prompt: String },
    /// A known command with malformed arguments; carries its usage line.
    Invalid { usage: &'static str },
    Unknown,
}

impl ChatCommand {
    /// Parse a raw input line. Returns `None` when the line does not start
    /// with the command prefix and should be sent as an ordinary message.
    pub fn parse(input: &str) -> Option<Self> {
        let rest = input.strip_prefix(COMMAND_PREFIX)?;
        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or("").to_ascii_lowercase();
        let args: Vec<&str> = parts.collect();

        let command = match name.as_str() {
            "join" => Self::Join,
            "clear" => Self::Clear,
            "msg" => {
                if args.len() < 2 {
                    Self::Invalid {
                        usage: "Usage: /msg <username> <text>",
                    }
                } else {
                    Self::Msg {
                        target: args[0].to_string(),
                        text: args[1..].join(" "),
                    }
                }
            }
            "kick" => match args.first() {
                Some(target) => Self::Kick {
                    target: target.to_string(),
                },
                None => Self::Invalid {
                    usage: "Usage: /kick <username>",
                },
            },
            "me" => Self::Me {
                action: args.join(" "),
            },
            "roll" => Self::Roll,
            "ai" => {
                let prompt = args.join(" ");
                if prompt.is_empty() {
                    Self::Invalid {
                        usage: "Usage: /ai <prompt>",
                    }
                } else {
                    Self::Ai { prompt }
                }
            }
            _ => Self::Unknown,
        };

        Some(command)
    }
}

impl Session {
    /// Execute a parsed command against the active conversation.
    ///
    /// Failures never propagate to the caller: validation, lookup, and
    /// authorization problems become local CMD_RESPONSE notices, transport
    /// failures are logged and swallowed.
    pub(crate) async fn run_command(
        self: &Arc<Self>,
        command: ChatCommand,
        conversation: &ConversationId,
    ) {
        match self.dispatch_command(command, conversation).await {
            Ok(Some(notice)) => self.local_notice(conversation, notice),
            Ok(None) => {}
            Err(ClientError::Transport(e)) => {
                warn!(error = %e, "command failed against the store");
            }
            Err(e) => self.local_notice(conversation, e.to_string()),
        }
    }

    /// Run one command; `Ok(Some(text))` is a local-only notice to append.
    async fn dispatch_command(
        self: &Arc<Self>,
        command: ChatCommand,
        conversation: &ConversationId,
    ) -> Result<Option<String>> {
        match command {
            ChatCommand::Join => Ok(Some("Use the lobby to join rooms.".to_string())),

            ChatCommand::Clear => {
                // Cutoff from the stamp clock, so it sorts after every
                // message already issued locally.
                let cutoff = self.next_stamp();
                let notice = self.system_message(conversation, "Chat history cleared locally.");
                let mut state = self.state();
                state.clear_cutoffs.insert(conversation.clone(), cutoff);
                state.messages = vec![notice];
                Ok(None)
            }

            ChatCommand::Msg { target, text } => {
                let me = self.require_user()?;
                let Some(target_user) = self.resolve_username(&target).await? else {
                    return Ok(Some(format!("User {target} not found.")));
                };

                let dm_id = ConversationId::direct(&me.id, &target_user.id);
                let message =
                    self.own_message(&dm_id, format!("{PM_MARKER}{text}"), MessageKind::Text)?;
                self.gateway.create_message(&message).await?;
                Ok(Some(format!("Sent DM to {}", target_user.username)))
            }

            ChatCommand::Kick { target } => self.kick_by_name(&target, conversation).await,

            ChatCommand::Me { action } => {
                if action.is_empty() {
                    return Ok(None);
                }
                let me = self.require_user()?;
                let message = self.own_message(
                    conversation,
                    format!("{} {action}", me.username),
                    MessageKind::Action,
                )?;
                self.state().messages.push(message.clone());
                self.gateway.create_message(&message).await?;
                Ok(None)
            }

            ChatCommand::Roll => {
                let roll = rand::thread_rng().gen_range(1..=100);
                let message = self.own_message(
                    conversation,
                    format!("\u{1F3B2} rolled a {roll}"),
                    MessageKind::Text,
                )?;
                self.state().messages.push(message.clone());
                self.gateway.create_message(&message).await?;
                Ok(None)
            }

            ChatCommand::Ai { prompt } => {
                // Transient placeholder while the provider thinks.
                let placeholder = self.synthetic_message(
                    conversation,
                    AI_SENDER_ID,
                    AI_SENDER_NAME,
                    "Thinking...",
                    MessageKind::System,
                );
                let placeholder_id = placeholder.id.clone();
                self.state().messages.push(placeholder);

                let response = self.ai.complete(&prompt).await;

                let reply = {
                    let mut state = self.state();
                    state.messages.retain(|m| m.id != placeholder_id);
                    drop(state);
                    self.synthetic_message(
                        conversation,
                        AI_SENDER_ID,
                        AI_SENDER_NAME,
                        response,
                        MessageKind::Text,
                    )
                };
                self.state().messages.push(reply.clone());
                self.gateway.create_message(&reply).await?;
                Ok(None)
            }

            ChatCommand::Invalid { usage } => Ok(Some(usage.to_string())),

            ChatCommand::Unknown => Ok(Some("Unknown command.".to_string())),
        }
    }

    /// The `/kick <username>` path: admin check, name resolution,
    /// membership check, then the moderation kick.
    async fn kick_by_name(
        self: &Arc<Self>,
        target: &str,
        conversation: &ConversationId,
    ) -> Result<Option<String>> {
        let me = self.require_user()?;

        let room = self
            .state()
            .rooms
            .iter()
            .find(|r| r.id.as_str() == conversation.as_str())
            .cloned();
        let Some(room) = room else {
            return Ok(Some("Only admins can kick.".to_string()));
        };
        if room.admin_id != me.id {
            return Ok(Some("Only admins can kick.".to_string()));
        }

        let Some(target_user) = self.resolve_username(target).await? else {
            return Ok(Some("User not found.".to_string()));
        };
        if !room.users.contains(&target_user.id) {
            return Ok(Some("User not in this room.".to_string()));
        }

        self.kick_user(&target_user.id).await?;
        Ok(None)
    }
}
