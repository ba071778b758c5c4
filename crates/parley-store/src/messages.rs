//! CRUD operations for [`Message`] records.

use rusqlite::params;

use parley_shared::constants::MESSAGE_FETCH_LIMIT;
use parley_shared::{ConversationId, MessageId, MessageKind, UserId};

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::Message;

impl Database {
    /// Insert a new message.
    pub fn create_message(&self, message: &Message) -> Result<()> {
        self.conn().execute(
            "INSERT INTO messages (id, conversation_id, sender_id, sender_name,
                                   content, timestamp, kind, is_read)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                message.id.as_str(),
                message.conversation_id.as_str(),
                message.sender_id.as_str(),
                message.sender_name,
                message.content,
                message.timestamp,
                message.kind.as_str(),
                message.read,
            ],
        )?;
        Ok(())
    }

    /// List messages for a conversation in chronological order, bounded by
    /// the fetch limit.
    pub fn list_messages(&self, conversation: &ConversationId) -> Result<Vec<Message>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, conversation_id, sender_id, sender_name,
                    content, timestamp, kind, is_read
             FROM messages
             WHERE conversation_id = ?1
             ORDER BY timestamp ASC
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(
            params![conversation.as_str(), MESSAGE_FETCH_LIMIT],
            row_to_message,
        )?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }

    /// Mark every message in a conversation that was not sent by `reader`
    /// as read.
    pub fn mark_messages_read(
        &self,
        conversation: &ConversationId,
        reader: &UserId,
    ) -> Result<()> {
        self.conn().execute(
            "UPDATE messages SET is_read = 1
             WHERE conversation_id = ?1 AND sender_id != ?2 AND is_read = 0",
            params![conversation.as_str(), reader.as_str()],
        )?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`Message`].
fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let id: String = row.get(0)?;
    let conversation_id: String = row.get(1)?;
    let sender_id: String = row.get(2)?;
    let sender_name: String = row.get(3)?;
    let content: String = row.get(4)?;
    let timestamp: i64 = row.get(5)?;
    let kind_str: String = row.get(6)?;
    let read: bool = row.get(7)?;

    let kind = MessageKind::parse(&kind_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            rusqlite::types::Type::Text,
            format!("unknown message kind: {kind_str}").into(),
        )
    })?;

    Ok(Message {
        id: MessageId::new(id),
        conversation_id: ConversationId(conversation_id),
        sender_id: UserId::new(sender_id),
        sender_name,
        content,
        timestamp,
        kind,
        read,
    })
}
