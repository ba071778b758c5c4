//! Session events, the UI-facing signal surface.
//!
//! Events carry conditions the UI must react to outside the normal
//! request/response flow of session actions, such as a forced exit detected
//! by the reconciliation loop.

use serde::Serialize;
use tokio::sync::mpsc;

/// Signals emitted by the session.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum SessionEvent {
    /// The room being viewed no longer exists; the session has been forced
    /// back to the lobby.
    RoomDeleted { room_id: String },

    /// The current user is no longer in the viewed room's member set
    /// (kicked or banned); the session has been forced back to the lobby.
    RemovedFromRoom { room_id: String },

    /// A join attempt was rejected because of a sticky ban.
    BannedFromRoom { room_id: String },

    /// Notifications were just enabled; the embedder should request
    /// platform notification permission if not already granted.
    NotificationPermissionRequested,
}

/// Send an event to the UI, logging instead of failing when the receiver
/// is gone or saturated.
pub(crate) fn emit(tx: &mpsc::Sender<SessionEvent>, event: SessionEvent) {
    if let Err(e) = tx.try_send(event) {
        tracing::warn!(error = %e, "failed to emit session event");
    }
}
