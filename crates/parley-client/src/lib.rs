//! The Parley client core.
//!
//! This crate holds everything between the UI and the storage gateway: the
//! session controller and its state, the polling reconciliation loop, the
//! slash-command interpreter, moderation, preferences, and the AI provider
//! seam. Embedders construct a [`Session`] over a [`StorageGateway`]
//! implementation, drive it through its action methods, render
//! [`Session::snapshot`], and react to the [`SessionEvent`] stream.

pub mod ai;
pub mod commands;
pub mod error;
pub mod events;
pub mod interpreter;
pub mod prefs;
pub mod session;
pub mod state;
pub mod sync;

pub use ai::{AiProvider, HttpAiProvider, UnconfiguredAi};
pub use error::{ClientError, Result};
pub use events::SessionEvent;
pub use interpreter::ChatCommand;
pub use prefs::Preferences;
pub use session::{Session, SessionConfig};
pub use state::{Mode, SessionState};

pub use parley_store::StorageGateway;

use tracing_subscriber::{fmt, EnvFilter};

/// Install the tracing subscriber for an embedding application.
///
/// `RUST_LOG` wins when set; the fallback keeps the client crates chatty
/// and everything else at warn.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("parley_client=debug,parley_store=info,parley_shared=info,warn")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
