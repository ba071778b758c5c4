//! Session actions, grouped by domain.
//!
//! Each sub-module contributes an `impl Session` block; the public methods
//! together form the action surface an embedder drives.

pub mod auth;
pub mod messaging;
pub mod moderation;
pub mod profile;
pub mod rooms;
pub mod settings;
