//! # parley-store
//!
//! The authoritative store behind the parley chat client: users, rooms,
//! messages, and ban records.
//!
//! The crate exposes two layers. [`Database`] is a synchronous handle that
//! wraps a `rusqlite::Connection` and provides typed CRUD helpers for every
//! domain model. [`StorageGateway`] is the narrow async interface the client
//! core programs against; [`SqliteGateway`] adapts a [`Database`] to it.

pub mod bans;
pub mod database;
pub mod gateway;
pub mod messages;
pub mod migrations;
pub mod models;
pub mod rooms;
pub mod users;

mod error;

pub use database::Database;
pub use error::{Result, StoreError};
pub use gateway::{SqliteGateway, StorageGateway};
pub use models::*;
