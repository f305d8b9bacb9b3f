//! Catan Host - runs catan-core games behind a snapshot store
//!
//! This crate provides:
//! - Per-game serialization of commands (lock, load, apply, save)
//! - Snapshot stores in memory or as JSON files
//! - Environment configuration and the JSON-lines request protocol

pub mod config;
pub mod error;
pub mod host;
pub mod protocol;
pub mod store;

pub use config::HostConfig;
pub use error::HostError;
pub use host::{CreatedGame, GameHost};
pub use protocol::{handle_line, handle_request, DeliveredEvent, HostRequest, HostResponse};
pub use store::{FileStore, MemoryStore, SnapshotStore};
