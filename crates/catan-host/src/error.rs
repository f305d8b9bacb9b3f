//! Errors surfaced by the host layer.

use catan_core::{GameError, GameId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("Game {0} not found")]
    GameNotFound(GameId),

    #[error("Snapshot store failure: {0}")]
    Store(#[from] std::io::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl HostError {
    /// Stable code reported to clients
    pub fn code(&self) -> &'static str {
        match self {
            HostError::Game(err) => err.code(),
            HostError::GameNotFound(_) => "GAME_NOT_FOUND",
            HostError::Store(_) => "STORE_FAILURE",
            HostError::InvalidRequest(_) => "INVALID_REQUEST",
            HostError::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}
