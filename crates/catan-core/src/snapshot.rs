//! Versioned JSON snapshots of a game.
//!
//! A snapshot carries everything needed to resume a game exactly, including the
//! board, hands, the remaining deck order and any pending robber or trade state.

use crate::error::GameError;
use crate::game::GameState;
use serde::{Deserialize, Serialize};

/// Current snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub game: GameState,
}

/// Only the version, read before the full document
#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

impl Snapshot {
    pub fn new(game: GameState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            game,
        }
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        serde_json::to_string(self).map_err(|e| GameError::Snapshot(e.to_string()))
    }

    /// Parse a snapshot, rejecting other format versions before decoding the game
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let probe: VersionProbe =
            serde_json::from_str(json).map_err(|e| GameError::Snapshot(e.to_string()))?;
        if probe.version != SNAPSHOT_VERSION {
            return Err(GameError::SnapshotVersion {
                found: probe.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        serde_json::from_str(json).map_err(|e| GameError::Snapshot(e.to_string()))
    }

    pub fn into_game(self) -> GameState {
        self.game
    }
}
