//! Catan Core - authoritative rules engine for a Settlers of Catan variant
//!
//! This crate provides the core game logic, including:
//! - Board generation on a 19-hex island with ports
//! - Game state machine from lobby through setup, turns and victory
//! - Building, trading, robber and development card rules
//! - Longest road and largest army tracking
//! - Versioned JSON snapshots
//!
//! # Architecture
//!
//! The engine is a pure library: no I/O, no clocks, and every random choice comes
//! from an RNG passed in by the caller. A caller drives a game through
//! [`GameState::apply`], which either commits an action completely or rejects it
//! with a [`GameError`] and leaves the state as it was.
//!
//! # Modules
//!
//! - [`hex`]: Axial hex coordinates and the integer lattice for corners
//! - [`board`]: Board topology, tiles, ports and placement queries
//! - [`rules`]: Costs, limits, victory points and resource hands
//! - [`player`]: Player state and development cards
//! - [`longest_road`]: Longest simple path per player
//! - [`game`]: Game state machine
//! - [`robber`], [`trading`], [`devcards`]: Subsystems on top of the state machine
//! - [`actions`]: Commands, events and the transactional entry point
//! - [`snapshot`]: Persistence format

pub mod actions;
pub mod board;
pub mod devcards;
pub mod error;
pub mod game;
pub mod hex;
pub mod longest_road;
pub mod player;
pub mod robber;
pub mod rules;
pub mod snapshot;
pub mod trading;

// Re-export commonly used types
pub use actions::{Audience, GameAction, GameEvent, Score, Structure};
pub use board::{
    Board, BoardLayout, BuildingKind, EdgeId, PlayerId, PortKind, Resource, Terrain, VertexId,
};
pub use error::{DevCardError, GameError, RobberError};
pub use game::{
    generate_join_code, GameId, GamePhase, GameState, GameStatus, RobberState, RobberStep,
    SetupState, SetupStep, TurnPhase, TurnStep,
};
pub use hex::HexCoord;
pub use player::{DevelopmentCard, PlayerColor, PlayerState};
pub use rules::ResourceHand;
pub use snapshot::{Snapshot, SNAPSHOT_VERSION};
pub use trading::{TradeId, TradeOffer, TradeStatus};
