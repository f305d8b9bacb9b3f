//! Typed rule violations returned by every engine entry point.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when applying commands
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Action not allowed in the current phase")]
    WrongPhase,

    #[error("Not your turn")]
    NotYourTurn,

    #[error("No such vertex")]
    InvalidVertex,

    #[error("No such edge")]
    InvalidEdge,

    #[error("No such hex")]
    InvalidHex,

    #[error("Dice values must be between 1 and 6")]
    InvalidDice,

    #[error("Vertex is already occupied")]
    VertexOccupied,

    #[error("Edge is already occupied")]
    EdgeOccupied,

    #[error("Too close to another building")]
    DistanceRuleViolation,

    #[error("Must connect to your own road or building")]
    MustConnectToOwned,

    #[error("Not enough resources")]
    InsufficientResources,

    #[error("Only your own settlement can be upgraded")]
    CannotUpgrade,

    #[error("No settlements left")]
    MaxSettlementsReached,

    #[error("No cities left")]
    MaxCitiesReached,

    #[error("No roads left")]
    MaxRoadsReached,

    #[error("Player not found")]
    PlayerNotFound,

    #[error("Only the host can do that")]
    NotHost,

    #[error("Not every player is ready")]
    PlayersNotReady,

    #[error("Not enough players")]
    NotEnoughPlayers,

    #[error("Game is full")]
    GameFull,

    #[error("Player already in game")]
    DuplicatePlayer,

    #[error("Player cannot take part in this trade")]
    InvalidTradeParticipant,

    #[error("Trade not found")]
    TradeNotFound,

    #[error("Invalid trade offer")]
    InvalidTradeOffer,

    #[error(transparent)]
    Robber(#[from] RobberError),

    #[error(transparent)]
    DevCard(#[from] DevCardError),

    #[error("Game is over")]
    GameOver,

    #[error("Unsupported snapshot version {found} (expected {expected})")]
    SnapshotVersion { found: u32, expected: u32 },

    #[error("Malformed snapshot: {0}")]
    Snapshot(String),
}

/// Robber phase violations
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RobberError {
    #[error("Another player must resolve the robber")]
    WrongPendingPlayer,

    #[error("No robber move expected")]
    NoMoveExpected,

    #[error("No steal expected")]
    NoStealExpected,

    #[error("Robber must move to a different hex")]
    SameHex,

    #[error("Victim has no building next to the robber")]
    VictimNotAdjacent,

    #[error("Victim has nothing to steal")]
    NothingToSteal,

    #[error("Players still have to discard")]
    DiscardsPending,

    #[error("No discard owed")]
    NoDiscardOwed,

    #[error("Must discard exactly {expected} cards, got {actual}")]
    WrongDiscardCount { expected: u32, actual: u32 },
}

/// Development card violations
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DevCardError {
    #[error("You don't have that card")]
    NotOwned,

    #[error("Card was bought this turn")]
    PurchasedThisTurn,

    #[error("No development cards left in deck")]
    DeckEmpty,

    #[error("Already played a development card this turn")]
    AlreadyPlayedThisTurn,

    #[error("Monopoly needs a target resource")]
    MissingTargetResource,

    #[error("Year of plenty needs exactly {expected} resources, got {actual}")]
    WrongResourceCount { expected: usize, actual: usize },
}

impl GameError {
    /// Stable code for the calling layer
    pub fn code(&self) -> &'static str {
        match self {
            GameError::WrongPhase => "WRONG_PHASE",
            GameError::NotYourTurn => "NOT_YOUR_TURN",
            GameError::InvalidVertex => "INVALID_VERTEX",
            GameError::InvalidEdge => "INVALID_EDGE",
            GameError::InvalidHex => "INVALID_HEX",
            GameError::InvalidDice => "INVALID_DICE",
            GameError::VertexOccupied => "VERTEX_OCCUPIED",
            GameError::EdgeOccupied => "EDGE_OCCUPIED",
            GameError::DistanceRuleViolation => "DISTANCE_RULE",
            GameError::MustConnectToOwned => "MUST_CONNECT",
            GameError::InsufficientResources => "INSUFFICIENT_RESOURCES",
            GameError::CannotUpgrade => "CANNOT_UPGRADE",
            GameError::MaxSettlementsReached => "MAX_SETTLEMENTS",
            GameError::MaxCitiesReached => "MAX_CITIES",
            GameError::MaxRoadsReached => "MAX_ROADS",
            GameError::PlayerNotFound => "PLAYER_NOT_FOUND",
            GameError::NotHost => "NOT_HOST",
            GameError::PlayersNotReady => "PLAYERS_NOT_READY",
            GameError::NotEnoughPlayers => "NOT_ENOUGH_PLAYERS",
            GameError::GameFull => "GAME_FULL",
            GameError::DuplicatePlayer => "DUPLICATE_PLAYER",
            GameError::InvalidTradeParticipant => "INVALID_TRADE_PARTICIPANT",
            GameError::TradeNotFound => "TRADE_NOT_FOUND",
            GameError::InvalidTradeOffer => "INVALID_TRADE_OFFER",
            GameError::Robber(_) => "ROBBER_PHASE",
            GameError::DevCard(_) => "DEV_CARD",
            GameError::GameOver => "GAME_OVER",
            GameError::SnapshotVersion { .. } | GameError::Snapshot(_) => "BAD_SNAPSHOT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_errors_convert() {
        let err: GameError = RobberError::SameHex.into();
        assert_eq!(err, GameError::Robber(RobberError::SameHex));
        assert_eq!(err.code(), "ROBBER_PHASE");
        assert_eq!(err.to_string(), "Robber must move to a different hex");
    }

    #[test]
    fn test_error_round_trips_through_json() {
        let err = GameError::DevCard(DevCardError::WrongResourceCount {
            expected: 2,
            actual: 1,
        });
        let json = serde_json::to_string(&err).unwrap();
        let back: GameError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
