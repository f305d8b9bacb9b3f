//! JSON-lines request and response messages for the host binary.

use crate::error::HostError;
use crate::host::GameHost;
use catan_core::{Audience, GameAction, GameEvent, GameId, PlayerId, Snapshot};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One request per input line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum HostRequest {
    /// Open a lobby hosted by `player`
    CreateGame { player: PlayerId, name: String },

    /// Apply a command on behalf of `player`
    Command {
        game: GameId,
        player: PlayerId,
        action: GameAction,
    },

    /// Fetch the latest snapshot
    Snapshot { game: GameId },
}

/// One response per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum HostResponse {
    GameCreated { game: GameId, code: String },

    Events { events: Vec<DeliveredEvent> },

    Snapshot { snapshot: Snapshot },

    Error { code: String, message: String },
}

/// An event with the players allowed to see it; `None` means everyone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveredEvent {
    pub event: GameEvent,
    pub visible_to: Option<Vec<PlayerId>>,
}

impl From<GameEvent> for DeliveredEvent {
    fn from(event: GameEvent) -> Self {
        let visible_to = match event.audience() {
            Audience::All => None,
            Audience::Only(players) => Some(players),
        };
        Self { event, visible_to }
    }
}

impl From<HostError> for HostResponse {
    fn from(err: HostError) -> Self {
        HostResponse::Error {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Run a request against the host, folding failures into an error response.
pub async fn handle_request(host: &GameHost, request: HostRequest) -> HostResponse {
    let result = match request {
        HostRequest::CreateGame { player, name } => host
            .create_game(player, name)
            .await
            .map(|created| HostResponse::GameCreated {
                game: created.game,
                code: created.code,
            }),
        HostRequest::Command {
            game,
            player,
            action,
        } => host
            .execute(game, player, action)
            .await
            .map(|events| HostResponse::Events {
                events: events.into_iter().map(DeliveredEvent::from).collect(),
            }),
        HostRequest::Snapshot { game } => host
            .snapshot(game)
            .await
            .map(|snapshot| HostResponse::Snapshot { snapshot }),
    };
    result.unwrap_or_else(HostResponse::from)
}

/// Parse and run one input line.
pub async fn handle_line(host: &GameHost, line: &str) -> HostResponse {
    match serde_json::from_str::<HostRequest>(line) {
        Ok(request) => handle_request(host, request).await,
        Err(e) => {
            warn!("Unparseable request: {}", e);
            HostError::InvalidRequest(e.to_string()).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catan_core::DevelopmentCard;
    use uuid::Uuid;

    #[test]
    fn test_request_wire_format() {
        let game = Uuid::new_v4();
        let player = Uuid::new_v4();
        let line = format!(
            r#"{{"type":"command","payload":{{"game":"{}","player":"{}","action":{{"type":"roll_dice"}}}}}}"#,
            game, player
        );
        let request: HostRequest = serde_json::from_str(&line).unwrap();
        assert!(matches!(
            request,
            HostRequest::Command { action: GameAction::RollDice, .. }
        ));
    }

    #[test]
    fn test_private_events_carry_audience() {
        let buyer = Uuid::new_v4();
        let delivered = DeliveredEvent::from(GameEvent::DevCardBought {
            player: buyer,
            card: DevelopmentCard::Knight,
        });
        assert_eq!(delivered.visible_to, Some(vec![buyer]));

        let public = DeliveredEvent::from(GameEvent::TurnChanged {
            player: buyer,
            turn: 3,
        });
        assert_eq!(public.visible_to, None, "turn changes are public");
    }

    #[test]
    fn test_error_response_shape() {
        let response = HostResponse::from(HostError::InvalidRequest("eof".to_string()));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["payload"]["code"], "INVALID_REQUEST");
    }
}
