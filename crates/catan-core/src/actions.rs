//! Game actions that players can take.
//!
//! This module defines every command the engine accepts, the events that result,
//! and `GameState::apply`, the single transactional entry point.

use crate::board::{EdgeId, PlayerId, Resource, VertexId};
use crate::error::GameError;
use crate::game::{GameState, TurnStep};
use crate::hex::HexCoord;
use crate::player::{DevelopmentCard, PlayerColor};
use crate::rules::ResourceHand;
use crate::trading::{TradeId, TradeOffer, TradeStatus};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// All possible actions a player can take
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameAction {
    // ==================== Lobby ====================
    /// Take a seat before the game starts
    Join { name: String },
    SetReady { ready: bool },
    SetConnected { connected: bool },
    /// Host only
    StartGame,

    // ==================== Setup Phase ====================
    PlaceSetupSettlement { vertex: VertexId },
    /// Must touch the settlement just placed
    PlaceSetupRoad { edge: EdgeId },

    // ==================== Turn Actions ====================
    RollDice,
    BuildStructure { structure: Structure },
    /// Switch between the trade and build steps
    SetTurnPhase { phase: TurnStep },
    EndTurn,

    // ==================== Trading ====================
    ProposeTrade {
        target: Option<PlayerId>,
        offered: ResourceHand,
        requested: ResourceHand,
    },
    RespondTrade { trade: TradeId, accept: bool },
    CancelTrade { trade: TradeId },
    BankTrade {
        offered: ResourceHand,
        requested: Resource,
    },

    // ==================== Robber ====================
    DiscardCards { cards: ResourceHand },
    /// Naming a victim steals from them in the same step
    MoveRobber {
        hex: HexCoord,
        victim: Option<PlayerId>,
    },
    StealResource { victim: PlayerId },

    // ==================== Development Cards ====================
    BuyDevCard,
    PlayDevCard {
        card: DevelopmentCard,
        /// Monopoly resource
        target: Option<Resource>,
        /// Year of plenty picks
        #[serde(default)]
        chosen: Vec<Resource>,
    },
}

/// Something to build during the trade or build step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Structure {
    Settlement { vertex: VertexId },
    City { vertex: VertexId },
    Road { edge: EdgeId },
}

impl GameAction {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            GameAction::Join { .. } => "join",
            GameAction::SetReady { .. } => "set_ready",
            GameAction::SetConnected { .. } => "set_connected",
            GameAction::StartGame => "start_game",
            GameAction::PlaceSetupSettlement { .. } => "place_setup_settlement",
            GameAction::PlaceSetupRoad { .. } => "place_setup_road",
            GameAction::RollDice => "roll_dice",
            GameAction::BuildStructure { .. } => "build_structure",
            GameAction::SetTurnPhase { .. } => "set_turn_phase",
            GameAction::EndTurn => "end_turn",
            GameAction::ProposeTrade { .. } => "propose_trade",
            GameAction::RespondTrade { .. } => "respond_trade",
            GameAction::CancelTrade { .. } => "cancel_trade",
            GameAction::BankTrade { .. } => "bank_trade",
            GameAction::DiscardCards { .. } => "discard_cards",
            GameAction::MoveRobber { .. } => "move_robber",
            GameAction::StealResource { .. } => "steal_resource",
            GameAction::BuyDevCard => "buy_dev_card",
            GameAction::PlayDevCard { .. } => "play_dev_card",
        }
    }
}

/// A player's score at the end of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub player: PlayerId,
    pub victory_points: u32,
}

/// Who may see an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    All,
    Only(Vec<PlayerId>),
}

impl Audience {
    pub fn includes(&self, player: PlayerId) -> bool {
        match self {
            Audience::All => true,
            Audience::Only(players) => players.contains(&player),
        }
    }
}

/// Events that occur as a result of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    PlayerJoined {
        player: PlayerId,
        name: String,
        color: PlayerColor,
    },
    PlayerReadyChanged { player: PlayerId, ready: bool },
    ConnectionChanged { player: PlayerId, connected: bool },
    GameStarted { first_player: PlayerId },

    /// A settlement was placed, in setup or built
    SettlementPlaced { player: PlayerId, vertex: VertexId },
    CityBuilt { player: PlayerId, vertex: VertexId },
    RoadPlaced {
        player: PlayerId,
        edge: EdgeId,
        /// Setup roads and road-building roads cost nothing
        free: bool,
    },
    /// Second setup settlement paid out
    SetupResourcesGranted {
        player: PlayerId,
        resources: ResourceHand,
    },
    SetupCompleted { first_player: PlayerId },

    DiceRolled {
        player: PlayerId,
        values: [u8; 2],
        total: u8,
        /// Production per player, empty on a seven
        gains: BTreeMap<PlayerId, ResourceHand>,
    },
    /// A seven was rolled
    RobberActivated {
        mover: PlayerId,
        discards: BTreeMap<PlayerId, u32>,
    },
    CardsDiscarded { player: PlayerId, cards: ResourceHand },
    RobberMoved {
        player: PlayerId,
        from: HexCoord,
        to: HexCoord,
        victim: Option<PlayerId>,
    },
    /// Only the two players involved learn the resource
    ResourceStolen {
        thief: PlayerId,
        victim: PlayerId,
        resource: Resource,
    },

    TurnPhaseChanged { player: PlayerId, phase: TurnStep },
    TurnChanged { player: PlayerId, turn: u32 },

    TradeProposed { offer: TradeOffer },
    TradeResolved {
        trade: TradeId,
        status: TradeStatus,
        responder: PlayerId,
    },
    BankTraded {
        player: PlayerId,
        gave: ResourceHand,
        received: Resource,
    },

    /// Only the buyer learns the card
    DevCardBought { player: PlayerId, card: DevelopmentCard },
    DevCardPlayed { player: PlayerId, card: DevelopmentCard },
    YearOfPlentyTaken {
        player: PlayerId,
        resources: ResourceHand,
    },
    MonopolyCollected {
        player: PlayerId,
        resource: Resource,
        amount: u32,
    },

    LongestRoadChanged {
        previous: Option<PlayerId>,
        holder: Option<PlayerId>,
        length: u32,
    },
    LargestArmyChanged {
        previous: Option<PlayerId>,
        holder: Option<PlayerId>,
        knights: u32,
    },

    GameOver { winner: PlayerId, scores: Vec<Score> },
}

impl GameEvent {
    pub fn audience(&self) -> Audience {
        match self {
            GameEvent::DevCardBought { player, .. } => Audience::Only(vec![*player]),
            GameEvent::ResourceStolen { thief, victim, .. } => {
                Audience::Only(vec![*thief, *victim])
            }
            _ => Audience::All,
        }
    }
}

impl GameState {
    /// Validate and apply one action.
    ///
    /// The action runs against a copy of the state, which replaces this one only
    /// if every step succeeds. A rejected action leaves the game untouched.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        player: PlayerId,
        action: GameAction,
        rng: &mut R,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_active()?;

        let mut next = self.clone();
        match next.dispatch(player, &action, rng) {
            Ok(events) => {
                next.refresh_scores();
                *self = next;
                debug!(
                    "Game {} applied {} from {} ({} events)",
                    self.id,
                    action.name(),
                    player,
                    events.len()
                );
                Ok(events)
            }
            Err(err) => {
                debug!(
                    "Game {} rejected {} from {}: {}",
                    self.id,
                    action.name(),
                    player,
                    err
                );
                Err(err)
            }
        }
    }

    fn dispatch<R: Rng + ?Sized>(
        &mut self,
        player: PlayerId,
        action: &GameAction,
        rng: &mut R,
    ) -> Result<Vec<GameEvent>, GameError> {
        match action {
            GameAction::Join { name } => self.add_player(player, name.clone()),
            GameAction::SetReady { ready } => self.set_player_ready(player, *ready),
            GameAction::SetConnected { connected } => self.set_connected(player, *connected),
            GameAction::StartGame => self.start_game(player),
            GameAction::PlaceSetupSettlement { vertex } => {
                self.place_setup_settlement(player, *vertex)
            }
            GameAction::PlaceSetupRoad { edge } => self.place_setup_road(player, *edge),
            GameAction::RollDice => self.roll_dice(player, rng),
            GameAction::BuildStructure { structure } => match *structure {
                Structure::Settlement { vertex } => self.build_settlement(player, vertex),
                Structure::City { vertex } => self.build_city(player, vertex),
                Structure::Road { edge } => self.build_road(player, edge),
            },
            GameAction::SetTurnPhase { phase } => self.set_turn_phase(player, *phase),
            GameAction::EndTurn => self.end_turn(player),
            GameAction::ProposeTrade {
                target,
                offered,
                requested,
            } => self.propose_trade(player, *target, *offered, *requested),
            GameAction::RespondTrade { trade, accept } => {
                self.respond_trade(player, *trade, *accept)
            }
            GameAction::CancelTrade { trade } => self.cancel_trade(player, *trade),
            GameAction::BankTrade { offered, requested } => {
                self.bank_trade(player, *offered, *requested)
            }
            GameAction::DiscardCards { cards } => self.discard_cards(player, *cards),
            GameAction::MoveRobber { hex, victim } => {
                self.move_robber_and_steal(player, *hex, *victim, rng)
            }
            GameAction::StealResource { victim } => self.steal_resource(player, *victim, rng),
            GameAction::BuyDevCard => self.buy_dev_card(player),
            GameAction::PlayDevCard {
                card,
                target,
                chosen,
            } => self.play_dev_card(player, *card, *target, chosen),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, BoardLayout};
    use crate::game::{GamePhase, GameStatus, TurnPhase};
    use crate::rules::costs;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use uuid::Uuid;

    fn lobby() -> (GameState, PlayerId, StdRng) {
        let mut rng = StdRng::seed_from_u64(21);
        let host = Uuid::new_v4();
        let game = GameState::new(
            Uuid::new_v4(),
            "APPLY1".to_string(),
            vec![(host, "Host".to_string())],
            &mut rng,
        )
        .unwrap();
        (game, host, rng)
    }

    #[test]
    fn test_action_json_shape() {
        let json = r#"{"type":"build_structure","structure":{"kind":"road","edge":12}}"#;
        let action: GameAction = serde_json::from_str(json).unwrap();
        assert_eq!(
            action,
            GameAction::BuildStructure {
                structure: Structure::Road { edge: EdgeId(12) }
            }
        );

        let json = r#"{"type":"play_dev_card","card":"Monopoly","target":"Ore"}"#;
        let action: GameAction = serde_json::from_str(json).unwrap();
        assert_eq!(
            action,
            GameAction::PlayDevCard {
                card: DevelopmentCard::Monopoly,
                target: Some(Resource::Ore),
                chosen: Vec::new(),
            }
        );

        let action: GameAction = serde_json::from_str(r#"{"type":"roll_dice"}"#).unwrap();
        assert_eq!(action, GameAction::RollDice);
    }

    #[test]
    fn test_apply_through_lobby() {
        let (mut game, host, mut rng) = lobby();
        let guest = Uuid::new_v4();

        game.apply(guest, GameAction::Join { name: "Guest".to_string() }, &mut rng).unwrap();
        for player in [host, guest] {
            game.apply(player, GameAction::SetReady { ready: true }, &mut rng).unwrap();
        }
        let events = game.apply(host, GameAction::StartGame, &mut rng).unwrap();

        assert_eq!(events, vec![GameEvent::GameStarted { first_player: host }]);
        assert_eq!(game.status(), GameStatus::Setup);
    }

    #[test]
    fn test_rejected_action_leaves_state_untouched() {
        let (mut game, host, mut rng) = lobby();
        let guest = Uuid::new_v4();
        game.add_player(guest, "Guest".to_string()).unwrap();
        game.board = Board::from_layout(&BoardLayout::standard());
        game.phase = GamePhase::Playing(TurnPhase::Build);
        game.player_mut(host).unwrap().resources = costs::road();

        let before = game.clone();
        let result = game.apply(
            host,
            GameAction::BuildStructure {
                structure: Structure::Road { edge: EdgeId(0) },
            },
            &mut rng,
        );
        assert_eq!(result, Err(GameError::MustConnectToOwned));
        assert_eq!(game, before);
    }

    #[test]
    fn test_apply_refreshes_scores() {
        let (mut game, host, mut rng) = lobby();
        game.add_player(Uuid::new_v4(), "Guest".to_string()).unwrap();
        game.board = Board::from_layout(&BoardLayout::standard());
        game.phase = GamePhase::Playing(TurnPhase::Build);
        game.board.place_settlement(VertexId(20), host);
        game.player_mut(host).unwrap().resources = costs::city();

        game.apply(
            host,
            GameAction::BuildStructure {
                structure: Structure::City { vertex: VertexId(20) },
            },
            &mut rng,
        )
        .unwrap();
        assert_eq!(game.player(host).unwrap().victory_points, 2);
    }

    #[test]
    fn test_finished_game_rejects_everything() {
        let (mut game, host, mut rng) = lobby();
        game.phase = GamePhase::Finished { winner: host };
        for action in [
            GameAction::RollDice,
            GameAction::EndTurn,
            GameAction::SetConnected { connected: false },
        ] {
            assert_eq!(game.apply(host, action, &mut rng), Err(GameError::GameOver));
        }
    }

    #[test]
    fn test_event_audience() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let bought = GameEvent::DevCardBought {
            player: a,
            card: DevelopmentCard::Knight,
        };
        assert!(bought.audience().includes(a));
        assert!(!bought.audience().includes(b));

        let stolen = GameEvent::ResourceStolen {
            thief: a,
            victim: b,
            resource: Resource::Wood,
        };
        assert!(stolen.audience().includes(b));
        assert!(!stolen.audience().includes(c));

        let rolled = GameEvent::TurnChanged { player: a, turn: 3 };
        assert_eq!(rolled.audience(), Audience::All);
    }
}
