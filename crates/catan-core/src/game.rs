//! Game state machine.
//!
//! This module contains:
//! - `GameState`, the authoritative state of one match
//! - The phase model (`GamePhase`, `TurnPhase`, and the setup and robber sub-states)
//! - Lobby, setup, dice, building and turn operations
//!
//! Robber, trading and development card operations extend `GameState` from their
//! own modules.

use crate::actions::{GameEvent, Score};
use crate::board::{Board, BuildingKind, EdgeId, PlayerId, VertexId};
use crate::error::GameError;
use crate::longest_road::{compute_lengths, longest_road_holder};
use crate::player::{DevelopmentCard, PlayerColor, PlayerState};
use crate::rules::{
    self, costs, ResourceHand, MAX_CITIES, MAX_PLAYERS, MAX_ROADS, MAX_SETTLEMENTS, MIN_PLAYERS,
};
use crate::trading::{TradeId, TradeOffer};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};
use uuid::Uuid;

pub type GameId = Uuid;

const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const JOIN_CODE_LEN: usize = 6;

/// Generate a short human-shareable join code
pub fn generate_join_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..JOIN_CODE_LEN)
        .map(|_| JOIN_CODE_ALPHABET[rng.gen_range(0..JOIN_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Coarse lifecycle of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Waiting,
    Setup,
    Playing,
    Finished,
}

/// Label of the step a normal turn is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnStep {
    Roll,
    Trade,
    Build,
    Robber,
}

/// What the current setup player places next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetupStep {
    AwaitingSettlement,
    /// The road must touch this settlement
    AwaitingRoad { settlement: VertexId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupState {
    /// 1 going forward through the seats, 2 coming back
    pub round: u8,
    pub step: SetupStep,
}

/// Who acts next while the robber is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RobberStep {
    Move { mover: PlayerId },
    Steal { thief: PlayerId },
}

/// Pending work after a seven or a knight.
///
/// Discards must all be in before the robber can move. The state is dropped once
/// the move (and steal, if one is possible) is done, and the turn goes back to
/// `resume`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobberState {
    /// Cards each player still owes
    pub discards: BTreeMap<PlayerId, u32>,
    pub step: RobberStep,
    pub resume: TurnStep,
}

/// Step of a normal turn, carrying the robber state while it is active
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    Roll,
    Trade,
    Build,
    Robber(RobberState),
}

impl TurnPhase {
    pub fn step(&self) -> TurnStep {
        match self {
            TurnPhase::Roll => TurnStep::Roll,
            TurnPhase::Trade => TurnStep::Trade,
            TurnPhase::Build => TurnStep::Build,
            TurnPhase::Robber(_) => TurnStep::Robber,
        }
    }

    /// Phase to return to once the robber is resolved
    pub fn resumed(step: TurnStep) -> Self {
        match step {
            TurnStep::Roll => TurnPhase::Roll,
            TurnStep::Trade => TurnPhase::Trade,
            TurnStep::Build | TurnStep::Robber => TurnPhase::Build,
        }
    }
}

/// Game phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Lobby, players joining and readying up
    Waiting,
    /// Initial placement in snake order
    Setup(SetupState),
    /// Normal turns
    Playing(TurnPhase),
    /// Game is over
    Finished { winner: PlayerId },
}

/// The complete state of one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub id: GameId,
    /// Join code shown to players
    pub code: String,
    /// Players in seat order
    pub players: Vec<PlayerState>,
    pub board: Board,
    /// Seat index of the player to act
    pub current_turn: usize,
    pub phase: GamePhase,
    /// Last dice roll, zeros before the first roll of a turn
    pub dice: [u8; 2],
    /// Number of completed turns
    pub turn_counter: u32,
    /// Development card deck, drawn from the end
    pub dev_card_deck: Vec<DevelopmentCard>,
    /// Player-to-player offers made this turn
    pub trades: Vec<TradeOffer>,
    pub next_trade_id: TradeId,
    pub longest_road_holder: Option<PlayerId>,
    pub largest_army_holder: Option<PlayerId>,
    /// Whether a non-VP development card has been played this turn
    pub dev_card_played_this_turn: bool,
    /// Set by a rolled seven; the turn goes straight to building
    #[serde(default)]
    pub trade_closed: bool,
}

impl GameState {
    /// Create a game in the lobby.
    ///
    /// The first player becomes host. The board and deck are shuffled with `rng`.
    pub fn new<R: Rng + ?Sized>(
        id: GameId,
        code: String,
        players: Vec<(PlayerId, String)>,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        if players.is_empty() {
            return Err(GameError::NotEnoughPlayers);
        }

        let mut dev_card_deck = DevelopmentCard::standard_deck();
        dev_card_deck.shuffle(rng);

        let mut game = Self {
            id,
            code,
            players: Vec::with_capacity(MAX_PLAYERS),
            board: Board::generate(rng),
            current_turn: 0,
            phase: GamePhase::Waiting,
            dice: [0, 0],
            turn_counter: 0,
            dev_card_deck,
            trades: Vec::new(),
            next_trade_id: 1,
            longest_road_holder: None,
            largest_army_holder: None,
            dev_card_played_this_turn: false,
            trade_closed: false,
        };
        for (player, name) in players {
            game.add_player(player, name)?;
        }

        info!(
            "Created game {} ({}) with {} players",
            game.id,
            game.code,
            game.players.len()
        );
        Ok(game)
    }

    // ==================== Queries ====================

    pub fn status(&self) -> GameStatus {
        match self.phase {
            GamePhase::Waiting => GameStatus::Waiting,
            GamePhase::Setup(_) => GameStatus::Setup,
            GamePhase::Playing(_) => GameStatus::Playing,
            GamePhase::Finished { .. } => GameStatus::Finished,
        }
    }

    /// Turn step, only while playing
    pub fn turn_phase(&self) -> Option<TurnStep> {
        match &self.phase {
            GamePhase::Playing(turn) => Some(turn.step()),
            _ => None,
        }
    }

    pub fn setup_state(&self) -> Option<&SetupState> {
        match &self.phase {
            GamePhase::Setup(setup) => Some(setup),
            _ => None,
        }
    }

    pub fn robber_state(&self) -> Option<&RobberState> {
        match &self.phase {
            GamePhase::Playing(TurnPhase::Robber(robber)) => Some(robber),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::Finished { .. })
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self.phase {
            GamePhase::Finished { winner } => Some(winner),
            _ => None,
        }
    }

    /// Get a player by ID
    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.id == id)
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Result<&mut PlayerState, GameError> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(GameError::PlayerNotFound)
    }

    pub fn current_player_id(&self) -> Option<PlayerId> {
        self.players.get(self.current_turn).map(|p| p.id)
    }

    /// Player ids in seat order
    pub fn seats(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    /// Victory points recomputed from the board, bonuses and VP cards
    pub fn victory_points(&self, id: PlayerId) -> u32 {
        let Some(player) = self.player(id) else {
            return 0;
        };
        let (settlements, cities) = self.board.building_counts(id);
        rules::calculate_victory_points(
            settlements,
            cities,
            self.longest_road_holder == Some(id),
            self.largest_army_holder == Some(id),
            player.victory_point_cards(),
        )
    }

    /// Every player's score in seat order
    pub fn scores(&self) -> Vec<Score> {
        self.players
            .iter()
            .map(|p| Score {
                player: p.id,
                victory_points: self.victory_points(p.id),
            })
            .collect()
    }

    /// Refresh the cached score on every player
    pub(crate) fn refresh_scores(&mut self) {
        for score in self.scores() {
            if let Some(player) = self.players.iter_mut().find(|p| p.id == score.player) {
                player.victory_points = score.victory_points;
            }
        }
    }

    // ==================== Guards ====================

    pub(crate) fn ensure_active(&self) -> Result<(), GameError> {
        if self.is_finished() {
            Err(GameError::GameOver)
        } else {
            Ok(())
        }
    }

    pub(crate) fn ensure_current(&self, player: PlayerId) -> Result<(), GameError> {
        match self.current_player_id() {
            Some(current) if current == player => Ok(()),
            _ => Err(GameError::NotYourTurn),
        }
    }

    /// Current turn step, or `WrongPhase` outside of normal play
    pub(crate) fn playing_step(&self) -> Result<TurnStep, GameError> {
        self.turn_phase().ok_or(GameError::WrongPhase)
    }

    /// Building and buying happen in the trade or build step of your own turn
    pub(crate) fn ensure_build_window(&self, player: PlayerId) -> Result<(), GameError> {
        self.ensure_active()?;
        let step = self.playing_step()?;
        self.ensure_current(player)?;
        match step {
            TurnStep::Trade | TurnStep::Build => Ok(()),
            _ => Err(GameError::WrongPhase),
        }
    }

    // ==================== Lobby ====================

    /// Seat a new player with the first free colour
    pub fn add_player(&mut self, id: PlayerId, name: String) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_active()?;
        if self.phase != GamePhase::Waiting {
            return Err(GameError::WrongPhase);
        }
        if self.player(id).is_some() {
            return Err(GameError::DuplicatePlayer);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::GameFull);
        }
        let taken: Vec<PlayerColor> = self.players.iter().map(|p| p.color).collect();
        let color = PlayerColor::first_free(&taken).ok_or(GameError::GameFull)?;
        let host = self.players.is_empty();

        self.players
            .push(PlayerState::new(id, name.clone(), color, host));
        debug!("Player {} joined game {} as {:?}", id, self.id, color);

        Ok(vec![GameEvent::PlayerJoined {
            player: id,
            name,
            color,
        }])
    }

    pub fn set_player_ready(
        &mut self,
        player: PlayerId,
        ready: bool,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_active()?;
        if self.phase != GamePhase::Waiting {
            return Err(GameError::WrongPhase);
        }
        self.player_mut(player)?.ready = ready;
        Ok(vec![GameEvent::PlayerReadyChanged { player, ready }])
    }

    pub fn set_connected(
        &mut self,
        player: PlayerId,
        connected: bool,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_active()?;
        self.player_mut(player)?.connected = connected;
        Ok(vec![GameEvent::ConnectionChanged { player, connected }])
    }

    /// Host starts the game once enough players are ready
    pub fn start_game(&mut self, player: PlayerId) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_active()?;
        if self.phase != GamePhase::Waiting {
            return Err(GameError::WrongPhase);
        }
        let requester = self.player(player).ok_or(GameError::PlayerNotFound)?;
        if !requester.host {
            return Err(GameError::NotHost);
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers);
        }
        if !self.players.iter().all(|p| p.ready) {
            return Err(GameError::PlayersNotReady);
        }

        self.current_turn = 0;
        self.phase = GamePhase::Setup(SetupState {
            round: 1,
            step: SetupStep::AwaitingSettlement,
        });
        info!("Game {} started with {} players", self.id, self.players.len());

        Ok(vec![GameEvent::GameStarted {
            first_player: self.players[0].id,
        }])
    }

    // ==================== Setup Phase ====================

    fn setup_turn(&self, player: PlayerId) -> Result<SetupState, GameError> {
        self.ensure_active()?;
        let GamePhase::Setup(setup) = self.phase else {
            return Err(GameError::WrongPhase);
        };
        self.ensure_current(player)?;
        Ok(setup)
    }

    /// Free settlement; the second one also pays out one card per adjacent hex
    pub fn place_setup_settlement(
        &mut self,
        player: PlayerId,
        vertex: VertexId,
    ) -> Result<Vec<GameEvent>, GameError> {
        let setup = self.setup_turn(player)?;
        if setup.step != SetupStep::AwaitingSettlement {
            return Err(GameError::WrongPhase);
        }
        let spot = self.board.vertex(vertex).ok_or(GameError::InvalidVertex)?;
        if spot.building.is_some() {
            return Err(GameError::VertexOccupied);
        }
        if !self.board.satisfies_distance_rule(vertex) {
            return Err(GameError::DistanceRuleViolation);
        }

        self.board.place_settlement(vertex, player);
        let mut events = vec![GameEvent::SettlementPlaced { player, vertex }];

        if setup.round == 2 {
            let mut grant = ResourceHand::new();
            for resource in self.board.resources_at_vertex(vertex) {
                grant.add(resource, 1);
            }
            self.player_mut(player)?.resources.add_hand(&grant);
            if !grant.is_empty() {
                events.push(GameEvent::SetupResourcesGranted {
                    player,
                    resources: grant,
                });
            }
        }

        self.phase = GamePhase::Setup(SetupState {
            round: setup.round,
            step: SetupStep::AwaitingRoad { settlement: vertex },
        });
        events.extend(self.update_longest_road());
        Ok(events)
    }

    /// Free road touching the settlement just placed
    pub fn place_setup_road(
        &mut self,
        player: PlayerId,
        edge: EdgeId,
    ) -> Result<Vec<GameEvent>, GameError> {
        let setup = self.setup_turn(player)?;
        let SetupStep::AwaitingRoad { settlement } = setup.step else {
            return Err(GameError::WrongPhase);
        };
        let spot = self.board.edge(edge).ok_or(GameError::InvalidEdge)?;
        if spot.road.is_some() {
            return Err(GameError::EdgeOccupied);
        }
        if !spot.vertices.contains(&settlement) {
            return Err(GameError::MustConnectToOwned);
        }

        self.board.place_road(edge, player);
        let mut events = vec![GameEvent::RoadPlaced {
            player,
            edge,
            free: true,
        }];
        events.extend(self.update_longest_road());
        events.extend(self.advance_setup(setup.round));
        Ok(events)
    }

    fn advance_setup(&mut self, round: u8) -> Vec<GameEvent> {
        let seats = self.players.len();
        let taken = if round == 1 {
            self.current_turn
        } else {
            2 * seats - 1 - self.current_turn
        };
        let next = taken + 1;

        let Some(seat) = rules::setup_turn_index(next, seats) else {
            self.current_turn = 0;
            self.phase = GamePhase::Playing(TurnPhase::Roll);
            info!("Game {} setup complete", self.id);
            return vec![GameEvent::SetupCompleted {
                first_player: self.players[0].id,
            }];
        };

        self.current_turn = seat;
        self.phase = GamePhase::Setup(SetupState {
            round: if next < seats { 1 } else { 2 },
            step: SetupStep::AwaitingSettlement,
        });
        vec![GameEvent::TurnChanged {
            player: self.players[self.current_turn].id,
            turn: self.turn_counter,
        }]
    }

    // ==================== Dice Rolling ====================

    /// Roll two dice with the provided RNG
    pub fn roll_dice<R: Rng + ?Sized>(
        &mut self,
        player: PlayerId,
        rng: &mut R,
    ) -> Result<Vec<GameEvent>, GameError> {
        let first = rng.gen_range(1..=6);
        let second = rng.gen_range(1..=6);
        self.roll_dice_with_values(player, first, second)
    }

    /// Apply a roll with fixed dice values.
    ///
    /// A seven starts the robber sequence with no production; anything else pays
    /// out from every matching hex except the one under the robber.
    pub fn roll_dice_with_values(
        &mut self,
        player: PlayerId,
        first: u8,
        second: u8,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_active()?;
        let step = self.playing_step()?;
        self.ensure_current(player)?;
        if step != TurnStep::Roll {
            return Err(GameError::WrongPhase);
        }
        if !(1..=6).contains(&first) || !(1..=6).contains(&second) {
            return Err(GameError::InvalidDice);
        }

        self.dice = [first, second];
        let total = first + second;
        debug!("Player {} rolled {} in game {}", player, total, self.id);

        if total == 7 {
            self.trade_closed = true;
            let discards = self.calculate_discards();
            self.phase = GamePhase::Playing(TurnPhase::Robber(RobberState {
                discards: discards.clone(),
                step: RobberStep::Move { mover: player },
                resume: TurnStep::Build,
            }));
            return Ok(vec![
                GameEvent::DiceRolled {
                    player,
                    values: self.dice,
                    total,
                    gains: BTreeMap::new(),
                },
                GameEvent::RobberActivated {
                    mover: player,
                    discards,
                },
            ]);
        }

        let gains = self.board.production(total);
        for (owner, hand) in &gains {
            if let Some(state) = self.players.iter_mut().find(|p| p.id == *owner) {
                state.resources.add_hand(hand);
            }
        }
        self.phase = GamePhase::Playing(TurnPhase::Trade);

        Ok(vec![GameEvent::DiceRolled {
            player,
            values: self.dice,
            total,
            gains,
        }])
    }

    // ==================== Building ====================

    pub fn build_settlement(
        &mut self,
        player: PlayerId,
        vertex: VertexId,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_build_window(player)?;
        let spot = self.board.vertex(vertex).ok_or(GameError::InvalidVertex)?;
        if spot.building.is_some() {
            return Err(GameError::VertexOccupied);
        }
        if !self.board.satisfies_distance_rule(vertex) {
            return Err(GameError::DistanceRuleViolation);
        }
        if !self.board.touches_own_road(vertex, player) {
            return Err(GameError::MustConnectToOwned);
        }
        let (settlements, _) = self.board.building_counts(player);
        if settlements >= MAX_SETTLEMENTS {
            return Err(GameError::MaxSettlementsReached);
        }
        self.player_mut(player)?
            .resources
            .subtract(&costs::settlement())?;

        self.board.place_settlement(vertex, player);
        debug!("Player {} built a settlement at {}", player, vertex);

        let mut events = vec![GameEvent::SettlementPlaced { player, vertex }];
        // A new settlement can cut an opponent's road
        events.extend(self.update_longest_road());
        events.extend(self.check_victory());
        Ok(events)
    }

    pub fn build_city(
        &mut self,
        player: PlayerId,
        vertex: VertexId,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_build_window(player)?;
        let spot = self.board.vertex(vertex).ok_or(GameError::InvalidVertex)?;
        match spot.building {
            Some(b) if b.owner == player && b.kind == BuildingKind::Settlement => {}
            _ => return Err(GameError::CannotUpgrade),
        }
        let (_, cities) = self.board.building_counts(player);
        if cities >= MAX_CITIES {
            return Err(GameError::MaxCitiesReached);
        }
        self.player_mut(player)?.resources.subtract(&costs::city())?;

        self.board.upgrade_to_city(vertex);
        debug!("Player {} built a city at {}", player, vertex);

        let mut events = vec![GameEvent::CityBuilt { player, vertex }];
        events.extend(self.check_victory());
        Ok(events)
    }

    /// Build a road, spending a free road from a road-building card first
    pub fn build_road(
        &mut self,
        player: PlayerId,
        edge: EdgeId,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_build_window(player)?;
        let spot = self.board.edge(edge).ok_or(GameError::InvalidEdge)?;
        if spot.road.is_some() {
            return Err(GameError::EdgeOccupied);
        }
        if !self.board.road_connects(edge, player) {
            return Err(GameError::MustConnectToOwned);
        }
        if self.board.road_count(player) >= MAX_ROADS {
            return Err(GameError::MaxRoadsReached);
        }
        let state = self.player_mut(player)?;
        let free = state.free_roads_remaining > 0;
        if free {
            state.free_roads_remaining -= 1;
        } else {
            state.resources.subtract(&costs::road())?;
        }

        self.board.place_road(edge, player);
        debug!("Player {} built a road at {}", player, edge);

        let mut events = vec![GameEvent::RoadPlaced { player, edge, free }];
        events.extend(self.update_longest_road());
        events.extend(self.check_victory());
        Ok(events)
    }

    // ==================== Turn Management ====================

    /// Move between the trade and build steps of your own turn
    pub fn set_turn_phase(
        &mut self,
        player: PlayerId,
        step: TurnStep,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_active()?;
        let current = self.playing_step()?;
        self.ensure_current(player)?;
        let phase = match (current, step) {
            (TurnStep::Build, TurnStep::Trade) if self.trade_closed => {
                return Err(GameError::WrongPhase)
            }
            (TurnStep::Trade | TurnStep::Build, TurnStep::Trade) => TurnPhase::Trade,
            (TurnStep::Trade | TurnStep::Build, TurnStep::Build) => TurnPhase::Build,
            _ => return Err(GameError::WrongPhase),
        };
        self.phase = GamePhase::Playing(phase);
        Ok(vec![GameEvent::TurnPhaseChanged {
            player,
            phase: step,
        }])
    }

    pub fn end_turn(&mut self, player: PlayerId) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_active()?;
        let step = self.playing_step()?;
        self.ensure_current(player)?;
        if !matches!(step, TurnStep::Trade | TurnStep::Build) {
            return Err(GameError::WrongPhase);
        }

        // Unused road-building roads do not carry over
        self.player_mut(player)?.free_roads_remaining = 0;
        self.expire_old_trades();

        self.current_turn = (self.current_turn + 1) % self.players.len();
        self.turn_counter += 1;
        self.dice = [0, 0];
        self.dev_card_played_this_turn = false;
        self.trade_closed = false;
        self.phase = GamePhase::Playing(TurnPhase::Roll);

        let next = self.players[self.current_turn].id;
        debug!("Game {} turn {} passes to {}", self.id, self.turn_counter, next);
        Ok(vec![GameEvent::TurnChanged {
            player: next,
            turn: self.turn_counter,
        }])
    }

    // ==================== Scoring ====================

    /// Recompute road lengths and move the longest road bonus if needed
    pub(crate) fn update_longest_road(&mut self) -> Vec<GameEvent> {
        let lengths = compute_lengths(&self.board);
        let holder = longest_road_holder(&self.seats(), &lengths, self.longest_road_holder);
        if holder == self.longest_road_holder {
            return Vec::new();
        }

        let previous = std::mem::replace(&mut self.longest_road_holder, holder);
        let length = holder
            .and_then(|h| lengths.get(&h).copied())
            .unwrap_or(0);
        info!(
            "Longest road in game {} moves from {:?} to {:?} (length {})",
            self.id, previous, holder, length
        );
        vec![GameEvent::LongestRoadChanged {
            previous,
            holder,
            length,
        }]
    }

    /// End the game if the current player has reached the target
    pub(crate) fn check_victory(&mut self) -> Vec<GameEvent> {
        let Some(current) = self.current_player_id() else {
            return Vec::new();
        };
        if !rules::is_victorious(self.victory_points(current)) {
            return Vec::new();
        }

        self.phase = GamePhase::Finished { winner: current };
        self.refresh_scores();
        info!("Game {} won by {}", self.id, current);
        vec![GameEvent::GameOver {
            winner: current,
            scores: self.scores(),
        }]
    }
}
