//! Player state and development cards.
//!
//! This module contains:
//! - `PlayerState` with resources, development cards, and lobby flags
//! - Development card types and the standard deck
//! - Player colours

use crate::board::PlayerId;
use crate::rules::ResourceHand;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Player color, unique within a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerColor {
    Red,
    Blue,
    Green,
    Orange,
}

impl PlayerColor {
    /// Colours in the order they are handed out
    pub const ALL: [PlayerColor; 4] = [
        PlayerColor::Red,
        PlayerColor::Blue,
        PlayerColor::Green,
        PlayerColor::Orange,
    ];

    /// First colour not already taken
    pub fn first_free(taken: &[PlayerColor]) -> Option<PlayerColor> {
        Self::ALL.into_iter().find(|c| !taken.contains(c))
    }
}

/// Development card types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DevelopmentCard {
    /// Move robber and steal, counts toward Largest Army
    Knight,
    /// Worth 1 VP, hidden until revealed
    VictoryPoint,
    /// Build 2 roads for free
    RoadBuilding,
    /// Take any 2 resources from the bank
    YearOfPlenty,
    /// All players must give you all of one resource type
    Monopoly,
}

impl DevelopmentCard {
    /// Create the standard development card deck (25 cards), unshuffled
    pub fn standard_deck() -> Vec<DevelopmentCard> {
        let mut deck = Vec::with_capacity(25);
        deck.extend(std::iter::repeat(DevelopmentCard::Knight).take(14));
        deck.extend(std::iter::repeat(DevelopmentCard::VictoryPoint).take(5));
        deck.extend(std::iter::repeat(DevelopmentCard::RoadBuilding).take(2));
        deck.extend(std::iter::repeat(DevelopmentCard::YearOfPlenty).take(2));
        deck.extend(std::iter::repeat(DevelopmentCard::Monopoly).take(2));
        deck
    }
}

/// When a player last bought a card type, and how many that turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub turn: u32,
    pub count: u32,
}

/// A single player's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    /// Display name
    pub name: String,
    pub color: PlayerColor,
    /// Current resources
    pub resources: ResourceHand,
    /// Development cards in hand, by type
    pub dev_cards: BTreeMap<DevelopmentCard, u32>,
    /// Turn each card type was last bought on (same-turn play restriction)
    pub dev_cards_purchased: BTreeMap<DevelopmentCard, PurchaseRecord>,
    /// Number of knights played (for Largest Army)
    pub knights_played: u32,
    /// Last computed score, for display only
    pub victory_points: u32,
    pub ready: bool,
    pub host: bool,
    pub connected: bool,
    /// VP cards held and not yet revealed
    pub hidden_victory_points: u32,
    /// VP cards revealed by playing them
    pub revealed_victory_points: u32,
    /// Roads left to place for free from a road-building card
    pub free_roads_remaining: u32,
}

impl PlayerState {
    /// Create a new player
    pub fn new(id: PlayerId, name: String, color: PlayerColor, host: bool) -> Self {
        Self {
            id,
            name,
            color,
            resources: ResourceHand::new(),
            dev_cards: BTreeMap::new(),
            dev_cards_purchased: BTreeMap::new(),
            knights_played: 0,
            victory_points: 0,
            ready: false,
            host,
            connected: true,
            hidden_victory_points: 0,
            revealed_victory_points: 0,
            free_roads_remaining: 0,
        }
    }

    /// Cards of a type in hand
    pub fn dev_card_count(&self, card: DevelopmentCard) -> u32 {
        self.dev_cards.get(&card).copied().unwrap_or(0)
    }

    /// Total development cards in hand
    pub fn total_dev_cards(&self) -> u32 {
        self.dev_cards.values().sum()
    }

    /// Add a bought card to the hand and record the turn
    pub fn receive_dev_card(&mut self, card: DevelopmentCard, turn: u32) {
        *self.dev_cards.entry(card).or_insert(0) += 1;
        let record = self
            .dev_cards_purchased
            .entry(card)
            .or_insert(PurchaseRecord { turn, count: 0 });
        if record.turn != turn {
            *record = PurchaseRecord { turn, count: 0 };
        }
        record.count += 1;
        if card == DevelopmentCard::VictoryPoint {
            self.hidden_victory_points += 1;
        }
    }

    /// Cards of a type bought on the given turn
    pub fn bought_on_turn(&self, card: DevelopmentCard, turn: u32) -> u32 {
        match self.dev_cards_purchased.get(&card) {
            Some(record) if record.turn == turn => record.count,
            _ => 0,
        }
    }

    /// Cards of a type that can be played this turn
    pub fn playable_count(&self, card: DevelopmentCard, turn: u32) -> u32 {
        if card == DevelopmentCard::VictoryPoint {
            return self.dev_card_count(card);
        }
        self.dev_card_count(card)
            .saturating_sub(self.bought_on_turn(card, turn))
    }

    /// Remove one card of a type from the hand
    pub fn remove_dev_card(&mut self, card: DevelopmentCard) {
        if let Some(count) = self.dev_cards.get_mut(&card) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.dev_cards.remove(&card);
            }
        }
    }

    /// Victory point cards owned, revealed or not
    pub fn victory_point_cards(&self) -> u32 {
        self.hidden_victory_points + self.revealed_victory_points
    }
}
