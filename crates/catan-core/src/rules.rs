//! Static rule tables and pure helpers.
//!
//! This module contains:
//! - `ResourceHand` for resource-bundle arithmetic
//! - Building and development card costs
//! - Victory point values and the victory computation
//! - Piece limits, thresholds and the setup snake-draft order

use crate::board::{PlayerId, Resource};
use crate::error::GameError;
use serde::{Deserialize, Serialize};

/// Victory points needed to win
pub const VICTORY_POINTS_TO_WIN: u32 = 10;

/// Minimum road length for Longest Road
pub const MIN_LONGEST_ROAD: u32 = 5;

/// Minimum knights for Largest Army
pub const MIN_LARGEST_ARMY: u32 = 3;

/// Settlements each player owns
pub const MAX_SETTLEMENTS: u32 = 5;

/// Cities each player owns
pub const MAX_CITIES: u32 = 4;

/// Roads each player owns
pub const MAX_ROADS: u32 = 15;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// Players holding more than this many cards discard on a seven
pub const DISCARD_THRESHOLD: u32 = 7;

/// Roads granted by a road-building card
pub const ROAD_BUILDING_FREE_ROADS: u32 = 2;

/// Resources chosen with a year-of-plenty card
pub const YEAR_OF_PLENTY_PICKS: usize = 2;

/// Victory point values
pub mod points {
    pub const SETTLEMENT: u32 = 1;
    pub const CITY: u32 = 2;
    pub const ROAD: u32 = 0;
    pub const LONGEST_ROAD: u32 = 2;
    pub const LARGEST_ARMY: u32 = 2;
}

/// A bundle of resource cards.
///
/// Counts are unsigned, so a hand can never go negative; every removal goes
/// through [`ResourceHand::subtract`], which checks coverage first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceHand {
    pub wood: u32,
    pub brick: u32,
    pub sheep: u32,
    pub wheat: u32,
    pub ore: u32,
}

impl ResourceHand {
    /// Create an empty hand
    pub const fn new() -> Self {
        Self::with_amounts(0, 0, 0, 0, 0)
    }

    /// Create a hand with specific amounts
    pub const fn with_amounts(wood: u32, brick: u32, sheep: u32, wheat: u32, ore: u32) -> Self {
        Self {
            wood,
            brick,
            sheep,
            wheat,
            ore,
        }
    }

    /// Create a hand with a single resource
    pub fn single(resource: Resource, amount: u32) -> Self {
        let mut hand = Self::new();
        hand.add(resource, amount);
        hand
    }

    /// Total number of resource cards
    pub fn total(&self) -> u32 {
        self.wood + self.brick + self.sheep + self.wheat + self.ore
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Get count of a specific resource
    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Wood => self.wood,
            Resource::Brick => self.brick,
            Resource::Sheep => self.sheep,
            Resource::Wheat => self.wheat,
            Resource::Ore => self.ore,
        }
    }

    fn slot(&mut self, resource: Resource) -> &mut u32 {
        match resource {
            Resource::Wood => &mut self.wood,
            Resource::Brick => &mut self.brick,
            Resource::Sheep => &mut self.sheep,
            Resource::Wheat => &mut self.wheat,
            Resource::Ore => &mut self.ore,
        }
    }

    /// Set count of a specific resource
    pub fn set(&mut self, resource: Resource, count: u32) {
        *self.slot(resource) = count;
    }

    /// Add resources to hand
    pub fn add(&mut self, resource: Resource, amount: u32) {
        *self.slot(resource) += amount;
    }

    /// Add another hand to this one
    pub fn add_hand(&mut self, other: &ResourceHand) {
        for (resource, count) in other.iter() {
            self.add(resource, count);
        }
    }

    /// Check if this hand covers a cost
    pub fn can_afford(&self, cost: &ResourceHand) -> bool {
        Resource::ALL
            .iter()
            .all(|&resource| self.get(resource) >= cost.get(resource))
    }

    /// Remove a cost from the hand, leaving it untouched if it is not covered
    pub fn subtract(&mut self, cost: &ResourceHand) -> Result<(), GameError> {
        if !self.can_afford(cost) {
            return Err(GameError::InsufficientResources);
        }
        for (resource, count) in cost.iter() {
            *self.slot(resource) -= count;
        }
        Ok(())
    }

    /// Remove and return every card of one resource
    pub fn take_all(&mut self, resource: Resource) -> u32 {
        std::mem::take(self.slot(resource))
    }

    /// Non-zero counts in `Resource::ALL` order
    pub fn iter(&self) -> impl Iterator<Item = (Resource, u32)> + '_ {
        Resource::ALL
            .into_iter()
            .map(|resource| (resource, self.get(resource)))
            .filter(|(_, count)| *count > 0)
    }

    /// The only resource present, if the hand holds exactly one kind
    pub fn single_kind(&self) -> Option<Resource> {
        let mut kinds = self.iter().map(|(resource, _)| resource);
        let first = kinds.next()?;
        kinds.next().is_none().then_some(first)
    }

    /// One entry per card, in `Resource::ALL` order
    pub fn cards(&self) -> Vec<Resource> {
        self.iter()
            .flat_map(|(resource, count)| std::iter::repeat(resource).take(count as usize))
            .collect()
    }
}

/// Building costs
pub mod costs {
    use super::ResourceHand;

    /// Cost to build a road: 1 wood, 1 brick
    pub const fn road() -> ResourceHand {
        ResourceHand::with_amounts(1, 1, 0, 0, 0)
    }

    /// Cost to build a settlement: 1 wood, 1 brick, 1 sheep, 1 wheat
    pub const fn settlement() -> ResourceHand {
        ResourceHand::with_amounts(1, 1, 1, 1, 0)
    }

    /// Cost to upgrade to city: 2 wheat, 3 ore
    pub const fn city() -> ResourceHand {
        ResourceHand::with_amounts(0, 0, 0, 2, 3)
    }

    /// Cost to buy a development card: 1 sheep, 1 wheat, 1 ore
    pub const fn development_card() -> ResourceHand {
        ResourceHand::with_amounts(0, 0, 1, 1, 1)
    }
}

/// Sum a player's victory points from their board presence, bonuses and VP cards
pub fn calculate_victory_points(
    settlements: u32,
    cities: u32,
    has_longest_road: bool,
    has_largest_army: bool,
    victory_point_cards: u32,
) -> u32 {
    let mut total = settlements * points::SETTLEMENT + cities * points::CITY + victory_point_cards;
    if has_longest_road {
        total += points::LONGEST_ROAD;
    }
    if has_largest_army {
        total += points::LARGEST_ARMY;
    }
    total
}

pub fn is_victorious(victory_points: u32) -> bool {
    victory_points >= VICTORY_POINTS_TO_WIN
}

/// Decide who holds a bonus card given `(player, count)` standings in seat order.
///
/// Nobody qualifies below `minimum`. Among the players sharing the best count the
/// current holder keeps the card; otherwise the first one in seat order takes it.
pub fn bonus_holder(
    standings: &[(PlayerId, u32)],
    minimum: u32,
    current: Option<PlayerId>,
) -> Option<PlayerId> {
    let best = standings.iter().map(|(_, n)| *n).max().unwrap_or(0);
    if best < minimum {
        return None;
    }
    let leaders = || standings.iter().filter(|(_, n)| *n == best).map(|(p, _)| *p);
    match current {
        Some(holder) if leaders().any(|p| p == holder) => Some(holder),
        _ => leaders().next(),
    }
}

/// Cards a player must discard when a seven is rolled
pub fn discard_count(cards_held: u32) -> u32 {
    if cards_held > DISCARD_THRESHOLD {
        cards_held / 2
    } else {
        0
    }
}

/// Seat index for the given setup turn.
///
/// Turns `0..n` go forward through the seats, turns `n..2n` come back in reverse,
/// so the last seat places twice in a row. `None` once setup is over, or for an
/// empty table.
pub fn setup_turn_index(turn_number: usize, player_count: usize) -> Option<usize> {
    if turn_number < player_count {
        Some(turn_number)
    } else if turn_number < 2 * player_count {
        Some((player_count - 1) - (turn_number - player_count))
    } else {
        None
    }
}
