//! Buying and playing development cards, and the largest army bonus.
//!
//! Cards bought this turn cannot be played until a later turn, and only one
//! non-VP card may be played per turn. Victory point cards are exempt from both
//! and can be revealed at any time on your own turn.

use crate::actions::GameEvent;
use crate::board::{PlayerId, Resource};
use crate::error::{DevCardError, GameError};
use crate::game::{GamePhase, GameState, RobberState, RobberStep, TurnPhase, TurnStep};
use crate::player::DevelopmentCard;
use crate::rules::{
    bonus_holder, costs, ResourceHand, MIN_LARGEST_ARMY, ROAD_BUILDING_FREE_ROADS,
    YEAR_OF_PLENTY_PICKS,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Decide who holds largest army from knights played, in seat order
pub fn largest_army_holder(
    knights: &[(PlayerId, u32)],
    current: Option<PlayerId>,
) -> Option<PlayerId> {
    bonus_holder(knights, MIN_LARGEST_ARMY, current)
}

impl GameState {
    pub fn buy_dev_card(&mut self, player: PlayerId) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_build_window(player)?;
        if self.dev_card_deck.is_empty() {
            return Err(DevCardError::DeckEmpty.into());
        }
        self.player_mut(player)?
            .resources
            .subtract(&costs::development_card())?;
        let card = self.dev_card_deck.pop().ok_or(DevCardError::DeckEmpty)?;

        let turn = self.turn_counter;
        self.player_mut(player)?.receive_dev_card(card, turn);
        debug!(
            "Player {} bought a development card ({} left)",
            player,
            self.dev_card_deck.len()
        );

        let mut events = vec![GameEvent::DevCardBought { player, card }];
        events.extend(self.check_victory());
        Ok(events)
    }

    /// Play a card from hand.
    ///
    /// `target` names the monopoly resource; `chosen` lists the year-of-plenty picks.
    pub fn play_dev_card(
        &mut self,
        player: PlayerId,
        card: DevelopmentCard,
        target: Option<Resource>,
        chosen: &[Resource],
    ) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_active()?;
        let step = self.playing_step()?;
        self.ensure_current(player)?;
        if step == TurnStep::Robber {
            return Err(GameError::WrongPhase);
        }

        let holder = self.player(player).ok_or(GameError::PlayerNotFound)?;
        if holder.dev_card_count(card) == 0 {
            return Err(DevCardError::NotOwned.into());
        }
        if holder.playable_count(card, self.turn_counter) == 0 {
            return Err(DevCardError::PurchasedThisTurn.into());
        }
        let is_victory_point = card == DevelopmentCard::VictoryPoint;
        if !is_victory_point && self.dev_card_played_this_turn {
            return Err(DevCardError::AlreadyPlayedThisTurn.into());
        }
        if card == DevelopmentCard::YearOfPlenty && chosen.len() != YEAR_OF_PLENTY_PICKS {
            return Err(DevCardError::WrongResourceCount {
                expected: YEAR_OF_PLENTY_PICKS,
                actual: chosen.len(),
            }
            .into());
        }
        let monopoly = match (card, target) {
            (DevelopmentCard::Monopoly, None) => {
                return Err(DevCardError::MissingTargetResource.into())
            }
            (DevelopmentCard::Monopoly, Some(resource)) => Some(resource),
            _ => None,
        };

        self.player_mut(player)?.remove_dev_card(card);
        if !is_victory_point {
            self.dev_card_played_this_turn = true;
        }
        debug!("Player {} played {:?}", player, card);

        let mut events = vec![GameEvent::DevCardPlayed { player, card }];
        match card {
            DevelopmentCard::Knight => {
                self.player_mut(player)?.knights_played += 1;
                events.extend(self.update_largest_army());
                self.phase = GamePhase::Playing(TurnPhase::Robber(RobberState {
                    discards: BTreeMap::new(),
                    step: RobberStep::Move { mover: player },
                    resume: step,
                }));
            }
            DevelopmentCard::VictoryPoint => {
                let state = self.player_mut(player)?;
                state.hidden_victory_points = state.hidden_victory_points.saturating_sub(1);
                state.revealed_victory_points += 1;
            }
            DevelopmentCard::RoadBuilding => {
                self.player_mut(player)?.free_roads_remaining = ROAD_BUILDING_FREE_ROADS;
            }
            DevelopmentCard::YearOfPlenty => {
                let mut resources = ResourceHand::new();
                for resource in chosen {
                    resources.add(*resource, 1);
                }
                self.player_mut(player)?.resources.add_hand(&resources);
                events.push(GameEvent::YearOfPlentyTaken { player, resources });
            }
            DevelopmentCard::Monopoly => {
                if let Some(resource) = monopoly {
                    events.push(self.collect_monopoly(player, resource));
                }
            }
        }

        events.extend(self.check_victory());
        Ok(events)
    }

    fn collect_monopoly(&mut self, player: PlayerId, resource: Resource) -> GameEvent {
        let mut amount = 0;
        for other in self.players.iter_mut().filter(|p| p.id != player) {
            amount += other.resources.take_all(resource);
        }
        if let Some(state) = self.players.iter_mut().find(|p| p.id == player) {
            state.resources.add(resource, amount);
        }
        GameEvent::MonopolyCollected {
            player,
            resource,
            amount,
        }
    }

    /// Recompute who holds largest army after a knight
    pub(crate) fn update_largest_army(&mut self) -> Vec<GameEvent> {
        let knights: Vec<(PlayerId, u32)> = self
            .players
            .iter()
            .map(|p| (p.id, p.knights_played))
            .collect();
        let holder = largest_army_holder(&knights, self.largest_army_holder);
        if holder == self.largest_army_holder {
            return Vec::new();
        }

        let previous = std::mem::replace(&mut self.largest_army_holder, holder);
        let count = knights
            .iter()
            .find(|(p, _)| Some(*p) == holder)
            .map(|(_, n)| *n)
            .unwrap_or(0);
        info!(
            "Largest army in game {} moves from {:?} to {:?} ({} knights)",
            self.id, previous, holder, count
        );
        vec![GameEvent::LargestArmyChanged {
            previous,
            holder,
            knights: count,
        }]
    }
}
