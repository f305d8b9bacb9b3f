//! Robber resolution: discards, moving the robber, and stealing.
//!
//! A seven or a knight puts the turn into the robber step. Everyone owing a
//! discard pays first, then the mover relocates the robber. If an opponent with
//! cards has a building on the new hex, the mover must steal from one of them
//! before the turn resumes.

use crate::actions::GameEvent;
use crate::board::{PlayerId, Resource};
use crate::error::{GameError, RobberError};
use crate::game::{GamePhase, GameState, RobberState, RobberStep, TurnPhase};
use crate::hex::HexCoord;
use crate::rules::{self, ResourceHand};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::debug;

impl GameState {
    /// Cards owed by every player holding more than the discard threshold
    pub fn calculate_discards(&self) -> BTreeMap<PlayerId, u32> {
        self.players
            .iter()
            .map(|p| (p.id, rules::discard_count(p.resources.total())))
            .filter(|(_, owed)| *owed > 0)
            .collect()
    }

    /// Opponents with a building on the hex and at least one card
    pub fn stealable_victims(&self, thief: PlayerId, hex: HexCoord) -> Vec<PlayerId> {
        self.board
            .players_adjacent_to_hex(hex)
            .into_iter()
            .filter(|p| *p != thief)
            .filter(|p| self.player(*p).is_some_and(|s| !s.resources.is_empty()))
            .collect()
    }

    fn active_robber(&self) -> Result<&RobberState, GameError> {
        self.ensure_active()?;
        self.robber_state().ok_or(GameError::WrongPhase)
    }

    fn active_robber_mut(&mut self) -> Result<&mut RobberState, GameError> {
        match &mut self.phase {
            GamePhase::Playing(TurnPhase::Robber(robber)) => Ok(robber),
            _ => Err(GameError::WrongPhase),
        }
    }

    fn resume_turn(&mut self) {
        if let Some(resume) = self.robber_state().map(|r| r.resume) {
            self.phase = GamePhase::Playing(TurnPhase::resumed(resume));
        }
    }

    /// Pay an owed discard; any player may do this, in any order
    pub fn discard_cards(
        &mut self,
        player: PlayerId,
        cards: ResourceHand,
    ) -> Result<Vec<GameEvent>, GameError> {
        let robber = self.active_robber()?;
        let owed = robber
            .discards
            .get(&player)
            .copied()
            .ok_or(RobberError::NoDiscardOwed)?;
        if cards.total() != owed {
            return Err(RobberError::WrongDiscardCount {
                expected: owed,
                actual: cards.total(),
            }
            .into());
        }

        self.player_mut(player)?.resources.subtract(&cards)?;
        self.active_robber_mut()?.discards.remove(&player);
        debug!("Player {} discarded {} cards", player, owed);

        Ok(vec![GameEvent::CardsDiscarded { player, cards }])
    }

    /// Move the robber; leaves a steal pending if anyone there can be robbed
    pub fn move_robber(
        &mut self,
        player: PlayerId,
        hex: HexCoord,
    ) -> Result<Vec<GameEvent>, GameError> {
        let robber = self.active_robber()?;
        let RobberStep::Move { mover } = robber.step else {
            return Err(RobberError::NoMoveExpected.into());
        };
        if mover != player {
            return Err(RobberError::WrongPendingPlayer.into());
        }
        if !robber.discards.is_empty() {
            return Err(RobberError::DiscardsPending.into());
        }
        if self.board.hex(hex).is_none() {
            return Err(GameError::InvalidHex);
        }
        let from = self.board.robber();
        if from == hex {
            return Err(RobberError::SameHex.into());
        }

        self.board.move_robber(hex);
        debug!("Player {} moved the robber from {} to {}", player, from, hex);

        if self.stealable_victims(player, hex).is_empty() {
            self.resume_turn();
        } else {
            self.active_robber_mut()?.step = RobberStep::Steal { thief: player };
        }

        Ok(vec![GameEvent::RobberMoved {
            player,
            from,
            to: hex,
            victim: None,
        }])
    }

    /// Take one uniformly random card from a victim next to the robber
    pub fn steal_resource<R: Rng + ?Sized>(
        &mut self,
        thief: PlayerId,
        victim: PlayerId,
        rng: &mut R,
    ) -> Result<Vec<GameEvent>, GameError> {
        let robber = self.active_robber()?;
        let RobberStep::Steal { thief: pending } = robber.step else {
            return Err(RobberError::NoStealExpected.into());
        };
        if pending != thief {
            return Err(RobberError::WrongPendingPlayer.into());
        }
        let resource = self.draw_from(thief, victim, rng)?;
        self.resume_turn();
        Ok(vec![GameEvent::ResourceStolen {
            thief,
            victim,
            resource,
        }])
    }

    /// Move the robber and, when a victim is named, steal from them in one step
    pub fn move_robber_and_steal<R: Rng + ?Sized>(
        &mut self,
        player: PlayerId,
        hex: HexCoord,
        victim: Option<PlayerId>,
        rng: &mut R,
    ) -> Result<Vec<GameEvent>, GameError> {
        let Some(victim) = victim else {
            return self.move_robber(player, hex);
        };
        self.check_victim(player, victim, hex)?;

        let mut events = self.move_robber(player, hex)?;
        for event in &mut events {
            if let GameEvent::RobberMoved { victim: named, .. } = event {
                *named = Some(victim);
            }
        }
        events.extend(self.steal_resource(player, victim, rng)?);
        Ok(events)
    }

    fn check_victim(&self, thief: PlayerId, victim: PlayerId, hex: HexCoord) -> Result<(), GameError> {
        let target = self.player(victim).ok_or(GameError::PlayerNotFound)?;
        if victim == thief || !self.board.players_adjacent_to_hex(hex).contains(&victim) {
            return Err(RobberError::VictimNotAdjacent.into());
        }
        if target.resources.is_empty() {
            return Err(RobberError::NothingToSteal.into());
        }
        Ok(())
    }

    fn draw_from<R: Rng + ?Sized>(
        &mut self,
        thief: PlayerId,
        victim: PlayerId,
        rng: &mut R,
    ) -> Result<Resource, GameError> {
        self.check_victim(thief, victim, self.board.robber())?;
        let pool = self
            .player(victim)
            .map(|p| p.resources.cards())
            .unwrap_or_default();
        let resource = *pool
            .choose(rng)
            .ok_or(RobberError::NothingToSteal)?;

        self.player_mut(victim)?
            .resources
            .subtract(&ResourceHand::single(resource, 1))?;
        self.player_mut(thief)?.resources.add(resource, 1);
        debug!("Player {} stole from {}", thief, victim);
        Ok(resource)
    }
}

#[cfg(test)]
mod tests {
    use crate::actions::GameEvent;
    use crate::board::{Board, BoardLayout, PlayerId, VertexId};
    use crate::error::{GameError, RobberError};
    use crate::game::{GamePhase, GameState, RobberState, RobberStep, TurnPhase, TurnStep};
    use crate::hex::HexCoord;
    use crate::rules::ResourceHand;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn game_in_robber(discards: BTreeMap<PlayerId, u32>) -> (GameState, Vec<PlayerId>) {
        let mut rng = StdRng::seed_from_u64(5);
        let ids: Vec<PlayerId> = (0..3).map(|_| Uuid::new_v4()).collect();
        let players = ids.iter().map(|id| (*id, "P".to_string())).collect();
        let mut game =
            GameState::new(Uuid::new_v4(), "ROBBER".to_string(), players, &mut rng).unwrap();
        game.board = Board::from_layout(&BoardLayout::standard());
        game.phase = GamePhase::Playing(TurnPhase::Robber(RobberState {
            discards,
            step: RobberStep::Move { mover: ids[0] },
            resume: TurnStep::Build,
        }));
        (game, ids)
    }

    fn with_mover_owing(owed: u32) -> (GameState, Vec<PlayerId>) {
        let (mut game, ids) = game_in_robber(BTreeMap::new());
        if let GamePhase::Playing(TurnPhase::Robber(robber)) = &mut game.phase {
            robber.discards.insert(ids[1], owed);
        }
        (game, ids)
    }

    /// A hex other than the robber's, with one of its corners
    fn target(game: &GameState) -> (HexCoord, VertexId) {
        let hex = game
            .board
            .hexes()
            .iter()
            .find(|h| h.coord != game.board.robber())
            .unwrap();
        (hex.coord, hex.vertices[0])
    }

    #[test]
    fn test_calculate_discards() {
        let (mut game, ids) = game_in_robber(BTreeMap::new());
        game.player_mut(ids[0]).unwrap().resources = ResourceHand::with_amounts(2, 2, 2, 1, 0);
        game.player_mut(ids[1]).unwrap().resources = ResourceHand::with_amounts(2, 2, 2, 2, 1);
        game.player_mut(ids[2]).unwrap().resources = ResourceHand::with_amounts(4, 4, 4, 0, 0);

        let discards = game.calculate_discards();
        assert_eq!(discards.get(&ids[0]), None, "Seven cards is safe");
        assert_eq!(discards.get(&ids[1]), Some(&4));
        assert_eq!(discards.get(&ids[2]), Some(&6));
    }

    #[test]
    fn test_discard_must_match_owed() {
        let (mut game, ids) = with_mover_owing(4);
        game.player_mut(ids[1]).unwrap().resources = ResourceHand::with_amounts(3, 3, 3, 0, 0);

        assert_eq!(
            game.discard_cards(ids[1], ResourceHand::with_amounts(1, 1, 1, 0, 0)),
            Err(RobberError::WrongDiscardCount { expected: 4, actual: 3 }.into())
        );
        assert_eq!(
            game.discard_cards(ids[1], ResourceHand::with_amounts(0, 0, 0, 4, 0)),
            Err(GameError::InsufficientResources)
        );
        assert_eq!(
            game.discard_cards(ids[2], ResourceHand::with_amounts(1, 0, 0, 0, 0)),
            Err(RobberError::NoDiscardOwed.into())
        );

        game.discard_cards(ids[1], ResourceHand::with_amounts(2, 2, 0, 0, 0)).unwrap();
        assert_eq!(
            game.player(ids[1]).unwrap().resources,
            ResourceHand::with_amounts(1, 1, 3, 0, 0)
        );
        assert!(game.robber_state().unwrap().discards.is_empty());
    }

    #[test]
    fn test_move_waits_for_discards() {
        let (mut game, ids) = with_mover_owing(4);
        let (hex, _) = target(&game);
        assert_eq!(
            game.move_robber(ids[0], hex),
            Err(RobberError::DiscardsPending.into())
        );
    }

    #[test]
    fn test_move_checks() {
        let (mut game, ids) = game_in_robber(BTreeMap::new());
        let (hex, _) = target(&game);
        let here = game.board.robber();

        assert_eq!(
            game.move_robber(ids[1], hex),
            Err(RobberError::WrongPendingPlayer.into())
        );
        assert_eq!(game.move_robber(ids[0], here), Err(RobberError::SameHex.into()));
        assert_eq!(
            game.move_robber(ids[0], HexCoord::new(9, 9)),
            Err(GameError::InvalidHex)
        );
        assert_eq!(
            game.steal_resource(ids[0], ids[1], &mut StdRng::seed_from_u64(1)),
            Err(RobberError::NoStealExpected.into())
        );
    }

    #[test]
    fn test_move_without_victims_resumes() {
        let (mut game, ids) = game_in_robber(BTreeMap::new());
        let (hex, corner) = target(&game);
        // Opponent is there but holds nothing
        game.board.place_settlement(corner, ids[1]);

        game.move_robber(ids[0], hex).unwrap();
        assert_eq!(game.board.robber(), hex);
        assert_eq!(game.phase, GamePhase::Playing(TurnPhase::Build));
    }

    #[test]
    fn test_move_then_steal() {
        let (mut game, ids) = game_in_robber(BTreeMap::new());
        let (hex, corner) = target(&game);
        game.board.place_settlement(corner, ids[1]);
        game.player_mut(ids[1]).unwrap().resources = ResourceHand::with_amounts(0, 0, 0, 0, 2);

        game.move_robber(ids[0], hex).unwrap();
        assert_eq!(
            game.robber_state().unwrap().step,
            RobberStep::Steal { thief: ids[0] }
        );
        assert_eq!(
            game.steal_resource(ids[0], ids[2], &mut StdRng::seed_from_u64(1)),
            Err(RobberError::VictimNotAdjacent.into())
        );

        let events = game
            .steal_resource(ids[0], ids[1], &mut StdRng::seed_from_u64(1))
            .unwrap();
        assert_eq!(
            events,
            vec![GameEvent::ResourceStolen {
                thief: ids[0],
                victim: ids[1],
                resource: crate::board::Resource::Ore,
            }]
        );
        assert_eq!(game.player(ids[0]).unwrap().resources.ore, 1);
        assert_eq!(game.player(ids[1]).unwrap().resources.ore, 1);
        assert_eq!(game.turn_phase(), Some(TurnStep::Build));
    }

    #[test]
    fn test_combined_move_and_steal() {
        let (mut game, ids) = game_in_robber(BTreeMap::new());
        let (hex, corner) = target(&game);
        game.board.place_settlement(corner, ids[2]);
        game.player_mut(ids[2]).unwrap().resources = ResourceHand::with_amounts(1, 0, 0, 0, 0);

        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(
            game.move_robber_and_steal(ids[0], hex, Some(ids[1]), &mut rng),
            Err(RobberError::VictimNotAdjacent.into())
        );
        assert_ne!(game.board.robber(), hex, "Rejected move leaves the robber in place");

        let events = game
            .move_robber_and_steal(ids[0], hex, Some(ids[2]), &mut rng)
            .unwrap();
        assert!(matches!(
            events[0],
            GameEvent::RobberMoved { victim: Some(v), .. } if v == ids[2]
        ));
        assert_eq!(game.player(ids[0]).unwrap().resources.wood, 1);
        assert!(game.player(ids[2]).unwrap().resources.is_empty());
        assert_eq!(game.turn_phase(), Some(TurnStep::Build));
    }

    #[test]
    fn test_steal_from_empty_hand_rejected() {
        let (mut game, ids) = game_in_robber(BTreeMap::new());
        let (hex, corner) = target(&game);
        game.board.place_settlement(corner, ids[1]);

        assert_eq!(
            game.move_robber_and_steal(ids[0], hex, Some(ids[1]), &mut StdRng::seed_from_u64(2)),
            Err(RobberError::NothingToSteal.into())
        );
    }
}
