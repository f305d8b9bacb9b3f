//! Player-to-player offers and bank trades.

use crate::actions::GameEvent;
use crate::board::{PlayerId, Resource};
use crate::error::GameError;
use crate::game::{GameState, TurnStep};
use crate::rules::ResourceHand;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub type TradeId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

/// An offer from the current player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOffer {
    pub id: TradeId,
    pub proposer: PlayerId,
    /// `None` means open to anyone
    pub target: Option<PlayerId>,
    /// What the proposer gives
    pub offered: ResourceHand,
    /// What the proposer wants in return
    pub requested: ResourceHand,
    pub status: TradeStatus,
}

impl GameState {
    /// Trade step of the given player's own turn
    fn ensure_trade_step(&self, player: PlayerId) -> Result<(), GameError> {
        self.ensure_active()?;
        let step = self.playing_step()?;
        self.ensure_current(player)?;
        if step != TurnStep::Trade {
            return Err(GameError::WrongPhase);
        }
        Ok(())
    }

    fn pending_trade(&self, id: TradeId) -> Result<&TradeOffer, GameError> {
        self.trades
            .iter()
            .find(|t| t.id == id && t.status == TradeStatus::Pending)
            .ok_or(GameError::TradeNotFound)
    }

    fn set_trade_status(&mut self, id: TradeId, status: TradeStatus) {
        if let Some(trade) = self.trades.iter_mut().find(|t| t.id == id) {
            trade.status = status;
        }
    }

    /// Offer cards to one opponent or to the table
    pub fn propose_trade(
        &mut self,
        player: PlayerId,
        target: Option<PlayerId>,
        offered: ResourceHand,
        requested: ResourceHand,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_trade_step(player)?;
        if offered.is_empty() || requested.is_empty() {
            return Err(GameError::InvalidTradeOffer);
        }
        if let Some(target) = target {
            if target == player {
                return Err(GameError::InvalidTradeParticipant);
            }
            self.player(target).ok_or(GameError::PlayerNotFound)?;
        }
        let proposer = self.player(player).ok_or(GameError::PlayerNotFound)?;
        if !proposer.resources.can_afford(&offered) {
            return Err(GameError::InsufficientResources);
        }

        let offer = TradeOffer {
            id: self.next_trade_id,
            proposer: player,
            target,
            offered,
            requested,
            status: TradeStatus::Pending,
        };
        self.next_trade_id += 1;
        self.trades.push(offer.clone());
        debug!("Player {} proposed trade {}", player, offer.id);

        Ok(vec![GameEvent::TradeProposed { offer }])
    }

    /// Accept or decline a pending offer.
    ///
    /// Both hands are checked again at acceptance; either side may have spent
    /// cards since the offer was made. Offers stay frozen while the robber is
    /// being resolved, so owed discards cannot be traded away.
    pub fn respond_trade(
        &mut self,
        player: PlayerId,
        trade_id: TradeId,
        accept: bool,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_active()?;
        if self.playing_step()? == TurnStep::Robber {
            return Err(GameError::WrongPhase);
        }
        let trade = self.pending_trade(trade_id)?.clone();
        if player == trade.proposer || trade.target.is_some_and(|t| t != player) {
            return Err(GameError::InvalidTradeParticipant);
        }
        let responder = self.player(player).ok_or(GameError::PlayerNotFound)?;

        if !accept {
            self.set_trade_status(trade_id, TradeStatus::Rejected);
            return Ok(vec![GameEvent::TradeResolved {
                trade: trade_id,
                status: TradeStatus::Rejected,
                responder: player,
            }]);
        }

        let proposer = self.player(trade.proposer).ok_or(GameError::PlayerNotFound)?;
        if !proposer.resources.can_afford(&trade.offered)
            || !responder.resources.can_afford(&trade.requested)
        {
            return Err(GameError::InsufficientResources);
        }

        let giver = self.player_mut(trade.proposer)?;
        giver.resources.subtract(&trade.offered)?;
        giver.resources.add_hand(&trade.requested);
        let taker = self.player_mut(player)?;
        taker.resources.subtract(&trade.requested)?;
        taker.resources.add_hand(&trade.offered);

        self.set_trade_status(trade_id, TradeStatus::Accepted);
        debug!("Player {} accepted trade {}", player, trade_id);

        Ok(vec![GameEvent::TradeResolved {
            trade: trade_id,
            status: TradeStatus::Accepted,
            responder: player,
        }])
    }

    /// Withdraw your own pending offer
    pub fn cancel_trade(
        &mut self,
        player: PlayerId,
        trade_id: TradeId,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_active()?;
        let trade = self.pending_trade(trade_id)?;
        if trade.proposer != player {
            return Err(GameError::InvalidTradeParticipant);
        }
        self.set_trade_status(trade_id, TradeStatus::Cancelled);
        Ok(vec![GameEvent::TradeResolved {
            trade: trade_id,
            status: TradeStatus::Cancelled,
            responder: player,
        }])
    }

    /// Drop settled offers; pending ones stay open
    pub fn expire_old_trades(&mut self) {
        self.trades.retain(|t| t.status == TradeStatus::Pending);
    }

    /// Trade exactly one ratio's worth of a single resource for one card
    pub fn bank_trade(
        &mut self,
        player: PlayerId,
        offered: ResourceHand,
        requested: Resource,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_trade_step(player)?;
        let given = offered.single_kind().ok_or(GameError::InvalidTradeOffer)?;
        if given == requested {
            return Err(GameError::InvalidTradeOffer);
        }
        let ratio = self.board.trade_ratio(player, given);
        if offered.total() != ratio {
            return Err(GameError::InvalidTradeOffer);
        }

        let state = self.player_mut(player)?;
        state.resources.subtract(&offered)?;
        state.resources.add(requested, 1);
        debug!(
            "Player {} traded {} {:?} with the bank for {:?}",
            player, ratio, given, requested
        );

        Ok(vec![GameEvent::BankTraded {
            player,
            gave: offered,
            received: requested,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, BoardLayout, PortKind};
    use crate::game::{GamePhase, RobberState, RobberStep, TurnPhase};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn trading_game() -> (GameState, Vec<PlayerId>) {
        let mut rng = StdRng::seed_from_u64(8);
        let ids: Vec<PlayerId> = (0..3).map(|_| Uuid::new_v4()).collect();
        let players = ids.iter().map(|id| (*id, "Trader".to_string())).collect();
        let mut game =
            GameState::new(Uuid::new_v4(), "TRADE1".to_string(), players, &mut rng).unwrap();
        game.board = Board::from_layout(&BoardLayout::standard());
        game.phase = GamePhase::Playing(TurnPhase::Trade);
        (game, ids)
    }

    fn wood(n: u32) -> ResourceHand {
        ResourceHand::single(Resource::Wood, n)
    }

    fn ore(n: u32) -> ResourceHand {
        ResourceHand::single(Resource::Ore, n)
    }

    #[test]
    fn test_propose_and_accept() {
        let (mut game, ids) = trading_game();
        game.player_mut(ids[0]).unwrap().resources = wood(2);
        game.player_mut(ids[1]).unwrap().resources = ore(1);

        let events = game.propose_trade(ids[0], None, wood(2), ore(1)).unwrap();
        let GameEvent::TradeProposed { offer } = &events[0] else {
            panic!("Expected a trade proposal");
        };
        let trade = offer.id;

        assert_eq!(
            game.respond_trade(ids[0], trade, true),
            Err(GameError::InvalidTradeParticipant),
            "Cannot accept your own offer"
        );
        assert_eq!(
            game.respond_trade(ids[2], trade, true),
            Err(GameError::InsufficientResources)
        );

        game.respond_trade(ids[1], trade, true).unwrap();
        assert_eq!(game.player(ids[0]).unwrap().resources, ore(1));
        assert_eq!(game.player(ids[1]).unwrap().resources, wood(2));
        assert_eq!(game.trades[0].status, TradeStatus::Accepted);
        assert_eq!(
            game.respond_trade(ids[1], trade, true),
            Err(GameError::TradeNotFound),
            "Settled offers cannot be answered again"
        );
    }

    #[test]
    fn test_targeted_offer_only_for_target() {
        let (mut game, ids) = trading_game();
        game.player_mut(ids[0]).unwrap().resources = wood(1);
        game.player_mut(ids[1]).unwrap().resources = ore(1);
        game.player_mut(ids[2]).unwrap().resources = ore(1);

        game.propose_trade(ids[0], Some(ids[2]), wood(1), ore(1)).unwrap();
        assert_eq!(
            game.respond_trade(ids[1], 1, true),
            Err(GameError::InvalidTradeParticipant)
        );
        game.respond_trade(ids[2], 1, false).unwrap();
        assert_eq!(game.trades[0].status, TradeStatus::Rejected);
        assert_eq!(
            game.player(ids[0]).unwrap().resources,
            wood(1),
            "Nothing moves on decline"
        );
    }

    #[test]
    fn test_propose_validation() {
        let (mut game, ids) = trading_game();
        game.player_mut(ids[0]).unwrap().resources = wood(1);

        assert_eq!(
            game.propose_trade(ids[0], None, wood(2), ore(1)),
            Err(GameError::InsufficientResources)
        );
        assert_eq!(
            game.propose_trade(ids[0], None, ResourceHand::new(), ore(1)),
            Err(GameError::InvalidTradeOffer)
        );
        assert_eq!(
            game.propose_trade(ids[0], Some(ids[0]), wood(1), ore(1)),
            Err(GameError::InvalidTradeParticipant)
        );
        assert_eq!(
            game.propose_trade(ids[1], None, wood(1), ore(1)),
            Err(GameError::NotYourTurn)
        );

        game.phase = GamePhase::Playing(TurnPhase::Build);
        assert_eq!(
            game.propose_trade(ids[0], None, wood(1), ore(1)),
            Err(GameError::WrongPhase)
        );
    }

    #[test]
    fn test_accept_rechecks_proposer_hand() {
        let (mut game, ids) = trading_game();
        game.player_mut(ids[0]).unwrap().resources = wood(1);
        game.player_mut(ids[1]).unwrap().resources = ore(1);
        game.propose_trade(ids[0], None, wood(1), ore(1)).unwrap();

        game.player_mut(ids[0]).unwrap().resources = ResourceHand::new();
        assert_eq!(
            game.respond_trade(ids[1], 1, true),
            Err(GameError::InsufficientResources)
        );
        assert_eq!(game.player(ids[1]).unwrap().resources, ore(1));
    }

    #[test]
    fn test_offers_frozen_while_robber_pending() {
        let (mut game, ids) = trading_game();
        game.player_mut(ids[0]).unwrap().resources = wood(1);
        game.player_mut(ids[1]).unwrap().resources = ore(8);
        game.propose_trade(ids[0], None, wood(1), ore(6)).unwrap();

        game.phase = GamePhase::Playing(TurnPhase::Robber(RobberState {
            discards: BTreeMap::from([(ids[1], 4)]),
            step: RobberStep::Move { mover: ids[0] },
            resume: TurnStep::Build,
        }));
        let mut rng = StdRng::seed_from_u64(1);
        let accepted = game.apply(
            ids[1],
            crate::actions::GameAction::RespondTrade {
                trade: 1,
                accept: true,
            },
            &mut rng,
        );
        assert_eq!(
            accepted,
            Err(GameError::WrongPhase),
            "Accepting would drop the hand below the owed discard"
        );
        assert_eq!(game.player(ids[1]).unwrap().resources, ore(8));
        assert_eq!(game.trades[0].status, TradeStatus::Pending);

        game.discard_cards(ids[1], ore(4)).unwrap();
        assert_eq!(game.player(ids[1]).unwrap().resources, ore(4));
    }

    #[test]
    fn test_cancel_and_expire() {
        let (mut game, ids) = trading_game();
        game.player_mut(ids[0]).unwrap().resources = wood(3);
        game.propose_trade(ids[0], None, wood(1), ore(1)).unwrap();
        game.propose_trade(ids[0], None, wood(1), ore(2)).unwrap();

        assert_eq!(
            game.cancel_trade(ids[1], 1),
            Err(GameError::InvalidTradeParticipant)
        );
        game.cancel_trade(ids[0], 1).unwrap();
        assert_eq!(game.trades[0].status, TradeStatus::Cancelled);

        game.expire_old_trades();
        assert_eq!(game.trades.len(), 1);
        assert_eq!(game.trades[0].id, 2, "Pending offers survive");
    }

    #[test]
    fn test_bank_trade_default_ratio() {
        let (mut game, ids) = trading_game();
        game.player_mut(ids[0]).unwrap().resources = wood(5);

        assert_eq!(
            game.bank_trade(ids[0], wood(3), Resource::Ore),
            Err(GameError::InvalidTradeOffer),
            "Four of a kind without a port"
        );
        assert_eq!(
            game.bank_trade(ids[0], wood(4), Resource::Wood),
            Err(GameError::InvalidTradeOffer)
        );
        assert_eq!(
            game.bank_trade(
                ids[0],
                ResourceHand::with_amounts(2, 2, 0, 0, 0),
                Resource::Ore
            ),
            Err(GameError::InvalidTradeOffer)
        );

        game.bank_trade(ids[0], wood(4), Resource::Ore).unwrap();
        assert_eq!(
            game.player(ids[0]).unwrap().resources,
            ResourceHand::with_amounts(1, 0, 0, 0, 1)
        );
        assert_eq!(
            game.bank_trade(ids[0], wood(4), Resource::Ore),
            Err(GameError::InsufficientResources)
        );
    }

    #[test]
    fn test_bank_trade_uses_port_ratio() {
        let (mut game, ids) = trading_game();
        let port = game
            .board
            .ports()
            .iter()
            .find(|p| p.kind == PortKind::Generic)
            .unwrap()
            .clone();
        game.board.place_settlement(port.vertices[0], ids[0]);
        game.player_mut(ids[0]).unwrap().resources = ore(3);

        game.bank_trade(ids[0], ore(3), Resource::Wheat).unwrap();
        assert_eq!(
            game.player(ids[0]).unwrap().resources,
            ResourceHand::single(Resource::Wheat, 1)
        );
    }
}
