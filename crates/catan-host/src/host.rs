//! Serialized command execution over stored games.
//!
//! Every command on a game runs under that game's lock: load the latest
//! snapshot, apply, save. Commands for different games never wait on each other.

use crate::error::HostError;
use crate::store::SnapshotStore;
use catan_core::{
    generate_join_code, GameAction, GameError, GameEvent, GameId, GameState, PlayerId, Snapshot,
};
use dashmap::DashMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Identifiers handed back when a game is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedGame {
    pub game: GameId,
    pub code: String,
}

pub struct GameHost {
    store: Arc<dyn SnapshotStore>,
    locks: DashMap<GameId, Arc<Mutex<()>>>,
    seed: Option<u64>,
    /// Advances once per RNG handed out
    sequence: AtomicU64,
}

impl GameHost {
    pub fn new(store: Arc<dyn SnapshotStore>, seed: Option<u64>) -> Self {
        Self {
            store,
            locks: DashMap::new(),
            seed,
            sequence: AtomicU64::new(0),
        }
    }

    /// Open a lobby with `host` in the first seat.
    pub async fn create_game(
        &self,
        host: PlayerId,
        name: String,
    ) -> Result<CreatedGame, HostError> {
        let id = Uuid::new_v4();
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let mut rng = self.next_rng();
        let code = generate_join_code(&mut rng);
        let game = GameState::new(id, code.clone(), vec![(host, name)], &mut rng)?;
        self.store.save(id, &Snapshot::new(game)).await?;

        info!("Hosting game {} with code {}", id, code);
        Ok(CreatedGame { game: id, code })
    }

    /// Apply one command to a stored game and persist the result.
    ///
    /// A rejected command leaves the stored snapshot as it was.
    pub async fn execute(
        &self,
        game: GameId,
        player: PlayerId,
        action: GameAction,
    ) -> Result<Vec<GameEvent>, HostError> {
        let lock = self.lock_for(game);
        let _guard = lock.lock().await;

        let mut state = self.load(game).await?;
        if state.is_finished() {
            return Err(GameError::GameOver.into());
        }

        let name = action.name();
        let mut rng = self.next_rng();
        let events = state.apply(player, action, &mut rng)?;
        let finished = state.winner();
        self.store.save(game, &Snapshot::new(state)).await?;

        debug!("Game {} stored after {} ({} events)", game, name, events.len());
        if let Some(winner) = finished {
            info!("Game {} finished, winner {}", game, winner);
        }
        Ok(events)
    }

    /// Latest stored snapshot of a game.
    pub async fn snapshot(&self, game: GameId) -> Result<Snapshot, HostError> {
        let lock = self.lock_for(game);
        let _guard = lock.lock().await;
        Ok(Snapshot::new(self.load(game).await?))
    }

    /// Unknown ids drop the lock entry taken for them
    async fn load(&self, game: GameId) -> Result<GameState, HostError> {
        match self.store.load(game).await? {
            Some(snapshot) => Ok(snapshot.into_game()),
            None => {
                self.locks.remove(&game);
                Err(HostError::GameNotFound(game))
            }
        }
    }

    fn lock_for(&self, game: GameId) -> Arc<Mutex<()>> {
        self.locks.entry(game).or_default().clone()
    }

    /// Seeded hosts derive each RNG from the base seed and a running sequence
    fn next_rng(&self) -> StdRng {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(sequence)),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use catan_core::{GamePhase, GameStatus};
    use pretty_assertions::assert_eq;

    fn memory_host(seed: Option<u64>) -> (Arc<MemoryStore>, GameHost) {
        let store = Arc::new(MemoryStore::new());
        let host = GameHost::new(store.clone(), seed);
        (store, host)
    }

    #[tokio::test]
    async fn test_create_game_stores_lobby() {
        let (store, host) = memory_host(None);
        let owner = Uuid::new_v4();

        let created = host.create_game(owner, "Ada".to_string()).await.unwrap();
        assert_eq!(created.code.len(), 6);
        assert_eq!(store.len(), 1);

        let game = host.snapshot(created.game).await.unwrap().into_game();
        assert_eq!(game.status(), GameStatus::Waiting);
        assert_eq!(game.players.len(), 1);
        assert!(game.players[0].host, "creator should host the lobby");
    }

    #[tokio::test]
    async fn test_execute_persists_events() {
        let (_, host) = memory_host(Some(3));
        let created = host.create_game(Uuid::new_v4(), "Ada".to_string()).await.unwrap();
        let guest = Uuid::new_v4();

        let events = host
            .execute(created.game, guest, GameAction::Join { name: "Bo".to_string() })
            .await
            .unwrap();
        assert!(
            matches!(events.as_slice(), [GameEvent::PlayerJoined { player, .. }] if *player == guest),
            "joining should emit exactly one event"
        );

        let game = host.snapshot(created.game).await.unwrap().into_game();
        assert_eq!(game.players.len(), 2);
    }

    #[tokio::test]
    async fn test_rejected_command_keeps_snapshot() {
        let (_, host) = memory_host(Some(3));
        let created = host.create_game(Uuid::new_v4(), "Ada".to_string()).await.unwrap();
        let guest = Uuid::new_v4();
        host.execute(created.game, guest, GameAction::Join { name: "Bo".to_string() })
            .await
            .unwrap();
        let before = host.snapshot(created.game).await.unwrap();

        let err = host
            .execute(created.game, guest, GameAction::StartGame)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_HOST");
        assert_eq!(host.snapshot(created.game).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_unknown_game() {
        let (_, host) = memory_host(None);
        let missing = Uuid::new_v4();
        let err = host
            .execute(missing, Uuid::new_v4(), GameAction::RollDice)
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::GameNotFound(id) if id == missing));
        assert!(
            matches!(host.snapshot(missing).await, Err(HostError::GameNotFound(_))),
            "snapshots of unknown games fail the same way"
        );
        assert_eq!(host.locks.len(), 0, "no lock is kept for an unknown game");
    }

    #[tokio::test]
    async fn test_finished_game_rejects_commands() {
        let (store, host) = memory_host(Some(1));
        let owner = Uuid::new_v4();
        let created = host.create_game(owner, "Ada".to_string()).await.unwrap();

        let mut game = host.snapshot(created.game).await.unwrap().into_game();
        game.phase = GamePhase::Finished { winner: owner };
        store.save(created.game, &Snapshot::new(game)).await.unwrap();

        let err = host
            .execute(created.game, owner, GameAction::SetReady { ready: true })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "GAME_OVER");
    }

    #[tokio::test]
    async fn test_same_seed_same_board() {
        let (_, left) = memory_host(Some(99));
        let (_, right) = memory_host(Some(99));
        let a = left.create_game(Uuid::new_v4(), "Ada".to_string()).await.unwrap();
        let b = right.create_game(Uuid::new_v4(), "Ada".to_string()).await.unwrap();

        let board_a = left.snapshot(a.game).await.unwrap().into_game().board;
        let board_b = right.snapshot(b.game).await.unwrap().into_game().board;
        assert_eq!(a.code, b.code);
        assert_eq!(board_a, board_b);
    }

    #[tokio::test]
    async fn test_concurrent_joins_are_serialized() {
        let (_, host) = memory_host(None);
        let host = Arc::new(host);
        let created = host.create_game(Uuid::new_v4(), "Ada".to_string()).await.unwrap();
        let game_id = created.game;

        let mut tasks = Vec::new();
        for i in 0..3 {
            let host = Arc::clone(&host);
            tasks.push(tokio::spawn(async move {
                host.execute(
                    game_id,
                    Uuid::new_v4(),
                    GameAction::Join {
                        name: format!("Guest {}", i),
                    },
                )
                .await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let game = host.snapshot(game_id).await.unwrap().into_game();
        assert_eq!(game.players.len(), 4, "no join should be lost");
    }
}
