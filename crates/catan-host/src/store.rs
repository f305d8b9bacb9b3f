//! Snapshot persistence.
//!
//! This module contains:
//! - [`SnapshotStore`]: load and replace the latest snapshot of a game
//! - [`MemoryStore`]: process-local store backed by a concurrent map
//! - [`FileStore`]: one `<game-id>.json` document per game on disk

use crate::error::HostError;
use async_trait::async_trait;
use catan_core::{GameId, Snapshot};
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Latest snapshot of a game, if one was saved
    async fn load(&self, game: GameId) -> Result<Option<Snapshot>, HostError>;

    /// Replace the stored snapshot of a game
    async fn save(&self, game: GameId, snapshot: &Snapshot) -> Result<(), HostError>;
}

// ==================== Memory ====================

/// Keeps serialized snapshots, so loads go through the same format checks as files.
#[derive(Default)]
pub struct MemoryStore {
    documents: DashMap<GameId, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self, game: GameId) -> Result<Option<Snapshot>, HostError> {
        let Some(json) = self.documents.get(&game).map(|doc| doc.value().clone()) else {
            return Ok(None);
        };
        Ok(Some(Snapshot::from_json(&json)?))
    }

    async fn save(&self, game: GameId, snapshot: &Snapshot) -> Result<(), HostError> {
        let json = snapshot.to_json()?;
        self.documents.insert(game, json);
        Ok(())
    }
}

// ==================== Files ====================

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory when missing
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, HostError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, game: GameId) -> PathBuf {
        self.dir.join(format!("{}.json", game))
    }
}

#[async_trait]
impl SnapshotStore for FileStore {
    async fn load(&self, game: GameId) -> Result<Option<Snapshot>, HostError> {
        let json = match tokio::fs::read_to_string(self.path_for(game)).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(Snapshot::from_json(&json)?))
    }

    async fn save(&self, game: GameId, snapshot: &Snapshot) -> Result<(), HostError> {
        let json = snapshot.to_json()?;
        let path = self.path_for(game);
        // Written beside the target and renamed over it, so readers never see half a file
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, json).await?;
        tokio::fs::rename(&staging, &path).await?;
        debug!("Saved snapshot {}", path.display());
        Ok(())
    }
}
