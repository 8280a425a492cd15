//! Per-game locks serializing read-modify-write cycles.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, instrument};

/// Hands out one async mutex per game id.
///
/// Holding the guard for a game keeps every other move on the same game
/// waiting, while moves on other games proceed.
#[derive(Debug, Clone, Default)]
pub struct GameLocks {
    locks: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl GameLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to the given game.
    #[instrument(skip(self))]
    pub async fn acquire(&self, game_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            // Drop entries nobody else is holding or waiting on.
            locks.retain(|id, lock| id == game_id || Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(game_id.to_string()).or_default())
        };
        debug!("Waiting for game lock");
        lock.lock_owned().await
    }

    /// Number of games with a live lock entry.
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether no lock entries exist.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
