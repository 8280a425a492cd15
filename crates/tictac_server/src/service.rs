//! Game operations tying the engine to the store.

use chrono::NaiveDateTime;
use derive_more::{Display, Error};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tictac_engine::{
    Board, Mark, MoveError, compute_opponent_move, create_empty_board, detect_draw,
    detect_winner, place_mark, validate_move,
};
use tracing::{info, instrument, warn};

use crate::db::{DbError, GameRecord, GameRepository, NewGameRecord};
use crate::locks::GameLocks;

/// Mark played by the human.
pub const HUMAN: Mark = Mark::X;

/// Errors surfaced by game operations.
#[derive(Debug, Display, Error)]
pub enum GameError {
    /// No game with this id.
    #[display("Game not found")]
    NotFound,
    /// The engine rejected the move.
    #[display("{}", _0)]
    Move(MoveError),
    /// The store failed.
    #[display("{}", _0)]
    Db(DbError),
    /// A background task or lock failed.
    #[display("Internal error: {}", message)]
    Internal {
        /// What went wrong.
        message: String,
    },
}

impl From<MoveError> for GameError {
    fn from(err: MoveError) -> Self {
        Self::Move(err)
    }
}

impl From<DbError> for GameError {
    fn from(err: DbError) -> Self {
        Self::Db(err)
    }
}

impl From<tokio::task::JoinError> for GameError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal {
            message: format!("Database task failed: {}", err),
        }
    }
}

/// A game as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    /// Game id.
    pub id: String,
    /// Current board.
    pub board: Board,
    /// Name of the player who created the game.
    pub player: Option<String>,
    /// Name of the player who joined the game.
    pub guest: Option<String>,
    /// Winner, once decided.
    pub winner: Option<Mark>,
    /// True when the board is full with no winner.
    pub is_draw: bool,
    /// Creation time (UTC).
    pub created_at: NaiveDateTime,
}

impl TryFrom<&GameRecord> for GameView {
    type Error = DbError;

    fn try_from(record: &GameRecord) -> Result<Self, Self::Error> {
        let board = record.decode_board()?;
        Ok(Self {
            id: record.id().clone(),
            board,
            player: record.player().clone(),
            guest: record.guest().clone(),
            winner: record.winner_mark()?,
            is_draw: detect_draw(&board),
            created_at: *record.created_at(),
        })
    }
}

/// Creates, fetches and plays games.
///
/// Cheap to clone; clones share the store, the per-game locks and the
/// opponent's random source.
#[derive(Debug, Clone)]
pub struct GameService {
    repo: GameRepository,
    locks: GameLocks,
    rng: Arc<Mutex<StdRng>>,
}

impl GameService {
    /// Creates a service. A seed makes the opponent's random fallback reproducible.
    #[instrument(skip(repo))]
    pub fn new(repo: GameRepository, opponent_seed: Option<u64>) -> Self {
        let rng = match opponent_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            repo,
            locks: GameLocks::new(),
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Runs a blocking repository call off the async runtime.
    async fn with_repo<T, F>(&self, op: F) -> Result<T, GameError>
    where
        T: Send + 'static,
        F: FnOnce(GameRepository) -> Result<T, DbError> + Send + 'static,
    {
        let repo = self.repo.clone();
        Ok(tokio::task::spawn_blocking(move || op(repo)).await??)
    }

    /// Starts a new game with an empty board.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Db`] if the game cannot be stored.
    #[instrument(skip(self))]
    pub async fn create_game(&self, player_name: String) -> Result<GameView, GameError> {
        let id = uuid::Uuid::new_v4().to_string();
        let row = NewGameRecord::for_board(id, &create_empty_board(), Some(player_name))?;
        let record = self.with_repo(move |repo| repo.create_game(row)).await?;
        info!(game_id = %record.id(), "New game started");
        Ok(GameView::try_from(&record)?)
    }

    /// Fetches a game.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] if no such game exists.
    #[instrument(skip(self))]
    pub async fn get_game(&self, id: &str) -> Result<GameView, GameError> {
        let record = self.load(id).await?;
        Ok(GameView::try_from(&record)?)
    }

    /// Attaches a second player's name to a game.
    ///
    /// The first joiner is kept; later joins leave the game untouched.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] if no such game exists.
    #[instrument(skip(self))]
    pub async fn join_game(&self, id: &str, player_name: String) -> Result<GameView, GameError> {
        let _guard = self.locks.acquire(id).await;
        let game_id = id.to_string();
        let record = self
            .with_repo(move |repo| repo.set_guest(&game_id, &player_name))
            .await?
            .ok_or(GameError::NotFound)?;
        Ok(GameView::try_from(&record)?)
    }

    /// Plays the human's mark at `position` and, unless that ends the game,
    /// the computer's reply.
    ///
    /// The fetch, both moves and the write happen while holding this game's
    /// lock, so concurrent moves on one game cannot overwrite each other.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] for an unknown game and
    /// [`GameError::Move`] when the engine rejects the move.
    #[instrument(skip(self))]
    pub async fn submit_move(&self, id: &str, position: usize) -> Result<GameView, GameError> {
        let _guard = self.locks.acquire(id).await;

        let record = self.load(id).await?;
        let board = record.decode_board()?;

        if let Err(e) = validate_move(&board, position) {
            warn!(game_id = %id, position, error = %e, "Move rejected");
            return Err(e.into());
        }

        let (board, winner) = self.play_turn(&board, position)?;

        let game_id = id.to_string();
        let saved = self
            .with_repo(move |repo| repo.save_board(&game_id, &board, winner))
            .await?;

        info!(
            game_id = %id,
            position,
            winner = ?winner,
            is_draw = detect_draw(&board),
            "Move completed"
        );
        Ok(GameView::try_from(&saved)?)
    }

    /// Human move followed by the computer's reply when the game goes on.
    fn play_turn(
        &self,
        board: &Board,
        position: usize,
    ) -> Result<(Board, Option<Mark>), GameError> {
        let board = place_mark(board, position, HUMAN)?;
        if let Some(winner) = detect_winner(&board) {
            return Ok((board, Some(winner)));
        }

        let board = {
            let mut rng = self.rng.lock().map_err(|e| GameError::Internal {
                message: format!("RNG lock poisoned: {}", e),
            })?;
            compute_opponent_move(&board, &mut *rng)
        };
        Ok((board, detect_winner(&board)))
    }

    async fn load(&self, id: &str) -> Result<GameRecord, GameError> {
        let game_id = id.to_string();
        self.with_repo(move |repo| repo.get_game(&game_id))
            .await?
            .ok_or(GameError::NotFound)
    }
}
