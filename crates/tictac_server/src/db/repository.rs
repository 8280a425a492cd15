//! Database repository for games.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tictac_engine::{Board, Mark};
use tracing::{debug, info, instrument};

use crate::db::{DbError, DbErrorKind, GameRecord, NewGameRecord, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Applied to every connection: wait on locks held by other games' writes
/// instead of failing, and let readers proceed alongside a writer.
const CONNECTION_PRAGMAS: &str = "PRAGMA busy_timeout = 5000; PRAGMA journal_mode = WAL;";

/// Database repository for game rows.
///
/// Each operation opens its own connection. Writes are plain last-write-wins;
/// serializing read-modify-write cycles per game is the caller's job.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new(DbErrorKind::Connection, "Database path is empty"));
        }
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(
                DbErrorKind::Connection,
                format!("Failed to connect to '{}': {}", self.db_path, e),
            )
        })?;
        conn.batch_execute(CONNECTION_PRAGMAS)?;
        Ok(conn)
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(DbErrorKind::Migration, e.to_string()))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Inserts a new game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the id is already taken or a database error occurs.
    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    pub fn create_game(&self, game: NewGameRecord) -> Result<GameRecord, DbError> {
        debug!("Inserting game");
        let mut conn = self.connection()?;

        let record = diesel::insert_into(schema::games::table)
            .values(&game)
            .returning(GameRecord::as_returning())
            .get_result(&mut conn)?;

        info!(game_id = %record.id(), "Game created");
        Ok(record)
    }

    /// Gets a game by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_game(&self, id: &str) -> Result<Option<GameRecord>, DbError> {
        debug!("Looking up game");
        let mut conn = self.connection()?;

        let record = schema::games::table
            .find(id)
            .select(GameRecord::as_select())
            .first(&mut conn)
            .optional()?;

        if record.is_none() {
            debug!("Game not found");
        }
        Ok(record)
    }

    /// Records the guest's name if the game has none yet.
    ///
    /// Returns the game as stored afterwards, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn set_guest(&self, id: &str, guest: &str) -> Result<Option<GameRecord>, DbError> {
        use schema::games::dsl;

        let mut conn = self.connection()?;
        let updated = diesel::update(dsl::games.find(id).filter(dsl::guest.is_null()))
            .set(dsl::guest.eq(guest))
            .execute(&mut conn)?;

        if updated > 0 {
            info!(game_id = %id, guest = %guest, "Guest joined");
        } else {
            debug!("Guest already set or game missing");
        }

        let record = dsl::games
            .find(id)
            .select(GameRecord::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(record)
    }

    /// Overwrites the board and winner of a game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the game does not exist or a database error occurs.
    #[instrument(skip(self, board))]
    pub fn save_board(
        &self,
        id: &str,
        board: &Board,
        winner: Option<Mark>,
    ) -> Result<GameRecord, DbError> {
        use schema::games::dsl;

        let encoded = serde_json::to_string(board)?;
        let mut conn = self.connection()?;

        let record = diesel::update(dsl::games.find(id))
            .set((
                dsl::board.eq(encoded),
                dsl::winner.eq(winner.map(|m| m.to_string())),
            ))
            .returning(GameRecord::as_returning())
            .get_result(&mut conn)?;

        info!(game_id = %id, winner = ?winner, "Board saved");
        Ok(record)
    }
}
