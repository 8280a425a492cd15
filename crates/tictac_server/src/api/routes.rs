//! Route table and handlers.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::api::ApiError;
use crate::service::{GameService, GameView};

/// Body for creating a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGameRequest {
    /// Name of the human player.
    pub player_name: String,
}

/// Body for joining a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinGameRequest {
    /// Name of the joining player.
    pub player_name: String,
}

/// Body for making a move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Name of the player making the move.
    pub player_name: String,
    /// Board index (0-8, row-major).
    pub position: usize,
}

/// Builds the API router.
pub fn router(service: GameService) -> Router {
    Router::new()
        .route("/games", post(create_game))
        .route("/games/{id}", get(get_game))
        .route("/games/{id}/join", post(join_game))
        .route("/games/{id}/move", post(make_move))
        .with_state(service)
}

#[instrument(skip(service, req), fields(player = %req.player_name))]
async fn create_game(
    State(service): State<GameService>,
    Json(req): Json<CreateGameRequest>,
) -> Result<Json<GameView>, ApiError> {
    let game = service.create_game(req.player_name).await?;
    Ok(Json(game))
}

#[instrument(skip(service))]
async fn get_game(
    State(service): State<GameService>,
    Path(id): Path<String>,
) -> Result<Json<GameView>, ApiError> {
    Ok(Json(service.get_game(&id).await?))
}

#[instrument(skip(service, req), fields(player = %req.player_name))]
async fn join_game(
    State(service): State<GameService>,
    Path(id): Path<String>,
    Json(req): Json<JoinGameRequest>,
) -> Result<Json<GameView>, ApiError> {
    Ok(Json(service.join_game(&id, req.player_name).await?))
}

#[instrument(skip(service, req), fields(player = %req.player_name, position = req.position))]
async fn make_move(
    State(service): State<GameService>,
    Path(id): Path<String>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<GameView>, ApiError> {
    info!("Move requested");
    Ok(Json(service.submit_move(&id, req.position).await?))
}
