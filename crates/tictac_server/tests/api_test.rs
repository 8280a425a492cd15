//! End-to-end tests of the REST API against a temporary database.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::NamedTempFile;
use tictac_engine::{Board, Mark};
use tictac_server::{GameRepository, GameService, router};
use tower::ServiceExt;

/// Builds the app over a fresh database, also handing back the repository so
/// tests can arrange boards directly.
fn setup_app_with_repo() -> (NamedTempFile, GameRepository, Router) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let repo = GameRepository::new(db_path).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");
    let app = router(GameService::new(repo.clone(), Some(11)));
    (db_file, repo, app)
}

fn setup_app() -> (NamedTempFile, Router) {
    let (db_file, _, app) = setup_app_with_repo();
    (db_file, app)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create(app: &Router, name: &str) -> String {
    let (status, game) = send(app, "POST", "/games", Some(json!({ "player_name": name }))).await;
    assert_eq!(status, StatusCode::OK);
    game["id"].as_str().expect("Missing id").to_string()
}

fn count(board: &Value, mark: &str) -> usize {
    board
        .as_array()
        .expect("Board is not an array")
        .iter()
        .filter(|c| c.as_str() == Some(mark))
        .count()
}

#[tokio::test]
async fn test_create_game() {
    let (_db, app) = setup_app();
    let (status, game) = send(&app, "POST", "/games", Some(json!({ "player_name": "A" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["player"], "A");
    assert_eq!(game["winner"], Value::Null);
    assert_eq!(game["is_draw"], false);
    assert_eq!(game["board"], json!([null, null, null, null, null, null, null, null, null]));
}

#[tokio::test]
async fn test_get_game() {
    let (_db, app) = setup_app();
    let id = create(&app, "A").await;

    let (status, game) = send(&app, "GET", &format!("/games/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["id"], id.as_str());
}

#[tokio::test]
async fn test_unknown_game_is_404() {
    let (_db, app) = setup_app();

    let (status, body) = send(&app, "GET", "/games/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Game not found");

    let (status, _) = send(
        &app,
        "POST",
        "/games/missing/move",
        Some(json!({ "player_name": "A", "position": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let body = json!({ "player_name": "B" });
    let (status, _) = send(&app, "POST", "/games/missing/join", Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_join_game() {
    let (_db, app) = setup_app();
    let id = create(&app, "A").await;

    let uri = format!("/games/{id}/join");
    let (status, game) = send(&app, "POST", &uri, Some(json!({ "player_name": "B" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["player"], "A");
    assert_eq!(game["guest"], "B");
    assert_eq!(game["board"], json!([null, null, null, null, null, null, null, null, null]));
}

#[tokio::test]
async fn test_move_places_human_and_computer_marks() {
    let (_db, app) = setup_app();
    let id = create(&app, "A").await;

    let (status, game) = send(
        &app,
        "POST",
        &format!("/games/{id}/move"),
        Some(json!({ "player_name": "A", "position": 0 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["board"][0], "X");
    assert_eq!(count(&game["board"], "X"), 1);
    assert_eq!(count(&game["board"], "O"), 1);
    assert_eq!(game["winner"], Value::Null);

    let (_, fetched) = send(&app, "GET", &format!("/games/{id}"), None).await;
    assert_eq!(fetched["board"], game["board"]);
}

#[tokio::test]
async fn test_move_on_occupied_cell_is_400() {
    let (_db, app) = setup_app();
    let id = create(&app, "A").await;
    let uri = format!("/games/{id}/move");

    let body = json!({ "player_name": "A", "position": 4 });
    send(&app, "POST", &uri, Some(body.clone())).await;
    let (status, body) = send(&app, "POST", &uri, Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Cell 4 already taken");
}

#[tokio::test]
async fn test_move_out_of_range_is_400() {
    let (_db, app) = setup_app();
    let id = create(&app, "A").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/games/{id}/move"),
        Some(json!({ "player_name": "A", "position": 9 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().expect("Missing detail").contains("Must be 0-8"));
}

#[tokio::test]
async fn test_negative_position_is_rejected() {
    let (_db, app) = setup_app();
    let id = create(&app, "A").await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/games/{id}/move"),
        Some(json!({ "player_name": "A", "position": -1 })),
    )
    .await;

    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_game_plays_to_terminal_state() {
    let (_db, app) = setup_app();
    let id = create(&app, "A").await;
    let uri = format!("/games/{id}/move");

    let mut game = Value::Null;
    for _ in 0..5 {
        let (_, current) = send(&app, "GET", &format!("/games/{id}"), None).await;
        let free = current["board"]
            .as_array()
            .expect("Board is not an array")
            .iter()
            .position(Value::is_null);
        let Some(position) = free else { break };
        if !current["winner"].is_null() || current["is_draw"] == true {
            game = current;
            break;
        }

        let body = json!({ "player_name": "A", "position": position });
        let (status, next) = send(&app, "POST", &uri, Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        game = next;
    }

    let finished = !game["winner"].is_null() || game["is_draw"] == true;
    assert!(finished, "Game should be over after five human moves: {game}");

    let body = json!({ "player_name": "A", "position": 0 });
    let (status, body) = send(&app, "POST", &uri, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().expect("Missing detail").contains("Game already finished"));
}

#[tokio::test]
async fn test_concurrent_moves_do_not_lose_updates() {
    let (_db, app) = setup_app();
    let id = create(&app, "A").await;
    let uri = format!("/games/{id}/move");

    let (first, second) = tokio::join!(
        send(&app, "POST", &uri, Some(json!({ "player_name": "A", "position": 0 }))),
        send(&app, "POST", &uri, Some(json!({ "player_name": "A", "position": 8 }))),
    );

    let (_, game) = send(&app, "GET", &format!("/games/{id}"), None).await;
    let accepted = [first.0, second.0]
        .iter()
        .filter(|s| **s == StatusCode::OK)
        .count();

    // Every accepted move is visible: one X and one O per accepted move.
    assert!(accepted >= 1);
    assert_eq!(count(&game["board"], "X"), accepted);
    assert_eq!(count(&game["board"], "O"), accepted);
}

#[tokio::test]
async fn test_winning_human_move_ends_game_without_reply() {
    use Mark::{O, X};

    let (_db, repo, app) = setup_app_with_repo();
    let id = create(&app, "A").await;
    // X X _ / O O _ / _ _ _
    #[rustfmt::skip]
    let board = Board::from([
        Some(X), Some(X), None,
        Some(O), Some(O), None,
        None, None, None,
    ]);
    repo.save_board(&id, &board, None).expect("Seed failed");

    let uri = format!("/games/{id}/move");
    let body = json!({ "player_name": "A", "position": 2 });
    let (status, game) = send(&app, "POST", &uri, Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["winner"], "X");
    assert_eq!(game["is_draw"], false);
    assert_eq!(count(&game["board"], "X"), 3);
    assert_eq!(count(&game["board"], "O"), 2);

    let (_, fetched) = send(&app, "GET", &format!("/games/{id}"), None).await;
    assert_eq!(fetched["board"], game["board"]);
    assert_eq!(fetched["winner"], "X");

    let body = json!({ "player_name": "A", "position": 8 });
    let (status, body) = send(&app, "POST", &uri, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Game already finished (winner decided)");
}

#[tokio::test]
async fn test_filling_last_cell_without_line_is_draw() {
    use Mark::{O, X};

    let (_db, repo, app) = setup_app_with_repo();
    let id = create(&app, "A").await;
    // X O X / X O O / O X _
    #[rustfmt::skip]
    let board = Board::from([
        Some(X), Some(O), Some(X),
        Some(X), Some(O), Some(O),
        Some(O), Some(X), None,
    ]);
    repo.save_board(&id, &board, None).expect("Seed failed");

    let uri = format!("/games/{id}/move");
    let body = json!({ "player_name": "A", "position": 8 });
    let (status, game) = send(&app, "POST", &uri, Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["winner"], Value::Null);
    assert_eq!(game["is_draw"], true);
    assert_eq!(game["board"], json!(["X", "O", "X", "X", "O", "O", "O", "X", "X"]));

    let (_, fetched) = send(&app, "GET", &format!("/games/{id}"), None).await;
    assert_eq!(fetched["board"], game["board"]);
    assert_eq!(fetched["winner"], Value::Null);
    assert_eq!(fetched["is_draw"], true);

    let body = json!({ "player_name": "A", "position": 0 });
    let (status, body) = send(&app, "POST", &uri, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Game already finished (draw)");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_moves_on_many_games_all_succeed() {
    let (_db, app) = setup_app();

    let creates = (0..16).map(|n| {
        let app = app.clone();
        tokio::spawn(async move { create(&app, &format!("P{n}")).await })
    });
    let mut ids = Vec::new();
    for handle in creates.collect::<Vec<_>>() {
        ids.push(handle.await.expect("Create task panicked"));
    }

    let moves = ids.iter().map(|id| {
        let app = app.clone();
        let uri = format!("/games/{id}/move");
        tokio::spawn(async move {
            let body = json!({ "player_name": "A", "position": 4 });
            send(&app, "POST", &uri, Some(body)).await
        })
    });
    for handle in moves.collect::<Vec<_>>() {
        let (status, game) = handle.await.expect("Move task panicked");
        assert_eq!(status, StatusCode::OK, "Move failed: {game}");
        assert_eq!(game["board"][4], "X");
        assert_eq!(count(&game["board"], "O"), 1);
    }

    for id in &ids {
        let (status, game) = send(&app, "GET", &format!("/games/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(count(&game["board"], "X"), 1);
    }
}
