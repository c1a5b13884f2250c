use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use super::types::{ActionResponse, CardRequest, CreateGameRequest, DrawRequest, GameResponse};
use crate::shared::{AppError, AppState};

/// HTTP handler for creating a new game
///
/// POST /games
/// Returns the game with its generated ID, waiting for its first round
#[instrument(name = "create_game", skip(state))]
pub async fn create_game(
    State(state): State<AppState>,
    Json(request): Json<CreateGameRequest>,
) -> Result<Json<GameResponse>, AppError> {
    info!(players = request.players.len(), "Creating new game");

    let game = state.game_service.create_game(&request.players).await?;

    info!(game_id = %game.id, "Game created successfully");
    Ok(Json(game))
}

/// GET /games
#[instrument(name = "list_games", skip(state))]
pub async fn list_games(
    State(state): State<AppState>,
) -> Result<Json<Vec<GameResponse>>, AppError> {
    let games = state.game_service.list_games().await?;
    info!(game_count = games.len(), "Games listed successfully");
    Ok(Json(games))
}

/// GET /games/:id
#[instrument(name = "get_game", skip(state))]
pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameResponse>, AppError> {
    let game = state.game_service.get_game(&game_id).await?;
    Ok(Json(game))
}

/// HTTP handler for dealing the game's current round
///
/// POST /games/:id/rounds
#[instrument(name = "start_round", skip(state))]
pub async fn start_round(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameResponse>, AppError> {
    info!("Starting round");
    let game = state.game_service.start_round(&game_id).await?;
    Ok(Json(game))
}

/// POST /games/:id/draw
#[instrument(name = "draw", skip(state))]
pub async fn draw(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(request): Json<DrawRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    let response = state
        .game_service
        .draw(&game_id, &request.player, request.source)
        .await?;
    Ok(Json(response))
}

/// POST /games/:id/discard
#[instrument(name = "discard", skip(state))]
pub async fn discard(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(request): Json<CardRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    let response = state
        .game_service
        .discard(&game_id, &request.player, request.card)
        .await?;
    Ok(Json(response))
}

/// HTTP handler for going out
///
/// POST /games/:id/go-out
/// The discard is rejected in-band (`accepted: false`) when the rest of the
/// hand still carries a penalty.
#[instrument(name = "go_out", skip(state))]
pub async fn go_out(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(request): Json<CardRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    let response = state
        .game_service
        .go_out(&game_id, &request.player, request.card)
        .await?;

    info!(
        player = %request.player,
        accepted = response.accepted,
        "Go out attempted"
    );
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::repository::InMemoryGameRepository;
    use crate::routes::app;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use std::sync::Arc;
    use tower::ServiceExt; // for `oneshot`

    fn test_app() -> Router {
        app(AppState::new(Arc::new(InMemoryGameRepository::new())))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_root_names_the_game() {
        let response = test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Three 13");
    }

    #[tokio::test]
    async fn test_create_game_handler() {
        let response = test_app()
            .oneshot(post_json("/games", r#"{"players": ["Sammy", "Les"]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let game: GameResponse = body_json(response).await;
        assert!(!game.id.is_empty());
        assert_eq!(game.round, 3);
        assert_eq!(game.players[0].name, "Sammy");
        assert_eq!(game.players[0].score, 0);
    }

    #[tokio::test]
    async fn test_create_game_handler_rejects_single_player() {
        let response = test_app()
            .oneshot(post_json("/games", r#"{"players": ["Sammy"]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: serde_json::Value = body_json(response).await;
        assert_eq!(error["error"], "A game can only begin with 2-6 users.");
    }

    #[tokio::test]
    async fn test_create_game_handler_invalid_json() {
        let response = test_app()
            .oneshot(post_json("/games", r#"{"names": ["Sammy", "Les"]}"#))
            .await
            .unwrap();

        // Should return 422 Unprocessable Entity for invalid JSON structure
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_get_unknown_game_is_not_found() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/games/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_round_can_be_started_and_played() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(post_json("/games", r#"{"players": ["Sammy", "Les", "Kim"]}"#))
            .await
            .unwrap();
        let game: GameResponse = body_json(response).await;

        let response = app
            .clone()
            .oneshot(post_json(&format!("/games/{}/rounds", game.id), "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let game: GameResponse = body_json(response).await;
        let round = game.current_round.unwrap();
        assert_eq!(round.hands.len(), 3);
        assert!(round.hands.iter().all(|hand| hand.cards.len() == 3));
        // three players in round 3: seat 0 starts
        assert_eq!(round.current_player, "Sammy");
        assert_eq!(round.message, "Sammy, time to draw and discard!");

        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/games/{}/draw", game.id),
                r#"{"player": "Sammy", "source": "discard_pile"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let action: ActionResponse = body_json(response).await;
        assert!(action.accepted);
        let drawn = action.drawn.unwrap();

        // a card nobody holds is rejected in-band
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/games/{}/discard", game.id),
                r#"{"player": "Sammy", "card": {"suit": "Joker", "rank": 5}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let action: ActionResponse = body_json(response).await;
        assert!(!action.accepted);
        assert_eq!(action.message, "Sammy, <Joker> is not in your hand.");

        let body = serde_json::json!({ "player": "Sammy", "card": drawn }).to_string();
        let response = app
            .clone()
            .oneshot(post_json(&format!("/games/{}/discard", game.id), &body))
            .await
            .unwrap();
        let action: ActionResponse = body_json(response).await;
        assert!(action.accepted);
        assert_eq!(action.message, "Les, time to draw and discard!");
    }

    #[tokio::test]
    async fn test_invalid_card_is_rejected() {
        let app = test_app();
        let response = app
            .clone()
            .oneshot(post_json("/games", r#"{"players": ["Sammy", "Les"]}"#))
            .await
            .unwrap();
        let game: GameResponse = body_json(response).await;

        let response = app
            .oneshot(post_json(
                &format!("/games/{}/discard", game.id),
                r#"{"player": "Sammy", "card": {"suit": "Hearts", "rank": 2}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
