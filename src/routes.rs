use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::game;
use crate::shared::AppState;

/// Builds the HTTP surface of the game server
pub fn app(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Three 13" }))
        .route("/games", get(game::list_games).post(game::create_game))
        .route("/games/:id", get(game::get_game))
        .route("/games/:id/rounds", post(game::start_round))
        .route("/games/:id/draw", post(game::draw))
        .route("/games/:id/discard", post(game::discard))
        .route("/games/:id/go-out", post(game::go_out))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
