// Library crate for the Three 13 game server
// This file exposes the public API for integration tests

pub mod config;
pub mod game;
pub mod routes;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use config::{ConfigError, ServerConfig};
pub use game::{
    Card, CardGroup, Deck, DrawSource, Game, GameError, GameRepository, GameService, Hand,
    InMemoryGameRepository, Round, RoundError, Suit,
};
pub use routes::app;
pub use shared::{AppError, AppState};
