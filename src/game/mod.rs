// Public API
pub use cards::{Card, CardError, CardGroup, Deck, DeckError, EvaluationStage, Hand, Suit};
pub use self::core::{Game, GameError, Player, RoundResult};
pub use handlers::{create_game, discard, draw, get_game, go_out, list_games, start_round};
pub use repository::{GameRepository, InMemoryGameRepository};
pub use round::{DrawSource, Round, RoundError, TurnPhase};
pub use service::GameService;
pub use types::{
    ActionResponse, CardRequest, CreateGameRequest, DrawRequest, GameResponse, HandView,
    RoundView,
};

// Internal modules
pub mod cards;
mod core;
mod handlers;
pub mod repository;
mod round;
mod service;
mod types;
