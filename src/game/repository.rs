use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::game::core::Game;
use crate::shared::AppError;

/// Storage for games in progress, keyed by game id
#[async_trait]
pub trait GameRepository {
    async fn create_game(&self, game: Game) -> Result<(), AppError>;
    async fn get_game(&self, game_id: &str) -> Result<Option<Game>, AppError>;
    async fn update_game(&self, game: Game) -> Result<(), AppError>;
    async fn list_games(&self) -> Result<Vec<Game>, AppError>;
    async fn delete_game(&self, game_id: &str) -> Result<(), AppError>;
}

/// In-memory implementation of GameRepository
pub struct InMemoryGameRepository {
    games: RwLock<HashMap<String, Game>>,
}

impl Default for InMemoryGameRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self {
            games: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    async fn create_game(&self, game: Game) -> Result<(), AppError> {
        let mut games = self.games.write().await;
        if games.contains_key(game.id()) {
            warn!("Game already exists in memory");
            return Err(AppError::BadRequest(format!(
                "Game already exists: {}",
                game.id()
            )));
        }
        games.insert(game.id().to_string(), game);
        debug!("Game stored in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_game(&self, game_id: &str) -> Result<Option<Game>, AppError> {
        let games = self.games.read().await;
        let game = games.get(game_id).cloned();
        if game.is_none() {
            debug!("Game not found in memory");
        }
        Ok(game)
    }

    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    async fn update_game(&self, game: Game) -> Result<(), AppError> {
        let mut games = self.games.write().await;
        match games.get_mut(game.id()) {
            Some(stored) => {
                *stored = game;
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Game not found: {}", game.id()))),
        }
    }

    #[instrument(skip(self))]
    async fn list_games(&self) -> Result<Vec<Game>, AppError> {
        let games = self.games.read().await;
        Ok(games.values().cloned().collect())
    }

    #[instrument(skip(self))]
    async fn delete_game(&self, game_id: &str) -> Result<(), AppError> {
        let mut games = self.games.write().await;
        match games.remove(game_id) {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("Game not found: {}", game_id))),
        }
    }
}
