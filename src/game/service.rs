use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::{
    game::{
        cards::{Card, Deck},
        core::{Game, GameError},
        repository::GameRepository,
        round::{DrawSource, RoundError},
        types::{ActionResponse, GameResponse},
    },
    shared::AppError,
};

pub struct GameService {
    game_repository: Arc<dyn GameRepository + Send + Sync>,
    // Player actions read, change and write back a whole game; one at a time
    action_lock: Mutex<()>,
}

impl GameService {
    pub fn new(game_repository: Arc<dyn GameRepository + Send + Sync>) -> Self {
        Self {
            game_repository,
            action_lock: Mutex::new(()),
        }
    }

    /// Create a new game for the given players
    #[instrument(skip(self))]
    pub async fn create_game(&self, player_names: &[String]) -> Result<GameResponse, AppError> {
        let mut unique_players = std::collections::HashSet::new();
        for player in player_names {
            if player.trim().is_empty() {
                return Err(AppError::BadRequest(
                    "Player names cannot be empty".to_string(),
                ));
            }
            if !unique_players.insert(player.trim()) {
                return Err(AppError::BadRequest(
                    "All player names must be unique".to_string(),
                ));
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        let game = Game::new(id, player_names).map_err(to_app_error)?;
        let response = GameResponse::from(&game);
        self.game_repository.create_game(game).await?;

        info!(game_id = %response.id, players = player_names.len(), "Game created");
        Ok(response)
    }

    pub async fn get_game(&self, game_id: &str) -> Result<GameResponse, AppError> {
        let game = self.load(game_id).await?;
        Ok(GameResponse::from(&game))
    }

    pub async fn list_games(&self) -> Result<Vec<GameResponse>, AppError> {
        let games = self.game_repository.list_games().await?;
        Ok(games.iter().map(GameResponse::from).collect())
    }

    /// Deal the game's current round from a freshly shuffled deck
    pub async fn start_round(&self, game_id: &str) -> Result<GameResponse, AppError> {
        self.deal_round(game_id, None).await
    }

    pub async fn start_round_with_deck(
        &self,
        game_id: &str,
        deck: Deck,
    ) -> Result<GameResponse, AppError> {
        self.deal_round(game_id, Some(deck)).await
    }

    #[instrument(skip(self, deck))]
    async fn deal_round(&self, game_id: &str, deck: Option<Deck>) -> Result<GameResponse, AppError> {
        let _guard = self.action_lock.lock().await;
        let mut game = self.load(game_id).await?;

        let round = match deck {
            Some(deck) => game.start_round_with_deck(deck),
            None => game.start_round(),
        }
        .map_err(to_app_error)?;
        info!(round = round.number(), "Round started");

        let response = GameResponse::from(&game);
        self.game_repository.update_game(game).await?;
        Ok(response)
    }

    #[instrument(skip(self))]
    pub async fn draw(
        &self,
        game_id: &str,
        player_name: &str,
        source: DrawSource,
    ) -> Result<ActionResponse, AppError> {
        let _guard = self.action_lock.lock().await;
        let mut game = self.load(game_id).await?;

        let outcome = game.draw(player_name, source);
        let drawn = match outcome {
            Ok(card) => Some(card),
            Err(e) => return Err(to_app_error(e)),
        };

        self.save_action(game, drawn, Ok(None)).await
    }

    #[instrument(skip(self))]
    pub async fn discard(
        &self,
        game_id: &str,
        player_name: &str,
        card: Card,
    ) -> Result<ActionResponse, AppError> {
        let _guard = self.action_lock.lock().await;
        let mut game = self.load(game_id).await?;

        let outcome = game.discard(player_name, card);
        self.save_action(game, None, outcome).await
    }

    #[instrument(skip(self))]
    pub async fn go_out(
        &self,
        game_id: &str,
        player_name: &str,
        card: Card,
    ) -> Result<ActionResponse, AppError> {
        let _guard = self.action_lock.lock().await;
        let mut game = self.load(game_id).await?;

        let outcome = game.go_out(player_name, card);
        self.save_action(game, None, outcome).await
    }

    async fn load(&self, game_id: &str) -> Result<Game, AppError> {
        self.game_repository
            .get_game(game_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Game not found: {}", game_id)))
    }

    /// Persists the game after an action. Moves the player is told about in
    /// the round message are reported in-band; anything else is an error.
    async fn save_action(
        &self,
        game: Game,
        drawn: Option<Card>,
        outcome: Result<Option<crate::game::core::RoundResult>, GameError>,
    ) -> Result<ActionResponse, AppError> {
        let (accepted, round_result) = match outcome {
            Ok(result) => (true, result),
            Err(GameError::Round(RoundError::Card(e))) => {
                debug!(error = %e, "Move rejected in-band");
                (false, None)
            }
            Err(GameError::Round(RoundError::CannotGoOut(penalty))) => {
                debug!(penalty = penalty, "Go out rejected in-band");
                (false, None)
            }
            Err(e) => return Err(to_app_error(e)),
        };

        let response = GameResponse::from(&game);
        let message = response
            .current_round
            .as_ref()
            .map(|round| round.message.clone())
            .unwrap_or_default();
        self.game_repository.update_game(game).await?;

        Ok(ActionResponse {
            accepted,
            message,
            drawn,
            round_result,
            game: response,
        })
    }
}

fn to_app_error(error: GameError) -> AppError {
    AppError::BadRequest(error.to_string())
}
