#![allow(dead_code)] // Test utilities may not all be used in every test

use std::sync::Arc;

use three13::{
    game::{ActionResponse, GameResponse},
    Card, Deck, DrawSource, GameService, InMemoryGameRepository,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub service: GameService,
    pub game_id: String,
    pub players: Vec<String>,
}

impl TestSetup {
    /// A fresh game for `players`, waiting for its first round
    pub async fn new(players: &[&str]) -> Self {
        let service = GameService::new(Arc::new(InMemoryGameRepository::new()));
        let players: Vec<String> = players.iter().map(|p| p.to_string()).collect();
        let game = service
            .create_game(&players)
            .await
            .expect("game should be created");

        Self {
            service,
            game_id: game.id,
            players,
        }
    }

    pub async fn game(&self) -> GameResponse {
        self.service.get_game(&self.game_id).await.unwrap()
    }

    pub async fn start_round(&self, deck: Deck) -> GameResponse {
        self.service
            .start_round_with_deck(&self.game_id, deck)
            .await
            .expect("round should start")
    }

    pub async fn draw(&self, player: &str, source: DrawSource) -> Card {
        let response = self
            .service
            .draw(&self.game_id, player, source)
            .await
            .unwrap_or_else(|e| panic!("{} could not draw: {}", player, e));
        response.drawn.expect("a drawn card")
    }

    pub async fn discard(&self, player: &str, card: Card) -> ActionResponse {
        self.service
            .discard(&self.game_id, player, card)
            .await
            .unwrap_or_else(|e| panic!("{} could not discard: {}", player, e))
    }

    pub async fn go_out(&self, player: &str, card: Card) -> ActionResponse {
        self.service
            .go_out(&self.game_id, player, card)
            .await
            .unwrap_or_else(|e| panic!("{} could not go out: {}", player, e))
    }

    /// Draws from the deck and throws the same card straight back
    pub async fn pass_turn(&self, player: &str) -> ActionResponse {
        let card = self.draw(player, DrawSource::Deck).await;
        self.discard(player, card).await
    }
}
