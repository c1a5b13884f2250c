use serde::{Deserialize, Serialize};

use crate::game::cards::{Card, CardGroup, EvaluationStage, Hand};
use crate::game::core::{Game, Player, RoundResult};
use crate::game::round::{DrawSource, Round, TurnPhase};

/// Request payload for creating a new game
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateGameRequest {
    pub players: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DrawRequest {
    pub player: String,
    pub source: DrawSource,
}

/// Request payload for discarding or going out
#[derive(Debug, Serialize, Deserialize)]
pub struct CardRequest {
    pub player: String,
    pub card: Card,
}

/// A player's hand as it currently stands, including the groups carved out
/// of it by evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandView {
    pub player: String,
    pub cards: CardGroup,
    pub processed_cards: Vec<CardGroup>,
    pub long_runs: Vec<CardGroup>,
    pub stage: EvaluationStage,
}

impl HandView {
    fn new(player: &str, hand: &Hand) -> Self {
        Self {
            player: player.to_string(),
            cards: hand.group().clone(),
            processed_cards: hand.processed_cards().to_vec(),
            long_runs: hand.long_runs().to_vec(),
            stage: hand.stage(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundView {
    pub number: u8,
    pub phase: TurnPhase,
    pub current_player: String,
    pub message: String,
    pub discard_top: Option<Card>,
    pub deck_size: usize,
    pub went_out: Option<String>,
    pub hands: Vec<HandView>,
}

impl From<&Round> for RoundView {
    fn from(round: &Round) -> Self {
        Self {
            number: round.number(),
            phase: round.phase(),
            current_player: round.current_player().to_string(),
            message: round.message().to_string(),
            discard_top: round.discard_pile().last().copied(),
            deck_size: round.deck().len(),
            went_out: round.went_out().map(str::to_string),
            hands: round
                .player_names()
                .iter()
                .zip(round.hands())
                .map(|(name, hand)| HandView::new(name, hand))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResponse {
    pub id: String,
    pub round: u8,
    pub over: bool,
    pub players: Vec<Player>,
    pub current_round: Option<RoundView>,
    pub results: Vec<RoundResult>,
}

impl From<&Game> for GameResponse {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id().to_string(),
            round: game.round(),
            over: game.is_over(),
            players: game.players().to_vec(),
            current_round: game.current_round().map(RoundView::from),
            results: game.results().to_vec(),
        }
    }
}

/// Outcome of a player action. Rejected moves (a card that is not in the
/// hand, a hand that does not go out) come back with `accepted: false` and
/// the round's status message rather than as an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub accepted: bool,
    pub message: String,
    pub drawn: Option<Card>,
    pub round_result: Option<RoundResult>,
    pub game: GameResponse,
}
