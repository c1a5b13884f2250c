// Game is a single game of Three 13. It runs eleven rounds, 3 through 13; the
// round number is both the number of cards dealt and the rank that is wild.

// Each player's score is the running total of their round penalties, lowest
// total wins.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::game::cards::{Card, Deck};
use crate::game::round::{DrawSource, Round, RoundError};

pub const INITIAL_ROUND: u8 = 3;
pub const FINAL_ROUND: u8 = 13;
pub const PLAYER_COUNT_MIN: usize = 2;
pub const PLAYER_COUNT_MAX: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("A game can only begin with 2-6 users.")]
    InvalidPlayerCount(usize),
    #[error("Game ends after round 13")]
    FinalRound,
    #[error("Game is over")]
    GameOver,
    #[error("No round in progress")]
    NoRoundInProgress,
    #[error("Round {0} is still in progress")]
    RoundInProgress(u8),
    #[error(transparent)]
    Round(#[from] RoundError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round: u8,
    pub went_out: Option<String>,
    pub penalties: Vec<u32>,
}

#[derive(Debug, Clone)]
pub struct Game {
    id: String,
    players: Vec<Player>,
    round: u8,
    current_round: Option<Round>,
    results: Vec<RoundResult>,
    over: bool,
}

impl Game {
    pub fn new(id: String, player_names: &[String]) -> Result<Self, GameError> {
        let count = player_names.len();
        if !(PLAYER_COUNT_MIN..=PLAYER_COUNT_MAX).contains(&count) {
            return Err(GameError::InvalidPlayerCount(count));
        }

        let players = player_names
            .iter()
            .map(|name| Player {
                name: name.to_string(),
                score: 0,
            })
            .collect();

        Ok(Self {
            id,
            players,
            round: INITIAL_ROUND,
            current_round: None,
            results: Vec::new(),
            over: false,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name.clone()).collect()
    }

    /// Current round number, which is also the wild rank
    pub fn round(&self) -> u8 {
        self.round
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.current_round.as_ref()
    }

    pub fn results(&self) -> &[RoundResult] {
        &self.results
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Players with the lowest total score
    pub fn leaders(&self) -> Vec<&Player> {
        let Some(best) = self.players.iter().map(|p| p.score).min() else {
            return Vec::new();
        };
        self.players.iter().filter(|p| p.score == best).collect()
    }

    pub fn go_to_next_round(&mut self) -> Result<u8, GameError> {
        if self.round == FINAL_ROUND {
            return Err(GameError::FinalRound);
        }
        self.round += 1;
        Ok(self.round)
    }

    /// Deals the current round from a freshly shuffled deck, with as many
    /// packs as the table needs
    pub fn start_round(&mut self) -> Result<&Round, GameError> {
        self.start_round_with_deck(Deck::shuffled_for_table(self.players.len()))
    }

    /// Deals the current round from `deck`
    pub fn start_round_with_deck(&mut self, deck: Deck) -> Result<&Round, GameError> {
        if self.over {
            return Err(GameError::GameOver);
        }
        if let Some(round) = &self.current_round {
            if !round.is_complete() {
                return Err(GameError::RoundInProgress(round.number()));
            }
        }

        let mut round = Round::new(self.round, self.player_names(), deck)?;
        round.start()?;
        Ok(&*self.current_round.insert(round))
    }

    pub fn draw(&mut self, player_name: &str, source: DrawSource) -> Result<Card, GameError> {
        let card = self.active_round()?.draw(player_name, source)?;
        Ok(card)
    }

    /// Discards for a player. Returns the round's result if that discard ended it.
    pub fn discard(
        &mut self,
        player_name: &str,
        card: Card,
    ) -> Result<Option<RoundResult>, GameError> {
        self.active_round()?.discard(player_name, card)?;
        Ok(self.finish_round_if_complete())
    }

    pub fn go_out(
        &mut self,
        player_name: &str,
        card: Card,
    ) -> Result<Option<RoundResult>, GameError> {
        self.active_round()?.go_out(player_name, card)?;
        Ok(self.finish_round_if_complete())
    }

    fn active_round(&mut self) -> Result<&mut Round, GameError> {
        match self.current_round.as_mut() {
            Some(round) if !round.is_complete() => Ok(round),
            _ => Err(GameError::NoRoundInProgress),
        }
    }

    /// Folds a completed round's penalties into the scores and moves the game on
    fn finish_round_if_complete(&mut self) -> Option<RoundResult> {
        let round = self.current_round.as_ref()?;
        let penalties = round.penalties()?;

        for (player, penalty) in self.players.iter_mut().zip(&penalties) {
            player.score += penalty;
        }
        let result = RoundResult {
            round: round.number(),
            went_out: round.went_out().map(str::to_string),
            penalties,
        };
        self.results.push(result.clone());

        info!(game_id = %self.id, round = result.round, "Round scored");
        if self.go_to_next_round().is_err() {
            info!(game_id = %self.id, "Game over");
            self.over = true;
        }
        Some(result)
    }
}
