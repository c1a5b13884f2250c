// A round deals `number` cards to each player, then players take turns drawing
// one card and discarding one. When a player goes out (their whole hand forms
// runs and sets), everyone else gets one final turn and is scored on whatever
// their hand still holds.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::game::cards::{Card, CardError, CardGroup, Deck, DeckError, Hand, MAX_RANK, MIN_RANK};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoundError {
    #[error("It is {expected}'s turn")]
    NotYourTurn { expected: String },
    #[error("Draw a card before discarding")]
    MustDrawFirst,
    #[error("Already drew a card this turn")]
    AlreadyDrew,
    #[error("Discard pile is empty")]
    EmptyDiscardPile,
    #[error("Hand does not go out yet: {0} penalty points remain")]
    CannotGoOut(u32),
    #[error("Round is already complete")]
    RoundComplete,
    #[error("Round has not been dealt yet")]
    NotStarted,
    #[error("Round has already been dealt")]
    AlreadyDealt,
    #[error("A round needs at least one player")]
    NoPlayers,
    #[error("There is no round {0}")]
    InvalidRound(u8),
    #[error(transparent)]
    Card(#[from] CardError),
    #[error(transparent)]
    Deck(#[from] DeckError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawSource {
    Deck,
    DiscardPile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    Deal,
    Draw,
    Discard,
    Complete,
}

#[derive(Debug, Clone)]
pub struct Round {
    number: u8,
    player_names: Vec<String>,
    deck: Deck,
    discard_pile: CardGroup,
    hands: Vec<Hand>,
    current_turn: usize,
    phase: TurnPhase,
    went_out: Option<usize>,
    final_turns_remaining: usize,
    penalties: Vec<Option<u32>>,
    message: String,
}

impl Round {
    pub fn new(number: u8, player_names: Vec<String>, deck: Deck) -> Result<Self, RoundError> {
        if player_names.is_empty() {
            return Err(RoundError::NoPlayers);
        }
        if !(MIN_RANK..=MAX_RANK).contains(&number) {
            return Err(RoundError::InvalidRound(number));
        }

        let hands = player_names.iter().map(|_| Hand::new()).collect();
        let penalties = vec![None; player_names.len()];
        Ok(Self {
            number,
            player_names,
            deck,
            discard_pile: CardGroup::new(),
            hands,
            current_turn: 0,
            phase: TurnPhase::Deal,
            went_out: None,
            final_turns_remaining: 0,
            penalties,
            message: String::new(),
        })
    }

    /// Deals the hands, turns up the first discard and names the first player
    pub fn start(&mut self) -> Result<(), RoundError> {
        if self.phase != TurnPhase::Deal {
            return Err(RoundError::AlreadyDealt);
        }

        // One card at a time, round-robin
        for _ in 0..self.number {
            for hand in self.hands.iter_mut() {
                hand.add(self.deck.deal_one_card()?);
            }
        }
        self.discard_pile.add(self.deck.deal_one_card()?);

        self.current_turn = self.first_player();
        self.phase = TurnPhase::Draw;
        self.set_message(format!(
            "{}, time to draw and discard!",
            self.player_names[self.current_turn]
        ));

        info!(
            round = self.number,
            players = self.player_names.len(),
            first_player = %self.player_names[self.current_turn],
            "Round dealt"
        );
        Ok(())
    }

    /// The first player rotates with the round; two-player games start with
    /// the first seat on the first round.
    fn first_player(&self) -> usize {
        let player_count = self.player_names.len();
        let round = self.number as usize;
        if player_count < 3 {
            (round - 1) % player_count
        } else {
            round % player_count
        }
    }

    pub fn draw(&mut self, player_name: &str, source: DrawSource) -> Result<Card, RoundError> {
        let player = self.check_turn(player_name)?;
        match self.phase {
            TurnPhase::Draw => {}
            TurnPhase::Discard => return Err(RoundError::AlreadyDrew),
            TurnPhase::Deal => return Err(RoundError::NotStarted),
            TurnPhase::Complete => return Err(RoundError::RoundComplete),
        }

        let card = match source {
            DrawSource::Deck => self.draw_from_deck()?,
            DrawSource::DiscardPile => self
                .discard_pile
                .pop()
                .ok_or(RoundError::EmptyDiscardPile)?,
        };

        self.hands[player].add(card);
        self.phase = TurnPhase::Discard;
        debug!(player = %player_name, card = %card, source = ?source, "Card drawn");
        Ok(card)
    }

    /// Deals from the deck, reshuffling all but the top discard under it when it runs out
    fn draw_from_deck(&mut self) -> Result<Card, RoundError> {
        if self.deck.is_empty() {
            if let Some(top) = self.discard_pile.pop() {
                debug!(recycled = self.discard_pile.len(), "Recycling discard pile into deck");
                let mut recycled = Deck::from_cards(self.discard_pile.cards().to_vec());
                recycled.shuffle(&mut rand::rng());
                self.deck.refill(recycled.cards().cards());
                self.discard_pile = CardGroup::from_cards(vec![top]);
            }
        }
        Ok(self.deck.deal_one_card()?)
    }

    pub fn discard(&mut self, player_name: &str, card: Card) -> Result<(), RoundError> {
        let player = self.check_turn(player_name)?;
        self.check_discard_phase()?;

        if let Err(e) = self.hands[player].move_card(&card, &mut self.discard_pile) {
            self.set_message(format!("{}, {} is not in your hand.", player_name, card));
            return Err(e.into());
        }

        debug!(player = %player_name, card = %card, "Card discarded");
        self.end_turn(player);
        Ok(())
    }

    /// Discards `card` and tries to go out with what is left. The hand is
    /// evaluated on a copy so a failed attempt leaves it as it was.
    pub fn go_out(&mut self, player_name: &str, card: Card) -> Result<u32, RoundError> {
        let player = self.check_turn(player_name)?;
        self.check_discard_phase()?;

        if self.went_out.is_some() {
            // Someone already went out, this is just the player's final discard
            self.discard(player_name, card)?;
            return Ok(self.penalties[player].unwrap_or(0));
        }

        let mut trial = self.hands[player].clone();
        if let Err(e) = trial.remove(&card) {
            self.set_message(format!("{}, {} is not in your hand.", player_name, card));
            return Err(e.into());
        }

        let penalty = trial.evaluate_hand(self.number);
        if penalty > 0 {
            self.set_message(format!(
                "{}, your hand does not go out yet ({} points left).",
                player_name, penalty
            ));
            return Err(RoundError::CannotGoOut(penalty));
        }

        self.hands[player] = trial;
        self.discard_pile.add(card);
        self.penalties[player] = Some(0);
        self.went_out = Some(player);
        self.final_turns_remaining = self.player_names.len() - 1;

        info!(player = %player_name, round = self.number, "Player went out");
        self.set_message(format!(
            "{} went out! Everyone else gets one more turn.",
            player_name
        ));
        self.advance_turn();
        Ok(0)
    }

    fn end_turn(&mut self, player: usize) {
        if self.went_out.is_some() {
            let penalty = self.hands[player].evaluate_hand(self.number);
            self.penalties[player] = Some(penalty);
            self.final_turns_remaining = self.final_turns_remaining.saturating_sub(1);
            debug!(
                player = %self.player_names[player],
                penalty = penalty,
                remaining = self.final_turns_remaining,
                "Final turn scored"
            );

            if self.final_turns_remaining == 0 {
                self.phase = TurnPhase::Complete;
                info!(round = self.number, "Round complete");
                self.set_message(format!("Round {} is over.", self.number));
                return;
            }
        }
        self.advance_turn();
    }

    fn advance_turn(&mut self) {
        self.current_turn = (self.current_turn + 1) % self.player_names.len();
        self.phase = TurnPhase::Draw;
        self.set_message(format!(
            "{}, time to draw and discard!",
            self.player_names[self.current_turn]
        ));
    }

    fn check_turn(&self, player_name: &str) -> Result<usize, RoundError> {
        if self.phase == TurnPhase::Complete {
            return Err(RoundError::RoundComplete);
        }
        let expected = &self.player_names[self.current_turn];
        if expected != player_name {
            return Err(RoundError::NotYourTurn {
                expected: expected.clone(),
            });
        }
        Ok(self.current_turn)
    }

    fn check_discard_phase(&self) -> Result<(), RoundError> {
        match self.phase {
            TurnPhase::Discard => Ok(()),
            TurnPhase::Draw => Err(RoundError::MustDrawFirst),
            TurnPhase::Deal => Err(RoundError::NotStarted),
            TurnPhase::Complete => Err(RoundError::RoundComplete),
        }
    }

    fn set_message(&mut self, message: String) {
        self.message = message;
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn player_names(&self) -> &[String] {
        &self.player_names
    }

    pub fn current_player(&self) -> &str {
        &self.player_names[self.current_turn]
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == TurnPhase::Complete
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    pub fn hand(&self, player_name: &str) -> Option<&Hand> {
        let index = self.player_names.iter().position(|n| n == player_name)?;
        self.hands.get(index)
    }

    pub fn discard_pile(&self) -> &CardGroup {
        &self.discard_pile
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn went_out(&self) -> Option<&str> {
        self.went_out.map(|i| self.player_names[i].as_str())
    }

    /// Each player's penalty, in seat order, once the round is complete
    pub fn penalties(&self) -> Option<Vec<u32>> {
        if !self.is_complete() {
            return None;
        }
        self.penalties.iter().copied().collect()
    }
}
