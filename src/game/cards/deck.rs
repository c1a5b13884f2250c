use rand::seq::SliceRandom;
use rand::Rng;
use strum::IntoEnumIterator;
use thiserror::Error;

use super::basic::{Card, Suit, MAX_RANK, MIN_RANK};
use super::group::CardGroup;

/// Ranks carried by the two physical jokers
pub const JOKER_IDS: [u8; 2] = [3, 4];
/// Cards in one pack: 3 through King in four suits, plus the jokers
pub const PACK_SIZE: usize = 46;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("Deck is empty")]
    Empty,
}

/// 44 suited cards (3 through King in four suits) and two jokers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: CardGroup,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    /// An unshuffled deck, suit by suit, with the jokers on top
    pub fn new() -> Self {
        let mut cards: CardGroup = Suit::iter()
            .filter(|suit| !suit.is_joker())
            .flat_map(|suit| (MIN_RANK..=MAX_RANK).map(move |rank| (suit, rank)))
            .filter_map(|(suit, rank)| Card::new(suit, rank).ok())
            .collect();
        for id in JOKER_IDS {
            if let Ok(joker) = Card::joker(id) {
                cards.add(joker);
            }
        }
        Self { cards }
    }

    /// A deck that deals `cards` from the end, in the given order otherwise untouched
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self {
            cards: CardGroup::from_cards(cards),
        }
    }

    /// `packs` unshuffled packs stacked on top of each other
    pub fn with_packs(packs: usize) -> Self {
        let pack = Self::new();
        let mut cards = CardGroup::new();
        for _ in 0..packs.max(1) {
            cards.add_many(pack.cards.cards());
        }
        Self { cards }
    }

    /// Enough packs to deal every player a full thirteen-card hand and turn
    /// up a card
    pub fn for_table(player_count: usize) -> Self {
        let needed = player_count * MAX_RANK as usize + 1;
        Self::with_packs(needed.div_ceil(PACK_SIZE))
    }

    pub fn shuffled() -> Self {
        let mut deck = Self::new();
        deck.shuffle(&mut rand::rng());
        deck
    }

    pub fn shuffled_for_table(player_count: usize) -> Self {
        let mut deck = Self::for_table(player_count);
        deck.shuffle(&mut rand::rng());
        deck
    }

    /// Uniform Fisher-Yates shuffle
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut cards = self.cards.cards().to_vec();
        cards.shuffle(rng);
        self.cards = CardGroup::from_cards(cards);
    }

    pub fn deal_one_card(&mut self) -> Result<Card, DeckError> {
        self.cards.pop().ok_or(DeckError::Empty)
    }

    pub fn cards(&self) -> &CardGroup {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Puts cards back under the deck, used to recycle the discard pile
    pub fn refill(&mut self, cards: &[Card]) {
        let mut refilled = CardGroup::from_cards(cards.to_vec());
        refilled.add_many(self.cards.cards());
        self.cards = refilled;
    }
}
