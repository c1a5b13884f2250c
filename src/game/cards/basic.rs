use std::fmt;
use strum_macros::EnumIter;
use thiserror::Error;

/// Lowest rank printed on a Three 13 card.
pub const MIN_RANK: u8 = 3;
/// Highest rank (King).
pub const MAX_RANK: u8 = 13;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    #[error("Invalid suit or rank: {suit}, {rank}")]
    InvalidCard { suit: Suit, rank: u8 },
    #[error("Remove Error: {0} not in group.")]
    CardNotFound(Card),
    #[error("Invalid group size: {0} cards, a run or set needs at least 3")]
    InvalidGroupSize(usize),
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, EnumIter,
)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
    Joker,
}

impl Suit {
    pub fn is_joker(&self) -> bool {
        matches!(self, Suit::Joker)
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Suit::Clubs => "Clubs",
                Suit::Diamonds => "Diamonds",
                Suit::Hearts => "Hearts",
                Suit::Spades => "Spades",
                Suit::Joker => "Joker",
            }
        )
    }
}

impl TryFrom<&str> for Suit {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "Clubs" => Ok(Suit::Clubs),
            "Diamonds" => Ok(Suit::Diamonds),
            "Hearts" => Ok(Suit::Hearts),
            "Spades" => Ok(Suit::Spades),
            "Joker" => Ok(Suit::Joker),
            _ => Err(s.to_string()),
        }
    }
}

/// Wire shape of a card before validation.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct RawCard {
    pub suit: Suit,
    pub rank: u8,
}

/// An immutable playing card.
///
/// A joker's rank carries no ranking meaning; it only tells the two physical
/// jokers (3 and 4) apart so that removing one never removes the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawCard", into = "RawCard")]
pub struct Card {
    suit: Suit,
    rank: u8,
}

impl TryFrom<RawCard> for Card {
    type Error = CardError;

    fn try_from(raw: RawCard) -> Result<Self, Self::Error> {
        Card::new(raw.suit, raw.rank)
    }
}

impl From<Card> for RawCard {
    fn from(card: Card) -> Self {
        RawCard {
            suit: card.suit,
            rank: card.rank,
        }
    }
}

impl Card {
    pub fn new(suit: Suit, rank: u8) -> Result<Self, CardError> {
        if !(MIN_RANK..=MAX_RANK).contains(&rank) {
            return Err(CardError::InvalidCard { suit, rank });
        }
        Ok(Self { suit, rank })
    }

    pub fn joker(id: u8) -> Result<Self, CardError> {
        Self::new(Suit::Joker, id)
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn is_joker(&self) -> bool {
        self.suit.is_joker()
    }

    /// Jokers are always wild; otherwise a card is wild when its rank matches the round.
    pub fn is_wild(&self, round: u8) -> bool {
        self.is_joker() || self.rank == round
    }

    fn rank_name(&self) -> String {
        match self.rank {
            11 => "Jack".to_string(),
            12 => "Queen".to_string(),
            13 => "King".to_string(),
            rank => rank.to_string(),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_joker() {
            return write!(f, "<Joker>");
        }
        write!(f, "<{} of {}>", self.rank_name(), self.suit)
    }
}
