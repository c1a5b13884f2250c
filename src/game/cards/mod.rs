pub mod basic;
pub mod deck;
pub mod group;
pub mod hand;

pub use basic::{Card, CardError, RawCard, Suit, MAX_RANK, MIN_RANK};
pub use deck::{Deck, DeckError, JOKER_IDS, PACK_SIZE};
pub use group::CardGroup;
pub use hand::{
    card_penalty, sort_into_runs, wild_cards, EvaluationStage, Hand, FACE_CARD_PENALTY,
    JOKER_PENALTY, MINIMUM_SET,
};
