//! Builders for decks whose deal order is known up front
#![allow(dead_code)] // Test utilities may not all be used in every test

use three13::{Card, Deck};

// ============================================================================
// Card Creation Macro
// ============================================================================

#[macro_export]
macro_rules! cards {
    ($($rank:literal $suit:ident),* $(,)?) => {
        vec![$(three13::Card::new(three13::Suit::$suit, $rank).unwrap()),*]
    };
}

// ============================================================================
// Deck Setup Utilities
// ============================================================================

/// Stacks a deck so that a round deals each seat its listed hand, turns up
/// `up_card`, and then hands out `draws` in order.
pub struct DeckBuilder {
    hands: Vec<Vec<Card>>,
    up_card: Option<Card>,
    draws: Vec<Card>,
}

impl DeckBuilder {
    pub fn new() -> Self {
        Self {
            hands: vec![],
            up_card: None,
            draws: vec![],
        }
    }

    /// Hands in seat order; every hand must hold the round's card count
    pub fn with_hands(mut self, hands: Vec<Vec<Card>>) -> Self {
        self.hands = hands;
        self
    }

    pub fn with_up_card(mut self, card: Card) -> Self {
        self.up_card = Some(card);
        self
    }

    pub fn with_draws(mut self, draws: Vec<Card>) -> Self {
        self.draws = draws;
        self
    }

    pub fn build(self) -> Deck {
        let hand_size = self.hands.first().map_or(0, Vec::len);
        assert!(
            self.hands.iter().all(|hand| hand.len() == hand_size),
            "every seat needs the same number of cards"
        );

        // Dealing is one card at a time, round-robin from seat 0
        let mut deal_order = Vec::new();
        for i in 0..hand_size {
            for hand in &self.hands {
                deal_order.push(hand[i]);
            }
        }
        deal_order.extend(self.up_card);
        deal_order.extend(self.draws);

        deal_order.reverse();
        Deck::from_cards(deal_order)
    }
}

impl Default for DeckBuilder {
    fn default() -> Self {
        Self::new()
    }
}
