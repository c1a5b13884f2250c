use std::fmt;

use super::basic::{Card, CardError, Suit};

/// An ordered bag of cards with all-or-nothing removal.
///
/// Order is insertion order. It only matters for display and for `pop`,
/// which deals from the end of a deck.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CardGroup {
    cards: Vec<Card>,
}

impl CardGroup {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Returns the card at `index` without removing it
    pub fn get_card_at(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.position(card).is_some()
    }

    pub fn first(&self) -> Option<&Card> {
        self.cards.first()
    }

    pub fn last(&self) -> Option<&Card> {
        self.cards.last()
    }

    /// Removes and returns the last card
    pub fn pop(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Removes and returns the first card
    pub fn shift(&mut self) -> Option<Card> {
        if self.cards.is_empty() {
            return None;
        }
        Some(self.cards.remove(0))
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn add_many(&mut self, cards: &[Card]) {
        self.cards.extend_from_slice(cards);
    }

    fn position(&self, card: &Card) -> Option<usize> {
        self.cards.iter().position(|c| c == card)
    }

    /// Removes the first card equal to `card` and returns it.
    /// The group is unchanged on failure.
    pub fn remove(&mut self, card: &Card) -> Result<Card, CardError> {
        match self.position(card) {
            Some(index) => Ok(self.cards.remove(index)),
            None => Err(CardError::CardNotFound(*card)),
        }
    }

    /// Removes every card in `cards`, or none of them.
    ///
    /// Presence is checked against a scratch copy with each card removed in
    /// turn, so asking for the same card twice fails when only one is held.
    pub fn remove_many(&mut self, cards: &[Card]) -> Result<(), CardError> {
        let mut remaining = self.cards.clone();
        for card in cards {
            match remaining.iter().position(|c| c == card) {
                Some(index) => {
                    remaining.remove(index);
                }
                None => return Err(CardError::CardNotFound(*card)),
            }
        }
        self.cards = remaining;
        Ok(())
    }

    /// Moves one card from this group into `target`.
    /// `target` is untouched when the card is missing.
    pub fn move_card(&mut self, card: &Card, target: &mut CardGroup) -> Result<(), CardError> {
        let card = self.remove(card)?;
        target.add(card);
        Ok(())
    }

    /// Moves each card of `group` from this group into `target`, all or nothing.
    pub fn move_group(&mut self, group: &CardGroup, target: &mut CardGroup) -> Result<(), CardError> {
        self.remove_many(group.cards())?;
        target.add_many(group.cards());
        Ok(())
    }

    /// Removes the cards of `group` from this group and appends `group` itself
    /// as one unit onto `target`, all or nothing.
    pub fn move_group_to_group_array(
        &mut self,
        group: CardGroup,
        target: &mut Vec<CardGroup>,
    ) -> Result<(), CardError> {
        self.remove_many(group.cards())?;
        target.push(group);
        Ok(())
    }

    /// Copies of every card of the given suit, in group order
    pub fn filter_by_suit(&self, suit: Suit) -> CardGroup {
        self.iter().filter(|c| c.suit() == suit).copied().collect()
    }

    /// Copies of every non-joker card of the given rank, in group order.
    /// A joker's rank only identifies the physical card, so jokers never match.
    pub fn filter_by_rank(&self, rank: u8) -> CardGroup {
        self.iter()
            .filter(|c| !c.is_joker() && c.rank() == rank)
            .copied()
            .collect()
    }
}

impl FromIterator<Card> for CardGroup {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CardGroup {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

impl fmt::Display for CardGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards: Vec<String> = self.cards.iter().map(|c| c.to_string()).collect();
        write!(f, "[{}]", cards.join(", "))
    }
}
