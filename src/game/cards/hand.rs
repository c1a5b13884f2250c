use std::cmp::Ordering;

use strum::IntoEnumIterator;
use tracing::{debug, instrument, warn};

use super::basic::{Card, CardError, Suit};
use super::group::CardGroup;

/// A run or set must have at least 3 cards in it
pub const MINIMUM_SET: usize = 3;
/// Stranded jokers are free under the current rules
pub const JOKER_PENALTY: u32 = 0;
/// Jack, Queen and King each cost a flat 10
pub const FACE_CARD_PENALTY: u32 = 10;

/// How far the last call to [`Hand::evaluate_hand`] got.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EvaluationStage {
    #[default]
    Raw,
    RunsExtracted,
    SetsExtracted,
    WildsSettled,
    Scored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    First,
    Last,
}

/// A long run that can give up one edge card to a set.
#[derive(Debug, Clone, Copy)]
struct Donor {
    index: usize,
    edge: Edge,
}

/// The cards a player holds, plus the groups carved out of them when the hand
/// is evaluated at the end of a round.
///
/// Every card that was in the hand when evaluation started ends up in exactly
/// one of `cards` (unresolved), a `processed_cards` group or a `long_runs` group.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Hand {
    cards: CardGroup,
    processed_cards: Vec<CardGroup>,
    long_runs: Vec<CardGroup>,
    stage: EvaluationStage,
}

/// Every wild card in `group` for this round: jokers first, then natural
/// cards of the round's rank.
///
/// Runs pad from the front of this list, so a round-rank card that may still
/// belong to a natural run is the last thing a short run takes. Sets pad from
/// the back.
///
/// Callers re-query this against the live hand at each step rather than
/// caching it, so cards spent by an earlier stage are gone for later ones.
pub fn wild_cards(group: &CardGroup, round: u8) -> CardGroup {
    let mut wilds = group.filter_by_suit(Suit::Joker);
    wilds.add_many(group.filter_by_rank(round).cards());
    wilds
}

/// Splits single-suit cards into maximal runs of consecutive ranks, ascending.
/// e.g. ranks 4,5,7,8,9,12 become [4,5], [7,8,9], [12].
pub fn sort_into_runs(cards: &CardGroup) -> Vec<CardGroup> {
    let mut sorted = cards.cards().to_vec();
    sorted.sort_by_key(|c| c.rank());

    let mut runs: Vec<CardGroup> = Vec::new();
    let mut current = CardGroup::new();
    for card in sorted {
        if let Some(previous) = current.last() {
            if card.rank() != previous.rank() + 1 {
                runs.push(std::mem::take(&mut current));
            }
        }
        current.add(card);
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Penalty for one card left unresolved in a hand
pub fn card_penalty(card: &Card) -> u32 {
    if card.is_joker() {
        return JOKER_PENALTY;
    }
    match card.rank() {
        rank if rank <= 10 => rank as u32,
        _ => FACE_CARD_PENALTY,
    }
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self {
            cards: CardGroup::from_cards(cards),
            ..Self::default()
        }
    }

    pub fn cards(&self) -> &[Card] {
        self.cards.cards()
    }

    pub fn group(&self) -> &CardGroup {
        &self.cards
    }

    pub fn processed_cards(&self) -> &[CardGroup] {
        &self.processed_cards
    }

    pub fn long_runs(&self) -> &[CardGroup] {
        &self.long_runs
    }

    pub fn stage(&self) -> EvaluationStage {
        self.stage
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }

    pub fn get_card_at(&self, index: usize) -> Option<&Card> {
        self.cards.get_card_at(index)
    }

    pub fn add(&mut self, card: Card) {
        self.cards.add(card);
    }

    pub fn add_many(&mut self, cards: &[Card]) {
        self.cards.add_many(cards);
    }

    pub fn remove(&mut self, card: &Card) -> Result<Card, CardError> {
        self.cards.remove(card)
    }

    pub fn remove_many(&mut self, cards: &[Card]) -> Result<(), CardError> {
        self.cards.remove_many(cards)
    }

    pub fn move_card(&mut self, card: &Card, target: &mut CardGroup) -> Result<(), CardError> {
        self.cards.move_card(card, target)
    }

    /// Partitions the hand into runs, sets and leftovers and returns the
    /// penalty for the leftovers. Cards of rank `round` are wild, as are jokers.
    ///
    /// A candidate group that cannot be completed is abandoned and stays in
    /// the hand; evaluation itself never fails.
    #[instrument(skip(self), fields(cards = self.cards.len()))]
    pub fn evaluate_hand(&mut self, round: u8) -> u32 {
        let wild_count = wild_cards(&self.cards, round).len();

        if !self.cards.is_empty() && wild_count == self.cards.len() {
            debug!("Every card is wild, hand goes out as one group");
            let everything = std::mem::take(&mut self.cards);
            self.processed_cards.push(everything);
        } else {
            self.process_runs_from_hand(round);
            self.stage = EvaluationStage::RunsExtracted;

            self.process_sets_from_hand(round);
            self.stage = EvaluationStage::SetsExtracted;

            self.settle_wild_cards(round);
            self.stage = EvaluationStage::WildsSettled;
        }

        let penalty = self.calculate_penalty();
        self.stage = EvaluationStage::Scored;

        debug!(
            penalty = penalty,
            processed = self.processed_cards.len(),
            long_runs = self.long_runs.len(),
            leftovers = self.cards.len(),
            "Hand evaluated"
        );
        penalty
    }

    /// Sum of the penalties of every card still in the hand
    pub fn calculate_penalty(&self) -> u32 {
        self.cards.iter().map(card_penalty).sum()
    }

    /// For every suit with at least 3 cards:
    ///  - 3 card runs are final
    ///  - longer runs are held back in `long_runs` so sets can borrow an edge card
    ///  - 1 or 2 card runs are padded with wilds, or left in the hand
    fn process_runs_from_hand(&mut self, round: u8) {
        for suit in Suit::iter().filter(|s| !s.is_joker()) {
            let cards_of_suit = self.cards.filter_by_suit(suit);
            if cards_of_suit.len() < MINIMUM_SET {
                continue;
            }

            for run in sort_into_runs(&cards_of_suit) {
                let result = match run.len().cmp(&MINIMUM_SET) {
                    Ordering::Equal => self.commit_group(run),
                    Ordering::Greater => self
                        .cards
                        .move_group_to_group_array(run, &mut self.long_runs),
                    Ordering::Less => self.complete_with_wild_cards(run, round).map(|_| ()),
                };

                if let Err(e) = result {
                    warn!(suit = %suit, error = %e, "Abandoning run");
                }
            }
        }
    }

    /// Same-rank groups, highest rank first so the most expensive cards get
    /// first claim on long-run edges and wilds. The round's own rank is not
    /// grouped here; those cards are wild.
    fn process_sets_from_hand(&mut self, round: u8) {
        for rank in self.set_ranks(round) {
            let cards_of_rank = self.cards.filter_by_rank(rank);

            let result = if cards_of_rank.len() >= MINIMUM_SET {
                self.commit_group(cards_of_rank).map(|_| true)
            } else {
                self.complete_set(cards_of_rank, rank, round)
            };

            match result {
                Ok(true) => {}
                Ok(false) => debug!(rank = rank, "Set left unresolved"),
                Err(e) => warn!(rank = rank, error = %e, "Abandoning set"),
            }
        }
    }

    /// Distinct natural ranks in the hand excluding `round`, descending
    fn set_ranks(&self, round: u8) -> Vec<u8> {
        let mut ranks: Vec<u8> = self
            .cards
            .iter()
            .filter(|c| !c.is_joker() && c.rank() != round)
            .map(|c| c.rank())
            .collect();
        ranks.sort_unstable_by(|a, b| b.cmp(a));
        ranks.dedup();
        ranks
    }

    /// Moves `group` out of the hand into `processed_cards`
    fn commit_group(&mut self, group: CardGroup) -> Result<(), CardError> {
        if group.len() < MINIMUM_SET {
            return Err(CardError::InvalidGroupSize(group.len()));
        }
        self.cards
            .move_group_to_group_array(group, &mut self.processed_cards)
    }

    /// Wilds still in the hand that are not part of `candidate`
    fn available_wild_cards(&self, candidate: &[Card], round: u8) -> Result<CardGroup, CardError> {
        let mut rest = self.cards.clone();
        rest.remove_many(candidate)?;
        Ok(wild_cards(&rest, round))
    }

    /// Pads a short candidate (all of whose cards are in the hand) with wilds
    /// and commits it. Returns `Ok(false)` without touching anything when
    /// there are not enough wilds.
    fn complete_with_wild_cards(&mut self, candidate: CardGroup, round: u8) -> Result<bool, CardError> {
        let shortfall = MINIMUM_SET.saturating_sub(candidate.len());
        let wilds = self.available_wild_cards(candidate.cards(), round)?;
        if wilds.len() < shortfall {
            debug!(
                candidate = %candidate,
                wilds = wilds.len(),
                "Not enough wild cards to complete run"
            );
            return Ok(false);
        }

        let mut group = candidate;
        group.add_many(&wilds.cards()[..shortfall]);
        self.commit_group(group)?;
        Ok(true)
    }

    /// Long runs whose edge card has this rank, checking every last card
    /// before any first card, up to `limit` donors.
    fn plan_donors(&self, rank: u8, limit: usize) -> Vec<Donor> {
        let mut donors: Vec<Donor> = Vec::new();
        for edge in [Edge::Last, Edge::First] {
            for (index, run) in self.long_runs.iter().enumerate() {
                if donors.len() == limit {
                    return donors;
                }
                if donors.iter().any(|d| d.index == index) {
                    continue;
                }
                let edge_card = match edge {
                    Edge::Last => run.last(),
                    Edge::First => run.first(),
                };
                if edge_card.is_some_and(|c| !c.is_joker() && c.rank() == rank) {
                    donors.push(Donor { index, edge });
                }
            }
        }
        donors
    }

    /// Tries to finish a short set by borrowing long-run edge cards, then
    /// wilds. Everything is staged on copies and only swapped in once the set
    /// is known to complete, so a failed attempt leaves no trace.
    fn complete_set(&mut self, candidate: CardGroup, rank: u8, round: u8) -> Result<bool, CardError> {
        let needed = MINIMUM_SET.saturating_sub(candidate.len());
        let donors = self.plan_donors(rank, needed);
        let shortfall = needed - donors.len();

        let wilds: Vec<Card> = if shortfall > 0 {
            let pool = self.available_wild_cards(candidate.cards(), round)?;
            if pool.len() < shortfall {
                debug!(
                    rank = rank,
                    borrowed = donors.len(),
                    wilds = pool.len(),
                    "Not enough long-run edges or wild cards to complete set"
                );
                return Ok(false);
            }
            pool.iter().rev().take(shortfall).copied().collect()
        } else {
            Vec::new()
        };

        let mut hand_cards = candidate.cards().to_vec();
        hand_cards.extend_from_slice(&wilds);
        let mut remaining = self.cards.clone();
        remaining.remove_many(&hand_cards)?;

        let mut long_runs = self.long_runs.clone();
        let mut set = candidate;
        for donor in &donors {
            let run = &mut long_runs[donor.index];
            let borrowed = match donor.edge {
                Edge::Last => run.pop(),
                Edge::First => run.shift(),
            };
            match borrowed {
                Some(card) if card.rank() == rank => set.add(card),
                Some(card) => return Err(CardError::CardNotFound(card)),
                None => return Err(CardError::InvalidGroupSize(0)),
            }
        }
        set.add_many(&wilds);

        if set.len() < MINIMUM_SET {
            return Err(CardError::InvalidGroupSize(set.len()));
        }

        self.cards = remaining;
        self.long_runs = long_runs;
        debug!(set = %set, borrowed = donors.len(), "Set completed");
        self.processed_cards.push(set);

        // A long run that drops to exactly 3 cards is an ordinary run now
        let mut indices: Vec<usize> = donors.iter().map(|d| d.index).collect();
        indices.sort_unstable_by(|a, b| b.cmp(a));
        let mut promoted: Vec<CardGroup> = Vec::new();
        for index in indices {
            if self.long_runs[index].len() == MINIMUM_SET {
                promoted.push(self.long_runs.remove(index));
            }
        }
        promoted.reverse();
        self.processed_cards.extend(promoted);

        Ok(true)
    }

    /// Wilds nobody needed ride along with the first processed group, or the
    /// first long run when nothing was processed.
    fn settle_wild_cards(&mut self, round: u8) {
        let wilds = wild_cards(&self.cards, round);
        if wilds.is_empty() {
            return;
        }

        let target = if let Some(group) = self.processed_cards.first_mut() {
            group
        } else if let Some(run) = self.long_runs.first_mut() {
            run
        } else {
            debug!(wilds = wilds.len(), "No group to attach leftover wild cards to");
            return;
        };

        if let Err(e) = self.cards.move_group(&wilds, target) {
            warn!(error = %e, "Could not settle leftover wild cards");
        }
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cards)
    }
}
