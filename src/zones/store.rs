//! Card position store.
//!
//! The `PositionStore` is the authoritative record of every card's zone,
//! lane, and progression flag. It applies already-validated moves and
//! enforces the one store-level rule: at most one card per processing
//! `(zone, lane)` slot.

use im::{HashMap as ImHashMap, Vector};
use tracing::debug;

use crate::core::card::{Card, CardId};
use crate::core::config::{BoardConfig, LaneId, ZoneId};
use crate::core::error::{DenyReason, MoveError};
use crate::lanes::LanePolicy;

/// A move the store has applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitResult {
    pub card_id: CardId,
    pub label: String,
    pub source_zone: ZoneId,
    pub source_lane: Option<LaneId>,
    pub dest_zone: ZoneId,
    pub dest_lane: Option<LaneId>,
    /// The card's sequence number after the move.
    pub sequence: u64,
    /// The card's recomputed progression flag.
    pub reached_furthest: bool,
}

impl CommitResult {
    /// Did the card move to a later zone?
    #[must_use]
    pub fn is_forward(&self) -> bool {
        self.dest_zone > self.source_zone
    }

    /// Did the card move to an earlier zone (including holding)?
    #[must_use]
    pub fn is_backward(&self) -> bool {
        self.dest_zone < self.source_zone
    }
}

/// Tracks where every card is.
///
/// Uses `im` persistent structures so a `BoardState` holding this store
/// clones in O(1).
///
/// ## Usage
///
/// ```
/// use voice_board::core::{Card, CardId, LaneId, ZoneId};
/// use voice_board::lanes::LanePolicy;
/// use voice_board::zones::PositionStore;
///
/// let mut store = PositionStore::new();
/// store.add_card(Card::new("voice-a", "Voice A"));
///
/// let policy = LanePolicy::new();
/// let id = CardId::new("voice-a");
/// store
///     .move_card(&id, ZoneId::new(1), Some(LaneId::new(2)), &policy, ZoneId::new(3))
///     .unwrap();
///
/// assert_eq!(store.occupant(ZoneId::new(1), LaneId::new(2)).map(|c| &c.id), Some(&id));
/// ```
#[derive(Clone, Debug, Default)]
pub struct PositionStore {
    /// Cards in configuration order.
    cards: Vector<Card>,

    /// card id -> index in `cards`
    index: ImHashMap<CardId, usize>,
}

impl PositionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with every configured card in holding.
    #[must_use]
    pub fn from_config(config: &BoardConfig) -> Self {
        let mut store = Self::new();
        for spec in &config.cards {
            store.add_card(Card::from_spec(spec));
        }
        store
    }

    /// Add a card.
    ///
    /// Panics if a card with the same ID already exists.
    pub fn add_card(&mut self, card: Card) {
        if self.index.contains_key(&card.id) {
            panic!("Card {} already exists in position store", card.id);
        }

        self.index.insert(card.id.clone(), self.cards.len());
        self.cards.push_back(card);
    }

    /// Get a card by ID.
    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&Card> {
        let &i = self.index.get(id)?;
        self.cards.get(i)
    }

    fn get_mut(&mut self, id: &CardId) -> Option<&mut Card> {
        let &i = self.index.get(id)?;
        self.cards.get_mut(i)
    }

    /// Iterate over all cards in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter()
    }

    /// Total number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.index.contains_key(id)
    }

    /// The card in a processing slot. Always `None` for holding.
    #[must_use]
    pub fn occupant(&self, zone: ZoneId, lane: LaneId) -> Option<&Card> {
        if zone.is_holding() {
            return None;
        }
        self.cards
            .iter()
            .find(|card| card.zone == zone && card.lane == Some(lane))
    }

    /// Cards currently in a zone.
    pub fn cards_in_zone(&self, zone: ZoneId) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter().filter(move |card| card.zone == zone)
    }

    /// Number of cards in a zone.
    #[must_use]
    pub fn zone_size(&self, zone: ZoneId) -> usize {
        self.cards_in_zone(zone).count()
    }

    /// Is every given lane of `zone` occupied?
    pub fn is_zone_full(&self, zone: ZoneId, mut lanes: impl Iterator<Item = LaneId>) -> bool {
        !zone.is_holding() && lanes.all(|lane| self.occupant(zone, lane).is_some())
    }

    /// Move a card whose move has already passed validation.
    ///
    /// Fails with `LaneOccupied` if a different card holds the destination
    /// slot. On success the card's `reached_furthest` flag is recomputed:
    /// - `false` when moved into holding
    /// - `true` when the destination lane is sticky, the destination is
    ///   `terminal`, or the card moved forward
    /// - unchanged otherwise (a lane shuffle inside a zone)
    ///
    /// The card's sequence is bumped and its processing flag set for any
    /// processing-zone destination.
    pub fn move_card(
        &mut self,
        id: &CardId,
        dest_zone: ZoneId,
        dest_lane: Option<LaneId>,
        policy: &LanePolicy,
        terminal: ZoneId,
    ) -> Result<CommitResult, MoveError> {
        if !self.contains(id) {
            return Err(MoveError::UnknownCard(id.clone()));
        }

        let dest_lane = if dest_zone.is_holding() {
            None
        } else {
            let lane = dest_lane.ok_or(MoveError::MissingLane(dest_zone))?;
            if let Some(occupant) = self.occupant(dest_zone, lane) {
                if &occupant.id != id {
                    debug!(card = %id, occupant = %occupant.id, zone = %dest_zone, lane = %lane, "Destination lane occupied");
                    return Err(DenyReason::LaneOccupied.into());
                }
            }
            Some(lane)
        };

        let card = self
            .get_mut(id)
            .ok_or_else(|| MoveError::UnknownCard(id.clone()))?;

        let source_zone = card.zone;
        let source_lane = card.lane;

        card.reached_furthest = match dest_lane {
            None => false,
            Some(lane) => {
                policy.is_sticky(dest_zone, lane)
                    || dest_zone == terminal
                    || dest_zone > source_zone
                    || card.reached_furthest
            }
        };
        card.zone = dest_zone;
        card.lane = dest_lane;
        card.sequence += 1;
        card.processing = dest_lane.is_some();

        Ok(CommitResult {
            card_id: card.id.clone(),
            label: card.label.clone(),
            source_zone,
            source_lane,
            dest_zone,
            dest_lane,
            sequence: card.sequence,
            reached_furthest: card.reached_furthest,
        })
    }

    /// Send a card back to holding.
    ///
    /// Denied with `Sticky` if the card is locked in a sticky lane.
    pub fn reset_to_holding(
        &mut self,
        id: &CardId,
        policy: &LanePolicy,
    ) -> Result<CommitResult, MoveError> {
        let card = self
            .get(id)
            .ok_or_else(|| MoveError::UnknownCard(id.clone()))?;

        if policy.locks(card.zone, card.lane) {
            return Err(DenyReason::Sticky.into());
        }

        self.move_card(id, ZoneId::HOLDING, None, policy, ZoneId::HOLDING)
    }

    /// Clear `reached_furthest` for every card that is neither locked in a
    /// sticky lane nor already at or beyond `revealed`.
    ///
    /// Returns how many flags were cleared.
    pub fn reset_reached_furthest(&mut self, revealed: ZoneId, policy: &LanePolicy) -> usize {
        let mut cleared = 0;
        for card in self.cards.iter_mut() {
            if card.zone >= revealed || policy.locks(card.zone, card.lane) {
                continue;
            }
            if card.reached_furthest {
                card.reached_furthest = false;
                cleared += 1;
            }
        }
        cleared
    }

    /// Set a card's processing indicator.
    ///
    /// Returns `false` if the card doesn't exist.
    pub fn set_processing(&mut self, id: &CardId, processing: bool) -> bool {
        match self.get_mut(id) {
            Some(card) => {
                card.processing = processing;
                true
            }
            None => false,
        }
    }
}
