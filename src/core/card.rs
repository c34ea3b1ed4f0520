//! Voice cards.
//!
//! A `Card` is created once per configured `CardSpec` and never destroyed.
//! Its position (`zone`, `lane`) and progression flag mutate over its life;
//! returning to holding is the only way to "reset" it.

use serde::{Deserialize, Serialize};

use super::config::{CardSpec, LaneId, ZoneId};

/// Unique card identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Create a new card ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CardId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A voice card on the board.
///
/// ## Position
///
/// A card is either in holding (`zone == ZoneId::HOLDING`, `lane == None`)
/// or in a processing zone with a lane.
///
/// ## Sequence
///
/// `sequence` increases by one on every committed move. Classification
/// results carry the sequence of the move that requested them and are
/// only applied while it still matches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique card ID.
    pub id: CardId,

    /// Display label, unique across the board.
    pub label: String,

    /// Current zone.
    pub zone: ZoneId,

    /// Current lane. `None` in holding.
    pub lane: Option<LaneId>,

    /// The card cannot progress further without a zone reveal, or is
    /// permanently fixed.
    pub reached_furthest: bool,

    /// Committed move counter.
    pub sequence: u64,

    /// A classification request for the current position is in flight.
    pub processing: bool,
}

impl Card {
    /// Create a card in holding.
    pub fn new(id: impl Into<CardId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            zone: ZoneId::HOLDING,
            lane: None,
            reached_furthest: false,
            sequence: 0,
            processing: false,
        }
    }

    /// Create a card from configuration.
    #[must_use]
    pub fn from_spec(spec: &CardSpec) -> Self {
        Self::new(spec.id.as_str(), spec.label.as_str())
    }

    #[must_use]
    pub fn in_holding(&self) -> bool {
        self.zone.is_holding()
    }

    /// The occupied `(zone, lane)` slot, if outside holding.
    #[must_use]
    pub fn slot(&self) -> Option<(ZoneId, LaneId)> {
        if self.in_holding() {
            return None;
        }
        self.lane.map(|lane| (self.zone, lane))
    }

    /// Check if the card sits at `zone`/`lane`.
    ///
    /// In holding the lane is ignored.
    #[must_use]
    pub fn is_at(&self, zone: ZoneId, lane: Option<LaneId>) -> bool {
        if zone.is_holding() {
            self.in_holding()
        } else {
            self.zone == zone && self.lane == lane
        }
    }
}
