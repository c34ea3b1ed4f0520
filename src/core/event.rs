//! Board events.
//!
//! The presentation layer sends `MoveAttempt`s in; the controller answers
//! with a new state plus `BoardEffect`s for the collaborators around it
//! (classification dispatcher, audio player, zone glow/reveal UI).

use serde::{Deserialize, Serialize};

use super::card::CardId;
use super::config::{LaneId, ZoneId};
use crate::classify::ClassifyRequest;

/// A completed drag: move `card_id` from its source slot to a destination.
///
/// ## Example
///
/// ```
/// use voice_board::core::{LaneId, MoveAttempt, ZoneId};
///
/// // Holding -> Zone 1 / Lane 2
/// let attempt = MoveAttempt::new("voice-a").with_dest(ZoneId::new(1), LaneId::new(2));
///
/// // Zone 1 / Lane 2 -> Holding
/// let back = MoveAttempt::new("voice-a")
///     .with_source(ZoneId::new(1), LaneId::new(2))
///     .with_dest_holding();
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveAttempt {
    /// The dragged card.
    pub card_id: CardId,

    /// Zone the card was dragged from.
    pub source_zone: ZoneId,

    /// Lane the card was dragged from. `None` in holding.
    pub source_lane: Option<LaneId>,

    /// Zone the card was dropped on.
    pub dest_zone: ZoneId,

    /// Lane the card was dropped on. Ignored for holding.
    pub dest_lane: Option<LaneId>,
}

impl MoveAttempt {
    /// Create a holding-to-holding attempt; chain `with_*`.
    pub fn new(card_id: impl Into<CardId>) -> Self {
        Self {
            card_id: card_id.into(),
            source_zone: ZoneId::HOLDING,
            source_lane: None,
            dest_zone: ZoneId::HOLDING,
            dest_lane: None,
        }
    }

    /// Set the source slot (builder pattern).
    #[must_use]
    pub fn with_source(mut self, zone: ZoneId, lane: LaneId) -> Self {
        self.source_zone = zone;
        self.source_lane = Some(lane);
        self
    }

    /// Set the destination slot (builder pattern).
    #[must_use]
    pub fn with_dest(mut self, zone: ZoneId, lane: LaneId) -> Self {
        self.dest_zone = zone;
        self.dest_lane = Some(lane);
        self
    }

    /// Send the card back to holding (builder pattern).
    #[must_use]
    pub fn with_dest_holding(mut self) -> Self {
        self.dest_zone = ZoneId::HOLDING;
        self.dest_lane = None;
        self
    }
}

/// A classification request tied to the move that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationTicket {
    /// Card that moved.
    pub card_id: CardId,

    /// The card's sequence number after the move.
    pub sequence: u64,

    /// Destination slot.
    pub zone: ZoneId,
    pub lane: LaneId,

    /// Wire request for the classification service.
    pub request: ClassifyRequest,
}

/// Side-effect requested by a state transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardEffect {
    /// A card entered a processing zone; show the processing indicator.
    ProcessingStarted {
        card_id: CardId,
        zone: ZoneId,
        lane: LaneId,
    },

    /// Call the classification service.
    Classify(ClassificationTicket),

    /// Drop any in-flight classification for this card.
    CancelClassification(CardId),

    /// A zone became visible.
    ZoneRevealed(ZoneId),

    /// Play an audio clip (fire and forget).
    PlayAudio(String),
}

impl BoardEffect {
    /// Card this effect concerns, if any.
    #[must_use]
    pub fn card_id(&self) -> Option<&CardId> {
        match self {
            BoardEffect::ProcessingStarted { card_id, .. } => Some(card_id),
            BoardEffect::Classify(ticket) => Some(&ticket.card_id),
            BoardEffect::CancelClassification(card_id) => Some(card_id),
            BoardEffect::ZoneRevealed(_) | BoardEffect::PlayAudio(_) => None,
        }
    }
}
