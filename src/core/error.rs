//! Error types.
//!
//! - `DenyReason`: why a move was rejected. Always recoverable: the card
//!   snaps back to where it was dragged from.
//! - `MoveError`: a rejected move or a malformed move event.
//! - `ConfigError`: configuration loading and validation failures.
//! - `ClassifyError`: classification service failures. These never touch
//!   zone/lane state.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::card::CardId;
use super::config::{LaneId, ZoneId};

/// Why a move was rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenyReason {
    /// The card sits in a sticky lane and can never move again.
    #[error("card is locked in a sticky lane")]
    Sticky,

    /// The card sits in a blocking lane and cannot advance.
    #[error("card is in a blocking lane and cannot advance")]
    Blocking,

    /// Destination is not next to the source zone.
    #[error("destination zone is not adjacent")]
    NotAdjacent,

    /// Processing zones only move forward.
    #[error("cards cannot move back to an earlier zone")]
    BackwardBlocked,

    /// Destination zone has not been revealed yet.
    #[error("destination zone is not revealed yet")]
    ZoneHidden,

    /// Another card holds the destination lane.
    #[error("destination lane is occupied")]
    LaneOccupied,
}

/// Move attempt failure.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    /// Rejected by the movement rules.
    #[error("move denied: {0}")]
    Denied(#[from] DenyReason),

    #[error("unknown card: {0}")]
    UnknownCard(CardId),

    #[error("unknown zone: {0}")]
    UnknownZone(ZoneId),

    #[error("unknown lane {lane} in {zone}")]
    UnknownLane { zone: ZoneId, lane: LaneId },

    /// A processing zone destination needs a lane.
    #[error("no lane given for {0}")]
    MissingLane(ZoneId),

    /// The event's source disagrees with the card's recorded position.
    #[error("card {card} is not at {zone} / {lane:?}")]
    SourceMismatch {
        card: CardId,
        zone: ZoneId,
        lane: Option<LaneId>,
    },
}

impl MoveError {
    /// Is this a rule rejection (as opposed to a malformed event)?
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, MoveError::Denied(_))
    }

    /// The rule that rejected the move, if any.
    #[must_use]
    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            MoveError::Denied(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// Configuration failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one processing zone is required")]
    NoZones,

    #[error("at least one lane is required")]
    NoLanes,

    #[error("at least one card is required")]
    NoCards,

    #[error("too many zones: {0}")]
    TooManyZones(usize),

    #[error("{lane} is out of range in zone {zone:?}")]
    LaneOutOfRange { zone: String, lane: LaneId },

    #[error("completion lane {0} is out of range")]
    CompletionLaneOutOfRange(LaneId),

    #[error("duplicate card id: {0}")]
    DuplicateCardId(String),

    #[error("duplicate card label: {0}")]
    DuplicateLabel(String),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Classification service failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// Transport failure (connection refused, DNS, TLS, ...).
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status.
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// No response within the configured timeout (carried for logging).
    #[error("API request timed out. The server might be overloaded or unreachable.")]
    Timeout(Duration),

    /// The service answered with `status: "error"`.
    #[error("{0}")]
    Failed(String),
}
