//! # voice-board
//!
//! Movement validation and zone progression for a drag-and-drop voice card
//! board.
//!
//! Cards start in holding and are dragged through an ordered sequence of
//! processing zones. Each zone has parallel lanes; a lane may be sticky
//! (its card never moves again) or blocking (its card never advances).
//! Later zones stay hidden until the zone before them completes.
//!
//! ## Design Principles
//!
//! 1. **Configuration Over Convention**: Zones, lanes, lane rules, and cards
//!    come from `BoardConfig`. Nothing about the stock board is hardcoded.
//!
//! 2. **Reducer, Not Widgets**: `ProgressionController::apply_move` takes a
//!    state and an event and returns the next state plus side effects. The
//!    input state is never mutated.
//!
//! 3. **Persistent Data Structures**: O(1) state cloning via `im-rs`.
//!
//! ## Modules
//!
//! - `core`: Configuration, cards, events, errors, state
//! - `lanes`: Sticky/blocking lane lookup
//! - `rules`: `MoveRules` trait and the standard movement rules
//! - `zones`: Card positions, historical presence, zone reveal
//! - `progression`: The reducer tying the above together
//! - `classify`: Classification service client and async dispatch
//!
//! ## Example
//!
//! ```
//! use voice_board::{BoardConfig, LaneId, MoveAttempt, ProgressionController, ZoneId};
//!
//! let controller = ProgressionController::new(BoardConfig::voice_board()).unwrap();
//! let state = controller.initial_state();
//!
//! // Zone 2 is hidden until Zone 1 completes
//! let attempt = MoveAttempt::new("voice-a").with_dest(ZoneId::new(2), LaneId::new(1));
//! assert!(controller.apply_move(&state, &attempt).is_err());
//! ```

pub mod classify;
pub mod core;
pub mod lanes;
pub mod progression;
pub mod rules;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    BoardConfig, BoardEffect, BoardSnapshot, BoardState, Card, CardId, CardSpec,
    ClassificationTicket, ClassifierConfig, ClassifyError, ConfigError, DenyReason, LaneId,
    MoveAttempt, MoveError, ZoneConfig, ZoneId, ZoneStatus,
};

pub use crate::lanes::{LanePolicy, LaneRule};

pub use crate::rules::{MoveRules, RuleContext, StandardRules, Verdict};

pub use crate::zones::{CommitResult, PositionStore, ZoneProgress};

pub use crate::progression::{ProgressionController, Transition};

pub use crate::classify::{
    ClassificationDispatcher, ClassificationOutcome, Classifier, ClassifyRequest,
    ClassifyResponse, HttpClassifier, Metadata,
};
