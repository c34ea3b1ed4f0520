//! Core board types: configuration, cards, events, errors, state.
//!
//! Boards are described by `BoardConfig` (zones, lanes, cards) rather than
//! by code. Everything else in the crate is built from these types.

pub mod card;
pub mod config;
pub mod error;
pub mod event;
pub mod state;

pub use card::{Card, CardId};
pub use config::{BoardConfig, CardSpec, ClassifierConfig, LaneId, ZoneConfig, ZoneId};
pub use error::{ClassifyError, ConfigError, DenyReason, MoveError};
pub use event::{BoardEffect, ClassificationTicket, MoveAttempt};
pub use state::{BoardSnapshot, BoardState, ZoneStatus};
