//! Card positions and zone progression.
//!
//! Zones are **board-configured**, not hardcoded. Boards define their
//! processing zones via `ZoneConfig` at startup; holding is always zone 0.
//!
//! ## Key Types
//!
//! - `ZoneId`: Zone ordinal (from `core::config`)
//! - `PositionStore`: Authoritative card positions and slot occupancy
//! - `CommitResult`: What a committed move changed
//! - `ZoneProgress`: Historical presence, completion, and zone reveal

pub mod progress;
pub mod store;

pub use progress::ZoneProgress;
pub use store::{CommitResult, PositionStore};

// Re-export zone types from core for convenience
pub use crate::core::config::{LaneId, ZoneConfig, ZoneId};
