//! Progression: the reducer that drives the board.
//!
//! `ProgressionController::apply_move` is the single entry point for drag
//! events. It consults the `MoveRules`, commits through the
//! `PositionStore`, updates `ZoneProgress`, and reports `BoardEffect`s for
//! the classification dispatcher and UI.

pub mod controller;

pub use controller::{ProgressionController, Transition};
