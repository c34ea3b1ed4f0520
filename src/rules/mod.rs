//! Movement rules.
//!
//! Boards implement `MoveRules` to decide which moves are legal. The
//! controller calls into `MoveRules` before touching any state; the
//! position store then enforces slot occupancy at commit time.

pub mod validator;

pub use validator::{MoveRules, RuleContext, StandardRules, Verdict};
