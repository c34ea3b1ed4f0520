//! Move validation.
//!
//! Boards plug their movement rules in through `MoveRules`. The stock
//! `StandardRules` applies, in order:
//!
//! 1. A card in a sticky lane never moves (`Sticky`).
//! 2. A card in a blocking lane never advances (`Blocking`).
//! 3. Returning to holding is always legal.
//! 4. Holding to the first processing zone is always legal.
//! 5. Hidden destinations are illegal (`ZoneHidden`).
//! 6. Lane changes within a zone are legal.
//! 7. Processing zones never move backward (`BackwardBlocked`).
//! 8. Anything else must go to an adjacent zone (`NotAdjacent`).
//!
//! Slot occupancy is not checked here; see `PositionStore::move_card`.

use crate::core::card::Card;
use crate::core::config::{LaneId, ZoneId};
use crate::core::error::DenyReason;
use crate::lanes::LanePolicy;
use crate::zones::ZoneProgress;

/// Result of validating a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Denied(DenyReason),
}

impl Verdict {
    #[must_use]
    pub fn is_allowed(self) -> bool {
        matches!(self, Verdict::Allowed)
    }

    /// The deny reason, if denied.
    #[must_use]
    pub fn reason(self) -> Option<DenyReason> {
        match self {
            Verdict::Allowed => None,
            Verdict::Denied(reason) => Some(reason),
        }
    }

    /// Convert to a `Result` for `?` propagation.
    pub fn into_result(self) -> Result<(), DenyReason> {
        match self {
            Verdict::Allowed => Ok(()),
            Verdict::Denied(reason) => Err(reason),
        }
    }
}

/// Read-only view of the board the rules consult.
#[derive(Clone, Copy, Debug)]
pub struct RuleContext<'a> {
    /// Sticky/blocking lookup.
    pub policy: &'a LanePolicy,
    /// Zone visibility.
    pub progress: &'a ZoneProgress,
}

impl<'a> RuleContext<'a> {
    #[must_use]
    pub fn new(policy: &'a LanePolicy, progress: &'a ZoneProgress) -> Self {
        Self { policy, progress }
    }

    /// Is `zone` revealed? Holding always is.
    #[must_use]
    pub fn is_visible(&self, zone: ZoneId) -> bool {
        zone.is_holding() || self.progress.is_visible(zone)
    }
}

/// Movement rules.
///
/// Implementations must be pure: the same context and move always give
/// the same verdict.
pub trait MoveRules {
    /// Decide whether a card at `source_zone`/`source_lane` may move to
    /// `dest_zone`.
    fn validate(
        &self,
        ctx: &RuleContext<'_>,
        source_zone: ZoneId,
        source_lane: Option<LaneId>,
        dest_zone: ZoneId,
    ) -> Verdict;

    // === Convenience Methods ===

    /// Validate a move of `card` from its current position.
    fn validate_card(&self, ctx: &RuleContext<'_>, card: &Card, dest_zone: ZoneId) -> Verdict {
        self.validate(ctx, card.zone, card.lane, dest_zone)
    }
}

/// The stock forward-only, adjacent-zone rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardRules;

impl MoveRules for StandardRules {
    fn validate(
        &self,
        ctx: &RuleContext<'_>,
        source_zone: ZoneId,
        source_lane: Option<LaneId>,
        dest_zone: ZoneId,
    ) -> Verdict {
        if let Some(lane) = source_lane {
            let rule = ctx.policy.rule(source_zone, lane);
            if rule.sticky {
                return Verdict::Denied(DenyReason::Sticky);
            }
            if rule.blocking && dest_zone > source_zone {
                return Verdict::Denied(DenyReason::Blocking);
            }
        }

        if dest_zone.is_holding() {
            return Verdict::Allowed;
        }

        if source_zone.is_holding() && dest_zone == ZoneId::FIRST {
            return Verdict::Allowed;
        }

        if !ctx.is_visible(dest_zone) {
            return Verdict::Denied(DenyReason::ZoneHidden);
        }

        if source_zone == dest_zone {
            return Verdict::Allowed;
        }

        if !source_zone.is_holding() && dest_zone < source_zone {
            return Verdict::Denied(DenyReason::BackwardBlocked);
        }

        if source_zone.is_adjacent(dest_zone) {
            Verdict::Allowed
        } else {
            Verdict::Denied(DenyReason::NotAdjacent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BoardConfig, CardId, ZoneConfig};
    use crate::zones::PositionStore;

    fn zone(n: u16) -> ZoneId {
        ZoneId::new(n)
    }

    fn lane(n: u8) -> Option<LaneId> {
        Some(LaneId::new(n))
    }

    /// Four processing zones, the first `visible` of them revealed.
    fn progress(visible: u16) -> ZoneProgress {
        let mut progress = ZoneProgress::new(4);
        let config = BoardConfig::new(1)
            .with_zone(ZoneConfig::new("Zone 1"))
            .with_zone(ZoneConfig::new("Zone 2"))
            .with_zone(ZoneConfig::new("Zone 3"))
            .with_zone(ZoneConfig::new("Zone 4"))
            .with_card("a", "A");
        let policy = LanePolicy::new();
        let mut store = PositionStore::from_config(&config);
        let id = CardId::new("a");

        // Walk a single card forward to reveal zones one at a time
        for z in 1..visible {
            let commit = store
                .move_card(&id, zone(z), lane(1), &policy, config.terminal_zone())
                .unwrap();
            progress.apply_commit(&commit);
            progress.evaluate_reveal(&mut store, &policy, &config);
        }
        progress
    }

    fn check(
        policy: &LanePolicy,
        progress: &ZoneProgress,
        src: ZoneId,
        src_lane: Option<LaneId>,
        dest: ZoneId,
    ) -> Verdict {
        StandardRules.validate(&RuleContext::new(policy, progress), src, src_lane, dest)
    }

    #[test]
    fn test_progress_helper() {
        let p = progress(3);
        assert!(p.is_visible(zone(3)));
        assert!(!p.is_visible(zone(4)));
    }

    #[test]
    fn test_sticky_denies_everything() {
        let policy = LanePolicy::new().with_sticky(zone(1), LaneId::new(1));
        let p = progress(4);

        for dest in [ZoneId::HOLDING, zone(1), zone(2), zone(3)] {
            assert_eq!(check(&policy, &p, zone(1), lane(1), dest), Verdict::Denied(DenyReason::Sticky));
        }
    }

    #[test]
    fn test_blocking_denies_forward_only() {
        let policy = LanePolicy::new().with_blocking(zone(2), LaneId::new(2));
        let p = progress(4);

        assert_eq!(check(&policy, &p, zone(2), lane(2), zone(3)), Verdict::Denied(DenyReason::Blocking));
        assert_eq!(check(&policy, &p, zone(2), lane(2), zone(4)), Verdict::Denied(DenyReason::Blocking));
        assert_eq!(check(&policy, &p, zone(2), lane(2), zone(2)), Verdict::Allowed);
        assert_eq!(check(&policy, &p, zone(2), lane(2), ZoneId::HOLDING), Verdict::Allowed);
        // Backward is not the blocking rule's concern
        assert_eq!(check(&policy, &p, zone(2), lane(2), zone(1)), Verdict::Denied(DenyReason::BackwardBlocked));
    }

    #[test]
    fn test_holding_rules() {
        let policy = LanePolicy::new();
        let p = progress(1);

        assert_eq!(check(&policy, &p, ZoneId::HOLDING, None, zone(1)), Verdict::Allowed);
        assert_eq!(check(&policy, &p, ZoneId::HOLDING, None, ZoneId::HOLDING), Verdict::Allowed);
        assert_eq!(check(&policy, &p, zone(1), lane(1), ZoneId::HOLDING), Verdict::Allowed);
        assert_eq!(check(&policy, &p, ZoneId::HOLDING, None, zone(2)), Verdict::Denied(DenyReason::ZoneHidden));

        let p = progress(3);
        assert_eq!(check(&policy, &p, ZoneId::HOLDING, None, zone(2)), Verdict::Denied(DenyReason::NotAdjacent));
    }

    #[test]
    fn test_hidden_zone() {
        let policy = LanePolicy::new();
        let p = progress(2);

        assert_eq!(check(&policy, &p, zone(2), lane(1), zone(3)), Verdict::Denied(DenyReason::ZoneHidden));
        assert_eq!(check(&policy, &p, zone(2), lane(1), zone(9)), Verdict::Denied(DenyReason::ZoneHidden));
    }

    #[test]
    fn test_same_zone_and_adjacency() {
        let policy = LanePolicy::new();
        let p = progress(4);

        assert_eq!(check(&policy, &p, zone(2), lane(1), zone(2)), Verdict::Allowed);
        assert_eq!(check(&policy, &p, zone(2), lane(1), zone(3)), Verdict::Allowed);
        assert_eq!(check(&policy, &p, zone(1), lane(1), zone(3)), Verdict::Denied(DenyReason::NotAdjacent));
        assert_eq!(check(&policy, &p, zone(3), lane(1), zone(1)), Verdict::Denied(DenyReason::BackwardBlocked));
    }

    #[test]
    fn test_validate_card_uses_position() {
        let policy = LanePolicy::new().with_sticky(zone(1), LaneId::new(2));
        let p = progress(2);
        let ctx = RuleContext::new(&policy, &p);

        let mut card = Card::new("a", "A");
        assert!(StandardRules.validate_card(&ctx, &card, zone(1)).is_allowed());

        card.zone = zone(1);
        card.lane = lane(2);
        assert_eq!(
            StandardRules.validate_card(&ctx, &card, zone(2)).reason(),
            Some(DenyReason::Sticky)
        );
    }

    #[test]
    fn test_verdict_into_result() {
        assert_eq!(Verdict::Allowed.into_result(), Ok(()));
        assert_eq!(
            Verdict::Denied(DenyReason::NotAdjacent).into_result(),
            Err(DenyReason::NotAdjacent)
        );
    }
}
