//! Per-(zone, lane) movement rules.

use rustc_hash::FxHashMap;

use crate::core::config::{BoardConfig, LaneId, ZoneId};

/// Movement flags for one `(zone, lane)` slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LaneRule {
    /// A card entering this lane can never leave.
    pub sticky: bool,
    /// A card in this lane cannot advance to a later zone.
    pub blocking: bool,
}

/// Static lookup of lane rules.
///
/// Unknown slots have no rules: both flags read `false`.
///
/// ```
/// use voice_board::core::{LaneId, ZoneId};
/// use voice_board::lanes::LanePolicy;
///
/// let policy = LanePolicy::new().with_sticky(ZoneId::new(1), LaneId::new(3));
///
/// assert!(policy.is_sticky(ZoneId::new(1), LaneId::new(3)));
/// assert!(!policy.is_blocking(ZoneId::new(1), LaneId::new(3)));
/// assert!(!policy.is_sticky(ZoneId::new(7), LaneId::new(3)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct LanePolicy {
    rules: FxHashMap<(ZoneId, LaneId), LaneRule>,
}

impl LanePolicy {
    /// Create a policy with no special lanes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the policy from each zone's sticky and blocking lanes.
    #[must_use]
    pub fn from_config(config: &BoardConfig) -> Self {
        let mut policy = Self::new();

        for (zone, zone_config) in config.zone_ids().zip(&config.zones) {
            for &lane in &zone_config.sticky_lanes {
                policy.rules.entry((zone, lane)).or_default().sticky = true;
            }
            for &lane in &zone_config.blocking_lanes {
                policy.rules.entry((zone, lane)).or_default().blocking = true;
            }
        }

        policy
    }

    /// Mark a slot sticky.
    #[must_use]
    pub fn with_sticky(mut self, zone: ZoneId, lane: LaneId) -> Self {
        self.rules.entry((zone, lane)).or_default().sticky = true;
        self
    }

    /// Mark a slot blocking.
    #[must_use]
    pub fn with_blocking(mut self, zone: ZoneId, lane: LaneId) -> Self {
        self.rules.entry((zone, lane)).or_default().blocking = true;
        self
    }

    /// Rules for a slot.
    #[must_use]
    pub fn rule(&self, zone: ZoneId, lane: LaneId) -> LaneRule {
        self.rules.get(&(zone, lane)).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn is_sticky(&self, zone: ZoneId, lane: LaneId) -> bool {
        self.rule(zone, lane).sticky
    }

    #[must_use]
    pub fn is_blocking(&self, zone: ZoneId, lane: LaneId) -> bool {
        self.rule(zone, lane).blocking
    }

    /// Is a card at this position locked in place?
    ///
    /// Holding (no lane) is never sticky.
    #[must_use]
    pub fn locks(&self, zone: ZoneId, lane: Option<LaneId>) -> bool {
        lane.is_some_and(|lane| self.is_sticky(zone, lane))
    }
}
