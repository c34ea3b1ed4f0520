//! Zone progress tracking and reveal.
//!
//! `ZoneProgress` owns the two pieces of aggregate progression state:
//!
//! - **Historical presence**: per zone, the labels of cards that have
//!   validly entered it moving forward (or shuffling within it). Stepping
//!   back erases credit for the zone stepped out of and every zone beyond.
//! - **Visibility**: which zones are revealed. Holding and the first
//!   processing zone start visible; reveals are monotonic.
//!
//! A zone `Zi` reveals `Z(i+1)` when either every lane of `Zi` is occupied
//! at once, or `Zi` has historical presence and every card has reached as
//! far as it can go.

use im::{HashSet as ImHashSet, Vector};
use smallvec::SmallVec;
use tracing::info;

use super::store::{CommitResult, PositionStore};
use crate::core::config::{BoardConfig, ZoneId};
use crate::lanes::LanePolicy;

/// Per-zone presence history and visibility.
#[derive(Clone, Debug)]
pub struct ZoneProgress {
    /// Indexed by zone ordinal. Index 0 (holding) stays empty.
    presence: Vector<ImHashSet<String>>,

    /// Indexed by zone ordinal.
    visibility: Vector<bool>,
}

impl ZoneProgress {
    /// Fresh progress for `zone_count` processing zones.
    #[must_use]
    pub fn new(zone_count: usize) -> Self {
        let slots = zone_count + 1;
        let presence = (0..slots).map(|_| ImHashSet::new()).collect();
        let visibility = (0..slots).map(|i| i <= ZoneId::FIRST.index()).collect();
        Self {
            presence,
            visibility,
        }
    }

    /// Number of processing zones tracked.
    #[must_use]
    pub fn zone_count(&self) -> usize {
        self.visibility.len().saturating_sub(1)
    }

    // === Visibility ===

    /// Is a zone revealed? Unknown zones are not.
    #[must_use]
    pub fn is_visible(&self, zone: ZoneId) -> bool {
        self.visibility.get(zone.index()).copied().unwrap_or(false)
    }

    /// Revealed processing zones, in order.
    pub fn visible_zones(&self) -> impl Iterator<Item = ZoneId> + '_ {
        self.visibility
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, &visible)| visible)
            .map(|(i, _)| ZoneId::new(i as u16))
    }

    /// Reveal a zone. Returns `true` if it was hidden.
    fn reveal(&mut self, zone: ZoneId) -> bool {
        match self.visibility.get_mut(zone.index()) {
            Some(visible) if !*visible => {
                *visible = true;
                true
            }
            _ => false,
        }
    }

    // === Historical Presence ===

    /// Labels credited to a zone.
    pub fn presence(&self, zone: ZoneId) -> impl Iterator<Item = &str> + '_ {
        self.presence
            .get(zone.index())
            .into_iter()
            .flat_map(|labels| labels.iter().map(String::as_str))
    }

    /// Is `label` credited to `zone`?
    #[must_use]
    pub fn has_presence(&self, zone: ZoneId, label: &str) -> bool {
        self.presence
            .get(zone.index())
            .is_some_and(|labels| labels.contains(label))
    }

    /// Number of labels credited to a zone.
    #[must_use]
    pub fn presence_count(&self, zone: ZoneId) -> usize {
        self.presence.get(zone.index()).map_or(0, |labels| labels.len())
    }

    /// Credit `label` to `zone`. Holding is never credited.
    pub fn record_presence(&mut self, zone: ZoneId, label: &str) {
        if zone.is_holding() {
            return;
        }
        if let Some(labels) = self.presence.get_mut(zone.index()) {
            labels.insert(label.to_string());
        }
    }

    /// Erase `label` from `source_zone` and every zone beyond it.
    pub fn revoke_presence(&mut self, source_zone: ZoneId, label: &str) {
        let start = source_zone.index().max(ZoneId::FIRST.index());
        for labels in self.presence.iter_mut().skip(start) {
            labels.remove(label);
        }
    }

    /// Update presence for a committed move.
    ///
    /// Forward and same-zone moves credit the destination; backward moves
    /// (including to holding) revoke from the source onwards.
    pub fn apply_commit(&mut self, commit: &CommitResult) {
        if commit.is_backward() {
            self.revoke_presence(commit.source_zone, &commit.label);
        } else {
            self.record_presence(commit.dest_zone, &commit.label);
        }
    }

    // === Completion ===

    /// Completion count for a zone's progress indicator.
    ///
    /// The presence count, except that any card sitting in the terminal
    /// zone's completion lane completes that zone outright.
    #[must_use]
    pub fn completion_count(
        &self,
        zone: ZoneId,
        store: &PositionStore,
        config: &BoardConfig,
    ) -> usize {
        if zone == config.terminal_zone() {
            if let Some(lane) = config.completion_lane {
                if store.occupant(zone, lane).is_some() {
                    return store.len();
                }
            }
        }
        self.presence_count(zone)
    }

    /// Has every card reached as far as it can go?
    #[must_use]
    pub fn all_cards_at_furthest(&self, store: &PositionStore) -> bool {
        store.iter().all(|card| card.reached_furthest)
    }

    // === Reveal ===

    /// Reveal every zone whose predecessor has completed.
    ///
    /// Zones are checked in order; a reveal clears `reached_furthest` for
    /// cards that are not locked in a sticky lane and not already at or
    /// beyond the revealed zone. Returns the newly revealed zones.
    ///
    /// Calling this twice with no move in between changes nothing the
    /// second time.
    pub fn evaluate_reveal(
        &mut self,
        store: &mut PositionStore,
        policy: &LanePolicy,
        config: &BoardConfig,
    ) -> SmallVec<[ZoneId; 2]> {
        let mut revealed = SmallVec::new();

        for zone in config.zone_ids() {
            let next = zone.next();
            if !config.contains_zone(next) || !self.is_visible(zone) || self.is_visible(next) {
                continue;
            }

            let lanes_full = store.is_zone_full(zone, config.lanes());
            let progressed =
                self.presence_count(zone) > 0 && self.all_cards_at_furthest(store);

            if lanes_full || progressed {
                self.reveal(next);
                let cleared = store.reset_reached_furthest(next, policy);
                info!(
                    zone = %next,
                    lanes_full,
                    progressed,
                    cleared,
                    "Zone revealed"
                );
                revealed.push(next);
            }
        }

        revealed
    }
}
