//! Board state and snapshots.
//!
//! ## BoardState
//!
//! Everything the controller reduces over:
//! - Card positions (`PositionStore`)
//! - Zone presence and visibility (`ZoneProgress`)
//! - Per-zone classification metadata
//! - The board message
//!
//! Uses `im` persistent structures throughout, so cloning a state to apply
//! a move is O(1) and the previous state stays valid.
//!
//! ## BoardSnapshot
//!
//! A plain, serializable view for the presentation layer.

use im::HashMap as ImHashMap;
use serde::{Deserialize, Serialize};

use super::card::{Card, CardId};
use super::config::{BoardConfig, ZoneId};
use crate::classify::Metadata;
use crate::zones::{PositionStore, ZoneProgress};

/// Complete board state.
#[derive(Clone, Debug)]
pub struct BoardState {
    pub(crate) positions: PositionStore,
    pub(crate) progress: ZoneProgress,

    /// (zone, card label) -> metadata from the last classification there.
    metadata: ImHashMap<(ZoneId, String), Metadata>,

    /// Last classification result or error, shown on the board.
    message: Option<String>,

    /// Number of committed moves.
    moves: u64,
}

impl BoardState {
    /// Initial state: every card in holding, holding and the first zone
    /// visible, no presence.
    #[must_use]
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            positions: PositionStore::from_config(config),
            progress: ZoneProgress::new(config.zone_count()),
            metadata: ImHashMap::new(),
            message: None,
            moves: 0,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn positions(&self) -> &PositionStore {
        &self.positions
    }

    #[must_use]
    pub fn progress(&self) -> &ZoneProgress {
        &self.progress
    }

    #[must_use]
    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.positions.get(id)
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.positions.iter()
    }

    /// Is a zone revealed? Holding always is.
    #[must_use]
    pub fn is_visible(&self, zone: ZoneId) -> bool {
        zone.is_holding() || self.progress.is_visible(zone)
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Number of moves committed since the board was created.
    #[must_use]
    pub fn committed_moves(&self) -> u64 {
        self.moves
    }

    // === Metadata ===

    /// Metadata recorded for a card label in a zone.
    #[must_use]
    pub fn metadata(&self, zone: ZoneId, label: &str) -> Option<&Metadata> {
        self.metadata.get(&(zone, label.to_string()))
    }

    /// Metadata from the furthest zone a label was classified in.
    #[must_use]
    pub fn latest_metadata(&self, label: &str) -> Option<(ZoneId, &Metadata)> {
        self.metadata
            .iter()
            .filter(|((_, l), _)| l == label)
            .max_by_key(|((zone, _), _)| *zone)
            .map(|((zone, _), metadata)| (*zone, metadata))
    }

    // === Mutation (controller only) ===

    pub(crate) fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub(crate) fn clear_message(&mut self) {
        self.message = None;
    }

    pub(crate) fn store_metadata(&mut self, zone: ZoneId, label: &str, metadata: Metadata) {
        self.metadata.insert((zone, label.to_string()), metadata);
    }

    pub(crate) fn record_commit(&mut self) {
        self.moves += 1;
    }
}

/// Progress indicator for one processing zone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneStatus {
    pub zone: ZoneId,
    pub name: String,

    /// Backend operation the zone represents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,

    pub visible: bool,

    /// Cards credited to the zone, out of `BoardSnapshot::total_cards`.
    pub completion: usize,
}

/// Read-only view of the board for presentation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub cards: Vec<Card>,
    pub zones: Vec<ZoneStatus>,
    pub message: Option<String>,
    pub total_cards: usize,
}

impl BoardSnapshot {
    #[must_use]
    pub fn new(state: &BoardState, config: &BoardConfig) -> Self {
        let zones = config
            .zone_ids()
            .map(|zone| ZoneStatus {
                zone,
                name: config.zone_name(zone).to_string(),
                operation: config.get_zone(zone).and_then(|z| z.operation.clone()),
                visible: state.progress.is_visible(zone),
                completion: state
                    .progress
                    .completion_count(zone, &state.positions, config),
            })
            .collect();

        Self {
            cards: state.cards().cloned().collect(),
            zones,
            message: state.message.clone(),
            total_cards: state.positions.len(),
        }
    }

    fn status(&self, zone: ZoneId) -> Option<&ZoneStatus> {
        self.zones.iter().find(|status| status.zone == zone)
    }

    /// Is a zone revealed? Holding always is; unknown zones are not.
    #[must_use]
    pub fn is_visible(&self, zone: ZoneId) -> bool {
        zone.is_holding() || self.status(zone).is_some_and(|status| status.visible)
    }

    /// Completion count for a zone, 0 for unknown zones.
    #[must_use]
    pub fn completion(&self, zone: ZoneId) -> usize {
        self.status(zone).map_or(0, |status| status.completion)
    }

    /// Completion as a fraction in `[0, 1]`.
    #[must_use]
    pub fn completion_ratio(&self, zone: ZoneId) -> f64 {
        if self.total_cards == 0 {
            return 0.0;
        }
        (self.completion(zone) as f64 / self.total_cards as f64).min(1.0)
    }

    /// Completed and possible card-zone pairs across every processing zone.
    #[must_use]
    pub fn total_completion(&self) -> (usize, usize) {
        let complete = self
            .zones
            .iter()
            .map(|status| status.completion.min(self.total_cards))
            .sum();
        (complete, self.zones.len() * self.total_cards)
    }

    /// Overall progress as a fraction in `[0, 1]`.
    #[must_use]
    pub fn total_completion_ratio(&self) -> f64 {
        match self.total_completion() {
            (_, 0) => 0.0,
            (complete, possible) => complete as f64 / possible as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::EmotionScore;
    use crate::core::config::ZoneConfig;

    fn config() -> BoardConfig {
        BoardConfig::new(2)
            .with_zone(ZoneConfig::new("Zone 1"))
            .with_zone(ZoneConfig::new("Zone 2"))
            .with_card("a", "Voice A")
            .with_card("b", "Voice B")
    }

    #[test]
    fn test_initial_state() {
        let state = BoardState::new(&config());

        assert_eq!(state.cards().count(), 2);
        assert!(state.cards().all(Card::in_holding));
        assert!(state.is_visible(ZoneId::HOLDING));
        assert!(state.is_visible(ZoneId::new(1)));
        assert!(!state.is_visible(ZoneId::new(2)));
        assert_eq!(state.message(), None);
        assert_eq!(state.committed_moves(), 0);
    }

    #[test]
    fn test_latest_metadata_prefers_furthest_zone() {
        let mut state = BoardState::new(&config());
        let early = Metadata {
            charisma: Some(10.0),
            ..Metadata::default()
        };
        let late = Metadata {
            prosody: vec![EmotionScore {
                name: "Joy".to_string(),
                score: 0.9,
            }],
            ..Metadata::default()
        };

        state.store_metadata(ZoneId::new(1), "Voice A", early.clone());
        state.store_metadata(ZoneId::new(2), "Voice A", late.clone());

        assert_eq!(state.metadata(ZoneId::new(1), "Voice A"), Some(&early));
        assert_eq!(state.latest_metadata("Voice A"), Some((ZoneId::new(2), &late)));
        assert_eq!(state.latest_metadata("Voice B"), None);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut state = BoardState::new(&config());
        let before = state.clone();

        state.set_message("hello");
        state.store_metadata(ZoneId::new(1), "Voice A", Metadata::default());

        assert_eq!(state.message(), Some("hello"));
        assert_eq!(before.message(), None);
        assert!(before.metadata(ZoneId::new(1), "Voice A").is_none());
    }

    #[test]
    fn test_snapshot() {
        let config = config();
        let state = BoardState::new(&config);
        let snapshot = BoardSnapshot::new(&state, &config);

        assert_eq!(snapshot.total_cards, 2);
        assert_eq!(snapshot.zones.len(), 2);
        assert!(snapshot.is_visible(ZoneId::new(1)));
        assert!(!snapshot.is_visible(ZoneId::new(2)));
        assert!(!snapshot.is_visible(ZoneId::new(7)));
        assert_eq!(snapshot.completion(ZoneId::new(1)), 0);
        assert_eq!(snapshot.completion_ratio(ZoneId::new(1)), 0.0);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["totalCards"], 2);
        assert_eq!(json["zones"][0]["name"], "Zone 1");
        assert!(json["zones"][0].get("operation").is_none());
    }

    #[test]
    fn test_total_completion() {
        let config = config();
        let mut snapshot = BoardSnapshot::new(&BoardState::new(&config), &config);
        assert_eq!(snapshot.total_completion(), (0, 4));
        assert_eq!(snapshot.total_completion_ratio(), 0.0);

        snapshot.zones[0].completion = 2;
        snapshot.zones[1].completion = 1;
        assert_eq!(snapshot.total_completion(), (3, 4));
        assert!((snapshot.total_completion_ratio() - 0.75).abs() < f64::EPSILON);

        snapshot.zones.clear();
        assert_eq!(snapshot.total_completion(), (0, 0));
        assert_eq!(snapshot.total_completion_ratio(), 0.0);
    }

    #[test]
    fn test_snapshot_operations() {
        let config = BoardConfig::voice_board();
        let snapshot = BoardSnapshot::new(&BoardState::new(&config), &config);
        let operations: Vec<_> = snapshot
            .zones
            .iter()
            .map(|status| status.operation.as_deref())
            .collect();
        assert_eq!(
            operations,
            vec![
                Some("initialization"),
                Some("feature_extraction"),
                Some("transformation"),
                Some("enhancement"),
            ]
        );
    }
}
