//! Board scenario tests.
//!
//! End-to-end move sequences through `ProgressionController`, checking
//! verdicts, positions, and zone visibility after each step.

use voice_board::core::{
    BoardConfig, BoardState, CardId, DenyReason, LaneId, MoveAttempt, MoveError, ZoneConfig,
    ZoneId,
};
use voice_board::progression::ProgressionController;

fn zone(n: u16) -> ZoneId {
    ZoneId::new(n)
}

fn lane(n: u8) -> LaneId {
    LaneId::new(n)
}

/// Move a card from wherever it is now.
fn drag(
    controller: &ProgressionController,
    state: &BoardState,
    id: &str,
    dest: ZoneId,
    dest_lane: Option<LaneId>,
) -> Result<BoardState, MoveError> {
    let card = state.card(&CardId::new(id)).expect("card exists");
    let mut attempt = MoveAttempt::new(id);
    attempt.source_zone = card.zone;
    attempt.source_lane = card.lane;
    attempt.dest_zone = dest;
    attempt.dest_lane = dest_lane;
    controller.apply_move(state, &attempt).map(|t| t.state)
}

fn two_zone_board(z1: ZoneConfig, cards: &[&str]) -> ProgressionController {
    let mut config = BoardConfig::new(2)
        .with_zone(z1)
        .with_zone(ZoneConfig::new("Zone 2"));
    for id in cards {
        config = config.with_card(*id, format!("Voice {}", id.to_uppercase()));
    }
    ProgressionController::new(config).unwrap()
}

// === Scenarios ===

/// Filling every lane of a zone reveals the next one.
#[test]
fn test_scenario_a_full_lanes_reveal() {
    let c = two_zone_board(ZoneConfig::new("Zone 1"), &["a", "b"]);
    let s = c.initial_state();

    let s = drag(&c, &s, "a", zone(1), Some(lane(1))).unwrap();
    assert!(!s.is_visible(zone(2)));

    let s = drag(&c, &s, "b", zone(1), Some(lane(2))).unwrap();
    assert!(s.is_visible(zone(2)));
}

/// A card in a sticky lane cannot go back to holding.
#[test]
fn test_scenario_b_sticky_lane() {
    let c = two_zone_board(ZoneConfig::new("Zone 1").with_sticky_lane(lane(1)), &["a", "b"]);
    let s = c.initial_state();

    let s = drag(&c, &s, "a", zone(1), Some(lane(1))).unwrap();
    let err = drag(&c, &s, "a", ZoneId::HOLDING, None).unwrap_err();
    assert_eq!(err, MoveError::Denied(DenyReason::Sticky));

    let card = s.card(&CardId::new("a")).unwrap();
    assert_eq!(card.slot(), Some((zone(1), lane(1))));
    assert!(card.reached_furthest);
}

/// A card in a blocking lane can shuffle within its zone but not advance.
#[test]
fn test_scenario_c_blocking_lane() {
    let c = two_zone_board(ZoneConfig::new("Zone 1").with_blocking_lane(lane(2)), &["a"]);
    let s = c.initial_state();

    let s = drag(&c, &s, "a", zone(1), Some(lane(2))).unwrap();
    assert!(s.is_visible(zone(2)));

    let err = drag(&c, &s, "a", zone(2), Some(lane(1))).unwrap_err();
    assert_eq!(err.deny_reason(), Some(DenyReason::Blocking));

    let s = drag(&c, &s, "a", zone(1), Some(lane(1))).unwrap();
    assert_eq!(s.card(&CardId::new("a")).unwrap().slot(), Some((zone(1), lane(1))));
}

/// Cards in the pipeline never move back a zone.
#[test]
fn test_scenario_d_backward_blocked() {
    let c = two_zone_board(ZoneConfig::new("Zone 1"), &["a"]);
    let s = c.initial_state();

    let s = drag(&c, &s, "a", zone(1), Some(lane(1))).unwrap();
    let s = drag(&c, &s, "a", zone(2), Some(lane(1))).unwrap();

    let err = drag(&c, &s, "a", zone(1), Some(lane(1))).unwrap_err();
    assert_eq!(err.deny_reason(), Some(DenyReason::BackwardBlocked));
    assert_eq!(s.card(&CardId::new("a")).unwrap().zone, zone(2));
}

/// Dropping onto an occupied lane is denied and the occupant stays.
#[test]
fn test_scenario_e_lane_occupied() {
    let c = two_zone_board(ZoneConfig::new("Zone 1"), &["a", "b"]);
    let s = c.initial_state();

    let s = drag(&c, &s, "b", zone(1), Some(lane(1))).unwrap();
    let err = drag(&c, &s, "a", zone(1), Some(lane(1))).unwrap_err();
    assert_eq!(err, MoveError::Denied(DenyReason::LaneOccupied));

    assert_eq!(s.card(&CardId::new("b")).unwrap().slot(), Some((zone(1), lane(1))));
    assert!(s.card(&CardId::new("a")).unwrap().in_holding());
}

// === Historical Presence ===

/// Going back to holding erases credit from the zone left and beyond only.
#[test]
fn test_backward_move_revokes_presence() {
    let config = BoardConfig::new(1)
        .with_zone(ZoneConfig::new("Zone 1"))
        .with_zone(ZoneConfig::new("Zone 2"))
        .with_zone(ZoneConfig::new("Zone 3"))
        .with_card("a", "Voice A");
    let c = ProgressionController::new(config).unwrap();
    let s = c.initial_state();

    let s = drag(&c, &s, "a", zone(1), Some(lane(1))).unwrap();
    let s = drag(&c, &s, "a", zone(2), Some(lane(1))).unwrap();
    assert!(s.is_visible(zone(3)));
    assert!(s.progress().has_presence(zone(1), "Voice A"));
    assert!(s.progress().has_presence(zone(2), "Voice A"));

    let s = drag(&c, &s, "a", ZoneId::HOLDING, None).unwrap();
    assert!(s.progress().has_presence(zone(1), "Voice A"));
    assert!(!s.progress().has_presence(zone(2), "Voice A"));
    assert!(!s.progress().has_presence(zone(3), "Voice A"));

    // Reveals stick
    assert!(s.is_visible(zone(3)));
}

/// Lane shuffles inside a zone keep the card credited.
#[test]
fn test_intra_zone_move_keeps_presence() {
    let c = two_zone_board(ZoneConfig::new("Zone 1"), &["a", "b"]);
    let s = c.initial_state();

    let s = drag(&c, &s, "a", zone(1), Some(lane(1))).unwrap();
    let s = drag(&c, &s, "a", zone(1), Some(lane(2))).unwrap();
    assert!(s.progress().has_presence(zone(1), "Voice A"));
    assert_eq!(s.progress().presence_count(zone(1)), 1);
}

/// Holding to a later zone is never adjacent, even when it is visible.
#[test]
fn test_holding_skip_not_adjacent() {
    let c = two_zone_board(ZoneConfig::new("Zone 1"), &["a", "b"]);
    let s = c.initial_state();
    let s = drag(&c, &s, "a", zone(1), Some(lane(1))).unwrap();
    let s = drag(&c, &s, "b", zone(1), Some(lane(2))).unwrap();
    let s = drag(&c, &s, "a", ZoneId::HOLDING, None).unwrap();
    assert!(s.is_visible(zone(2)));

    let err = drag(&c, &s, "a", zone(2), Some(lane(1))).unwrap_err();
    assert_eq!(err.deny_reason(), Some(DenyReason::NotAdjacent));
}
