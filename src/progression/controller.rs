//! The board reducer.
//!
//! `ProgressionController` turns a `BoardState` plus an event into the next
//! `BoardState` and the side effects collaborators should perform. It never
//! mutates the state it is given; each call clones (cheaply, via `im`) and
//! returns a fresh state.
//!
//! ## Move pipeline
//!
//! 1. Reject malformed events (unknown card, zone, or lane; stale source).
//! 2. Ask the `MoveRules` for a verdict.
//! 3. Commit through the `PositionStore` (which checks slot occupancy).
//! 4. Update presence, evaluate reveals, emit effects.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::classify::{ClassificationOutcome, ClassifyRequest};
use crate::core::card::CardId;
use crate::core::config::{BoardConfig, LaneId, ZoneId};
use crate::core::error::{ConfigError, MoveError};
use crate::core::event::{BoardEffect, ClassificationTicket, MoveAttempt};
use crate::core::state::{BoardSnapshot, BoardState};
use crate::lanes::LanePolicy;
use crate::rules::{MoveRules, RuleContext, StandardRules, Verdict};
use crate::zones::CommitResult;

/// A new state and the effects that produced it.
#[derive(Clone, Debug)]
pub struct Transition {
    pub state: BoardState,
    pub effects: Vec<BoardEffect>,
}

impl Transition {
    fn unchanged(state: &BoardState) -> Self {
        Self {
            state: state.clone(),
            effects: Vec::new(),
        }
    }

    /// Zones revealed by this transition.
    pub fn revealed(&self) -> impl Iterator<Item = ZoneId> + '_ {
        self.effects.iter().filter_map(|effect| match effect {
            BoardEffect::ZoneRevealed(zone) => Some(*zone),
            _ => None,
        })
    }

    /// Classification requests raised by this transition.
    pub fn tickets(&self) -> impl Iterator<Item = &ClassificationTicket> + '_ {
        self.effects.iter().filter_map(|effect| match effect {
            BoardEffect::Classify(ticket) => Some(ticket),
            _ => None,
        })
    }
}

/// Applies moves and classification results to board states.
///
/// ## Usage
///
/// ```
/// use voice_board::core::{BoardConfig, LaneId, MoveAttempt, ZoneId};
/// use voice_board::progression::ProgressionController;
///
/// let controller = ProgressionController::new(BoardConfig::voice_board()).unwrap();
/// let state = controller.initial_state();
///
/// let attempt = MoveAttempt::new("voice-a").with_dest(ZoneId::new(1), LaneId::new(1));
/// let transition = controller.apply_move(&state, &attempt).unwrap();
///
/// let card = transition.state.card(&"voice-a".into()).unwrap();
/// assert_eq!(card.zone, ZoneId::new(1));
/// assert!(card.processing);
/// ```
#[derive(Clone, Debug)]
pub struct ProgressionController<R: MoveRules = StandardRules> {
    config: Arc<BoardConfig>,
    policy: LanePolicy,
    rules: R,
}

impl ProgressionController<StandardRules> {
    /// Controller with the standard movement rules.
    ///
    /// Fails if the board configuration is invalid.
    pub fn new(config: impl Into<Arc<BoardConfig>>) -> Result<Self, ConfigError> {
        Self::with_rules(config, StandardRules)
    }
}

impl<R: MoveRules> ProgressionController<R> {
    /// Controller with custom movement rules.
    pub fn with_rules(
        config: impl Into<Arc<BoardConfig>>,
        rules: R,
    ) -> Result<Self, ConfigError> {
        let config = config.into();
        config.validate()?;
        let policy = LanePolicy::from_config(&config);
        Ok(Self {
            config,
            policy,
            rules,
        })
    }

    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[must_use]
    pub fn policy(&self) -> &LanePolicy {
        &self.policy
    }

    /// Every card in holding, the first zone visible.
    #[must_use]
    pub fn initial_state(&self) -> BoardState {
        BoardState::new(&self.config)
    }

    /// Presentation view of a state.
    #[must_use]
    pub fn snapshot(&self, state: &BoardState) -> BoardSnapshot {
        BoardSnapshot::new(state, &self.config)
    }

    // === Validation ===

    /// Would the rules let a card move to `dest_zone` from where it is now?
    ///
    /// Slot occupancy is not considered.
    pub fn validate(
        &self,
        state: &BoardState,
        card_id: &CardId,
        dest_zone: ZoneId,
    ) -> Result<Verdict, MoveError> {
        let card = state
            .card(card_id)
            .ok_or_else(|| MoveError::UnknownCard(card_id.clone()))?;
        let ctx = RuleContext::new(&self.policy, &state.progress);
        Ok(self.rules.validate_card(&ctx, card, dest_zone))
    }

    // === Moves ===

    /// Apply a completed drag.
    ///
    /// Denied moves come back as `Err(MoveError::Denied(reason))` and leave
    /// the board untouched; the UI snaps the card back. Dropping a card on
    /// its own slot is a no-op transition.
    pub fn apply_move(
        &self,
        state: &BoardState,
        attempt: &MoveAttempt,
    ) -> Result<Transition, MoveError> {
        let card = state.card(&attempt.card_id).ok_or_else(|| {
            warn!(card = %attempt.card_id, "Move for unknown card");
            MoveError::UnknownCard(attempt.card_id.clone())
        })?;

        let dest_zone = attempt.dest_zone;
        let dest_lane = self.resolve_dest(dest_zone, attempt.dest_lane)?;

        if !card.is_at(attempt.source_zone, attempt.source_lane) {
            warn!(
                card = %card.id,
                claimed_zone = %attempt.source_zone,
                actual_zone = %card.zone,
                "Move source does not match card position"
            );
            return Err(MoveError::SourceMismatch {
                card: card.id.clone(),
                zone: attempt.source_zone,
                lane: attempt.source_lane,
            });
        }

        if card.is_at(dest_zone, dest_lane) {
            debug!(card = %card.id, zone = %dest_zone, "Dropped on own slot");
            return Ok(Transition::unchanged(state));
        }

        let ctx = RuleContext::new(&self.policy, &state.progress);
        let verdict = self.rules.validate_card(&ctx, card, dest_zone);
        debug!(
            card = %card.id,
            from = %card.zone,
            to = %dest_zone,
            ?verdict,
            "Validated move"
        );
        verdict.into_result()?;

        let mut next = state.clone();
        let commit = next.positions.move_card(
            &attempt.card_id,
            dest_zone,
            dest_lane,
            &self.policy,
            self.config.terminal_zone(),
        )?;

        Ok(self.settle(next, &commit))
    }

    /// Send a card back to holding.
    ///
    /// Fails with `Denied(Sticky)` for cards locked in a sticky lane. A card
    /// already in holding is a no-op.
    pub fn reset_card(&self, state: &BoardState, card_id: &CardId) -> Result<Transition, MoveError> {
        let card = state
            .card(card_id)
            .ok_or_else(|| MoveError::UnknownCard(card_id.clone()))?;
        if card.in_holding() {
            return Ok(Transition::unchanged(state));
        }

        let mut next = state.clone();
        let commit = next.positions.reset_to_holding(card_id, &self.policy)?;
        Ok(self.settle(next, &commit))
    }

    /// Send every card that can move back to holding.
    ///
    /// Cards locked in sticky lanes stay put.
    #[must_use]
    pub fn reset_all(&self, state: &BoardState) -> Transition {
        let movable: Vec<CardId> = state
            .cards()
            .filter(|card| !card.in_holding() && !self.policy.locks(card.zone, card.lane))
            .map(|card| card.id.clone())
            .collect();

        let mut transition = Transition::unchanged(state);
        for id in movable {
            match self.reset_card(&transition.state, &id) {
                Ok(step) => {
                    transition.state = step.state;
                    transition.effects.extend(step.effects);
                }
                Err(e) => warn!(card = %id, error = %e, "Reset failed"),
            }
        }

        info!(
            remaining = transition.state.cards().filter(|c| !c.in_holding()).count(),
            "Board reset"
        );
        transition
    }

    /// Re-run zone reveal on a settled state.
    ///
    /// Moves already do this; calling it again changes nothing.
    #[must_use]
    pub fn evaluate_reveal(&self, state: &BoardState) -> Transition {
        let mut next = state.clone();
        let revealed = next
            .progress
            .evaluate_reveal(&mut next.positions, &self.policy, &self.config);
        Transition {
            state: next,
            effects: revealed.into_iter().map(BoardEffect::ZoneRevealed).collect(),
        }
    }

    // === Classification ===

    /// Apply a classification result.
    ///
    /// Outcomes for a card that has moved since the request (sequence
    /// mismatch) or is back in holding are discarded. Otherwise the
    /// processing indicator is cleared and the message updated; zone and
    /// lane never change.
    #[must_use]
    pub fn apply_classification(
        &self,
        state: &BoardState,
        outcome: ClassificationOutcome,
    ) -> Transition {
        let Some(card) = state.card(&outcome.card_id) else {
            debug!(card = %outcome.card_id, "Classification for unknown card");
            return Transition::unchanged(state);
        };

        if card.sequence != outcome.sequence || card.in_holding() {
            debug!(
                card = %card.id,
                outcome_sequence = outcome.sequence,
                current_sequence = card.sequence,
                in_holding = card.in_holding(),
                "Discarding stale classification"
            );
            return Transition::unchanged(state);
        }

        let zone = card.zone;
        let label = card.label.clone();
        let mut next = state.clone();
        let mut effects = Vec::new();
        next.positions.set_processing(&outcome.card_id, false);

        match outcome.result {
            Ok(response) if response.is_ok() => {
                info!(
                    card = %outcome.card_id,
                    zone = %zone,
                    processing_ms = response.processing_time_ms(),
                    "Classification applied"
                );
                next.set_message(response.message);
                if let Some(metadata) = response.metadata {
                    next.store_metadata(zone, &label, metadata);
                }
                if let Some(audio) = response.audio_file {
                    effects.push(BoardEffect::PlayAudio(audio));
                }
            }
            Ok(response) => {
                warn!(card = %outcome.card_id, status = %response.status, "Classification reported failure");
                next.set_message(format!("Error: {}", response.message));
            }
            Err(e) => {
                warn!(card = %outcome.card_id, error = %e, "Classification failed");
                next.set_message(format!("Error: {e}"));
            }
        }

        Transition {
            state: next,
            effects,
        }
    }

    // === Internals ===

    /// Check a destination and normalise its lane (`None` for holding).
    fn resolve_dest(
        &self,
        zone: ZoneId,
        lane: Option<LaneId>,
    ) -> Result<Option<LaneId>, MoveError> {
        if zone.is_holding() {
            return Ok(None);
        }
        if !self.config.contains_zone(zone) {
            warn!(zone = %zone, "Move to unknown zone");
            return Err(MoveError::UnknownZone(zone));
        }
        let lane = lane.ok_or(MoveError::MissingLane(zone))?;
        if !self.config.contains_lane(lane) {
            warn!(zone = %zone, lane = %lane, "Move to unknown lane");
            return Err(MoveError::UnknownLane { zone, lane });
        }
        Ok(Some(lane))
    }

    /// Post-commit bookkeeping: presence, reveal, effects.
    fn settle(&self, mut next: BoardState, commit: &CommitResult) -> Transition {
        let mut effects = Vec::new();

        next.progress.apply_commit(commit);
        let revealed = next
            .progress
            .evaluate_reveal(&mut next.positions, &self.policy, &self.config);

        match commit.dest_lane {
            None => {
                next.clear_message();
                effects.push(BoardEffect::CancelClassification(commit.card_id.clone()));
            }
            Some(lane) => {
                effects.push(BoardEffect::ProcessingStarted {
                    card_id: commit.card_id.clone(),
                    zone: commit.dest_zone,
                    lane,
                });
                effects.push(BoardEffect::Classify(self.ticket(commit, lane)));
            }
        }
        effects.extend(revealed.into_iter().map(BoardEffect::ZoneRevealed));

        next.record_commit();

        info!(
            card = %commit.card_id,
            from = %commit.source_zone,
            to = %commit.dest_zone,
            lane = ?commit.dest_lane.map(LaneId::raw),
            sequence = commit.sequence,
            reached_furthest = commit.reached_furthest,
            "Move committed"
        );

        Transition {
            state: next,
            effects,
        }
    }

    fn ticket(&self, commit: &CommitResult, lane: LaneId) -> ClassificationTicket {
        let mut request = ClassifyRequest::new(
            commit.label.as_str(),
            self.config.zone_name(commit.dest_zone),
            lane,
        );
        if !commit.source_zone.is_holding() && commit.source_zone != commit.dest_zone {
            request = request.with_previous_zone(self.config.zone_name(commit.source_zone));
        }

        ClassificationTicket {
            card_id: commit.card_id.clone(),
            sequence: commit.sequence,
            zone: commit.dest_zone,
            lane,
            request,
        }
    }
}
