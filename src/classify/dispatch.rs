//! Asynchronous classification dispatch.
//!
//! Every committed move into a processing zone yields a
//! `ClassificationTicket`. The dispatcher runs each ticket as a tokio task
//! and reports the result on a channel as a `ClassificationOutcome`. At
//! most one request is in flight per card: a newer ticket or a move back to
//! holding aborts the older task.
//!
//! Outcomes carry the card's sequence number at dispatch time. The
//! controller drops any outcome whose sequence no longer matches, so a
//! result that races past its abort is still harmless.

use std::sync::Arc;
use std::time::Duration;

use rustc_hash::FxHashMap;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::types::ClassifyResponse;
use super::Classifier;
use crate::core::card::CardId;
use crate::core::error::ClassifyError;
use crate::core::event::{BoardEffect, ClassificationTicket};

/// The result of one classification request.
#[derive(Clone, Debug)]
pub struct ClassificationOutcome {
    pub card_id: CardId,

    /// The card's sequence when the request was issued.
    pub sequence: u64,

    pub result: Result<ClassifyResponse, ClassifyError>,
}

impl ClassificationOutcome {
    #[must_use]
    pub fn new(
        card_id: CardId,
        sequence: u64,
        result: Result<ClassifyResponse, ClassifyError>,
    ) -> Self {
        Self {
            card_id,
            sequence,
            result,
        }
    }
}

/// Runs classification requests, one in flight per card.
///
/// Must be used from within a tokio runtime.
pub struct ClassificationDispatcher<C: Classifier> {
    classifier: Arc<C>,
    timeout: Duration,
    in_flight: FxHashMap<CardId, JoinHandle<()>>,
    outcomes: UnboundedSender<ClassificationOutcome>,
}

impl<C: Classifier> ClassificationDispatcher<C> {
    /// Create a dispatcher and the receiver its outcomes arrive on.
    pub fn new(
        classifier: Arc<C>,
        timeout: Duration,
    ) -> (Self, UnboundedReceiver<ClassificationOutcome>) {
        let (outcomes, receiver) = mpsc::unbounded_channel();
        let dispatcher = Self {
            classifier,
            timeout,
            in_flight: FxHashMap::default(),
            outcomes,
        };
        (dispatcher, receiver)
    }

    /// Start a request, superseding any in flight for the same card.
    pub fn dispatch(&mut self, ticket: ClassificationTicket) {
        self.cancel(&ticket.card_id);

        let classifier = Arc::clone(&self.classifier);
        let outcomes = self.outcomes.clone();
        let timeout = self.timeout;
        let card_id = ticket.card_id.clone();

        debug!(card = %card_id, sequence = ticket.sequence, zone = %ticket.zone, lane = %ticket.lane, "Dispatching classification");

        let handle = tokio::spawn(async move {
            let result = match tokio::time::timeout(timeout, classifier.classify(ticket.request)).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(card = %ticket.card_id, ?timeout, "Classification timed out");
                    Err(ClassifyError::Timeout(timeout))
                }
            };

            // Receiver gone means the board shut down
            let _ = outcomes.send(ClassificationOutcome::new(
                ticket.card_id,
                ticket.sequence,
                result,
            ));
        });

        self.in_flight.insert(card_id, handle);
    }

    /// Abort the request in flight for a card.
    ///
    /// Returns `true` if a running task was aborted.
    pub fn cancel(&mut self, card_id: &CardId) -> bool {
        match self.in_flight.remove(card_id) {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                trace!(card = %card_id, "Aborted classification");
                true
            }
            _ => false,
        }
    }

    /// Act on the effects of a transition.
    ///
    /// Dispatches `Classify` tickets and honours `CancelClassification`;
    /// other effects are left to the caller.
    pub fn handle_effects(&mut self, effects: &[BoardEffect]) {
        for effect in effects {
            match effect {
                BoardEffect::Classify(ticket) => self.dispatch(ticket.clone()),
                BoardEffect::CancelClassification(card_id) => {
                    self.cancel(card_id);
                }
                _ => {}
            }
        }
    }

    /// Number of requests still running.
    pub fn in_flight(&mut self) -> usize {
        self.in_flight.retain(|_, handle| !handle.is_finished());
        self.in_flight.len()
    }

    /// Is a request running for this card?
    #[must_use]
    pub fn is_in_flight(&self, card_id: &CardId) -> bool {
        self.in_flight
            .get(card_id)
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<C: Classifier> Drop for ClassificationDispatcher<C> {
    fn drop(&mut self) {
        for handle in self.in_flight.values() {
            handle.abort();
        }
    }
}
