//! Voice classification.
//!
//! The board asks an external service to classify a card each time it
//! lands in a processing slot. `Classifier` is the seam; `HttpClassifier`
//! is the production implementation and tests substitute their own.
//! `ClassificationDispatcher` runs requests concurrently and hands results
//! back to the `ProgressionController` as `ClassificationOutcome`s.

pub mod client;
pub mod dispatch;
pub mod types;

use std::future::Future;

pub use client::HttpClassifier;
pub use dispatch::{ClassificationDispatcher, ClassificationOutcome};
pub use types::{ClassifyRequest, ClassifyResponse, EmotionScore, Metadata, Operation};

use crate::core::error::ClassifyError;

/// Something that can classify a voice card.
pub trait Classifier: Send + Sync + 'static {
    fn classify(
        &self,
        request: ClassifyRequest,
    ) -> impl Future<Output = Result<ClassifyResponse, ClassifyError>> + Send;
}

impl Classifier for HttpClassifier {
    fn classify(
        &self,
        request: ClassifyRequest,
    ) -> impl Future<Output = Result<ClassifyResponse, ClassifyError>> + Send {
        async move { self.process(&request).await }
    }
}
