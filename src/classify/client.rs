//! HTTP client for the voice classification service.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use super::types::{ClassifyRequest, ClassifyResponse, Operation, OperationsResponse};
use crate::core::config::ClassifierConfig;
use crate::core::error::ClassifyError;

const USER_AGENT: &str = concat!("voice-board/", env!("CARGO_PKG_VERSION"));

/// Error body returned by the service on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Talks to the classification service over HTTP.
#[derive(Clone, Debug)]
pub struct HttpClassifier {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    ping_timeout: Duration,
}

impl HttpClassifier {
    /// Create a client from configuration.
    pub fn new(config: &ClassifierConfig) -> Result<Self, ClassifyError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClassifyError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
            ping_timeout: config.ping_timeout(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a service-relative path absolute. Absolute URLs pass through.
    #[must_use]
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") || self.base_url.is_empty() {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Classify a card at its new position.
    ///
    /// Relative `audioFile` and spectrogram paths in the response are
    /// resolved against the base URL.
    pub async fn process(&self, request: &ClassifyRequest) -> Result<ClassifyResponse, ClassifyError> {
        let url = self.resolve_url("/api/process");

        debug!(
            card = %request.card_name,
            zone = %request.zone_name,
            lane = %request.lane_name,
            url = %url,
            "Requesting classification"
        );

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let fallback = format!("API request failed with status {}", status.as_u16());
            let message = match response.json::<ErrorBody>().await {
                Ok(ErrorBody { detail: Some(detail) }) => detail,
                _ => fallback,
            };
            warn!(status = status.as_u16(), %message, "Classification request failed");
            return Err(ClassifyError::Api(status.as_u16(), message));
        }

        let mut body: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| ClassifyError::Parse(e.to_string()))?;

        if body.status == "error" {
            return Err(ClassifyError::Failed(body.message));
        }

        if let Some(audio) = body.audio_file.take() {
            body.audio_file = Some(self.resolve_url(&audio));
        }
        if let Some(metadata) = body.metadata.as_mut() {
            if let Some(spectrogram) = metadata.spectrogram.take() {
                metadata.spectrogram = Some(self.resolve_url(&spectrogram));
            }
        }

        debug!(
            card = %request.card_name,
            processing_ms = body.processing_time_ms(),
            "Classification complete"
        );

        Ok(body)
    }

    /// Is the service reachable?
    pub async fn ping(&self) -> bool {
        let url = self.resolve_url("/");
        match self.http.get(&url).timeout(self.ping_timeout).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, "Classification service unreachable");
                false
            }
        }
    }

    /// Operations the service offers, one per processing zone.
    pub async fn operations(&self) -> Result<Vec<Operation>, ClassifyError> {
        let url = self.resolve_url("/api/operations");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClassifyError::Api(status.as_u16(), text));
        }

        let body: OperationsResponse = response
            .json()
            .await
            .map_err(|e| ClassifyError::Parse(e.to_string()))?;

        Ok(body.operations)
    }

    fn transport_error(&self, error: reqwest::Error) -> ClassifyError {
        if error.is_timeout() {
            ClassifyError::Timeout(self.timeout)
        } else {
            ClassifyError::Network(error.to_string())
        }
    }
}
