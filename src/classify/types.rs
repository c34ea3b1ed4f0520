//! Classification service wire types.

use serde::{Deserialize, Serialize};

use crate::core::config::LaneId;

/// `POST /api/process` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyRequest {
    /// Card label, e.g. "Voice A".
    pub card_name: String,

    /// Destination zone name, e.g. "Zone 2".
    pub zone_name: String,

    /// Destination lane, e.g. "Lane 3".
    pub lane_name: String,

    /// Zone the card came from, when it came from a processing zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_zone: Option<String>,
}

impl ClassifyRequest {
    pub fn new(card_name: impl Into<String>, zone_name: impl Into<String>, lane: LaneId) -> Self {
        Self {
            card_name: card_name.into(),
            zone_name: zone_name.into(),
            lane_name: lane.to_string(),
            previous_zone: None,
        }
    }

    #[must_use]
    pub fn with_previous_zone(mut self, zone_name: impl Into<String>) -> Self {
        self.previous_zone = Some(zone_name.into());
        self
    }
}

/// `POST /api/process` response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyResponse {
    /// Human-readable result shown on the board.
    pub message: String,

    /// "ok"/"success" or "error".
    pub status: String,

    /// Server-side processing time in seconds.
    #[serde(default)]
    pub processing_time: f64,

    /// Audio clip to play, if any.
    #[serde(default)]
    pub audio_file: Option<String>,

    #[serde(default)]
    pub metadata: Option<Metadata>,
}

impl ClassifyResponse {
    /// Did the service report success?
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self.status.as_str(), "ok" | "success")
    }

    /// Processing time in whole milliseconds.
    #[must_use]
    pub fn processing_time_ms(&self) -> u64 {
        (self.processing_time.max(0.0) * 1000.0).round() as u64
    }
}

/// A named score from an emotion model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    pub name: String,
    pub score: f64,
}

/// Per-zone analysis of a voice.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Emotions detected from the spoken words.
    #[serde(default)]
    pub language: Vec<EmotionScore>,

    /// Emotions detected from tone of voice.
    #[serde(default)]
    pub prosody: Vec<EmotionScore>,

    /// Spectrogram image URL.
    #[serde(default)]
    pub spectrogram: Option<String>,

    // Percentages, 0-100
    #[serde(default)]
    pub charisma: Option<f64>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub pitch: Option<f64>,
    #[serde(default)]
    pub energy: Option<f64>,
}

impl Metadata {
    /// Highest-scoring prosody emotion.
    #[must_use]
    pub fn dominant_prosody(&self) -> Option<&EmotionScore> {
        self.prosody
            .iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

/// A backend operation, one per processing zone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub id: String,
    pub name: String,
    pub zone: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OperationsResponse {
    pub operations: Vec<Operation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let request = ClassifyRequest::new("Voice A", "Zone 2", LaneId::new(3));
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "cardName": "Voice A",
                "zoneName": "Zone 2",
                "laneName": "Lane 3",
            })
        );

        let request = request.with_previous_zone("Zone 1");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["previousZone"], "Zone 1");
    }

    #[test]
    fn test_response_minimal() {
        let json = r#"{"message": "done", "status": "success", "processingTime": 2.0041}"#;
        let response: ClassifyResponse = serde_json::from_str(json).unwrap();

        assert!(response.is_ok());
        assert_eq!(response.processing_time_ms(), 2004);
        assert_eq!(response.audio_file, None);
        assert_eq!(response.metadata, None);
    }

    #[test]
    fn test_response_with_metadata() {
        let json = r#"{
            "message": "Voice B analysed",
            "status": "ok",
            "processingTime": 0.5,
            "audioFile": "/audio/voice-b.wav",
            "metadata": {
                "prosody": [{"name": "Calmness", "score": 0.4}, {"name": "Joy", "score": 0.7}],
                "spectrogram": "/spectrograms/voice-b.png",
                "charisma": 81.0
            }
        }"#;
        let response: ClassifyResponse = serde_json::from_str(json).unwrap();
        let metadata = response.metadata.unwrap();

        assert_eq!(response.audio_file.as_deref(), Some("/audio/voice-b.wav"));
        assert!(metadata.language.is_empty());
        assert_eq!(metadata.dominant_prosody().map(|e| e.name.as_str()), Some("Joy"));
        assert_eq!(metadata.charisma, Some(81.0));
        assert_eq!(metadata.pitch, None);
    }

    #[test]
    fn test_error_status() {
        let json = r#"{"message": "model unavailable", "status": "error"}"#;
        let response: ClassifyResponse = serde_json::from_str(json).unwrap();
        assert!(!response.is_ok());
    }

    #[test]
    fn test_operations_response() {
        let json = r#"{"operations": [{"id": "initialization", "name": "Initialization", "zone": "Zone 1"}]}"#;
        let response: OperationsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.operations.len(), 1);
        assert_eq!(response.operations[0].zone, "Zone 1");
    }
}
