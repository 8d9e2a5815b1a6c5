use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The validated, display-ready outcome of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub detected: bool,
    /// Rounded to the nearest integer, clamped to 0..=100.
    pub confidence: u8,
    /// Shown verbatim when the predictor names the class.
    pub class_name: Option<String>,
    pub analyzed_at: DateTime<Utc>,
}

impl Verdict {
    pub fn new(detected: bool, confidence: u8, class_name: Option<String>) -> Self {
        Self {
            detected,
            confidence,
            class_name,
            analyzed_at: Utc::now(),
        }
    }

    pub(crate) fn from_wire(wire: WirePrediction) -> Self {
        Self::new(
            wire.detected,
            round_confidence(wire.confidence),
            wire.class_name,
        )
    }
}

/// Success body of the predict endpoint. `detected` and `confidence` are
/// required; a missing field or a wrong type fails deserialization and the
/// attempt is treated as an invalid response. `class_index` and
/// `all_predictions` also arrive on the wire but carry nothing the client
/// renders, so they are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct WirePrediction {
    pub detected: bool,
    pub confidence: f64,
    #[serde(default)]
    pub class_name: Option<String>,
}

/// Body of the predictor's `/health` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub model_loaded: bool,
}

fn round_confidence(raw: f64) -> u8 {
    raw.round().clamp(0.0, 100.0) as u8
}
