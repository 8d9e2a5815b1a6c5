use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::config::PredictorSettings;
use crate::error::PredictError;
use crate::predict::verdict::WirePrediction;
use crate::predict::{Health, Verdict};
use crate::session::SelectedImage;

/// Seam to the remote prediction service. The app talks to this trait so
/// tests can stub the remote side out.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, image: &SelectedImage) -> Result<Verdict, PredictError>;
    async fn health(&self) -> Result<Health, PredictError>;
}

/// HTTP implementation: one multipart POST per analysis, request timeout
/// set client-wide from the settings.
pub struct HttpPredictor {
    client: reqwest::Client,
    endpoint: String,
    health_endpoint: String,
}

impl HttpPredictor {
    pub fn new(settings: &PredictorSettings) -> Result<Self, PredictError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            health_endpoint: settings.health_endpoint(),
        })
    }
}

#[async_trait]
impl Predictor for HttpPredictor {
    async fn predict(&self, image: &SelectedImage) -> Result<Verdict, PredictError> {
        let part = Part::bytes(image.bytes().to_vec())
            .file_name(image.filename().to_owned())
            .mime_str(image.kind().mime())?;
        let form = Form::new().part("image", part);

        debug!(
            image = %image.id(),
            filename = %image.filename(),
            endpoint = %self.endpoint,
            "uploading image for analysis"
        );
        let response = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        interpret_response(status, &body)
    }

    async fn health(&self) -> Result<Health, PredictError> {
        let response = self.client.get(&self.health_endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PredictError::Status { status });
        }
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| PredictError::InvalidPayload(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct WireError {
    #[serde(default)]
    error: Option<String>,
}

/// Pure mapping from (status, body) to a verdict or a typed failure; the
/// network half above stays a thin shell around it.
fn interpret_response(status: StatusCode, body: &[u8]) -> Result<Verdict, PredictError> {
    if status.is_success() {
        let wire: WirePrediction = serde_json::from_slice(body)
            .map_err(|e| PredictError::InvalidPayload(e.to_string()))?;
        return Ok(Verdict::from_wire(wire));
    }
    match serde_json::from_slice::<WireError>(body) {
        Ok(WireError {
            error: Some(message),
        }) => Err(PredictError::Rejected { status, message }),
        _ => Err(PredictError::Status { status }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_success_body_becomes_verdict() {
        let body = br#"{"detected": true, "confidence": 91.4, "class_name": "malignant"}"#;
        let verdict = interpret_response(StatusCode::OK, body).unwrap();
        assert!(verdict.detected);
        assert_eq!(verdict.confidence, 91);
        assert_eq!(verdict.class_name.as_deref(), Some("malignant"));
    }

    #[test]
    fn test_success_body_missing_detected_is_invalid() {
        let err = interpret_response(StatusCode::OK, br#"{"confidence": 80.0}"#).unwrap_err();
        assert!(matches!(err, PredictError::InvalidPayload(_)));
        assert_eq!(err.user_message(), "Invalid response format from server");
    }

    #[test]
    fn test_success_body_with_wrong_types_is_invalid() {
        let err = interpret_response(
            StatusCode::OK,
            br#"{"detected": true, "confidence": "high"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, PredictError::InvalidPayload(_)));
    }

    #[test]
    fn test_non_json_success_body_is_invalid() {
        let err = interpret_response(StatusCode::OK, b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, PredictError::InvalidPayload(_)));
    }

    #[test]
    fn test_error_body_message_is_surfaced() {
        let err = interpret_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            br#"{"error": "model unavailable"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, PredictError::Rejected { .. }));
        assert_eq!(err.user_message(), "model unavailable");
    }

    #[test]
    fn test_error_body_without_message_falls_back() {
        let err = interpret_response(StatusCode::INTERNAL_SERVER_ERROR, b"{}").unwrap_err();
        match &err {
            PredictError::Status { status } => {
                assert_eq!(*status, StatusCode::INTERNAL_SERVER_ERROR);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.user_message(), "Failed to analyze image");
    }

    #[test]
    fn test_non_json_error_body_falls_back() {
        let err =
            interpret_response(StatusCode::BAD_GATEWAY, b"upstream timed out").unwrap_err();
        assert!(matches!(err, PredictError::Status { .. }));
        assert_eq!(err.user_message(), "Failed to analyze image");
    }

    #[test]
    fn test_rejection_is_not_tied_to_one_status_code() {
        let err = interpret_response(StatusCode::BAD_REQUEST, br#"{"error": "Invalid file type"}"#)
            .unwrap_err();
        assert_eq!(err.user_message(), "Invalid file type");
    }
}
