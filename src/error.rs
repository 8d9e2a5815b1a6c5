use reqwest::StatusCode;
use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Config Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Predict Error: {0}")]
    Predict(#[from] PredictError),
    #[error("Session Error: {0}")]
    Session(#[from] SessionError),
    #[error("Image Error: {0}")]
    Image(#[from] ImageRejection),
    #[error("Ui Error: {0}")]
    Ui(String),
}

/// Failure of a single predictor call. `user_message` is what reaches the
/// session and the notification overlay; the full variant goes to the log.
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("predictor rejected the request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },
    #[error("predictor returned {status} with no error message")]
    Status { status: StatusCode },
    #[error("invalid response payload: {0}")]
    InvalidPayload(String),
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

impl PredictError {
    pub fn user_message(&self) -> String {
        match self {
            PredictError::Rejected { message, .. } => message.clone(),
            PredictError::InvalidPayload(_) => "Invalid response format from server".to_string(),
            PredictError::Status { .. } | PredictError::Transport(_) => {
                "Failed to analyze image".to_string()
            }
        }
    }
}

// State machine guard violations. These never reach the user as failures,
// the UI disables the offending controls.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("no image selected")]
    NoImage,
    #[error("an analysis is already in flight")]
    AnalysisInFlight,
    #[error("session must be reset before a new analysis")]
    NotIdle,
}

/// Rejection of a picked file before it ever enters the session.
#[derive(Error, Debug)]
pub enum ImageRejection {
    #[error("selected file is empty")]
    Empty,
    #[error("could not read {path}: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },
    #[error("unsupported image format (expected JPEG or PNG)")]
    UnsupportedFormat,
}
