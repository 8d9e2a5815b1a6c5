pub mod app;
pub mod config;
pub mod error;
pub mod predict;
pub mod session;

pub use error::{AppError, PredictError, SessionError};

pub use predict::{HttpPredictor, PredictService, Predictor, Verdict};
pub use session::{AnalysisSession, Phase, SelectedImage};
