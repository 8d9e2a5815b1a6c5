mod predictor;
mod service;
mod verdict;

pub use predictor::{HttpPredictor, Predictor};
pub use service::PredictService;
pub use verdict::{Health, Verdict};
