mod analysis_session;
mod phase;
mod selected_image;

pub use analysis_session::{AnalysisRequest, AnalysisSession, Applied};
pub use phase::Phase;
pub use selected_image::{ImageKind, SelectedImage};
