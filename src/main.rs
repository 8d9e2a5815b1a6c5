use mediscan::app::ScanApp;
use mediscan::config::Settings;
use mediscan::error::AppError;
use tracing::info;

fn init_logging(settings: &Settings) {
    tracing_subscriber::fmt()
        .with_max_level(settings.log.max_level())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let settings = Settings::load()?;
    init_logging(&settings);
    info!(endpoint = %settings.predictor.endpoint, "starting mediscan");
    ScanApp::start_gui(settings)
}
