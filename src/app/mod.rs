mod config;
mod error;
mod logging;
mod services;

pub use config::AppConfig;
pub use error::AppError;
pub use services::{AnalysisService, DeviceDirectory, ServiceError, SourceError, TelemetrySource};

pub fn bootstrap() -> Result<AppConfig, AppError> {
    dotenvy::dotenv().ok();

    logging::init()?;

    let config = AppConfig::from_env()?;
    let analysis = config.analysis()?;

    tracing::info!(
        rise_threshold = analysis.rise_threshold,
        detection_window = analysis.window,
        merge_gap_minutes = config.merge_gap_minutes,
        "telemetry analysis configured"
    );

    Ok(config)
}
