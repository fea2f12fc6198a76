use thiserror::Error;

use crate::domain::analysis::{self, AnalysisConfig, AnalysisError, DeviceAnalysis};
use crate::domain::models::{DateRange, DeviceInfo, Reading};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("telemetry backend error: {0}")]
    Backend(String),
    #[error("unknown device: {0}")]
    UnknownDevice(String),
}

impl SourceError {
    pub fn backend<E: std::fmt::Display>(error: E) -> Self {
        Self::Backend(error.to_string())
    }
}

pub trait TelemetrySource: Send + Sync + 'static {
    fn readings(&self, device_id: &str, range: DateRange) -> Result<Vec<Reading>, SourceError>;
}

pub trait DeviceDirectory: Send + Sync + 'static {
    fn device_info(&self, device_id: &str) -> Result<Option<DeviceInfo>, SourceError>;
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to load readings: {0}")]
    Source(#[source] SourceError),
    #[error("failed to look up device info: {0}")]
    Directory(#[source] SourceError),
    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
}

pub struct AnalysisService<S, D> {
    source: S,
    directory: D,
    config: AnalysisConfig,
}

impl<S, D> AnalysisService<S, D>
where
    S: TelemetrySource,
    D: DeviceDirectory,
{
    pub fn new(source: S, directory: D, config: AnalysisConfig) -> Self {
        Self {
            source,
            directory,
            config,
        }
    }

    pub fn analyze(
        &self,
        device_id: &str,
        range: DateRange,
    ) -> Result<DeviceAnalysis, ServiceError> {
        let readings = self
            .source
            .readings(device_id, range)
            .map_err(ServiceError::Source)?;
        let device_info = self
            .directory
            .device_info(device_id)
            .map_err(ServiceError::Directory)?;

        let result = analysis::analyze_readings(device_id, &readings, &self.config, device_info)?;

        tracing::info!(
            device_id,
            readings = readings.len(),
            ping_count = result.ping_count,
            charge_cycles = result.charge_cycle_count,
            long_offline = result.long_offline_count,
            "device analysis complete"
        );

        Ok(result)
    }
}
