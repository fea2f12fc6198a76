use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::activity::{self, ActivitySummary};
use crate::domain::charge_detection::{
    self, DetectionError, DetectorConfig, VoltageSample,
};
use crate::domain::cycle_merge::{self, ChargeCycle};
use crate::domain::models::{DeviceInfo, Reading};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    pub rise_threshold: f64,
    pub window: usize,
    pub merge_gap: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            rise_threshold: 0.15,
            window: 3,
            merge_gap: Duration::minutes(60),
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("detection window must be at least 1 sample")]
    WindowTooSmall,
    #[error("rise threshold must be a finite, positive voltage delta")]
    InvalidRiseThreshold,
    #[error("merge gap must not be negative")]
    NegativeMergeGap,
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.window == 0 {
            return Err(ConfigValidationError::WindowTooSmall);
        }
        if !self.rise_threshold.is_finite() || self.rise_threshold <= 0.0 {
            return Err(ConfigValidationError::InvalidRiseThreshold);
        }
        if self.merge_gap < Duration::zero() {
            return Err(ConfigValidationError::NegativeMergeGap);
        }

        Ok(())
    }

    fn detector(&self) -> DetectorConfig {
        DetectorConfig {
            rise_threshold: self.rise_threshold,
            window: self.window,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("invalid analysis configuration: {0}")]
    Config(#[from] ConfigValidationError),
    #[error("charge detection failed: {0}")]
    Detection(#[from] DetectionError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceAnalysis {
    pub device_id: String,
    pub device_info: Option<DeviceInfo>,
    pub ping_count: u64,
    pub charge_cycle_count: u64,
    pub long_offline_count: u64,
    pub charge_cycles: Vec<ChargeCycle>,
    pub activity: ActivitySummary,
}

pub fn analyze_readings(
    device_id: &str,
    readings: &[Reading],
    config: &AnalysisConfig,
    device_info: Option<DeviceInfo>,
) -> Result<DeviceAnalysis, AnalysisError> {
    config.validate()?;

    let samples = voltage_samples(readings);
    let pings = ping_timestamps(readings);

    let raw_events = charge_detection::detect_charges(&samples, &config.detector())?;
    let cycles = cycle_merge::merge_charges(&raw_events, config.merge_gap);

    let long_offline_count = cycles.iter().filter(|cycle| cycle.is_long_offline).count() as u64;
    let activity = activity::summarize_activity(&pings, &cycles, &samples);

    Ok(DeviceAnalysis {
        device_id: device_id.to_string(),
        device_info,
        ping_count: pings.len() as u64,
        charge_cycle_count: cycles.len() as u64,
        long_offline_count,
        charge_cycles: cycles,
        activity,
    })
}

fn voltage_samples(readings: &[Reading]) -> Vec<VoltageSample> {
    readings
        .iter()
        .filter_map(|reading| {
            reading
                .voltage
                .filter(|volts| volts.is_finite())
                .map(|volts| VoltageSample {
                    at: reading.timestamp,
                    volts,
                })
        })
        .collect()
}

fn ping_timestamps(readings: &[Reading]) -> Vec<DateTime<Utc>> {
    readings
        .iter()
        .filter(|reading| reading.event_kind.counts_as_ping())
        .map(|reading| reading.timestamp)
        .collect()
}
