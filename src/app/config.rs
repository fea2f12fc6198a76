use chrono::Duration;

use crate::app::AppError;
use crate::domain::analysis::AnalysisConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rise_threshold: f64,
    pub detection_window: usize,
    // Rises separated by at most this gap fold into one charging cycle.
    pub merge_gap_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            rise_threshold: parse_or_default(&lookup, "RISE_THRESHOLD", 0.15_f64)?,
            detection_window: parse_or_default(&lookup, "DETECTION_WINDOW", 3_usize)?,
            merge_gap_minutes: parse_or_default(&lookup, "MERGE_GAP_MINUTES", 60_i64)?,
        })
    }

    pub fn analysis(&self) -> Result<AnalysisConfig, AppError> {
        let config = AnalysisConfig {
            rise_threshold: self.rise_threshold,
            window: self.detection_window,
            merge_gap: Duration::minutes(self.merge_gap_minutes),
        };

        config.validate().map_err(AppError::invalid_parameters)?;

        Ok(config)
    }
}

fn parse_or_default<T, F>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::config(format!("{key} must be a valid number"))),
        None => Ok(default),
    }
}
