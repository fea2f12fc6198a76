use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    pub rise_threshold: f64,
    pub window: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            rise_threshold: 0.15,
            window: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoltageSample {
    pub at: DateTime<Utc>,
    pub volts: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawChargeEvent {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub start_voltage: f64,
    pub max_voltage: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum DetectionError {
    #[error("voltage samples out of order at index {index}: {current} precedes {previous}")]
    UnsortedInput {
        index: usize,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },
}

pub fn detect_charges(
    samples: &[VoltageSample],
    config: &DetectorConfig,
) -> Result<Vec<RawChargeEvent>, DetectionError> {
    ensure_sorted(samples)?;

    let window = config.window;
    if samples.len() < window + 1 {
        return Ok(Vec::new());
    }

    let mut events = Vec::new();
    let mut i = 0;

    while i < samples.len() - window {
        let start = samples[i];
        let probe = samples[i + window];

        let rising = start.volts.is_finite()
            && probe.volts.is_finite()
            && probe.volts - start.volts >= config.rise_threshold;

        if !rising {
            i += 1;
            continue;
        }

        let max_index = peak_index(samples, i, i + window);
        let peak = samples[max_index];

        events.push(RawChargeEvent {
            start_time: start.at,
            end_time: peak.at,
            start_voltage: start.volts,
            max_voltage: peak.volts,
        });

        // Scanning resumes at the detected peak, never behind it.
        i = max_index.max(i + 1);
    }

    Ok(events)
}

fn ensure_sorted(samples: &[VoltageSample]) -> Result<(), DetectionError> {
    for (index, pair) in samples.windows(2).enumerate() {
        if pair[1].at < pair[0].at {
            return Err(DetectionError::UnsortedInput {
                index: index + 1,
                previous: pair[0].at,
                current: pair[1].at,
            });
        }
    }

    Ok(())
}

// Earliest index of the largest finite voltage within the inclusive range [from, to].
fn peak_index(samples: &[VoltageSample], from: usize, to: usize) -> usize {
    let mut best = from;
    for index in from..=to {
        if samples[index].volts.is_finite() && samples[index].volts > samples[best].volts {
            best = index;
        }
    }

    best
}
