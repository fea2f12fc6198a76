use chrono::{DateTime, TimeZone, Utc};

use crate::domain::charge_detection::VoltageSample;
use crate::domain::models::{EventKind, Reading};

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("test timestamp must be valid")
}

pub fn sample(at: DateTime<Utc>, volts: f64) -> VoltageSample {
    VoltageSample { at, volts }
}

pub fn ping(timestamp: DateTime<Utc>) -> Reading {
    Reading {
        timestamp,
        event_kind: EventKind::Ping,
        voltage: None,
    }
}

pub fn voltage_reading(timestamp: DateTime<Utc>, volts: f64) -> Reading {
    Reading {
        timestamp,
        event_kind: EventKind::Other,
        voltage: Some(volts),
    }
}
