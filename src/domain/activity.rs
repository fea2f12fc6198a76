use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::domain::charge_detection::VoltageSample;
use crate::domain::cycle_merge::ChargeCycle;

// Spans strictly longer than this many whole days switch the report to monthly buckets.
pub const MONTHLY_SPAN_CUTOFF_DAYS: i64 = 60;

pub const DAILY_TICK_FORMAT: &str = "%d %b";
pub const DAILY_TICK_ANGLE: i32 = 45;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub ping_count: u64,
    pub charge_count: u64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    pub center: DateTime<Utc>,
    pub ping_count: u64,
    pub charge_count: u64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "granularity", rename_all = "camelCase")]
pub enum ActivityBuckets {
    #[serde(rename_all = "camelCase")]
    Daily {
        buckets: Vec<DailyBucket>,
        tick_format: &'static str,
        tick_angle: i32,
    },
    #[serde(rename_all = "camelCase")]
    Monthly {
        buckets: Vec<MonthlyBucket>,
        month_boundaries: Vec<DateTime<Utc>>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightPoint {
    pub at: DateTime<Utc>,
    pub volts: f64,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub buckets: ActivityBuckets,
    pub voltage_points: Vec<VoltageSample>,
    pub charge_highlights: Vec<HighlightPoint>,
}

pub fn summarize_activity(
    pings: &[DateTime<Utc>],
    cycles: &[ChargeCycle],
    voltage: &[VoltageSample],
) -> ActivitySummary {
    ActivitySummary {
        buckets: bucketize(pings, cycles),
        voltage_points: voltage.to_vec(),
        charge_highlights: highlight_points(cycles),
    }
}

fn bucketize(pings: &[DateTime<Utc>], cycles: &[ChargeCycle]) -> ActivityBuckets {
    let charge_starts: Vec<DateTime<Utc>> = cycles.iter().map(|cycle| cycle.start_time).collect();

    let first = pings.iter().chain(charge_starts.iter()).min().copied();
    let last = pings.iter().chain(charge_starts.iter()).max().copied();

    let (Some(first), Some(last)) = (first, last) else {
        return daily_buckets(pings, &charge_starts);
    };

    let span_days = (last - first).num_days();
    if span_days > MONTHLY_SPAN_CUTOFF_DAYS {
        monthly_buckets(pings, &charge_starts, first)
    } else {
        daily_buckets(pings, &charge_starts)
    }
}

fn daily_buckets(pings: &[DateTime<Utc>], charges: &[DateTime<Utc>]) -> ActivityBuckets {
    let mut counts: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();
    for ping in pings {
        counts.entry(ping.date_naive()).or_default().0 += 1;
    }
    for charge in charges {
        counts.entry(charge.date_naive()).or_default().1 += 1;
    }

    let buckets = counts
        .into_iter()
        .map(|(date, (ping_count, charge_count))| DailyBucket {
            date,
            ping_count,
            charge_count,
            label: format!(
                "{}\nPings: {ping_count} | Charges: {charge_count}",
                date.format(DAILY_TICK_FORMAT)
            ),
        })
        .collect();

    ActivityBuckets::Daily {
        buckets,
        tick_format: DAILY_TICK_FORMAT,
        tick_angle: DAILY_TICK_ANGLE,
    }
}

fn monthly_buckets(
    pings: &[DateTime<Utc>],
    charges: &[DateTime<Utc>],
    range_start: DateTime<Utc>,
) -> ActivityBuckets {
    let mut counts: BTreeMap<(i32, u32), (u64, u64)> = BTreeMap::new();
    for ping in pings {
        counts.entry((ping.year(), ping.month())).or_default().0 += 1;
    }
    for charge in charges {
        counts.entry((charge.year(), charge.month())).or_default().1 += 1;
    }

    let mut buckets = Vec::with_capacity(counts.len());
    let mut month_boundaries = Vec::new();

    for ((year, month), (ping_count, charge_count)) in counts {
        let Some(center) = month_center(year, month) else {
            continue;
        };

        buckets.push(MonthlyBucket {
            year,
            month,
            center,
            ping_count,
            charge_count,
            label: format!(
                "{}\nPings: {ping_count} | Charges: {charge_count}",
                center.format("%b %Y")
            ),
        });

        if let Some(start) = month_start(year, month)
            && start > range_start
        {
            month_boundaries.push(start);
        }
    }

    ActivityBuckets::Monthly {
        buckets,
        month_boundaries,
    }
}

fn highlight_points(cycles: &[ChargeCycle]) -> Vec<HighlightPoint> {
    let mut points = Vec::with_capacity(cycles.len() * 2);

    for cycle in cycles {
        points.push(HighlightPoint {
            at: cycle.start_time,
            volts: cycle.start_voltage,
            tooltip: format!(
                "Start Voltage: {:.2}V\nDate: {}",
                cycle.start_voltage,
                cycle.start_time.format("%d-%m-%Y %I:%M %p")
            ),
        });
        points.push(HighlightPoint {
            at: cycle.end_time,
            volts: cycle.max_voltage,
            tooltip: format!(
                "Max Voltage: {:.2}V\nDate: {}",
                cycle.max_voltage,
                cycle.end_time.format("%d-%m-%Y %I:%M %p")
            ),
        });
    }

    points
}

fn month_center(year: i32, month: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, 15, 12, 0, 0).single()
}

fn month_start(year: i32, month: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()
}
