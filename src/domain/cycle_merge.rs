use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, Serializer};

use crate::domain::charge_detection::RawChargeEvent;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeCycle {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub start_voltage: f64,
    pub max_voltage: f64,
    #[serde(serialize_with = "duration_as_seconds")]
    pub duration: Duration,
    pub duration_label: String,
    pub is_long_offline: bool,
}

impl ChargeCycle {
    pub fn date(&self) -> chrono::NaiveDate {
        self.start_time.date_naive()
    }
}

pub fn merge_charges(events: &[RawChargeEvent], merge_gap: Duration) -> Vec<ChargeCycle> {
    let mut cycles = Vec::new();
    let mut open: Option<Span> = None;

    for event in events {
        open = Some(match open.take() {
            Some(span) if event.start_time - span.end_time <= merge_gap => span.absorb(event),
            Some(span) => {
                cycles.push(span.seal());
                Span::start(event)
            }
            None => Span::start(event),
        });
    }

    if let Some(span) = open {
        cycles.push(span.seal());
    }

    cycles
}

pub fn format_duration_label(duration: Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;

    format!("{days} days {hours} hrs {minutes} mins")
}

#[derive(Debug, Clone, Copy)]
struct Span {
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    start_voltage: f64,
    max_voltage: f64,
}

impl Span {
    fn start(event: &RawChargeEvent) -> Self {
        Self {
            start_time: event.start_time,
            end_time: event.end_time,
            start_voltage: event.start_voltage,
            max_voltage: event.max_voltage,
        }
    }

    fn absorb(self, event: &RawChargeEvent) -> Self {
        Self {
            start_time: self.start_time,
            end_time: self.end_time.max(event.end_time),
            start_voltage: self.start_voltage.min(event.start_voltage),
            max_voltage: self.max_voltage.max(event.max_voltage),
        }
    }

    fn seal(self) -> ChargeCycle {
        let duration = self.end_time - self.start_time;

        ChargeCycle {
            start_time: self.start_time,
            end_time: self.end_time,
            start_voltage: self.start_voltage,
            max_voltage: self.max_voltage,
            duration,
            duration_label: format_duration_label(duration),
            // Two days or longer without a charge counts as a long offline period, inclusive.
            is_long_offline: duration >= Duration::days(2),
        }
    }
}

fn duration_as_seconds<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_i64(duration.num_seconds())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::{format_duration_label, merge_charges};
    use crate::domain::charge_detection::RawChargeEvent;
    use crate::test_support::at;

    fn event(
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
        start_voltage: f64,
        max_voltage: f64,
    ) -> RawChargeEvent {
        RawChargeEvent {
            start_time: start,
            end_time: end,
            start_voltage,
            max_voltage,
        }
    }

    #[test]
    fn merges_events_with_gap_equal_to_tolerance() {
        let events = vec![
            event(at(2024, 3, 1, 8, 0), at(2024, 3, 1, 8, 30), 3.70, 3.95),
            event(at(2024, 3, 1, 9, 30), at(2024, 3, 1, 10, 0), 3.80, 4.00),
        ];

        let cycles = merge_charges(&events, Duration::minutes(60));

        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].start_time, at(2024, 3, 1, 8, 0));
        assert_eq!(cycles[0].end_time, at(2024, 3, 1, 10, 0));
    }

    #[test]
    fn keeps_events_separate_beyond_tolerance() {
        let events = vec![
            event(at(2024, 3, 1, 8, 0), at(2024, 3, 1, 8, 30), 3.70, 3.95),
            event(at(2024, 3, 1, 9, 31), at(2024, 3, 1, 10, 0), 3.80, 4.00),
        ];

        let cycles = merge_charges(&events, Duration::minutes(60));

        assert_eq!(cycles.len(), 2);
    }

    #[test]
    fn merged_cycle_folds_voltage_extremes() {
        let events = vec![
            event(at(2024, 3, 1, 8, 0), at(2024, 3, 1, 8, 30), 3.70, 3.95),
            event(at(2024, 3, 1, 8, 40), at(2024, 3, 1, 9, 0), 3.60, 4.05),
        ];

        let cycles = merge_charges(&events, Duration::minutes(60));

        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].start_voltage, 3.60);
        assert_eq!(cycles[0].max_voltage, 4.05);
        assert_eq!(cycles[0].duration, Duration::minutes(60));
        assert_eq!(
            cycles[0].date(),
            chrono::NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
        );
    }

    #[test]
    fn chains_of_nearby_events_collapse_into_one_cycle() {
        let events = vec![
            event(at(2024, 3, 1, 8, 0), at(2024, 3, 1, 8, 20), 3.70, 3.80),
            event(at(2024, 3, 1, 9, 0), at(2024, 3, 1, 9, 20), 3.75, 3.90),
            event(at(2024, 3, 1, 10, 0), at(2024, 3, 1, 10, 20), 3.85, 4.10),
        ];

        let cycles = merge_charges(&events, Duration::minutes(60));

        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].start_time, at(2024, 3, 1, 8, 0));
        assert_eq!(cycles[0].end_time, at(2024, 3, 1, 10, 20));
        assert_eq!(cycles[0].max_voltage, 4.10);
    }

    #[test]
    fn merge_keeps_longest_end_time() {
        let events = vec![
            event(at(2024, 3, 1, 8, 0), at(2024, 3, 1, 10, 0), 3.70, 4.00),
            event(at(2024, 3, 1, 9, 0), at(2024, 3, 1, 9, 30), 3.75, 3.90),
        ];

        let cycles = merge_charges(&events, Duration::minutes(60));

        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].end_time, at(2024, 3, 1, 10, 0));
    }

    #[test]
    fn flags_long_offline_at_exactly_two_days() {
        let events = vec![event(
            at(2024, 3, 1, 8, 0),
            at(2024, 3, 3, 8, 0),
            3.40,
            4.00,
        )];

        let cycles = merge_charges(&events, Duration::minutes(60));

        assert!(cycles[0].is_long_offline);
        assert_eq!(cycles[0].duration_label, "2 days 0 hrs 0 mins");
    }

    #[test]
    fn does_not_flag_cycles_shorter_than_two_days() {
        let events = vec![event(
            at(2024, 3, 1, 8, 0),
            at(2024, 3, 3, 7, 59),
            3.40,
            4.00,
        )];

        let cycles = merge_charges(&events, Duration::minutes(60));

        assert!(!cycles[0].is_long_offline);
    }

    #[test]
    fn duration_label_truncates_each_unit() {
        let duration = Duration::days(2) + Duration::hours(5) + Duration::minutes(59)
            + Duration::seconds(59);

        assert_eq!(format_duration_label(duration), "2 days 5 hrs 59 mins");
    }

    #[test]
    fn duration_label_for_short_cycles_shows_zero_days() {
        assert_eq!(
            format_duration_label(Duration::minutes(42)),
            "0 days 0 hrs 42 mins"
        );
    }

    #[test]
    fn empty_input_yields_no_cycles() {
        assert!(merge_charges(&[], Duration::minutes(60)).is_empty());
    }

    #[test]
    fn output_cycles_are_ordered_and_separated_by_more_than_the_gap() {
        let events = vec![
            event(at(2024, 3, 1, 8, 0), at(2024, 3, 1, 8, 30), 3.70, 3.95),
            event(at(2024, 3, 1, 9, 0), at(2024, 3, 1, 9, 30), 3.75, 4.00),
            event(at(2024, 3, 2, 12, 0), at(2024, 3, 2, 12, 30), 3.50, 3.90),
        ];
        let gap = Duration::minutes(60);

        let cycles = merge_charges(&events, gap);

        assert_eq!(cycles.len(), 2);
        for pair in cycles.windows(2) {
            assert!(pair[0].start_time < pair[1].start_time);
            assert!(pair[1].start_time - pair[0].end_time > gap);
        }
    }
}
