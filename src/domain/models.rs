use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Ping,
    Reboot,
    Other,
}

impl EventKind {
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "G_PING" | "PING" => Self::Ping,
            "REBOOT" => Self::Reboot,
            _ => Self::Other,
        }
    }

    // Reboot events also mark the device online.
    pub fn counts_as_ping(self) -> bool {
        matches!(self, Self::Ping | Self::Reboot)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub event_kind: EventKind,
    pub voltage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub region: String,
    pub branch: String,
    pub sim_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{DateRange, EventKind};

    #[test]
    fn classifies_ping_labels_case_insensitively() {
        assert_eq!(EventKind::parse("G_PING"), EventKind::Ping);
        assert_eq!(EventKind::parse("  g_ping "), EventKind::Ping);
        assert_eq!(EventKind::parse("ping"), EventKind::Ping);
    }

    #[test]
    fn classifies_reboot_and_unknown_labels() {
        assert_eq!(EventKind::parse("REBOOT"), EventKind::Reboot);
        assert_eq!(EventKind::parse("reboot"), EventKind::Reboot);
        assert_eq!(EventKind::parse("GEO_FENCE"), EventKind::Other);
        assert_eq!(EventKind::parse(""), EventKind::Other);
    }

    #[test]
    fn reboot_counts_toward_ping_totals() {
        assert!(EventKind::Ping.counts_as_ping());
        assert!(EventKind::Reboot.counts_as_ping());
        assert!(!EventKind::Other.counts_as_ping());
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let range = DateRange {
            from: NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
            to: NaiveDate::from_ymd_opt(2024, 3, 10).expect("valid date"),
        };

        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")));
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 3, 10).expect("valid date")));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 3, 11).expect("valid date")));
    }
}
