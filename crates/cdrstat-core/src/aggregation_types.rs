//! Aggregation and analysis data types for cdrstat
//!
//! Pure data structures produced by day aggregation and usage analysis.
//! These types have no dependencies on the aggregator or analyzer logic;
//! they are values, recomputed wholesale on every analysis pass and never
//! persisted independently.

use crate::types::{CdrKind, DayKey, RecordSource, UsageCounts};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-day usage summary across settled and provisional records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAggregatedUsage {
    /// Day bucket key (literal date portion of the record timestamps)
    pub day: DayKey,
    /// Accumulated counters for the day
    #[serde(flatten)]
    pub counts: UsageCounts,
    /// Individual record entries (only populated in detailed mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<VerboseCdrEntry>>,
}

/// Per-record detail line for detailed mode
///
/// Identity is the (source, index) pair, the record's position within its
/// fetch snapshot. Timestamps are carried for display only; they are not
/// unique and must never be used as a key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerboseCdrEntry {
    /// Which fetch the record came from
    pub source: RecordSource,
    /// Position of the record within its source snapshot
    pub index: usize,
    /// Raw record timestamp
    pub start_date: String,
    /// Raw record kind label
    pub cdr_type: String,
    /// Classified kind
    pub kind: CdrKind,
    /// Charge for this record
    pub charge: f64,
}

/// Data usage for a single calendar day, as seen by the analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyUsage {
    /// Calendar date (in the analyzer's configured timezone)
    pub date: NaiveDate,
    /// Data volume in megabytes
    pub data_usage_mb: f64,
    /// Whether the date falls on a Saturday or Sunday
    pub is_weekend: bool,
}

/// Direction of the usage trend over the analyzed window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageTrend {
    Increasing,
    Decreasing,
    Stable,
}

impl fmt::Display for UsageTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increasing => write!(f, "increasing"),
            Self::Decreasing => write!(f, "decreasing"),
            Self::Stable => write!(f, "stable"),
        }
    }
}

/// Statistical insights over a sequence of daily data usage values
///
/// Recomputed wholesale on each analysis request; there is no incremental
/// update. `daily_usages` is ordered ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageInsights {
    /// Per-day usage, ascending by date
    pub daily_usages: Vec<DailyUsage>,
    /// Arithmetic mean over all days
    pub average_daily_usage: f64,
    /// Mean over weekdays, 0 when there are none
    pub weekday_average: f64,
    /// Mean over weekend days, 0 when there are none
    pub weekend_average: f64,
    /// Day with the highest usage (first wins on ties)
    pub highest_usage_day: Option<DailyUsage>,
    /// Day with the lowest usage (first wins on ties)
    pub lowest_usage_day: Option<DailyUsage>,
    /// Linear-regression trend classification
    pub trend: UsageTrend,
    /// Days deviating more than two standard deviations from the mean
    pub outliers: Vec<DailyUsage>,
    /// Number of daily entries actually produced
    pub recent_days_count: usize,
}

/// Totals across a set of aggregated days
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Totals {
    #[serde(flatten)]
    pub counts: UsageCounts,
}

impl Totals {
    pub fn from_daily(days: &[DayAggregatedUsage]) -> Self {
        let mut totals = Self::default();
        for day in days {
            totals.counts += day.counts;
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_from_daily() {
        let days = vec![
            DayAggregatedUsage {
                day: DayKey::new("2025-09-28"),
                counts: UsageCounts::new(150.0, 10, 2, 0.30),
                entries: None,
            },
            DayAggregatedUsage {
                day: DayKey::new("2025-09-27"),
                counts: UsageCounts::new(50.0, 5, 1, 0.10),
                entries: None,
            },
        ];

        let totals = Totals::from_daily(&days);
        assert_eq!(totals.counts.data_usage_mb, 200.0);
        assert_eq!(totals.counts.call_minutes, 15);
        assert_eq!(totals.counts.sms_count, 3);
        assert!((totals.counts.total_charge - 0.40).abs() < 1e-9);
    }

    #[test]
    fn test_day_aggregated_usage_serialization_flattens_counts() {
        let day = DayAggregatedUsage {
            day: DayKey::new("2025-09-28"),
            counts: UsageCounts::new(150.0, 0, 1, 0.10),
            entries: None,
        };

        let json = serde_json::to_value(&day).unwrap();
        assert_eq!(json["day"], "2025-09-28");
        assert_eq!(json["data_usage_mb"], 150.0);
        assert_eq!(json["sms_count"], 1);
        assert!(json.get("entries").is_none());
    }

    #[test]
    fn test_usage_trend_display() {
        assert_eq!(UsageTrend::Increasing.to_string(), "increasing");
        assert_eq!(UsageTrend::Stable.to_string(), "stable");
    }
}
