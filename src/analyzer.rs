//! Statistical analysis of daily data usage
//!
//! The analyzer takes a raw record set, keeps only data-session records,
//! buckets them per calendar day in a configured timezone, and computes
//! descriptive statistics over the resulting daily series: averages, a
//! weekday/weekend split, extreme days, a linear-regression trend, and
//! 2-sigma outliers.
//!
//! Unlike the day aggregator, which keys buckets on the literal date portion
//! of each timestamp, the analyzer parses timestamps and assigns them to
//! calendar days in its configured timezone. Near midnight across a timezone
//! boundary the two can disagree about which day a record belongs to.
//!
//! Everything operates on the complete history passed in; there is no
//! sliding window. "Recent N days" framing is entirely up to the caller.

use cdrstat_core::aggregation_types::{DailyUsage, UsageInsights, UsageTrend};
use cdrstat_core::parse::parse_data_volume;
use cdrstat_core::timezone::TimezoneConfig;
use cdrstat_core::types::CdrRecord;
use chrono::{DateTime, Datelike, NaiveDate, Weekday};
use std::collections::BTreeMap;
use tracing::trace;

/// Timestamp format of the carrier's `startDate` field
const START_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Regression slope (MB per day-index step) beyond which the trend is
/// classified as increasing or decreasing
const TREND_SLOPE_THRESHOLD_MB: f64 = 5.0;

/// Minimum number of days required for trend and outlier detection
const MIN_DAYS_FOR_STATISTICS: usize = 3;

/// Usage analyzer over raw CDR records
pub struct Analyzer {
    timezone_config: TimezoneConfig,
}

impl Analyzer {
    /// Create an analyzer using the given timezone for calendar grouping
    pub fn new(timezone_config: TimezoneConfig) -> Self {
        Self { timezone_config }
    }

    /// The timezone configuration used for calendar grouping
    pub fn timezone_config(&self) -> &TimezoneConfig {
        &self.timezone_config
    }

    /// Compute usage insights over a record set.
    ///
    /// Returns `None` when no data-session records are present or none of
    /// them carries a parseable timestamp; "no insights available" is a
    /// first-class outcome, not an error.
    pub fn analyze(&self, records: &[CdrRecord]) -> Option<UsageInsights> {
        // Data sessions only. Matching here is containment, not the exact
        // classifier rule: any type mentioning "data" carries data volume.
        let data_records: Vec<&CdrRecord> = records
            .iter()
            .filter(|r| r.cdr_type.to_lowercase().contains("data"))
            .collect();

        if data_records.is_empty() {
            return None;
        }

        let daily_usages = self.daily_usages(&data_records);
        if daily_usages.is_empty() {
            return None;
        }

        let total: f64 = daily_usages.iter().map(|d| d.data_usage_mb).sum();
        let average_daily_usage = total / daily_usages.len() as f64;

        let weekday_average = subset_average(&daily_usages, |d| !d.is_weekend);
        let weekend_average = subset_average(&daily_usages, |d| d.is_weekend);

        let highest_usage_day = extreme_day(&daily_usages, |candidate, best| candidate > best);
        let lowest_usage_day = extreme_day(&daily_usages, |candidate, best| candidate < best);

        let trend = calculate_trend(&daily_usages);
        let outliers = detect_outliers(&daily_usages);

        Some(UsageInsights {
            recent_days_count: daily_usages.len(),
            average_daily_usage,
            weekday_average,
            weekend_average,
            highest_usage_day,
            lowest_usage_day,
            trend,
            outliers,
            daily_usages,
        })
    }

    /// Bucket data records per calendar day and sum their volumes.
    ///
    /// Records whose timestamp fails to parse are dropped from this pass;
    /// a garbled timestamp must not abort the whole analysis.
    fn daily_usages(&self, records: &[&CdrRecord]) -> Vec<DailyUsage> {
        let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();

        for record in records {
            let parsed = match DateTime::parse_from_str(&record.start_date, START_DATE_FORMAT) {
                Ok(dt) => dt,
                Err(_) => {
                    trace!(start_date = %record.start_date, "dropping record with unparseable timestamp");
                    continue;
                }
            };

            let local_date = parsed.with_timezone(&self.timezone_config.tz).date_naive();
            *per_day.entry(local_date).or_insert(0.0) += parse_data_volume(&record.duration);
        }

        per_day
            .into_iter()
            .map(|(date, data_usage_mb)| DailyUsage {
                date,
                data_usage_mb,
                is_weekend: is_weekend(date),
            })
            .collect()
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Mean over the days matching the predicate, 0 when none do.
fn subset_average(daily: &[DailyUsage], predicate: impl Fn(&DailyUsage) -> bool) -> f64 {
    let subset: Vec<f64> = daily
        .iter()
        .filter(|d| predicate(d))
        .map(|d| d.data_usage_mb)
        .collect();
    if subset.is_empty() {
        0.0
    } else {
        subset.iter().sum::<f64>() / subset.len() as f64
    }
}

/// Stable argmax/argmin: the first day in ascending-date order wins ties.
fn extreme_day(daily: &[DailyUsage], beats: impl Fn(f64, f64) -> bool) -> Option<DailyUsage> {
    let mut best: Option<&DailyUsage> = None;
    for day in daily {
        match best {
            Some(current) if !beats(day.data_usage_mb, current.data_usage_mb) => {}
            _ => best = Some(day),
        }
    }
    best.cloned()
}

/// Classify the usage trend with a least-squares fit of daily volume against
/// the 0-based day index. Day-index regression deliberately ignores calendar
/// gaps: a missing day does not weight the fit.
fn calculate_trend(daily: &[DailyUsage]) -> UsageTrend {
    if daily.len() < MIN_DAYS_FOR_STATISTICS {
        return UsageTrend::Stable;
    }

    let n = daily.len() as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;

    for (i, day) in daily.iter().enumerate() {
        let x = i as f64;
        let y = day.data_usage_mb;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x);

    if slope > TREND_SLOPE_THRESHOLD_MB {
        UsageTrend::Increasing
    } else if slope < -TREND_SLOPE_THRESHOLD_MB {
        UsageTrend::Decreasing
    } else {
        UsageTrend::Stable
    }
}

/// Days deviating more than two population standard deviations from the mean.
fn detect_outliers(daily: &[DailyUsage]) -> Vec<DailyUsage> {
    if daily.len() < MIN_DAYS_FOR_STATISTICS {
        return Vec::new();
    }

    let n = daily.len() as f64;
    let mean = daily.iter().map(|d| d.data_usage_mb).sum::<f64>() / n;
    let variance = daily
        .iter()
        .map(|d| (d.data_usage_mb - mean).powi(2))
        .sum::<f64>()
        / n;
    let threshold = 2.0 * variance.sqrt();

    daily
        .iter()
        .filter(|d| (d.data_usage_mb - mean).abs() > threshold)
        .cloned()
        .collect()
}
