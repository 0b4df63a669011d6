//! Day aggregation for CDR records
//!
//! This module folds the two independently-fetched record sets (settled and
//! provisional) into one summary per calendar day, keyed by the literal
//! date portion of each record's timestamp.
//!
//! The fold runs in two passes: all settled records first, then all
//! provisional records, into the same bucket map. Within each source the
//! arithmetic is pure addition, so shuffling records inside a source cannot
//! change the result; only the settled/provisional split matters, because
//! provisional records contribute under stricter rules: data sessions only,
//! since provisional voice and SMS records do not count until settled.
//!
//! # Examples
//!
//! ```
//! use cdrstat::aggregation::aggregate_by_day;
//! use cdrstat::types::CdrRecord;
//!
//! let settled = vec![CdrRecord {
//!     start_date: "2025-09-28T15:41:15+0200".to_string(),
//!     cdr_type: "Data".to_string(),
//!     retail_charge: 0.0,
//!     original_retail_charge: None,
//!     other_party: None,
//!     a_location: None,
//!     a_country: None,
//!     duration: "150,00 MB".to_string(),
//!     duration_in_bundle: None,
//! }];
//!
//! let days = aggregate_by_day(&settled, &[]);
//! assert_eq!(days.len(), 1);
//! assert_eq!(days[0].counts.data_usage_mb, 150.0);
//! ```

use cdrstat_core::aggregation_types::{DayAggregatedUsage, VerboseCdrEntry};
use cdrstat_core::parse::{parse_call_duration, parse_data_volume};
use cdrstat_core::types::{CdrKind, CdrRecord, DayKey, ProvisionalCdrRecord, RecordSource, UsageCounts};
use std::collections::BTreeMap;
use tracing::debug;

/// Accumulator for one day bucket
struct DayAccumulator {
    counts: UsageCounts,
    entries: Option<Vec<VerboseCdrEntry>>,
}

impl DayAccumulator {
    fn new(detailed: bool) -> Self {
        Self {
            counts: UsageCounts::default(),
            entries: if detailed { Some(Vec::new()) } else { None },
        }
    }

    fn add_settled(&mut self, record: &CdrRecord, index: usize) {
        let kind = record.kind();
        match kind {
            CdrKind::Data => {
                self.counts.data_usage_mb += parse_data_volume(&record.duration);
                self.counts.total_charge += record.retail_charge;
            }
            CdrKind::Voice => {
                self.counts.call_minutes += parse_call_duration(&record.duration);
                self.counts.total_charge += record.retail_charge;
            }
            CdrKind::Sms => {
                self.counts.sms_count += 1;
                self.counts.total_charge += record.retail_charge;
            }
            // Unrecognized kinds add nothing, but the bucket stays:
            // the day still shows up as having had activity.
            CdrKind::Unknown => {}
        }

        self.push_entry(RecordSource::Settled, index, &record.start_date, &record.cdr_type, kind, record.retail_charge);
    }

    fn add_provisional(&mut self, record: &ProvisionalCdrRecord, index: usize) {
        let kind = record.kind();
        // Provisional voice and SMS counts are unreliable until settled;
        // only data sessions contribute from this source.
        if kind == CdrKind::Data {
            self.counts.data_usage_mb += parse_data_volume(&record.duration);
            self.counts.total_charge += record.retail_charge;
        }

        self.push_entry(RecordSource::Provisional, index, &record.start_date, &record.cdr_type, kind, record.retail_charge);
    }

    fn push_entry(
        &mut self,
        source: RecordSource,
        index: usize,
        start_date: &str,
        cdr_type: &str,
        kind: CdrKind,
        charge: f64,
    ) {
        if let Some(ref mut entries) = self.entries {
            entries.push(VerboseCdrEntry {
                source,
                index,
                start_date: start_date.to_string(),
                cdr_type: cdr_type.to_string(),
                kind,
                charge,
            });
        }
    }

    fn into_day_usage(self, day: DayKey) -> DayAggregatedUsage {
        DayAggregatedUsage {
            day,
            counts: self.counts,
            entries: self.entries,
        }
    }
}

/// Aggregate settled and provisional records into per-day summaries.
///
/// Output is sorted by day key descending (most recent day first).
pub fn aggregate_by_day(
    settled: &[CdrRecord],
    provisional: &[ProvisionalCdrRecord],
) -> Vec<DayAggregatedUsage> {
    aggregate_by_day_detailed(settled, provisional, false)
}

/// Aggregate with optional per-record detail entries.
///
/// In detailed mode each day carries its contributing records, identified by
/// their (source, index) position; timestamps are not unique and are never
/// used as identity.
pub fn aggregate_by_day_detailed(
    settled: &[CdrRecord],
    provisional: &[ProvisionalCdrRecord],
    detailed: bool,
) -> Vec<DayAggregatedUsage> {
    let mut buckets: BTreeMap<DayKey, DayAccumulator> = BTreeMap::new();

    for (index, record) in settled.iter().enumerate() {
        buckets
            .entry(record.day_key())
            .or_insert_with(|| DayAccumulator::new(detailed))
            .add_settled(record, index);
    }

    for (index, record) in provisional.iter().enumerate() {
        buckets
            .entry(record.day_key())
            .or_insert_with(|| DayAccumulator::new(detailed))
            .add_provisional(record, index);
    }

    debug!(
        settled = settled.len(),
        provisional = provisional.len(),
        days = buckets.len(),
        "aggregated CDR records into day buckets"
    );

    // Most recent day first
    buckets
        .into_iter()
        .rev()
        .map(|(day, acc)| acc.into_day_usage(day))
        .collect()
}
