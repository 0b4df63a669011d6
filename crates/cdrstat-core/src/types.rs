//! Core domain types for cdrstat
//!
//! This module contains the fundamental types used throughout the cdrstat
//! library: raw call-detail records as delivered by the carrier portal,
//! the day-key used to bucket them, and the additive usage counters that
//! daily aggregation produces.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// Calendar-day bucket key derived from a record timestamp
///
/// The key is the literal substring of the ISO-8601 `startDate` preceding the
/// `T` separator (the whole string when no `T` is present). No timezone
/// conversion is applied; the date portion is taken exactly as the carrier
/// sent it.
///
/// # Examples
/// ```
/// use cdrstat_core::types::DayKey;
///
/// let day = DayKey::from_start_date("2025-09-28T15:41:15+0200");
/// assert_eq!(day.as_str(), "2025-09-28");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DayKey(String);

impl DayKey {
    /// Create a DayKey from an already-extracted date string
    pub fn new(day: impl Into<String>) -> Self {
        Self(day.into())
    }

    /// Extract the day key from a raw `startDate` timestamp string
    pub fn from_start_date(start_date: &str) -> Self {
        let day = start_date.split('T').next().unwrap_or(start_date);
        Self(day.to_string())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the key as a calendar date, if it is well-formed YYYY-MM-DD
    pub fn to_naive_date(&self) -> Option<chrono::NaiveDate> {
        chrono::NaiveDate::parse_from_str(&self.0, "%Y-%m-%d").ok()
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DayKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Classified record kind derived from the free-form `cdrType` field
///
/// The carrier encodes the record kind as a display string, so classification
/// is string matching: an exact (case-insensitive) `"data"` marks a data
/// session, while voice calls and text messages are recognized by the Dutch
/// markers `"gesprek"` and `"sms"` appearing anywhere in the type. SMS is
/// checked before the voice marker so combined labels like `"SMS gesprek"`
/// count as messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CdrKind {
    /// Mobile data session
    Data,
    /// Voice call
    Voice,
    /// Text message
    Sms,
    /// Anything else (roaming surcharges, service messages, ...)
    Unknown,
}

impl CdrKind {
    /// Classify a raw `cdrType` string
    pub fn classify(cdr_type: &str) -> Self {
        let normalized = cdr_type.to_lowercase();
        if normalized == "data" {
            Self::Data
        } else if normalized.contains("sms") {
            Self::Sms
        } else if normalized.contains("gesprek") {
            Self::Voice
        } else {
            Self::Unknown
        }
    }
}

impl fmt::Display for CdrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data => write!(f, "data"),
            Self::Voice => write!(f, "voice"),
            Self::Sms => write!(f, "sms"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Which fetch a record came from
///
/// Settled records are finalized and billed; provisional records cover
/// in-flight usage (typically the current day) and are replaced by settled
/// records once the carrier closes them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSource {
    Settled,
    Provisional,
}

impl fmt::Display for RecordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Settled => write!(f, "settled"),
            Self::Provisional => write!(f, "provisional"),
        }
    }
}

/// Settled (finalized) call-detail record as delivered by the portal
///
/// Field names are camelCase on the wire, matching the portal's response
/// payload. `start_date` is an ISO-8601 timestamp with a numeric offset
/// (e.g. `"2025-09-28T15:41:15+0200"`). `duration` is a free-form,
/// locale-formatted quantity: `"MM:SS"` for calls, `"1.208,52 MB"` style
/// for data sessions.
///
/// `start_date` is NOT a unique identity; two distinct records can share a
/// timestamp. Code that needs a per-record identity must use the record's
/// position within its source (see `VerboseCdrEntry`), never a
/// timestamp-keyed map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdrRecord {
    /// Event timestamp, ISO-8601 with numeric offset
    pub start_date: String,
    /// Free-form record kind label
    pub cdr_type: String,
    /// Charge billed for this record
    pub retail_charge: f64,
    /// Charge before discounts, when different
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_retail_charge: Option<f64>,
    /// Counterparty number for calls and messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_party: Option<String>,
    /// Originating location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a_location: Option<String>,
    /// Originating country
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a_country: Option<String>,
    /// Locale-formatted quantity (duration or data volume)
    pub duration: String,
    /// Portion of the duration covered by the bundle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_in_bundle: Option<String>,
}

impl CdrRecord {
    /// Day bucket this record belongs to
    pub fn day_key(&self) -> DayKey {
        DayKey::from_start_date(&self.start_date)
    }

    /// Classified record kind
    pub fn kind(&self) -> CdrKind {
        CdrKind::classify(&self.cdr_type)
    }
}

/// Provisional (not-yet-settled) call-detail record
///
/// Same shape as [`CdrRecord`] minus `durationInBundle`, which the carrier
/// only reports once a record settles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionalCdrRecord {
    /// Event timestamp, ISO-8601 with numeric offset
    pub start_date: String,
    /// Free-form record kind label
    pub cdr_type: String,
    /// Charge accrued so far for this record
    pub retail_charge: f64,
    /// Charge before discounts, when different
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_retail_charge: Option<f64>,
    /// Counterparty number for calls and messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_party: Option<String>,
    /// Originating location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a_location: Option<String>,
    /// Originating country
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a_country: Option<String>,
    /// Locale-formatted quantity (duration or data volume)
    pub duration: String,
}

impl ProvisionalCdrRecord {
    /// Day bucket this record belongs to
    pub fn day_key(&self) -> DayKey {
        DayKey::from_start_date(&self.start_date)
    }

    /// Classified record kind
    pub fn kind(&self) -> CdrKind {
        CdrKind::classify(&self.cdr_type)
    }
}

/// Additive usage counters for a single day
///
/// Folding more records into a day only ever increases these fields (given
/// non-negative charges); the aggregation never subtracts.
///
/// # Examples
/// ```
/// use cdrstat_core::types::UsageCounts;
///
/// let mut counts = UsageCounts::default();
/// counts += UsageCounts::new(150.0, 12, 3, 0.45);
/// counts += UsageCounts::new(50.0, 0, 1, 0.10);
/// assert_eq!(counts.data_usage_mb, 200.0);
/// assert_eq!(counts.sms_count, 4);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageCounts {
    /// Data volume in megabytes
    pub data_usage_mb: f64,
    /// Voice minutes (seconds rounded up)
    pub call_minutes: u64,
    /// Number of text messages
    pub sms_count: u64,
    /// Total charge across all record kinds
    pub total_charge: f64,
}

impl UsageCounts {
    /// Create new UsageCounts
    pub fn new(data_usage_mb: f64, call_minutes: u64, sms_count: u64, total_charge: f64) -> Self {
        Self {
            data_usage_mb,
            call_minutes,
            sms_count,
            total_charge,
        }
    }

    /// Whether every counter is zero
    pub fn is_empty(&self) -> bool {
        self.data_usage_mb == 0.0
            && self.call_minutes == 0
            && self.sms_count == 0
            && self.total_charge == 0.0
    }
}

impl Add for UsageCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            data_usage_mb: self.data_usage_mb + other.data_usage_mb,
            call_minutes: self.call_minutes + other.call_minutes,
            sms_count: self.sms_count + other.sms_count,
            total_charge: self.total_charge + other.total_charge,
        }
    }
}

impl AddAssign for UsageCounts {
    fn add_assign(&mut self, other: Self) {
        self.data_usage_mb += other.data_usage_mb;
        self.call_minutes += other.call_minutes;
        self.sms_count += other.sms_count;
        self.total_charge += other.total_charge;
    }
}
