//! Billing-period filtering for CDR records
//!
//! A [`Period`] is an optional date range (both bounds inclusive) used to
//! narrow fetched records to a billing cycle. Matching is performed on the
//! literal day key of a record's `startDate`; a record whose day key is not
//! a well-formed date cannot be placed inside a bounded period and is
//! excluded by it.
//!
//! # Examples
//!
//! ```
//! use cdrstat_core::filters::Period;
//! use chrono::NaiveDate;
//!
//! let period = Period::new()
//!     .with_since(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap())
//!     .with_until(NaiveDate::from_ymd_opt(2025, 9, 30).unwrap());
//!
//! assert!(period.matches_start_date("2025-09-28T15:41:15+0200"));
//! assert!(!period.matches_start_date("2025-10-01T00:00:00+0200"));
//! ```

use crate::types::DayKey;
use chrono::NaiveDate;

/// Date-range filter for a billing period
#[derive(Debug, Default, Clone)]
pub struct Period {
    /// Start date (inclusive)
    pub since: Option<NaiveDate>,
    /// End date (inclusive)
    pub until: Option<NaiveDate>,
}

impl Period {
    /// Create an unbounded period
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start date
    pub fn with_since(mut self, date: NaiveDate) -> Self {
        self.since = Some(date);
        self
    }

    /// Set the end date
    pub fn with_until(mut self, date: NaiveDate) -> Self {
        self.until = Some(date);
        self
    }

    /// Whether no bounds are set
    pub fn is_unbounded(&self) -> bool {
        self.since.is_none() && self.until.is_none()
    }

    /// Check whether a calendar date falls inside the period
    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(since) = self.since
            && date < since
        {
            return false;
        }
        if let Some(until) = self.until
            && date > until
        {
            return false;
        }
        true
    }

    /// Check whether a record day key falls inside the period
    ///
    /// An unparseable key matches only an unbounded period.
    pub fn matches_day_key(&self, day: &DayKey) -> bool {
        if self.is_unbounded() {
            return true;
        }
        match day.to_naive_date() {
            Some(date) => self.contains(date),
            None => false,
        }
    }

    /// Check whether a raw `startDate` timestamp falls inside the period
    pub fn matches_start_date(&self, start_date: &str) -> bool {
        self.matches_day_key(&DayKey::from_start_date(start_date))
    }
}
