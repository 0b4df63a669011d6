//! Data-allowance prediction
//!
//! Pure, stateless projection of the current billing cycle: given how much
//! data has been used, the period allowance, and where we are in the cycle,
//! compute the average daily consumption so far, the projected total at the
//! end of the period, the per-day budget that would land exactly on the
//! allowance, and a status classification.
//!
//! All inputs are supplied by the caller; this facade fetches and caches
//! nothing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Megabytes per gigabyte, as the carrier counts them
const MB_PER_GB: f64 = 1000.0;

/// Classification of the current cycle against the allowance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UsageStatus {
    /// Projected usage stays within the allowance
    OnTrack,
    /// Projected usage exceeds the allowance
    Warning,
    /// Usage already exceeds the allowance
    OverLimit,
}

impl fmt::Display for UsageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnTrack => write!(f, "on track"),
            Self::Warning => write!(f, "warning"),
            Self::OverLimit => write!(f, "over limit"),
        }
    }
}

/// Computed budget and projection for the current billing cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsagePrediction {
    /// Average consumption per elapsed day, in GB
    pub daily_average_gb: f64,
    /// Projected total at the end of the period, in GB
    pub predicted_total_gb: f64,
    /// Per-day budget to land exactly on the allowance, in GB (never negative)
    pub daily_budget_gb: f64,
    /// Status classification
    pub status: UsageStatus,
}

/// Project the current billing cycle.
///
/// `days_remaining` and `total_days_in_period` describe the cycle position;
/// a fresh cycle (no elapsed days) predicts zero, and an exhausted cycle
/// (no remaining days) budgets zero.
///
/// # Examples
/// ```
/// use cdrstat::prediction::{predict, UsageStatus};
///
/// let p = predict(8500.0, 10000.0, 5, 30);
/// assert_eq!(p.status, UsageStatus::Warning);
/// ```
pub fn predict(
    data_used_mb: f64,
    data_total_mb: f64,
    days_remaining: u32,
    total_days_in_period: u32,
) -> UsagePrediction {
    let data_used_gb = data_used_mb / MB_PER_GB;
    let data_total_gb = data_total_mb / MB_PER_GB;

    let days_elapsed = total_days_in_period.saturating_sub(days_remaining);

    let daily_average_gb = if days_elapsed > 0 {
        data_used_gb / days_elapsed as f64
    } else {
        0.0
    };

    let predicted_total_gb = daily_average_gb * total_days_in_period as f64;

    let daily_budget_gb = if days_remaining > 0 {
        ((data_total_gb - data_used_gb) / days_remaining as f64).max(0.0)
    } else {
        0.0
    };

    let status = if data_used_gb > data_total_gb {
        UsageStatus::OverLimit
    } else if predicted_total_gb > data_total_gb {
        UsageStatus::Warning
    } else {
        UsageStatus::OnTrack
    };

    UsagePrediction {
        daily_average_gb,
        predicted_total_gb,
        daily_budget_gb,
        status,
    }
}
