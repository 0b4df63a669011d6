//! cdrstat - Usage analytics and day aggregation for telecom CDR exports
//!
//! This library provides functionality to:
//! - Parse locale-formatted usage strings (data volumes, call durations)
//! - Merge settled and provisional call-detail records into per-day summaries
//! - Compute statistical insights over daily data usage (trend, outliers,
//!   weekday/weekend averages)
//! - Predict whether a subscriber exceeds their data allowance before the
//!   billing period ends
//!
//! # Examples
//!
//! ```no_run
//! use cdrstat::{
//!     aggregation::aggregate_by_day,
//!     aggregation_types::Totals,
//!     analyzer::Analyzer,
//!     filters::Period,
//!     pipeline::fetch_cycle,
//!     timezone::TimezoneConfig,
//! };
//! use cdrstat_provider_export::ExportDataLoader;
//!
//! #[tokio::main]
//! async fn main() -> cdrstat::Result<()> {
//!     let loader = ExportDataLoader::new().await?;
//!     let outcome = fetch_cycle(&loader, &Period::new()).await;
//!
//!     let daily = aggregate_by_day(&outcome.settled, &outcome.provisional);
//!     let totals = Totals::from_daily(&daily);
//!
//!     let analyzer = Analyzer::new(TimezoneConfig::default());
//!     if let Some(insights) = analyzer.analyze(&outcome.settled) {
//!         println!("trend: {}", insights.trend);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod aggregation;
pub mod analyzer;
pub mod cli;
pub mod output;
pub mod pipeline;
pub mod prediction;

// Re-export the core crate's modules so downstream code can use a single path
pub use cdrstat_core::{aggregation_types, error, filters, parse, source, timezone, types};

// Re-export commonly used types
pub use cdrstat_core::{
    CdrKind, CdrRecord, CdrstatError, DayKey, ProvisionalCdrRecord, RecordSource, Result,
    UsageCounts,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
