//! Core types, parsing, and traits for cdrstat
//!
//! This crate provides the foundational pieces used by all other cdrstat
//! crates: raw record types and their classifier, the locale-aware usage
//! string parsers, error handling, timezone configuration, billing-period
//! filters, and the source trait that fetch collaborators implement.

pub mod aggregation_types;
pub mod error;
pub mod filters;
pub mod parse;
pub mod source;
pub mod timezone;
pub mod types;

// Re-export commonly used types
pub use error::{CdrstatError, Result};
pub use types::{CdrKind, CdrRecord, DayKey, ProvisionalCdrRecord, RecordSource, UsageCounts};
