//! CDR export file provider for cdrstat
//!
//! Loads settled and provisional call-detail records from JSON export files
//! downloaded from the self-service portal, implementing the
//! [`cdrstat_core::source::CdrSource`] trait.

pub mod data_loader;

pub use data_loader::ExportDataLoader;
