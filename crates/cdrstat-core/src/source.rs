//! Source trait for CDR fetch collaborators
//!
//! This module defines the [`CdrSource`] trait that record providers
//! implement. The analytics core never fetches anything itself; it consumes
//! whatever snapshot a source hands it. Settled and provisional records are
//! fetched independently; the two calls may fail independently, and the
//! pipeline treats a failed source as contributing no records rather than
//! aborting the other source's contribution.

use crate::error::Result;
use crate::filters::Period;
use crate::types::{CdrRecord, ProvisionalCdrRecord};
use async_trait::async_trait;

/// Trait for CDR record sources.
///
/// Implementations fetch immutable snapshots of settled and provisional
/// records for a billing period. The export-file provider implements this
/// trait; a network-backed portal client would implement it the same way.
#[async_trait]
pub trait CdrSource: Send + Sync {
    /// Fetch settled (finalized, billed) records for the period.
    async fn fetch_settled(&self, period: &Period) -> Result<Vec<CdrRecord>>;

    /// Fetch provisional (in-flight, not yet billed) records for the period.
    async fn fetch_provisional(&self, period: &Period) -> Result<Vec<ProvisionalCdrRecord>>;
}
