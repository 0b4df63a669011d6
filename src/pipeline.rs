//! Fetch cycle orchestration
//!
//! The analytics core runs over immutable snapshots: settled and provisional
//! records are fetched as sibling tasks, and aggregation only starts once
//! BOTH have completed; there is no partial aggregation on partial arrival.
//! A failed source degrades to an empty snapshot and its error is carried on
//! the outcome, so the other source's records still flow through.
//!
//! Display consumers hold a [`ResultSlot`]: when a newer fetch cycle begins
//! before a prior analysis completes, the prior result is simply discarded
//! when it resolves (last write wins on the observable result slot). No
//! cancellation token propagates into the computation itself.

use cdrstat_core::error::CdrstatError;
use cdrstat_core::filters::Period;
use cdrstat_core::source::CdrSource;
use cdrstat_core::types::{CdrRecord, ProvisionalCdrRecord};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Result of one fetch cycle across both record sources
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Settled records (empty when that fetch failed)
    pub settled: Vec<CdrRecord>,
    /// Provisional records (empty when that fetch failed)
    pub provisional: Vec<ProvisionalCdrRecord>,
    /// Error from the settled fetch, if it failed
    pub settled_error: Option<CdrstatError>,
    /// Error from the provisional fetch, if it failed
    pub provisional_error: Option<CdrstatError>,
}

impl FetchOutcome {
    /// Whether both fetches succeeded
    pub fn is_complete(&self) -> bool {
        self.settled_error.is_none() && self.provisional_error.is_none()
    }

    /// Whether both fetches failed
    pub fn is_empty_failure(&self) -> bool {
        self.settled_error.is_some() && self.provisional_error.is_some()
    }
}

/// Run one fetch cycle: both sources concurrently, joined before returning.
pub async fn fetch_cycle<S: CdrSource + ?Sized>(source: &S, period: &Period) -> FetchOutcome {
    let (settled, provisional) = tokio::join!(
        source.fetch_settled(period),
        source.fetch_provisional(period)
    );

    let (settled, settled_error) = match settled {
        Ok(records) => (records, None),
        Err(error) => {
            warn!(%error, "settled CDR fetch failed; continuing without settled records");
            (Vec::new(), Some(error))
        }
    };

    let (provisional, provisional_error) = match provisional {
        Ok(records) => (records, None),
        Err(error) => {
            warn!(%error, "provisional CDR fetch failed; continuing without provisional records");
            (Vec::new(), Some(error))
        }
    };

    debug!(
        settled = settled.len(),
        provisional = provisional.len(),
        "fetch cycle complete"
    );

    FetchOutcome {
        settled,
        provisional,
        settled_error,
        provisional_error,
    }
}

/// Ticket identifying one fetch/analysis cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleTicket(u64);

/// Last-write-wins slot for analysis results
///
/// Each display refresh begins a cycle and publishes against its ticket.
/// A publish is accepted only while its cycle is still the newest one; a
/// result that resolves after a newer cycle has begun is dropped.
pub struct ResultSlot<T> {
    inner: Mutex<SlotState<T>>,
}

struct SlotState<T> {
    generation: u64,
    latest: Option<Arc<T>>,
}

impl<T> ResultSlot<T> {
    /// Create an empty slot
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SlotState {
                generation: 0,
                latest: None,
            }),
        }
    }

    /// Begin a new cycle, invalidating any in-flight older cycles
    pub fn begin_cycle(&self) -> CycleTicket {
        let mut state = self.lock();
        state.generation += 1;
        CycleTicket(state.generation)
    }

    /// Publish a result for the given cycle.
    ///
    /// Returns `false` (and drops the value) when a newer cycle has begun
    /// since the ticket was issued.
    pub fn publish(&self, ticket: CycleTicket, value: T) -> bool {
        let mut state = self.lock();
        if ticket.0 == state.generation {
            state.latest = Some(Arc::new(value));
            true
        } else {
            debug!(
                ticket = ticket.0,
                current = state.generation,
                "discarding stale analysis result"
            );
            false
        }
    }

    /// The most recently published result, if any
    pub fn latest(&self) -> Option<Arc<T>> {
        self.lock().latest.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SlotState<T>> {
        // Slot state is a single assignment; a poisoned lock is still valid.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T> Default for ResultSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cdrstat_core::error::Result;

    /// Source whose fetches can be made to fail independently
    struct FlakySource {
        fail_settled: bool,
        fail_provisional: bool,
    }

    fn sample_settled() -> CdrRecord {
        CdrRecord {
            start_date: "2025-09-28T10:00:00+0200".to_string(),
            cdr_type: "Data".to_string(),
            retail_charge: 0.0,
            original_retail_charge: None,
            other_party: None,
            a_location: None,
            a_country: None,
            duration: "100 MB".to_string(),
            duration_in_bundle: None,
        }
    }

    fn sample_provisional() -> ProvisionalCdrRecord {
        ProvisionalCdrRecord {
            start_date: "2025-09-29T08:00:00+0200".to_string(),
            cdr_type: "Data".to_string(),
            retail_charge: 0.0,
            original_retail_charge: None,
            other_party: None,
            a_location: None,
            a_country: None,
            duration: "42 MB".to_string(),
        }
    }

    #[async_trait]
    impl CdrSource for FlakySource {
        async fn fetch_settled(&self, _period: &Period) -> Result<Vec<CdrRecord>> {
            if self.fail_settled {
                Err(CdrstatError::Source("settled endpoint unavailable".into()))
            } else {
                Ok(vec![sample_settled()])
            }
        }

        async fn fetch_provisional(&self, _period: &Period) -> Result<Vec<ProvisionalCdrRecord>> {
            if self.fail_provisional {
                Err(CdrstatError::Source(
                    "provisional endpoint unavailable".into(),
                ))
            } else {
                Ok(vec![sample_provisional()])
            }
        }
    }

    #[tokio::test]
    async fn test_fetch_cycle_complete() {
        let source = FlakySource {
            fail_settled: false,
            fail_provisional: false,
        };

        let outcome = fetch_cycle(&source, &Period::new()).await;
        assert!(outcome.is_complete());
        assert_eq!(outcome.settled.len(), 1);
        assert_eq!(outcome.provisional.len(), 1);
    }

    #[tokio::test]
    async fn test_settled_failure_keeps_provisional() {
        let source = FlakySource {
            fail_settled: true,
            fail_provisional: false,
        };

        let outcome = fetch_cycle(&source, &Period::new()).await;
        assert!(!outcome.is_complete());
        assert!(outcome.settled_error.is_some());
        assert!(outcome.settled.is_empty());
        assert_eq!(outcome.provisional.len(), 1);
    }

    #[tokio::test]
    async fn test_provisional_failure_keeps_settled() {
        let source = FlakySource {
            fail_settled: false,
            fail_provisional: true,
        };

        let outcome = fetch_cycle(&source, &Period::new()).await;
        assert!(outcome.provisional_error.is_some());
        assert!(outcome.provisional.is_empty());
        assert_eq!(outcome.settled.len(), 1);
    }

    #[tokio::test]
    async fn test_both_failures_is_empty_outcome() {
        let source = FlakySource {
            fail_settled: true,
            fail_provisional: true,
        };

        let outcome = fetch_cycle(&source, &Period::new()).await;
        assert!(outcome.is_empty_failure());
        assert!(outcome.settled.is_empty());
        assert!(outcome.provisional.is_empty());
    }

    #[test]
    fn test_result_slot_publishes_current_cycle() {
        let slot = ResultSlot::new();
        let ticket = slot.begin_cycle();

        assert!(slot.publish(ticket, 42));
        assert_eq!(*slot.latest().unwrap(), 42);
    }

    #[test]
    fn test_result_slot_discards_stale_cycle() {
        let slot = ResultSlot::new();
        let stale = slot.begin_cycle();
        let current = slot.begin_cycle();

        // The older cycle resolves late; its result is dropped
        assert!(!slot.publish(stale, 1));
        assert!(slot.latest().is_none());

        assert!(slot.publish(current, 2));
        assert_eq!(*slot.latest().unwrap(), 2);

        // And the stale cycle still cannot overwrite the newer result
        assert!(!slot.publish(stale, 3));
        assert_eq!(*slot.latest().unwrap(), 2);
    }

    #[test]
    fn test_result_slot_empty_by_default() {
        let slot: ResultSlot<i32> = ResultSlot::default();
        assert!(slot.latest().is_none());
    }
}
