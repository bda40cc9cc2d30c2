//! Shared collector state.

use std::sync::{Arc, Mutex, PoisonError};

use homenode_domain::telemetry::{SampleSet, TemperatureSample};

use crate::store::CsvStore;

struct Inner {
    samples: Mutex<SampleSet>,
    store: CsvStore,
}

/// Collector state: the session-scoped sample set plus the CSV audit log.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl AppState {
    #[must_use]
    pub fn new(store: CsvStore) -> Self {
        Self {
            inner: Arc::new(Inner {
                samples: Mutex::new(SampleSet::new()),
                store,
            }),
        }
    }

    /// Samples retained by the session so far.
    #[must_use]
    pub fn retained(&self) -> Vec<TemperatureSample> {
        self.inner
            .samples
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .samples()
            .to_vec()
    }

    /// Run the outlier filter over a batch; returns the accepted subset.
    ///
    /// The lock is held only for the in-memory filtering, never across IO.
    pub fn ingest(&self, batch: Vec<TemperatureSample>) -> Vec<TemperatureSample> {
        self.inner
            .samples
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .ingest(batch)
    }

    #[must_use]
    pub fn store(&self) -> &CsvStore {
        &self.inner.store
    }
}
