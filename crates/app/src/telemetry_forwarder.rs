//! Best-effort batching telemetry forwarder.
//!
//! Samples accumulate locally until the batch is full, then flush
//! synchronously through the sink. A flush failure is logged and the batch
//! discarded — no retry, no backpressure. Staleness of a best-effort
//! temperature feed is not safety-critical.

use homenode_domain::telemetry::TemperatureSample;

use crate::ports::TelemetrySink;

/// Default number of samples per delivered batch.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Local sample batcher in front of a [`TelemetrySink`].
pub struct TelemetryForwarder<S> {
    sink: S,
    batch: Vec<TemperatureSample>,
    batch_size: usize,
}

impl<S: TelemetrySink> TelemetryForwarder<S> {
    #[must_use]
    pub fn new(sink: S, batch_size: usize) -> Self {
        Self {
            sink,
            batch: Vec::with_capacity(batch_size),
            batch_size: batch_size.max(1),
        }
    }

    /// Samples currently waiting for a flush.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.batch.len()
    }

    /// Queue one sample, flushing when the batch fills.
    pub async fn push(&mut self, sample: TemperatureSample) {
        self.batch.push(sample);
        if self.batch.len() >= self.batch_size {
            self.flush().await;
        }
    }

    /// Deliver and drop the current batch, full or not.
    pub async fn flush(&mut self) {
        if self.batch.is_empty() {
            return;
        }
        match self.sink.send_batch(&self.batch).await {
            Ok(accepted) => {
                tracing::debug!(
                    sent = self.batch.len(),
                    accepted = accepted.len(),
                    "telemetry batch delivered"
                );
            }
            Err(err) => {
                tracing::warn!(dropped = self.batch.len(), error = %err, "telemetry batch dropped");
            }
        }
        self.batch.clear();
    }
}
