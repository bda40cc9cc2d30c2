//! Telemetry delivery port.

use std::future::Future;

use homenode_domain::error::TelemetryError;
use homenode_domain::telemetry::TemperatureSample;

/// Outbound telemetry endpoint (HTTP client adapter in production).
///
/// Both calls return the subset of submitted samples the collector accepted
/// after outlier filtering.
pub trait TelemetrySink: Send + Sync {
    /// Deliver a single sample.
    fn send(
        &self,
        sample: &TemperatureSample,
    ) -> impl Future<Output = Result<Vec<TemperatureSample>, TelemetryError>> + Send;

    /// Deliver a batch of samples.
    fn send_batch(
        &self,
        batch: &[TemperatureSample],
    ) -> impl Future<Output = Result<Vec<TemperatureSample>, TelemetryError>> + Send;
}
