//! # homenode-adapter-telemetry-http
//!
//! HTTP client adapter implementing
//! [`TelemetrySink`](homenode_app::ports::TelemetrySink) against the
//! telemetry collector's wire format:
//!
//! - `POST /` with `{"temperature_data": {...}}` for a single sample
//! - `POST /batch` with `{"temperatures_batch": [...]}` for a batch
//!
//! Both endpoints answer with the JSON array of samples that survived the
//! collector's outlier filter.

use homenode_app::ports::TelemetrySink;
use homenode_domain::error::TelemetryError;
use homenode_domain::telemetry::TemperatureSample;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct AddRequest<'a> {
    temperature_data: &'a TemperatureSample,
}

#[derive(Debug, Serialize)]
struct AddBatchRequest<'a> {
    temperatures_batch: &'a [TemperatureSample],
}

/// Telemetry sink backed by an HTTP collector endpoint.
#[derive(Debug, Clone)]
pub struct HttpTelemetrySink {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTelemetrySink {
    /// Build a sink for the collector at `base_url` (no trailing slash).
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    async fn post<T: Serialize + Sync>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Vec<TemperatureSample>, TelemetryError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| TelemetryError::new(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TelemetryError::new(format!(
                "collector answered {status} on {path}"
            )));
        }

        response
            .json::<Vec<TemperatureSample>>()
            .await
            .map_err(|err| TelemetryError::new(format!("invalid collector response: {err}")))
    }
}

impl TelemetrySink for HttpTelemetrySink {
    async fn send(
        &self,
        sample: &TemperatureSample,
    ) -> Result<Vec<TemperatureSample>, TelemetryError> {
        self.post(
            "/",
            &AddRequest {
                temperature_data: sample,
            },
        )
        .await
    }

    async fn send_batch(
        &self,
        batch: &[TemperatureSample],
    ) -> Result<Vec<TemperatureSample>, TelemetryError> {
        self.post(
            "/batch",
            &AddBatchRequest {
                temperatures_batch: batch,
            },
        )
        .await
    }
}
