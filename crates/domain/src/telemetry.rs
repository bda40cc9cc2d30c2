//! Temperature telemetry samples and the 3-sigma outlier filter.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// One temperature reading, as it travels over the telemetry wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSample {
    pub temperature: f64,
    /// Sample time, serialized as an ISO-8601 / RFC 3339 string.
    pub time: Timestamp,
}

impl TemperatureSample {
    #[must_use]
    pub fn new(temperature: f64, time: Timestamp) -> Self {
        Self { temperature, time }
    }
}

/// Population mean of a data set. Returns 0 for an empty set.
#[must_use]
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = data.len() as f64;
    data.iter().sum::<f64>() / n
}

/// Population standard deviation of a data set.
#[must_use]
pub fn sigma(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mean = mean(data);
    #[allow(clippy::cast_precision_loss)]
    let n = data.len() as f64;
    let variance = data.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Session-scoped accumulated sample set with 3-sigma outlier filtering.
///
/// The set keeps every sample that has survived filtering so far; each
/// ingest recomputes the population statistics over the *full* accumulated
/// set including the new samples, so an extreme outlier can also evict
/// earlier borderline samples.
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    samples: Vec<TemperatureSample>,
}

impl SampleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples currently retained.
    #[must_use]
    pub fn samples(&self) -> &[TemperatureSample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Ingest a batch, filter the accumulated set to within three standard
    /// deviations of its mean, and return exactly the retained subset of the
    /// just-submitted batch.
    ///
    /// With fewer than 2 accumulated samples the deviation is meaningless,
    /// so everything is accepted unconditionally until the set can vouch for
    /// a statistic.
    pub fn ingest(&mut self, batch: Vec<TemperatureSample>) -> Vec<TemperatureSample> {
        self.samples.extend(batch.iter().cloned());

        if self.samples.len() < 2 {
            return batch;
        }

        let values: Vec<f64> = self.samples.iter().map(|s| s.temperature).collect();
        let mean = mean(&values);
        let sigma = sigma(&values);
        let lo = 3.0f64.mul_add(-sigma, mean);
        let hi = 3.0f64.mul_add(sigma, mean);
        let within = |t: f64| t >= lo && t <= hi;

        self.samples.retain(|s| within(s.temperature));
        batch
            .into_iter()
            .filter(|s| within(s.temperature))
            .collect()
    }
}
