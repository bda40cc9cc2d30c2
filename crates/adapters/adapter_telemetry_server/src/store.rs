//! Append-only CSV persistence for accepted samples.
//!
//! The file carries a `temperature,time` header written once at creation;
//! every accepted sample appends one row. The file is an audit log only —
//! the in-memory session set is never rebuilt from it.

use std::io::Write;
use std::path::PathBuf;

use homenode_domain::telemetry::TemperatureSample;

/// Failure while appending to the CSV log.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("csv append failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv writer task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Append-only CSV sample log.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append the samples, creating the file with its header first if needed.
    ///
    /// File IO runs on the blocking pool.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be created or written.
    pub async fn append(&self, samples: &[TemperatureSample]) -> Result<(), StoreError> {
        if samples.is_empty() {
            return Ok(());
        }
        let path = self.path.clone();
        let rows: Vec<(f64, String)> = samples
            .iter()
            .map(|sample| (sample.temperature, sample.time.to_rfc3339()))
            .collect();

        tokio::task::spawn_blocking(move || -> Result<(), std::io::Error> {
            let fresh = !path.exists();
            let mut file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)?;
            if fresh {
                writeln!(file, "temperature,time")?;
            }
            for (temperature, time) in rows {
                writeln!(file, "{temperature},{time}")?;
            }
            Ok(())
        })
        .await??;
        Ok(())
    }
}
