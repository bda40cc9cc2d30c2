//! State reporter that writes snapshots to the log.
//!
//! The management transport serves state on demand from the channels, so the
//! per-poll push only needs to be observable, not delivered anywhere.

use homenode_app::ports::StateReporter;
use homenode_domain::config::SettingValue;
use homenode_domain::error::ReportError;

/// Reporter logging each snapshot at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingStateReporter {
    node: &'static str,
}

impl TracingStateReporter {
    #[must_use]
    pub fn new(node: &'static str) -> Self {
        Self { node }
    }
}

impl StateReporter for TracingStateReporter {
    async fn report_states(&self, values: &[SettingValue]) -> Result<(), ReportError> {
        let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
        tracing::debug!(node = self.node, states = ?rendered, "state snapshot");
        Ok(())
    }
}
