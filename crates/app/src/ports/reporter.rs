//! State-report port — pushes the full configuration snapshot per poll.

use std::future::Future;

use homenode_domain::config::SettingValue;
use homenode_domain::error::ReportError;

/// Outbound half of the remote-config transport.
///
/// Invoked by a node once per poll cycle with the current values of every
/// registered setting, in the exact field order the schema declares.
pub trait StateReporter: Send + Sync {
    fn report_states(
        &self,
        values: &[SettingValue],
    ) -> impl Future<Output = Result<(), ReportError>> + Send;
}
