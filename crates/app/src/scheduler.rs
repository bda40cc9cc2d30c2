//! Poll scheduling — an explicit tick source instead of a bare sleep loop.
//!
//! Control logic never reads the wall clock itself: the scheduler samples a
//! [`Clock`] once per cycle and hands the reduced [`LocalMoment`] to the
//! node. Tests drive [`Node::poll`] directly with synthetic moments and tick
//! lengths; only the production loop ever sleeps.

use std::future::Future;
use std::time::Duration;

use chrono::Timelike;
use homenode_domain::time::LocalMoment;

/// Source of the current local wall-clock moment.
pub trait Clock: Send + Sync {
    fn local_moment(&self) -> LocalMoment;
}

/// Production clock backed by the system's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn local_moment(&self) -> LocalMoment {
        let now = chrono::Local::now();
        LocalMoment::new(
            u8::try_from(now.hour()).unwrap_or(0),
            u8::try_from(now.minute()).unwrap_or(0),
        )
    }
}

/// One automation node: a single poll cycle of sense → decide → actuate →
/// report.
///
/// `poll` must never fail the loop: port and telemetry errors are logged
/// inside the node and the cycle completes.
pub trait Node: Send {
    /// Node name used for logging and management routing.
    fn name(&self) -> &'static str;

    /// Run one poll cycle at the given moment.
    fn poll(&mut self, now: LocalMoment) -> impl Future<Output = ()> + Send;
}

/// Fixed-interval driver for one node.
///
/// The loop runs for the process lifetime; there is no cancellation
/// mechanism. Each cycle completes before the next sleep starts, so a slow
/// cycle stretches the period rather than overlapping itself.
pub struct Scheduler<C> {
    clock: C,
    period: Duration,
}

impl<C: Clock> Scheduler<C> {
    #[must_use]
    pub fn new(clock: C, period: Duration) -> Self {
        Self { clock, period }
    }

    /// Tick length in whole seconds, as handed to the controllers.
    #[must_use]
    pub fn tick_secs(&self) -> u32 {
        u32::try_from(self.period.as_secs()).unwrap_or(u32::MAX)
    }

    /// Drive the node forever.
    pub async fn run(self, mut node: impl Node) {
        tracing::info!(node = node.name(), period = ?self.period, "scheduler started");
        loop {
            node.poll(self.clock.local_moment()).await;
            tokio::time::sleep(self.period).await;
        }
    }
}
