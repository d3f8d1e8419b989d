//! # LogWriter: renders events through `tracing`
//!
//! A subscriber that turns incoming [`Event`]s into `tracing` records.
//! Progress is logged at `info`, anything that deserves attention
//! (overrides, timeouts, forced shutdown, leaked workers, secondary faults)
//! at `warn`. Install any `tracing` subscriber to see the output.
//!
//! ## Example output
//! ```text
//! INFO  phase starting phase=setup timeout_ms=Some(30000)
//! WARN  phase timed out phase=tests timeout_ms=Some(60000)
//! WARN  Application forcibly shut down grace_ms=Some(10000)
//! WARN  secondary fault phase=Some(Application) reason="application failed: ..."
//! INFO  Tests failed
//! ```

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let reason = e.reason.as_deref().unwrap_or("");
        match e.kind {
            EventKind::DefinitionOverridden => {
                warn!("Overriding previous definition of {reason}");
            }
            EventKind::ConditionSkipped => {
                info!("Condition failed - skipping tests");
            }
            EventKind::PhaseStarting => {
                info!(phase = ?e.phase, timeout_ms = ?e.timeout_ms, "phase starting");
            }
            EventKind::PhaseCompleted => {
                debug!(phase = ?e.phase, "phase completed");
            }
            EventKind::PhaseFailed => {
                info!(phase = ?e.phase, reason, "phase failed");
            }
            EventKind::TimeoutHit => {
                warn!(phase = ?e.phase, timeout_ms = ?e.timeout_ms, "phase timed out");
            }
            EventKind::WorkerStarted => {
                debug!("application worker started");
            }
            EventKind::WorkerFinished => {
                debug!(reason, "application worker finished");
            }
            EventKind::ForcedShutdown => {
                warn!(grace_ms = ?e.timeout_ms, "Application forcibly shut down");
            }
            EventKind::ShutdownInterrupted => {
                debug!("Shutdown interrupted");
            }
            EventKind::WorkerLeaked => {
                warn!("application worker still alive after interrupt; leaving it behind");
            }
            EventKind::SecondaryFault => {
                warn!(phase = ?e.phase, reason, "secondary fault");
            }
            EventKind::FailureSignalled => {
                info!("{reason}");
            }
            EventKind::OutcomeResolved => {
                info!(fault = ?e.reason, "outcome resolved");
            }
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked => {
                warn!(kind = ?e.kind, reason, "subscriber problem");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
