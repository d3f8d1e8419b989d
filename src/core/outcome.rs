//! Per-run fault capture and the resolved outcome of a run.

use crate::{core::shutdown::ShutdownReport, error::Fault};

/// Faults captured during one run, before arbitration.
///
/// The test slot also holds a setup fault, since setup failing means the
/// tests never ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    /// Setup or test-sequence fault.
    pub test: Option<Fault>,
    /// Fault reported by the application worker.
    pub application: Option<Fault>,
    /// Teardown fault.
    pub teardown: Option<Fault>,
}

/// Result of one [`Funtest::execute`](crate::Funtest::execute) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    captured: Captured,
    fault: Option<Fault>,
    failure_signalled: bool,
    skipped: bool,
    shutdown: Option<ShutdownReport>,
}

impl Outcome {
    pub(crate) fn resolved(captured: Captured, fault: Option<Fault>, failure_signalled: bool) -> Self {
        Self {
            captured,
            fault,
            failure_signalled,
            skipped: false,
            shutdown: None,
        }
    }

    pub(crate) fn with_shutdown(mut self, report: ShutdownReport) -> Self {
        self.shutdown = Some(report);
        self
    }

    pub(crate) fn skipped() -> Self {
        Self {
            captured: Captured::default(),
            fault: None,
            failure_signalled: false,
            skipped: true,
            shutdown: None,
        }
    }

    /// The surfaced fault, if the run failed.
    pub fn fault(&self) -> Option<&Fault> {
        self.fault.as_ref()
    }

    /// True if nothing was surfaced.
    pub fn succeeded(&self) -> bool {
        self.fault.is_none()
    }

    /// True if the condition gate skipped the run.
    pub fn was_skipped(&self) -> bool {
        self.skipped
    }

    /// True if the failure signal was found set after teardown.
    pub fn failure_signalled(&self) -> bool {
        self.failure_signalled
    }

    /// True if the application had to be interrupted after the first grace wait.
    pub fn application_interrupted(&self) -> bool {
        self.shutdown.is_some_and(|r| r.interrupted)
    }

    /// True if the application was still running when the run ended.
    pub fn application_leaked(&self) -> bool {
        self.shutdown.is_some_and(|r| !r.finished)
    }

    /// True if a termination signal cut the shutdown wait short.
    pub fn shutdown_signalled(&self) -> bool {
        self.shutdown.is_some_and(|r| r.signalled)
    }

    /// Setup or test-sequence fault, surfaced or not.
    pub fn test_fault(&self) -> Option<&Fault> {
        self.captured.test.as_ref()
    }

    /// Fault the application worker finished with.
    pub fn application_fault(&self) -> Option<&Fault> {
        self.captured.application.as_ref()
    }

    /// Teardown fault, surfaced or not.
    pub fn teardown_fault(&self) -> Option<&Fault> {
        self.captured.teardown.as_ref()
    }

    /// Everything captured, before arbitration.
    pub fn captured(&self) -> &Captured {
        &self.captured
    }
}
