//! # Probe-and-test sequencer.
//!
//! Builds the ordered test sequence (readiness probe, tests, reporting)
//! and runs it as one bounded concurrent group whose deadline is
//!
//! ```text
//! probe.max_wait()            (0 without a probe)
//!   + timeout × unit          if tests are configured
//!   + timeout × unit          if reporting is configured
//! ```
//!
//! A zero total means no deadline. Whatever fault results is returned as the
//! test-sequence fault; it is never propagated, so teardown can still run.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{
    core::{Phase, group::run_group},
    error::Fault,
    events::Bus,
    probes::{Probe, ProbeStep},
    steps::{Sequence, StepRef},
};

/// Computes the test-sequence deadline.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use funtest::sequence_deadline;
///
/// let t = Duration::from_secs(30);
/// let p = Duration::from_secs(60);
/// assert_eq!(sequence_deadline(Some(p), true, true, t), p + t + t);
/// assert_eq!(sequence_deadline(None, true, false, t), t);
/// ```
pub fn sequence_deadline(
    probe_wait: Option<Duration>,
    has_tests: bool,
    has_reporting: bool,
    phase_timeout: Duration,
) -> Duration {
    let mut total = probe_wait.unwrap_or(Duration::ZERO);
    if has_tests {
        total = total.saturating_add(phase_timeout);
    }
    if has_reporting {
        total = total.saturating_add(phase_timeout);
    }
    total
}

/// The probe/tests/reporting sequence with its computed deadline.
pub(crate) struct TestSequence {
    steps: Sequence,
    deadline: Duration,
}

impl TestSequence {
    /// Assembles the sequence in probe → tests → reporting order.
    pub(crate) fn build(
        block: Option<&Arc<dyn Probe>>,
        tests: Option<&StepRef>,
        reporting: Option<&StepRef>,
        phase_timeout: Duration,
    ) -> Self {
        let mut steps = Sequence::new("test-run");
        if let Some(probe) = block {
            steps.push(ProbeStep::arc(Arc::clone(probe)));
        }
        if let Some(tests) = tests {
            steps.push(Arc::clone(tests));
        }
        if let Some(reporting) = reporting {
            steps.push(Arc::clone(reporting));
        }
        let deadline = sequence_deadline(
            block.map(|p| p.max_wait()),
            tests.is_some(),
            reporting.is_some(),
            phase_timeout,
        );
        Self { steps, deadline }
    }

    /// The computed deadline (`Duration::ZERO` = unbounded).
    #[cfg(test)]
    pub(crate) fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Runs the sequence and returns the captured fault, if any.
    pub(crate) async fn run(self, parent: &CancellationToken, bus: &Bus) -> Option<Fault> {
        run_group(
            Phase::Tests,
            vec![self.steps.into_ref()],
            Some(self.deadline),
            parent,
            bus,
        )
        .await
        .err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StepError;
    use crate::probes::{BlockFor, ConditionFn};
    use crate::steps::StepFn;
    use std::sync::Mutex;
    use tokio::time;

    fn probe(max_wait: Duration) -> Arc<dyn Probe> {
        Arc::new(
            BlockFor::new("ready", ConditionFn::new(|| async { Ok::<_, StepError>(true) }))
                .with_max_wait(max_wait),
        )
    }

    fn noop(name: &'static str) -> StepRef {
        StepFn::arc(name, |_ctx: CancellationToken| async { Ok::<_, StepError>(()) })
    }

    #[test]
    fn deadline_is_probe_plus_one_timeout_per_phase() {
        let p = Duration::from_secs(7);
        let t = Duration::from_secs(3);
        let block = probe(p);
        let tests = noop("tests");
        let reporting = noop("report");

        let seq = TestSequence::build(Some(&block), Some(&tests), Some(&reporting), t);
        assert_eq!(seq.deadline(), p + t + t);

        let seq = TestSequence::build(Some(&block), None, Some(&reporting), t);
        assert_eq!(seq.deadline(), p + t);

        let seq = TestSequence::build(None, Some(&tests), None, t);
        assert_eq!(seq.deadline(), t);

        let seq = TestSequence::build(Some(&block), Some(&tests), Some(&reporting), Duration::ZERO);
        assert_eq!(seq.deadline(), p);
    }

    #[tokio::test]
    async fn runs_probe_tests_then_reporting() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let step = |name: &'static str| -> StepRef {
            let log = Arc::clone(&log);
            StepFn::arc(name, move |_ctx: CancellationToken| {
                let log = Arc::clone(&log);
                async move {
                    log.lock().unwrap().push(name);
                    Ok::<_, StepError>(())
                }
            })
        };
        let tests = step("tests");
        let reporting = step("reporting");
        let seq = TestSequence::build(
            Some(&probe(Duration::from_secs(1))),
            Some(&tests),
            Some(&reporting),
            Duration::from_secs(1),
        );

        assert!(seq.run(&CancellationToken::new(), &Bus::new(8)).await.is_none());
        assert_eq!(*log.lock().unwrap(), vec!["tests", "reporting"]);
    }

    #[tokio::test(start_paused = true)]
    async fn overrun_is_captured_as_timeout() {
        let slow: StepRef = StepFn::arc("slow", |_ctx: CancellationToken| async {
            time::sleep(Duration::from_secs(3600)).await;
            Ok::<_, StepError>(())
        });
        let seq = TestSequence::build(None, Some(&slow), None, Duration::from_secs(5));
        let fault = seq.run(&CancellationToken::new(), &Bus::new(8)).await;
        assert_eq!(
            fault,
            Some(Fault::Timeout {
                phase: Phase::Tests,
                timeout: Duration::from_secs(5)
            })
        );
    }

    #[tokio::test]
    async fn empty_sequence_succeeds_without_deadline() {
        let seq = TestSequence::build(None, None, None, Duration::from_secs(5));
        assert_eq!(seq.deadline(), Duration::ZERO);
        assert!(seq.run(&CancellationToken::new(), &Bus::new(8)).await.is_none());
    }
}
