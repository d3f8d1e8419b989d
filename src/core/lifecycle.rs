//! # Setup and teardown.
//!
//! Both phases run as a bounded single-member group with the per-phase
//! deadline. Their faults are returned, never raised: a setup fault becomes
//! the test-sequence fault (and skips the application and tests), a teardown
//! fault is kept apart for the prioritizer.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{
    core::{Phase, group::run_group},
    error::Fault,
    events::Bus,
    steps::StepRef,
};

/// Runs setup, if configured. Returns the captured fault.
pub(crate) async fn run_setup(
    setup: Option<&StepRef>,
    deadline: Option<Duration>,
    parent: &CancellationToken,
    bus: &Bus,
) -> Option<Fault> {
    run_bounded(Phase::Setup, setup, deadline, parent, bus).await
}

/// Runs teardown, if configured. Returns the captured fault.
pub(crate) async fn run_teardown(
    teardown: Option<&StepRef>,
    deadline: Option<Duration>,
    parent: &CancellationToken,
    bus: &Bus,
) -> Option<Fault> {
    run_bounded(Phase::Teardown, teardown, deadline, parent, bus).await
}

async fn run_bounded(
    phase: Phase,
    steps: Option<&StepRef>,
    deadline: Option<Duration>,
    parent: &CancellationToken,
    bus: &Bus,
) -> Option<Fault> {
    let steps = steps?;
    run_group(phase, vec![steps.clone()], deadline, parent, bus)
        .await
        .err()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StepError;
    use crate::steps::StepFn;
    use tokio::time;

    #[tokio::test]
    async fn absent_phase_is_no_fault() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        assert!(run_setup(None, None, &CancellationToken::new(), &bus).await.is_none());
        assert!(run_teardown(None, None, &CancellationToken::new(), &bus).await.is_none());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn teardown_fault_is_captured() {
        let teardown: StepRef = StepFn::arc("cleanup", |_ctx: CancellationToken| async {
            Err::<(), _>(StepError::fail("port still bound"))
        });
        let fault = run_teardown(Some(&teardown), None, &CancellationToken::new(), &Bus::new(8)).await;
        assert_eq!(
            fault,
            Some(Fault::Phase {
                phase: Phase::Teardown,
                error: StepError::fail("port still bound")
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn setup_is_bounded_by_the_phase_timeout() {
        let setup: StepRef = StepFn::arc("provision", |_ctx: CancellationToken| async {
            time::sleep(Duration::from_secs(120)).await;
            Ok::<_, StepError>(())
        });
        let fault = run_setup(
            Some(&setup),
            Some(Duration::from_secs(10)),
            &CancellationToken::new(),
            &Bus::new(8),
        )
        .await;
        assert_eq!(
            fault,
            Some(Fault::Timeout {
                phase: Phase::Setup,
                timeout: Duration::from_secs(10)
            })
        );
    }
}
