//! # Application launcher.
//!
//! Wraps the application phase in a bounded concurrent group (fail on first
//! error, deadline = the per-phase timeout) and hands it to a
//! [`WorkerHandle`] that the orchestrator starts once setup has succeeded.
//!
//! Without an application the worker is a no-op: it never faults and is
//! finished as soon as it is started.
//!
//! An application that answers an interrupt by returning
//! [`StepError::Canceled`] has stopped as asked; that is not a fault.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        Phase,
        group::run_group,
        worker::{WorkerHandle, WorkerJob},
    },
    error::{Fault, StepError},
    events::Bus,
    steps::StepRef,
};

/// Prepares the application worker without starting it.
pub(crate) fn prepare(
    application: Option<StepRef>,
    deadline: Option<Duration>,
    bus: &Bus,
) -> WorkerHandle {
    let token = CancellationToken::new();
    let job = application.map(|app| {
        let ctx = token.clone();
        let bus = bus.clone();
        Box::pin(async move {
            match run_group(Phase::Application, vec![app], deadline, &ctx, &bus).await {
                Err(Fault::Phase {
                    error: StepError::Canceled,
                    ..
                }) if ctx.is_cancelled() => Ok(()),
                res => res,
            }
        }) as WorkerJob
    });
    WorkerHandle::new(job, token, bus.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::StepFn;
    use tokio::time;

    #[tokio::test]
    async fn without_application_the_worker_is_a_noop() {
        let w = prepare(None, Some(Duration::from_secs(1)), &Bus::new(8));
        w.start();
        assert!(!w.is_alive());
        assert!(w.fault().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn application_overrunning_its_deadline_is_a_timeout_fault() {
        let app: StepRef = StepFn::arc("server", |ctx: CancellationToken| async move {
            ctx.cancelled().await;
            Err(StepError::Canceled)
        });
        let w = prepare(Some(app), Some(Duration::from_secs(2)), &Bus::new(8));
        w.start();
        assert!(w.wait_until_finished(Duration::from_secs(3)).await);
        assert_eq!(
            w.fault(),
            Some(Fault::Timeout {
                phase: Phase::Application,
                timeout: Duration::from_secs(2)
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn interrupt_reaches_the_application_steps() {
        let app: StepRef = StepFn::arc("server", |ctx: CancellationToken| async move {
            ctx.cancelled().await;
            Ok(())
        });
        let w = prepare(Some(app), None, &Bus::new(8));
        w.start();
        time::sleep(Duration::from_secs(60)).await;
        assert!(w.is_alive());

        w.interrupt();
        assert!(w.wait_until_finished(Duration::from_secs(1)).await);
        assert!(w.fault().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn canceled_after_interrupt_is_not_a_fault() {
        let app: StepRef = StepFn::arc("server", |ctx: CancellationToken| async move {
            ctx.cancelled().await;
            Err(StepError::Canceled)
        });
        let w = prepare(Some(app), None, &Bus::new(8));
        w.start();
        time::sleep(Duration::from_millis(1)).await;
        w.interrupt();
        assert!(w.wait_until_finished(Duration::from_secs(1)).await);
        assert!(w.fault().is_none());
    }
}
