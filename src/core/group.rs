//! # Bounded concurrent group.
//!
//! Runs the members of one phase concurrently under an optional deadline and
//! publishes the phase lifecycle to the [`Bus`].
//!
//! - **Spawn every member** with a child cancellation token
//! - **Fail fast** on the first member fault
//! - **Apply the deadline** if configured (wraps the join in `tokio::time::timeout`)
//!
//! ## Event flow
//!
//! ```text
//! Success:
//!   PhaseStarting → all members Ok → PhaseCompleted
//!
//! Failure:
//!   PhaseStarting → first member Err → cancel child → PhaseFailed
//!
//! Timeout:
//!   PhaseStarting → deadline elapsed → cancel child → TimeoutHit
//!                                                   → PhaseFailed (timeout)
//! ```
//!
//! ## Rules
//! - Always publishes **exactly one** terminal event: `PhaseCompleted` or `PhaseFailed`
//! - Cancellation is **advisory**: on fault or timeout the child token is
//!   cancelled and remaining members are detached, never aborted
//! - A zero deadline is treated as no deadline
//! - A panicking member is reported as a phase fault

use std::time::Duration;

use tokio::task::{JoinError, JoinSet};
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::{
    core::Phase,
    error::{Fault, StepError},
    events::{Bus, Event, EventKind},
    steps::StepRef,
};

/// Runs `members` concurrently as `phase`, bounded by `deadline`.
///
/// ### Cancellation semantics
/// - Parent cancellation propagates to the members' child token
/// - Child cancellation does **not** affect the parent
pub(crate) async fn run_group(
    phase: Phase,
    members: Vec<StepRef>,
    deadline: Option<Duration>,
    parent: &CancellationToken,
    bus: &Bus,
) -> Result<(), Fault> {
    let deadline = deadline.filter(|d| *d > Duration::ZERO);
    publish_starting(bus, phase, deadline);

    let child = parent.child_token();
    let mut set = JoinSet::new();
    for member in members {
        let ctx = child.clone();
        set.spawn(async move { member.run(ctx).await });
    }

    let joined = join_fail_fast(phase, &mut set);
    let res = if let Some(dur) = deadline {
        match time::timeout(dur, joined).await {
            Ok(r) => r,
            Err(_elapsed) => {
                publish_timeout(bus, phase, dur);
                Err(Fault::Timeout {
                    phase,
                    timeout: dur,
                })
            }
        }
    } else {
        joined.await
    };

    match res {
        Ok(()) => {
            publish_completed(bus, phase);
            Ok(())
        }
        Err(fault) => {
            child.cancel();
            set.detach_all();
            publish_failed(bus, phase, &fault);
            Err(fault)
        }
    }
}

/// Joins members until all succeed or one fails.
async fn join_fail_fast(
    phase: Phase,
    set: &mut JoinSet<Result<(), StepError>>,
) -> Result<(), Fault> {
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(Fault::from_step(phase, e)),
            Err(join_err) => return Err(panicked(phase, join_err)),
        }
    }
    Ok(())
}

fn panicked(phase: Phase, err: JoinError) -> Fault {
    Fault::Phase {
        phase,
        error: StepError::fail(format!("step did not complete: {err}")),
    }
}

/// Publishes `PhaseStarting` (with the deadline, if bounded).
fn publish_starting(bus: &Bus, phase: Phase, deadline: Option<Duration>) {
    let ev = Event::new(EventKind::PhaseStarting).with_phase(phase);
    bus.publish(match deadline {
        Some(d) => ev.with_timeout(d),
        None => ev,
    });
}

/// Publishes `PhaseCompleted`.
fn publish_completed(bus: &Bus, phase: Phase) {
    bus.publish(Event::new(EventKind::PhaseCompleted).with_phase(phase));
}

/// Publishes `PhaseFailed` with the fault message.
fn publish_failed(bus: &Bus, phase: Phase, fault: &Fault) {
    bus.publish(
        Event::new(EventKind::PhaseFailed)
            .with_phase(phase)
            .with_reason(fault.to_string()),
    );
}

/// Publishes `TimeoutHit` (always followed by `PhaseFailed`).
fn publish_timeout(bus: &Bus, phase: Phase, dur: Duration) {
    bus.publish(
        Event::new(EventKind::TimeoutHit)
            .with_phase(phase)
            .with_timeout(dur),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::StepFn;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn ok_after(d: Duration) -> StepRef {
        StepFn::arc("ok", move |_ctx: CancellationToken| async move {
            time::sleep(d).await;
            Ok(())
        })
    }

    fn fail_after(d: Duration, msg: &'static str) -> StepRef {
        StepFn::arc("fail", move |_ctx: CancellationToken| async move {
            time::sleep(d).await;
            Err(StepError::fail(msg))
        })
    }

    fn kinds(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<EventKind> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            out.push(ev.kind);
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn completes_when_all_members_succeed() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let res = run_group(
            Phase::Setup,
            vec![ok_after(Duration::from_secs(1)), ok_after(Duration::from_secs(2))],
            Some(Duration::from_secs(5)),
            &CancellationToken::new(),
            &bus,
        )
        .await;

        assert!(res.is_ok());
        assert_eq!(
            kinds(&mut rx),
            vec![EventKind::PhaseStarting, EventKind::PhaseCompleted]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn fails_fast_on_first_fault() {
        let bus = Bus::new(16);
        let started = time::Instant::now();
        let err = run_group(
            Phase::Tests,
            vec![
                ok_after(Duration::from_secs(60)),
                fail_after(Duration::from_secs(1), "broken"),
            ],
            None,
            &CancellationToken::new(),
            &bus,
        )
        .await
        .unwrap_err();

        assert_eq!(
            err,
            Fault::Phase {
                phase: Phase::Tests,
                error: StepError::fail("broken")
            }
        );
        assert!(started.elapsed() < Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_overrun_is_timeout_kind_and_cancels_members() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let saw_cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&saw_cancel);
        let slow: StepRef = StepFn::arc("slow", move |ctx: CancellationToken| {
            let flag = Arc::clone(&flag);
            async move {
                ctx.cancelled().await;
                flag.store(true, Ordering::SeqCst);
                Err(StepError::Canceled)
            }
        });

        let err = run_group(
            Phase::Teardown,
            vec![slow],
            Some(Duration::from_millis(250)),
            &CancellationToken::new(),
            &bus,
        )
        .await
        .unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(err.phase(), Some(Phase::Teardown));
        assert_eq!(
            kinds(&mut rx),
            vec![
                EventKind::PhaseStarting,
                EventKind::TimeoutHit,
                EventKind::PhaseFailed
            ]
        );

        // the detached member observes the advisory cancellation
        time::sleep(Duration::from_millis(1)).await;
        assert!(saw_cancel.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_deadline_is_unbounded() {
        let bus = Bus::new(16);
        let res = run_group(
            Phase::Setup,
            vec![ok_after(Duration::from_secs(3600))],
            Some(Duration::ZERO),
            &CancellationToken::new(),
            &bus,
        )
        .await;
        assert!(res.is_ok());
    }

    #[tokio::test]
    async fn panicking_member_is_a_phase_fault() {
        let bus = Bus::new(16);
        let boom: StepRef = StepFn::arc("boom", |_ctx: CancellationToken| async {
            if std::hint::black_box(true) {
                panic!("kaboom");
            }
            Ok::<(), StepError>(())
        });
        let err = run_group(Phase::Setup, vec![boom], None, &CancellationToken::new(), &bus)
            .await
            .unwrap_err();
        assert!(matches!(err, Fault::Phase { phase: Phase::Setup, .. }));
    }

    #[tokio::test]
    async fn empty_group_succeeds() {
        let bus = Bus::new(4);
        assert!(
            run_group(Phase::Tests, Vec::new(), None, &CancellationToken::new(), &bus)
                .await
                .is_ok()
        );
    }
}
