//! # Shutdown coordinator.
//!
//! Drains the application worker once setup, tests and teardown are done:
//!
//! ```text
//! wait_until_finished(grace)
//!   └─ still alive?
//!        ├─► publish ForcedShutdown
//!        ├─► worker.interrupt()
//!        └─► wait_until_finished(grace)
//!              └─ still alive? ─► publish WorkerLeaked, move on
//! ```
//!
//! The run never blocks on a worker that ignores its interrupt, and a leaked
//! worker is not a fault.
//!
//! ## Termination signals
//! With `interrupt_on_signal`, either wait also ends when the process
//! receives a termination signal; the drain then stops right there and
//! publishes `ShutdownInterrupted`.
//!
//! **Unix platforms:** `SIGINT`, `SIGTERM`, `SIGQUIT`.
//! **Windows platforms:** `Ctrl-C` via [`tokio::signal::ctrl_c`].

use std::time::Duration;

use crate::{
    core::worker::WorkerHandle,
    events::{Bus, Event, EventKind},
};

/// What happened while draining the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ShutdownReport {
    /// Worker finished (or was never started).
    pub finished: bool,
    /// An interrupt was sent.
    pub interrupted: bool,
    /// A termination signal ended the drain early.
    pub signalled: bool,
}

enum Wait {
    Finished,
    TimedOut,
    Signalled,
}

/// Waits for the worker, interrupting it once if the first grace wait expires.
pub(crate) async fn drain(
    worker: &WorkerHandle,
    grace: Duration,
    honor_signals: bool,
    bus: &Bus,
) -> ShutdownReport {
    let mut report = ShutdownReport {
        finished: false,
        interrupted: false,
        signalled: false,
    };

    match wait(worker, grace, honor_signals).await {
        Wait::Finished => {
            report.finished = true;
            return report;
        }
        Wait::Signalled => return interrupted_by_signal(worker, report, bus),
        Wait::TimedOut => {}
    }

    if worker.is_alive() {
        bus.publish(
            Event::new(EventKind::ForcedShutdown)
                .with_timeout(grace)
                .with_reason("Application forcibly shut down"),
        );
        worker.interrupt();
        report.interrupted = true;

        if let Wait::Signalled = wait(worker, grace, honor_signals).await {
            return interrupted_by_signal(worker, report, bus);
        }
    }

    report.finished = !worker.is_alive();
    if !report.finished {
        bus.publish(Event::new(EventKind::WorkerLeaked));
    }
    report
}

fn interrupted_by_signal(worker: &WorkerHandle, mut report: ShutdownReport, bus: &Bus) -> ShutdownReport {
    bus.publish(Event::new(EventKind::ShutdownInterrupted).with_reason("Shutdown interrupted"));
    report.signalled = true;
    report.finished = !worker.is_alive();
    report
}

async fn wait(worker: &WorkerHandle, grace: Duration, honor_signals: bool) -> Wait {
    if !honor_signals {
        return finished_or_timed_out(worker.wait_until_finished(grace).await);
    }
    tokio::select! {
        finished = worker.wait_until_finished(grace) => finished_or_timed_out(finished),
        _ = termination_signal() => Wait::Signalled,
    }
}

fn finished_or_timed_out(finished: bool) -> Wait {
    if finished { Wait::Finished } else { Wait::TimedOut }
}

/// Completes when a termination signal arrives; never completes if the
/// listeners cannot be registered.
async fn termination_signal() {
    if wait_for_shutdown_signal().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Waits for a termination signal.
///
/// Each call creates independent signal listeners.
#[cfg(unix)]
async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = sigint.recv()  => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

/// Waits for a termination signal.
///
/// Each call creates independent signal listeners.
#[cfg(not(unix))]
async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
