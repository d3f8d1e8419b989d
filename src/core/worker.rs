//! # Application worker handle.
//!
//! [`WorkerHandle`] hosts the application phase for the whole run. It is
//! created (not started) by the launcher, started once by the orchestrator,
//! and afterwards polled and interrupted only by the shutdown coordinator.
//!
//! ## States
//! ```text
//! created ──start()──► running ──job returns──► finished
//!    │                    │
//!    │                    └─ interrupt() cancels the job's token (cooperative)
//!    └─ never started: counts as finished, never faults
//! ```
//!
//! ## Rules
//! - `start()` has effect at most once
//! - the captured fault is write-once (`OnceLock`)
//! - completion is observed through a `watch` channel, so it can be awaited
//!   any number of times, with or without a timeout

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use futures::FutureExt;
use tokio::{sync::watch, time};
use tokio_util::sync::CancellationToken;

use crate::{
    core::Phase,
    error::{Fault, StepError},
    events::{Bus, Event, EventKind},
};

/// The application job run by the worker.
pub(crate) type WorkerJob = Pin<Box<dyn Future<Output = Result<(), Fault>> + Send + 'static>>;

/// Handle to the asynchronous application run.
pub(crate) struct WorkerHandle {
    job: Mutex<Option<WorkerJob>>,
    started: AtomicBool,
    interrupts: AtomicU32,
    token: CancellationToken,
    fault: Arc<OnceLock<Fault>>,
    done_tx: Arc<watch::Sender<bool>>,
    done_rx: watch::Receiver<bool>,
    bus: Bus,
}

impl WorkerHandle {
    /// Creates a handle for `job`; `None` makes a no-op worker.
    ///
    /// `token` must be the token `job` observes; [`interrupt`](Self::interrupt)
    /// cancels it.
    pub(crate) fn new(job: Option<WorkerJob>, token: CancellationToken, bus: Bus) -> Self {
        let (done_tx, done_rx) = watch::channel(false);
        Self {
            job: Mutex::new(job),
            started: AtomicBool::new(false),
            interrupts: AtomicU32::new(0),
            token,
            fault: Arc::new(OnceLock::new()),
            done_tx: Arc::new(done_tx),
            done_rx,
            bus,
        }
    }

    /// Starts the job on the tokio runtime and returns immediately.
    ///
    /// Subsequent calls do nothing. A no-op worker finishes on the spot.
    pub fn start(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }
        let job = self
            .job
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take();
        let Some(job) = job else {
            self.done_tx.send_replace(true);
            return;
        };

        self.bus.publish(Event::new(EventKind::WorkerStarted));
        let fault = Arc::clone(&self.fault);
        let done = Arc::clone(&self.done_tx);
        let bus = self.bus.clone();
        tokio::spawn(async move {
            let res = match std::panic::AssertUnwindSafe(job).catch_unwind().await {
                Ok(res) => res,
                Err(_panic) => Err(Fault::Phase {
                    phase: Phase::Application,
                    error: StepError::fail("application worker panicked"),
                }),
            };
            let mut ev = Event::new(EventKind::WorkerFinished);
            if let Err(f) = res {
                ev = ev.with_reason(f.to_string());
                let _ = fault.set(f);
            }
            bus.publish(ev);
            done.send_replace(true);
        });
    }

    /// True once [`start`](Self::start) has been called.
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// True while the job has been started and has not finished.
    pub fn is_alive(&self) -> bool {
        self.is_started() && !*self.done_rx.borrow()
    }

    /// Waits up to `timeout` for the job to finish.
    ///
    /// Returns `true` if the worker is finished (or was never started).
    /// A zero `timeout` only checks.
    pub async fn wait_until_finished(&self, timeout: Duration) -> bool {
        if !self.is_started() {
            return true;
        }
        let mut rx = self.done_rx.clone();
        matches!(
            time::timeout(timeout, rx.wait_for(|done| *done)).await,
            Ok(Ok(_))
        )
    }

    /// Requests cooperative cancellation of the job.
    pub fn interrupt(&self) {
        self.interrupts.fetch_add(1, Ordering::SeqCst);
        self.token.cancel();
    }

    /// Number of interrupt requests issued.
    pub fn interrupt_count(&self) -> u32 {
        self.interrupts.load(Ordering::SeqCst)
    }

    /// The fault the job finished with, if any.
    pub fn fault(&self) -> Option<Fault> {
        self.fault.get().cloned()
    }
}

impl std::fmt::Debug for WorkerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerHandle")
            .field("started", &self.is_started())
            .field("alive", &self.is_alive())
            .field("interrupts", &self.interrupt_count())
            .field("fault", &self.fault.get())
            .finish()
    }
}
