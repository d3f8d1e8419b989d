//! # Funtest: the workflow orchestrator.
//!
//! Drives one functional-test run through its phases and turns whatever went
//! wrong into at most one surfaced [`Fault`].
//!
//! ## Architecture
//! ```text
//! execute()
//!   ├─► subscriber_listener(): Bus.subscribe() ─► SubscriberSet::emit(&Event)
//!   ├─► publish DefinitionOverridden (one per overridden phase)
//!   ├─► gate::check(condition)
//!   │     ├─ Err  ─► return Fault::Condition (nothing else runs)
//!   │     └─ false ─► ConditionSkipped, return Ok (teardown skipped too)
//!   ├─► launcher::prepare(application)            (worker created, not started)
//!   ├─► lifecycle::run_setup(setup)
//!   │     ├─ fault ─► test fault; application and tests skipped
//!   │     └─ ok    ─► worker.start(); TestSequence::run(probe → tests → reporting)
//!   ├─► lifecycle::run_teardown(teardown)         (always, fault kept apart)
//!   ├─► shutdown::drain(worker, grace)            (wait, interrupt, wait)
//!   ├─► Prioritizer::resolve(captured, signals)
//!   │     ├─► SecondaryFault for every fault not surfaced
//!   │     ├─► FailureSignalled if the failure property is set
//!   │     └─► OutcomeResolved
//!   └─► return Ok or the surfaced fault
//! ```
//!
//! ## Rules
//! - At most one fault reaches the caller
//! - Teardown runs on every path except the gate skipping the run
//! - A leaked worker never blocks `execute`
//! - The last [`Outcome`] stays readable until the next `execute`
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use funtest::{BlockFor, Config, FuntestBuilder, SocketCondition, StepError, StepFn, StepRef, TimeUnit};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server: StepRef = StepFn::arc("server", |ctx: CancellationToken| async move {
//!         // serve until interrupted
//!         ctx.cancelled().await;
//!         Ok::<_, StepError>(())
//!     });
//!     let tests: StepRef = StepFn::arc("tests", |_ctx: CancellationToken| async {
//!         Ok::<_, StepError>(())
//!     });
//!
//!     let cfg = Config {
//!         timeout: 30,
//!         timeout_unit: TimeUnit::Second,
//!         ..Config::default()
//!     };
//!     let run = FuntestBuilder::new(cfg)
//!         .application(server)
//!         .block(Arc::new(BlockFor::new("port", SocketCondition::new("127.0.0.1:8080"))))
//!         .tests(tests)
//!         .build();
//!
//!     run.execute().await?;
//!     Ok(())
//! }
//! ```

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        Config, Phase, gate, launcher, lifecycle,
        outcome::{Captured, Outcome},
        prioritizer::{Prioritizer, Resolution},
        sequencer::TestSequence,
        shutdown,
    },
    error::Fault,
    events::{Bus, Event, EventKind},
    probes::{Condition, Probe},
    signals::SignalSource,
    steps::StepRef,
    subscribers::SubscriberSet,
};

/// A phase definition that replaced an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Override {
    pub element: &'static str,
    pub phase: Option<Phase>,
}

/// Phase definitions of a run.
#[derive(Default)]
pub(crate) struct Phases {
    pub condition: Option<Arc<dyn Condition>>,
    pub setup: Option<StepRef>,
    pub application: Option<StepRef>,
    pub block: Option<Arc<dyn Probe>>,
    pub tests: Option<StepRef>,
    pub reporting: Option<StepRef>,
    pub teardown: Option<StepRef>,
}

/// Orchestrates a functional-test run.
///
/// Built with [`FuntestBuilder`](crate::FuntestBuilder); may be executed
/// more than once.
pub struct Funtest {
    cfg: Config,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    phases: Phases,
    signals: Arc<dyn SignalSource>,
    overrides: Vec<Override>,
    last: Mutex<Option<Outcome>>,
}

impl Funtest {
    pub(crate) fn new_internal(
        cfg: Config,
        bus: Bus,
        subs: Arc<SubscriberSet>,
        phases: Phases,
        signals: Arc<dyn SignalSource>,
        overrides: Vec<Override>,
    ) -> Self {
        Self {
            cfg,
            bus,
            subs,
            phases,
            signals,
            overrides,
            last: Mutex::new(None),
        }
    }

    /// Runs the workflow once.
    ///
    /// Returns the surfaced fault, if any. Everything else that went wrong is
    /// published as `SecondaryFault` and kept in [`last_outcome`](Self::last_outcome).
    pub async fn execute(&self) -> Result<(), Fault> {
        self.store(None);
        let listener = self.subscriber_listener();
        let res = self.run_workflow().await;
        if let Some(listener) = listener {
            listener.stop().await;
        }
        res
    }

    async fn run_workflow(&self) -> Result<(), Fault> {
        self.publish_overrides();

        match gate::check(self.phases.condition.as_ref(), &self.bus).await {
            Err(fault) => {
                self.store(Some(Outcome::resolved(
                    Captured::default(),
                    Some(fault.clone()),
                    false,
                )));
                return Err(fault);
            }
            Ok(false) => {
                self.store(Some(Outcome::skipped()));
                return Ok(());
            }
            Ok(true) => {}
        }

        let timeout = self.cfg.phase_timeout();
        let run = CancellationToken::new();
        let worker = launcher::prepare(self.phases.application.clone(), timeout, &self.bus);
        let sequence = TestSequence::build(
            self.phases.block.as_ref(),
            self.phases.tests.as_ref(),
            self.phases.reporting.as_ref(),
            self.cfg.phase_duration(),
        );

        let mut captured = Captured::default();
        captured.test = match lifecycle::run_setup(self.phases.setup.as_ref(), timeout, &run, &self.bus).await {
            Some(fault) => Some(fault),
            None => {
                worker.start();
                sequence.run(&run, &self.bus).await
            }
        };
        captured.teardown =
            lifecycle::run_teardown(self.phases.teardown.as_ref(), timeout, &run, &self.bus).await;

        let report = shutdown::drain(
            &worker,
            self.cfg.shutdown_grace(),
            self.cfg.interrupt_on_signal,
            &self.bus,
        )
        .await;
        captured.application = worker.fault();

        let resolution = Prioritizer::from_config(&self.cfg).resolve(&captured, self.signals.as_ref());
        self.publish_resolution(&resolution);

        let fault = resolution.fault;
        self.store(Some(
            Outcome::resolved(captured, fault.clone(), resolution.failure_signalled)
                .with_shutdown(report),
        ));
        fault.map_or(Ok(()), Err)
    }

    /// Subscribes to the bus and forwards events to the subscriber set.
    ///
    /// Returns `None` without subscribers.
    fn subscriber_listener(&self) -> Option<Listener> {
        if self.subs.is_empty() {
            return None;
        }
        let mut rx = self.bus.subscribe();
        let set = Arc::clone(&self.subs);
        let stop = CancellationToken::new();
        let stopped = stop.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    ev = rx.recv() => match ev {
                        Ok(ev) => set.emit(&ev),
                        Err(RecvError::Lagged(_)) => continue,
                        Err(RecvError::Closed) => return,
                    },
                    _ = stopped.cancelled() => break,
                }
            }
            loop {
                match rx.try_recv() {
                    Ok(ev) => set.emit(&ev),
                    Err(TryRecvError::Lagged(_)) => continue,
                    Err(_) => break,
                }
            }
        });
        Some(Listener { stop, handle })
    }

    fn publish_overrides(&self) {
        for o in &self.overrides {
            let ev = Event::new(EventKind::DefinitionOverridden).with_reason(format!("<{}>", o.element));
            self.bus.publish(match o.phase {
                Some(phase) => ev.with_phase(phase),
                None => ev,
            });
        }
    }

    fn publish_resolution(&self, resolution: &Resolution) {
        for fault in &resolution.secondary {
            let ev = Event::new(EventKind::SecondaryFault).with_reason(fault.to_string());
            self.bus.publish(match fault.phase() {
                Some(phase) => ev.with_phase(phase),
                None => ev,
            });
        }
        if resolution.failure_signalled {
            self.bus.publish(
                Event::new(EventKind::FailureSignalled).with_reason(self.cfg.failure_message.as_str()),
            );
        }
        let ev = Event::new(EventKind::OutcomeResolved);
        self.bus.publish(match &resolution.fault {
            Some(fault) => ev.with_reason(fault.to_string()),
            None => ev,
        });
    }

    fn store(&self, outcome: Option<Outcome>) {
        *self.last.lock().unwrap_or_else(|p| p.into_inner()) = outcome;
    }

    /// The outcome of the last completed `execute`.
    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn with_last(&self, f: impl FnOnce(&Outcome) -> Option<&Fault>) -> Option<Fault> {
        let last = self.last.lock().unwrap_or_else(|p| p.into_inner());
        last.as_ref().and_then(f).cloned()
    }

    /// Setup or test-sequence fault of the last run.
    pub fn test_fault(&self) -> Option<Fault> {
        self.with_last(Outcome::test_fault)
    }

    /// Application fault of the last run.
    pub fn application_fault(&self) -> Option<Fault> {
        self.with_last(Outcome::application_fault)
    }

    /// Teardown fault of the last run.
    pub fn teardown_fault(&self) -> Option<Fault> {
        self.with_last(Outcome::teardown_fault)
    }

    /// The fault surfaced by the last run.
    pub fn task_fault(&self) -> Option<Fault> {
        self.with_last(Outcome::fault)
    }

    /// The event bus this run publishes to.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Configuration the run was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Waits for every subscriber to drain its queue.
    pub async fn close(self) {
        if let Ok(subs) = Arc::try_unwrap(self.subs) {
            subs.shutdown().await;
        }
    }
}

/// Running subscriber listener.
struct Listener {
    stop: CancellationToken,
    handle: JoinHandle<()>,
}

impl Listener {
    /// Forwards what is already queued, then exits.
    async fn stop(self) {
        self.stop.cancel();
        let _ = self.handle.await;
    }
}
