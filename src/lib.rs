//! # funtest
//!
//! **Funtest** orchestrates functional tests against a running application.
//!
//! It starts an application in the background, waits until it is ready, runs
//! tests and reporting under a deadline, always tears down, shuts the
//! application down in two stages and reports **at most one** fault, picked
//! by a fixed precedence.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌───────────┐ ┌────────────┐ ┌──────────────┐ ┌────────────┐ ┌───────────┐ ┌────────────┐
//!   │ condition │ │   setup    │ │ application  │ │   block    │ │   tests   │ │  teardown  │
//!   │  (guard)  │ │ (StepRef)  │ │  (StepRef)   │ │  (Probe)   │ │ reporting │ │ (StepRef)  │
//!   └─────┬─────┘ └─────┬──────┘ └──────┬───────┘ └─────┬──────┘ └─────┬─────┘ └─────┬──────┘
//!         ▼             ▼               ▼               ▼              ▼             ▼
//! ┌──────────────────────────────────────────────────────────────────────────────────────────┐
//! │  Funtest (workflow orchestrator)                                                         │
//! │  - gate        (condition; false skips everything)                                       │
//! │  - lifecycle   (setup / teardown as bounded groups)                                      │
//! │  - launcher    (application in a WorkerHandle)                                           │
//! │  - sequencer   (probe → tests → reporting, deadline P + T + T)                           │
//! │  - shutdown    (wait, interrupt, wait)                                                   │
//! │  - Prioritizer (test / application / teardown / failure signal → one fault)             │
//! └──────────────────────────────────────────┬───────────────────────────────────────────────┘
//!                                            │ publish(Event)
//!                                            ▼
//! ┌──────────────────────────────────────────────────────────────────────────────────────────┐
//! │                             Bus (broadcast channel)                                      │
//! │                       (capacity: Config::bus_capacity)                                   │
//! └──────────────────────────────────────────┬───────────────────────────────────────────────┘
//!                                            ▼
//!                                   subscriber listener
//!                                            ▼
//!                                     SubscriberSet
//!                                  ┌─────────┼─────────┐
//!                                  ▼         ▼         ▼
//!                              LogWriter   sub2     subN
//! ```
//!
//! ### Lifecycle
//! ```text
//! gate ─ false ─► skip (no teardown)
//!   │
//!   ▼
//! setup ─ fault ─────────────────────────────┐
//!   │                                        │
//!   ▼                                        │
//! worker.start()  (application runs on)      │
//!   │                                        │
//!   ▼                                        │
//! probe → tests → reporting  (one deadline)  │
//!   │                                        │
//!   ▼                                        ▼
//! teardown ◄─────────────────────────────────┘
//!   │
//!   ▼
//! drain worker: wait(grace) → ForcedShutdown + interrupt → wait(grace) → WorkerLeaked?
//!   │
//!   ▼
//! Prioritizer → Ok(()) | Err(Fault)
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                              |
//! |-------------------|--------------------------------------------------------------|-------------------------------------------------|
//! | **Orchestration** | Run the workflow and inspect the last outcome.               | [`Funtest`], [`FuntestBuilder`], [`Outcome`]    |
//! | **Steps**         | Define phases as closures or composed sequences.             | [`Step`], [`StepFn`], [`StepRef`], [`Sequence`] |
//! | **Probes**        | Guards and readiness checks.                                 | [`Condition`], [`Probe`], [`BlockFor`]          |
//! | **Faults**        | Typed errors and their precedence.                           | [`Fault`], [`StepError`], [`Prioritizer`]       |
//! | **Subscriber API**| Hook into run events (logging, metrics, custom subscribers). | [`Subscribe`]                                   |
//! | **Configuration** | Timeouts, grace period, failure signal.                      | [`Config`], [`TimeUnit`]                        |
//!
//! ## Optional features
//! - `logging` (default): exports the built-in [`LogWriter`], which renders
//!   events through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use funtest::{Config, FuntestBuilder, SignalStore, StepError, StepFn, StepRef, TimeUnit};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config {
//!         timeout: 5,
//!         timeout_unit: TimeUnit::Second,
//!         shutdown_time: 100,
//!         shutdown_unit: TimeUnit::Millisecond,
//!         failure_property: Some("tests.failed".into()),
//!         ..Config::default()
//!     };
//!
//!     // Build subscribers (optional)
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn funtest::Subscribe>> = vec![Arc::new(funtest::LogWriter::default())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn funtest::Subscribe>> = Vec::new();
//!
//!     let signals = SignalStore::new();
//!     let recorder = signals.clone();
//!
//!     let app: StepRef = StepFn::arc("app", |ctx: CancellationToken| async move {
//!         ctx.cancelled().await;
//!         Ok::<_, StepError>(())
//!     });
//!     let tests: StepRef = StepFn::arc("tests", move |_ctx: CancellationToken| {
//!         let recorder = recorder.clone();
//!         async move {
//!             // a failure noted without raising it
//!             recorder.set("tests.failed", "1 failure");
//!             Ok::<_, StepError>(())
//!         }
//!     });
//!
//!     let run = FuntestBuilder::new(cfg)
//!         .application(app)
//!         .tests(tests)
//!         .signals(Arc::new(signals))
//!         .with_subscribers(subs)
//!         .build();
//!
//!     let err = run.execute().await.unwrap_err();
//!     assert_eq!(err.to_string(), "Tests failed");
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod probes;
mod signals;
mod steps;
mod subscribers;

// ---- Public re-exports ----

pub use core::{
    Captured, Config, Funtest, FuntestBuilder, Outcome, Phase, Prioritizer, Resolution, TimeUnit,
    sequence_deadline,
};
pub use error::{ConfigError, Fault, StepError};
pub use events::{Bus, Event, EventKind};
pub use probes::{BlockFor, Condition, ConditionFn, Probe, ProbeStep, SignalCondition, SocketCondition};
pub use signals::{SignalSource, SignalStore};
pub use steps::{Sequence, Step, StepFn, StepRef};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber.
// Enabled by default with the `logging` feature.
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
