//! Runtime core: orchestration and phase lifecycle.
//!
//! The public API from this module is [`Funtest`] (built with
//! [`FuntestBuilder`]), its [`Config`] and the fault [`Prioritizer`].
//!
//! Internal modules:
//! - [`gate`]: evaluates the guard condition;
//! - [`group`]: runs one phase as a bounded, fail-fast concurrent group;
//! - [`launcher`]: wraps the application in a [`WorkerHandle`](worker::WorkerHandle);
//! - [`lifecycle`]: setup and teardown;
//! - [`sequencer`]: probe, tests and reporting under one deadline;
//! - [`shutdown`]: drains the application worker;
//! - [`prioritizer`]: picks the fault to surface.

mod builder;
mod config;
mod funtest;
mod gate;
mod group;
mod launcher;
mod lifecycle;
mod outcome;
mod phase;
mod prioritizer;
mod sequencer;
mod shutdown;
mod worker;

pub use builder::FuntestBuilder;
pub use config::{Config, TimeUnit};
pub use funtest::Funtest;
pub use outcome::{Captured, Outcome};
pub use phase::Phase;
pub use prioritizer::{Prioritizer, Resolution};
pub use sequencer::sequence_deadline;
