//! # Conditions and readiness probes.
//!
//! - [`Condition`] - async boolean check that may fault (guards and probe targets)
//! - [`ConditionFn`] - closure-backed condition
//! - [`SocketCondition`] - true once a TCP endpoint accepts connections
//! - [`SignalCondition`] - true once a key is present in a [`SignalSource`](crate::SignalSource)
//! - [`Probe`] - readiness check with a declared maximum wait
//! - [`ProbeStep`] - adapts a probe into a [`Step`](crate::Step)
//! - [`BlockFor`] - polls a condition until it holds or the maximum wait elapses
//!
//! ## Quick wiring
//! ```text
//! Funtest { block: Arc<dyn Probe>, .. }
//!      └─► sequencer:
//!           - probe.max_wait() contributes to the test-sequence deadline
//!           - ProbeStep(probe) runs first in the test sequence
//! ```

mod block_for;
mod condition;

pub use block_for::{BlockFor, Probe, ProbeStep};
pub use condition::{Condition, ConditionFn, SignalCondition, SocketCondition};
