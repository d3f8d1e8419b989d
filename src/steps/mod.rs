//! # Step abstractions and the ordered-step runner.
//!
//! This module provides the unit of work every phase is made of:
//! - [`Step`] - trait for implementing async cancelable steps
//! - [`StepFn`] - closure-backed step implementation
//! - [`StepRef`] - shared reference to a step (`Arc<dyn Step>`)
//! - [`Sequence`] - ordered list of steps that stops on the first fault

mod sequence;
mod step;
mod step_fn;

pub use sequence::Sequence;
pub use step::{Step, StepRef};
pub use step_fn::StepFn;
