//! Error types used by the funtest runtime and its steps.
//!
//! This module defines three error enums:
//!
//! - [`StepError`] - errors returned by individual step executions.
//! - [`Fault`] - faults captured per phase and surfaced by the orchestrator.
//! - [`ConfigError`] - errors raised while interpreting configuration values.
//!
//! All types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use std::time::Duration;
use thiserror::Error;

use crate::core::Phase;

/// # Errors produced by step execution.
///
/// These represent failures of individual async steps (a test, a probe, a
/// reporting action). The orchestrator wraps them into a [`Fault`] tagged
/// with the phase they happened in.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    /// Step execution exceeded its own deadline (e.g. a readiness probe gave up).
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The duration that was exceeded.
        timeout: Duration,
    },

    /// Step execution failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Step observed cancellation of its context and stopped early.
    #[error("context cancelled")]
    Canceled,
}

impl StepError {
    /// Convenience constructor for [`StepError::Fail`].
    ///
    /// # Example
    /// ```
    /// use funtest::StepError;
    ///
    /// let err = StepError::fail("assertion failed");
    /// assert_eq!(err.as_label(), "step_failed");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        StepError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            StepError::Timeout { .. } => "step_timeout",
            StepError::Fail { .. } => "step_failed",
            StepError::Canceled => "step_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            StepError::Timeout { timeout } => format!("timeout: {timeout:?}"),
            StepError::Fail { error } => format!("error: {error}"),
            StepError::Canceled => "context cancelled".to_string(),
        }
    }
}

/// # Faults captured and surfaced by the orchestrator.
///
/// Every phase fault except [`Fault::Condition`] is captured and deferred so
/// that teardown and shutdown always run; the fault prioritizer then picks at
/// most one of them to surface.
///
/// - `Phase { phase: Application, .. }` is the application fault.
/// - `Phase { phase: Teardown, .. }` is the teardown fault.
/// - [`Fault::Timeout`] is the timeout kind used by the prioritizer's tie-break.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// The guard condition could not be evaluated. Propagates immediately.
    #[error("condition evaluation failed: {error}")]
    Condition {
        /// The evaluation error.
        error: StepError,
    },

    /// A step inside `phase` failed.
    #[error("{phase} failed: {error}")]
    Phase {
        /// The phase the failing step belonged to.
        phase: Phase,
        /// The step error.
        error: StepError,
    },

    /// The deadline for `phase` elapsed before its steps finished.
    #[error("{phase} timed out after {timeout:?}")]
    Timeout {
        /// The phase whose deadline elapsed.
        phase: Phase,
        /// The deadline that was exceeded.
        timeout: Duration,
    },

    /// The failure signal was found set after teardown.
    #[error("{message}")]
    FailureSignal {
        /// The configured failure message.
        message: String,
    },
}

impl Fault {
    /// Builds a phase fault from a step error.
    ///
    /// A [`StepError::Timeout`] raised by a step (for instance a readiness
    /// probe that gave up) is still a timeout-kind fault for the phase.
    pub fn from_step(phase: Phase, error: StepError) -> Self {
        match error {
            StepError::Timeout { timeout } => Fault::Timeout { phase, timeout },
            error => Fault::Phase { phase, error },
        }
    }

    /// True for faults that signal a deadline overrun.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use funtest::{Fault, Phase};
    ///
    /// let f = Fault::Timeout { phase: Phase::Tests, timeout: Duration::from_secs(1) };
    /// assert!(f.is_timeout());
    /// ```
    pub fn is_timeout(&self) -> bool {
        matches!(self, Fault::Timeout { .. })
    }

    /// Returns the phase this fault belongs to, if any.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Fault::Phase { phase, .. } | Fault::Timeout { phase, .. } => Some(*phase),
            Fault::Condition { .. } | Fault::FailureSignal { .. } => None,
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Fault::Condition { .. } => "fault_condition",
            Fault::Phase { .. } => "fault_phase",
            Fault::Timeout { .. } => "fault_timeout",
            Fault::FailureSignal { .. } => "fault_failure_signal",
        }
    }

    /// Returns a human-readable message with details about the fault.
    pub fn as_message(&self) -> String {
        match self {
            Fault::Condition { error } => format!("condition: {}", error.as_message()),
            Fault::Phase { phase, error } => format!("{phase}: {}", error.as_message()),
            Fault::Timeout { phase, timeout } => format!("{phase}: timeout {timeout:?}"),
            Fault::FailureSignal { message } => format!("failure signal: {message}"),
        }
    }
}

/// # Errors produced while interpreting configuration values.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The given text does not name a known time unit.
    #[error("unknown time unit {0:?}; expected millisecond, second, minute, hour, day or week")]
    UnknownUnit(String),
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::UnknownUnit(_) => "config_unknown_unit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_timeout_becomes_timeout_fault() {
        let f = Fault::from_step(
            Phase::Tests,
            StepError::Timeout {
                timeout: Duration::from_millis(5),
            },
        );
        assert!(f.is_timeout());
        assert_eq!(f.phase(), Some(Phase::Tests));
    }

    #[test]
    fn step_failure_becomes_phase_fault() {
        let f = Fault::from_step(Phase::Teardown, StepError::fail("disk full"));
        assert!(!f.is_timeout());
        assert_eq!(f.as_label(), "fault_phase");
        assert_eq!(f.to_string(), "teardown failed: execution failed: disk full");
    }
}
