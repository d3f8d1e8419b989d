//! # Fault prioritizer.
//!
//! Combines the faults captured during a run into at most one surfaced fault.
//!
//! ## Precedence
//! ```text
//! 1. outcome ← test fault
//! 2. application fault replaces it if outcome is empty or timeout-kind,
//!    otherwise it is secondary
//! 3. teardown fault fills an empty outcome when fail_on_teardown_errors,
//!    otherwise it is secondary
//! 4. failure signal set → report the failure message; an empty outcome
//!    becomes FailureSignal(failure_message)
//! ```
//!
//! A test-phase timeout is usually a symptom of the application never coming
//! up, so the application's own fault is the more useful one to surface; a
//! genuine test fault still wins over it.
//!
//! [`Prioritizer::arbitrate`] is a pure function of its inputs; secondary
//! faults are returned for the caller to report, never raised.

use crate::{
    core::{Config, outcome::Captured},
    error::Fault,
    signals::SignalSource,
};

/// Result of arbitration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The fault to surface, if any.
    pub fault: Option<Fault>,
    /// Faults that were superseded or suppressed, in precedence order.
    pub secondary: Vec<Fault>,
    /// Whether the failure signal was found set.
    pub failure_signalled: bool,
}

/// Fault arbitration policy.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use funtest::{Captured, Fault, Phase, Prioritizer, StepError};
///
/// let p = Prioritizer::new(true, None, "Tests failed");
/// let captured = Captured {
///     test: Some(Fault::Timeout { phase: Phase::Tests, timeout: Duration::from_secs(60) }),
///     application: Some(Fault::Phase { phase: Phase::Application, error: StepError::fail("bind: address in use") }),
///     teardown: None,
/// };
///
/// let r = p.arbitrate(&captured, false);
/// assert_eq!(r.fault, captured.application);
/// ```
#[derive(Debug, Clone)]
pub struct Prioritizer {
    fail_on_teardown_errors: bool,
    failure_property: Option<String>,
    failure_message: String,
}

impl Prioritizer {
    /// Creates a policy.
    pub fn new(
        fail_on_teardown_errors: bool,
        failure_property: Option<String>,
        failure_message: impl Into<String>,
    ) -> Self {
        Self {
            fail_on_teardown_errors,
            failure_property,
            failure_message: failure_message.into(),
        }
    }

    /// Creates the policy configured in `cfg`.
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            cfg.fail_on_teardown_errors,
            cfg.failure_property.clone(),
            cfg.failure_message.clone(),
        )
    }

    /// True if the failure property is configured and set in `signals`.
    pub fn failure_signal_set(&self, signals: &dyn SignalSource) -> bool {
        self.failure_property
            .as_deref()
            .is_some_and(|key| signals.get(key).is_some())
    }

    /// Looks up the failure signal, then arbitrates.
    pub fn resolve(&self, captured: &Captured, signals: &dyn SignalSource) -> Resolution {
        self.arbitrate(captured, self.failure_signal_set(signals))
    }

    /// Applies the precedence rules to `captured`.
    pub fn arbitrate(&self, captured: &Captured, failure_signal_set: bool) -> Resolution {
        let mut fault = captured.test.clone();
        let mut secondary = Vec::new();

        if let Some(app) = &captured.application {
            if fault.as_ref().is_none_or(Fault::is_timeout) {
                if let Some(superseded) = fault.replace(app.clone()) {
                    secondary.push(superseded);
                }
            } else {
                secondary.push(app.clone());
            }
        }

        if let Some(teardown) = &captured.teardown {
            if fault.is_none() && self.fail_on_teardown_errors {
                fault = Some(teardown.clone());
            } else {
                secondary.push(teardown.clone());
            }
        }

        if failure_signal_set && fault.is_none() {
            fault = Some(Fault::FailureSignal {
                message: self.failure_message.clone(),
            });
        }

        Resolution {
            fault,
            secondary,
            failure_signalled: failure_signal_set,
        }
    }

    /// The configured failure message.
    pub fn failure_message(&self) -> &str {
        &self.failure_message
    }
}
