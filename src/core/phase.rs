//! # Workflow phases.

use std::fmt;

/// One named stage of a functional-test run.
///
/// The probe, tests and reporting run together as one bounded group; any
/// fault raised there (including the probe's) is attributed to
/// [`Phase::Tests`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Preparation run synchronously before the application starts.
    Setup,
    /// The long-running application under test.
    Application,
    /// Readiness probe, tests and reporting.
    Tests,
    /// Cleanup that runs after every other path through the workflow.
    Teardown,
}

impl Phase {
    /// Returns the phase name as used in logs and fault messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::Application => "application",
            Phase::Tests => "tests",
            Phase::Teardown => "teardown",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
