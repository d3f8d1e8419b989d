use std::sync::Arc;

use crate::{
    core::{
        Config, Phase,
        funtest::{Funtest, Override, Phases},
    },
    events::Bus,
    probes::{Condition, Probe},
    signals::{SignalSource, SignalStore},
    steps::StepRef,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing a [`Funtest`].
///
/// Every phase is optional. Defining a phase twice keeps the later
/// definition; the override is published as `DefinitionOverridden` at the
/// start of each run.
pub struct FuntestBuilder {
    cfg: Config,
    phases: Phases,
    signals: Option<Arc<dyn SignalSource>>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    overrides: Vec<Override>,
}

impl FuntestBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            phases: Phases::default(),
            signals: None,
            subscribers: Vec::new(),
            overrides: Vec::new(),
        }
    }

    /// Guard evaluated before anything else; `false` skips the run.
    pub fn condition(mut self, condition: Arc<dyn Condition>) -> Self {
        replace(&mut self.phases.condition, condition, "condition", None, &mut self.overrides);
        self
    }

    /// Steps run before the application starts.
    pub fn setup(mut self, steps: StepRef) -> Self {
        replace(&mut self.phases.setup, steps, "setup", Some(Phase::Setup), &mut self.overrides);
        self
    }

    /// Application run in the background for the duration of the tests.
    pub fn application(mut self, steps: StepRef) -> Self {
        replace(
            &mut self.phases.application,
            steps,
            "application",
            Some(Phase::Application),
            &mut self.overrides,
        );
        self
    }

    /// Readiness probe awaited before the tests.
    pub fn block(mut self, probe: Arc<dyn Probe>) -> Self {
        replace(&mut self.phases.block, probe, "block", Some(Phase::Tests), &mut self.overrides);
        self
    }

    /// Test steps, run after the probe.
    pub fn tests(mut self, steps: StepRef) -> Self {
        replace(&mut self.phases.tests, steps, "tests", Some(Phase::Tests), &mut self.overrides);
        self
    }

    /// Steps run after the tests, inside the same deadline.
    pub fn reporting(mut self, steps: StepRef) -> Self {
        replace(
            &mut self.phases.reporting,
            steps,
            "reporting",
            Some(Phase::Tests),
            &mut self.overrides,
        );
        self
    }

    /// Steps run after everything else, on every path but a skipped run.
    pub fn teardown(mut self, steps: StepRef) -> Self {
        replace(
            &mut self.phases.teardown,
            steps,
            "teardown",
            Some(Phase::Teardown),
            &mut self.overrides,
        );
        self
    }

    /// Source queried for the failure property after teardown.
    ///
    /// Defaults to an empty [`SignalStore`].
    pub fn signals(mut self, source: Arc<dyn SignalSource>) -> Self {
        self.signals = Some(source);
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events through dedicated workers with
    /// bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the run.
    ///
    /// Must be called from within a tokio runtime (subscriber workers are
    /// spawned here).
    pub fn build(self) -> Funtest {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = Arc::new(SubscriberSet::new(self.subscribers, bus.clone()));
        let signals = self
            .signals
            .unwrap_or_else(|| Arc::new(SignalStore::new()));

        Funtest::new_internal(self.cfg, bus, subs, self.phases, signals, self.overrides)
    }
}

fn replace<T>(
    slot: &mut Option<T>,
    value: T,
    element: &'static str,
    phase: Option<Phase>,
    overrides: &mut Vec<Override>,
) {
    if slot.replace(value).is_some() {
        overrides.push(Override { element, phase });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StepError;
    use crate::steps::StepFn;
    use tokio_util::sync::CancellationToken;

    fn noop() -> StepRef {
        StepFn::arc("noop", |_ctx: CancellationToken| async { Ok::<_, StepError>(()) })
    }

    #[test]
    fn second_definition_is_recorded_as_override() {
        let b = FuntestBuilder::new(Config::default())
            .tests(noop())
            .setup(noop())
            .tests(noop());
        assert_eq!(
            b.overrides,
            vec![Override {
                element: "tests",
                phase: Some(Phase::Tests)
            }]
        );
    }

    #[test]
    fn single_definitions_record_nothing() {
        let b = FuntestBuilder::new(Config::default())
            .setup(noop())
            .application(noop())
            .tests(noop())
            .reporting(noop())
            .teardown(noop());
        assert!(b.overrides.is_empty());
    }
}
