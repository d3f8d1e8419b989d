//! # Readiness probes.
//!
//! A [`Probe`] waits for the system under test to become ready. It declares
//! its own maximum wait up front, so the orchestrator can extend the
//! test-sequence deadline by exactly that much, and it is run as the first
//! step of that sequence through [`ProbeStep`].
//!
//! [`BlockFor`] is the standard probe: it polls a [`Condition`] every
//! `check_every` until it holds, and gives up with a timeout once
//! `max_wait` has elapsed.
//!
//! ## Poll loop
//! ```text
//! loop {
//!   ├─► condition.eval()?  ── true ──► Ok(())
//!   ├─► elapsed >= max_wait ─────────► Err(Timeout { max_wait })
//!   └─► sleep(check_every)  (cancellable → Err(Canceled))
//! }
//! ```

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::error::StepError;
use crate::probes::condition::Condition;
use crate::steps::{Step, StepRef};

/// Readiness check with a declared maximum wait.
#[async_trait]
pub trait Probe: Send + Sync + 'static {
    /// Returns a stable, human-readable probe name.
    fn name(&self) -> &str;

    /// Longest time [`wait`](Probe::wait) may take before giving up.
    fn max_wait(&self) -> Duration;

    /// Waits until ready, failing with [`StepError::Timeout`] after `max_wait`.
    async fn wait(&self, ctx: CancellationToken) -> Result<(), StepError>;
}

/// Adapts a [`Probe`] into a [`Step`].
#[derive(Clone)]
pub struct ProbeStep {
    probe: Arc<dyn Probe>,
}

impl ProbeStep {
    /// Wraps `probe`.
    pub fn new(probe: Arc<dyn Probe>) -> Self {
        Self { probe }
    }

    /// Wraps `probe` and returns a shared step handle.
    pub fn arc(probe: Arc<dyn Probe>) -> StepRef {
        Arc::new(Self::new(probe))
    }
}

#[async_trait]
impl Step for ProbeStep {
    fn name(&self) -> &str {
        self.probe.name()
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), StepError> {
        self.probe.wait(ctx).await
    }
}

/// Polls a condition until it holds.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use funtest::{BlockFor, Probe, SocketCondition};
///
/// let probe = BlockFor::new("server-up", SocketCondition::new("127.0.0.1:8080"))
///     .with_max_wait(Duration::from_secs(30))
///     .with_check_every(Duration::from_millis(250));
///
/// assert_eq!(probe.max_wait(), Duration::from_secs(30));
/// ```
pub struct BlockFor {
    name: Cow<'static, str>,
    condition: Arc<dyn Condition>,
    max_wait: Duration,
    check_every: Duration,
}

impl BlockFor {
    /// Default maximum wait: 3 minutes.
    pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(180);
    /// Default polling interval: 500ms.
    pub const DEFAULT_CHECK_EVERY: Duration = Duration::from_millis(500);

    /// Creates a probe polling `condition` with the default timings.
    pub fn new(name: impl Into<Cow<'static, str>>, condition: impl Condition) -> Self {
        Self::from_arc(name, Arc::new(condition))
    }

    /// Same as [`BlockFor::new`] for an already shared condition.
    pub fn from_arc(name: impl Into<Cow<'static, str>>, condition: Arc<dyn Condition>) -> Self {
        Self {
            name: name.into(),
            condition,
            max_wait: Self::DEFAULT_MAX_WAIT,
            check_every: Self::DEFAULT_CHECK_EVERY,
        }
    }

    /// Sets the maximum wait.
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Sets the polling interval (clamped to at least 1ms).
    pub fn with_check_every(mut self, check_every: Duration) -> Self {
        self.check_every = check_every.max(Duration::from_millis(1));
        self
    }
}

#[async_trait]
impl Probe for BlockFor {
    fn name(&self) -> &str {
        &self.name
    }

    fn max_wait(&self) -> Duration {
        self.max_wait
    }

    async fn wait(&self, ctx: CancellationToken) -> Result<(), StepError> {
        let deadline = time::Instant::now() + self.max_wait;
        loop {
            if self.condition.eval().await? {
                return Ok(());
            }
            let now = time::Instant::now();
            if now >= deadline {
                return Err(StepError::Timeout {
                    timeout: self.max_wait,
                });
            }
            let pause = self.check_every.min(deadline - now);
            select! {
                _ = time::sleep(pause) => {}
                _ = ctx.cancelled() => return Err(StepError::Canceled),
            }
        }
    }
}
