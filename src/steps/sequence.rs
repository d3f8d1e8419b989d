//! # Ordered-step runner.
//!
//! [`Sequence`] runs its children one after another and stops on the first
//! fault, which it returns unchanged. Every workflow phase (setup,
//! application, tests, reporting, teardown) is configured as a `Sequence`.
//!
//! ## Rules
//! - Children run **strictly in order**, never concurrently.
//! - The first `Err` ends the sequence; later children never run.
//! - Cancellation is checked **between** children: once `ctx` is cancelled,
//!   the next child is not started and `StepError::Canceled` is returned.
//! - An empty sequence succeeds immediately.

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::StepError;
use crate::steps::step::{Step, StepRef};

/// Ordered list of steps executed one after another.
///
/// ## Example
/// ```rust
/// use tokio_util::sync::CancellationToken;
/// use funtest::{Sequence, StepFn, StepError};
///
/// let tests = Sequence::new("tests")
///     .then(StepFn::arc("login", |_ctx: CancellationToken| async { Ok::<_, StepError>(()) }))
///     .then(StepFn::arc("checkout", |_ctx: CancellationToken| async { Ok::<_, StepError>(()) }));
///
/// assert_eq!(tests.len(), 2);
/// ```
#[derive(Clone)]
pub struct Sequence {
    name: Cow<'static, str>,
    steps: Vec<StepRef>,
}

impl Sequence {
    /// Creates an empty sequence.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Appends a step and returns the sequence (builder style).
    pub fn then(mut self, step: StepRef) -> Self {
        self.steps.push(step);
        self
    }

    /// Appends a step in place.
    pub fn push(&mut self, step: StepRef) {
        self.steps.push(step);
    }

    /// Number of child steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True if the sequence has no children.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Wraps the sequence into a shared step handle.
    pub fn into_ref(self) -> StepRef {
        Arc::new(self)
    }
}

impl std::fmt::Debug for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequence")
            .field("name", &self.name)
            .field(
                "steps",
                &self.steps.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[async_trait]
impl Step for Sequence {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), StepError> {
        for step in &self.steps {
            if ctx.is_cancelled() {
                return Err(StepError::Canceled);
            }
            step.run(ctx.clone()).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::StepFn;
    use std::sync::Mutex;

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str, fail: bool) -> StepRef {
        let log = Arc::clone(log);
        StepFn::arc(name, move |_ctx: CancellationToken| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(name);
                if fail {
                    Err(StepError::fail(name))
                } else {
                    Ok(())
                }
            }
        })
    }

    #[tokio::test]
    async fn runs_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let seq = Sequence::new("s")
            .then(recorder(&log, "a", false))
            .then(recorder(&log, "b", false))
            .then(recorder(&log, "c", false));

        seq.run(CancellationToken::new()).await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn stops_on_first_fault() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let seq = Sequence::new("s")
            .then(recorder(&log, "a", false))
            .then(recorder(&log, "b", true))
            .then(recorder(&log, "c", false));

        let err = seq.run(CancellationToken::new()).await.unwrap_err();
        assert_eq!(err, StepError::fail("b"));
        assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn cancelled_context_starts_nothing() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let seq = Sequence::new("s").then(recorder(&log, "a", false));
        let ctx = CancellationToken::new();
        ctx.cancel();

        assert_eq!(seq.run(ctx).await, Err(StepError::Canceled));
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_sequence_succeeds() {
        assert!(Sequence::new("none").run(CancellationToken::new()).await.is_ok());
    }
}
