//! # Function-backed step (`StepFn`)
//!
//! [`StepFn`] wraps a closure `F: Fn(CancellationToken) -> Fut`, producing a
//! fresh future per run. There is no hidden mutation between runs; shared
//! state goes in an explicit `Arc<...>` captured by the closure.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use funtest::{StepFn, StepRef, StepError};
//!
//! let s: StepRef = StepFn::arc("smoke", |ctx: CancellationToken| async move {
//!     if ctx.is_cancelled() {
//!         return Err(StepError::Canceled);
//!     }
//!     Ok(())
//! });
//!
//! assert_eq!(s.name(), "smoke");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::StepError;
use crate::steps::step::Step;

/// Function-backed step implementation.
#[derive(Debug)]
pub struct StepFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> StepFn<F> {
    /// Creates a new function-backed step.
    ///
    /// Prefer [`StepFn::arc`] when you immediately need a [`StepRef`](crate::StepRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the step and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Step for StepFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), StepError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), StepError> {
        (self.f)(ctx).await
    }
}
