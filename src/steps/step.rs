//! # Step abstraction.
//!
//! Defines the [`Step`] trait (async, cancelable) and the shared handle type
//! [`StepRef`], an `Arc<dyn Step>` suitable for sharing across the runtime.
//!
//! A step receives a [`CancellationToken`] and should check it to stop
//! cooperatively when its phase deadline elapses or the application worker is
//! interrupted.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::StepError;

/// # Asynchronous, cancelable unit of work.
///
/// A `Step` has a stable [`name`](Step::name) and an async [`run`](Step::run)
/// method that receives a [`CancellationToken`].
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use funtest::{Step, StepError};
///
/// struct Ping;
///
/// #[async_trait]
/// impl Step for Ping {
///     fn name(&self) -> &str { "ping" }
///
///     async fn run(&self, ctx: CancellationToken) -> Result<(), StepError> {
///         if ctx.is_cancelled() {
///             return Err(StepError::Canceled);
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Step: Send + Sync + 'static {
    /// Returns a stable, human-readable step name.
    fn name(&self) -> &str;

    /// Executes the step until completion or cancellation.
    ///
    /// Cancellation is advisory: the runtime never aborts a step, it only
    /// cancels `ctx` and stops waiting.
    async fn run(&self, ctx: CancellationToken) -> Result<(), StepError>;
}

/// Shared handle to a step.
pub type StepRef = Arc<dyn Step>;
