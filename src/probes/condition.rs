//! # Boolean conditions.
//!
//! A [`Condition`] answers a yes/no question and may fail while doing so
//! (for instance when it is misconfigured). Conditions guard a whole run
//! and are what [`BlockFor`](crate::BlockFor) polls.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::TcpStream;

use crate::error::StepError;
use crate::signals::SignalSource;

/// Async boolean check.
#[async_trait]
pub trait Condition: Send + Sync + 'static {
    /// Evaluates the condition.
    ///
    /// `Err` means the question could not be asked at all; an unmet condition
    /// is `Ok(false)`.
    async fn eval(&self) -> Result<bool, StepError>;
}

/// Closure-backed condition.
///
/// ## Example
/// ```rust
/// use funtest::{ConditionFn, StepError};
///
/// let enabled = ConditionFn::arc(|| async { Ok::<_, StepError>(std::env::var("CI").is_ok()) });
/// # let _ = enabled;
/// ```
pub struct ConditionFn<F> {
    f: F,
}

impl<F> ConditionFn<F> {
    /// Creates a new closure-backed condition.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the condition and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Condition for ConditionFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<bool, StepError>> + Send + 'static,
{
    async fn eval(&self) -> Result<bool, StepError> {
        (self.f)().await
    }
}

/// True once a TCP connection to `address` succeeds.
///
/// Connection and resolution errors count as "not yet"; only a missing
/// address is an evaluation fault.
#[derive(Clone, Debug)]
pub struct SocketCondition {
    address: Cow<'static, str>,
}

impl SocketCondition {
    /// Creates a condition for `host:port`.
    pub fn new(address: impl Into<Cow<'static, str>>) -> Self {
        Self {
            address: address.into(),
        }
    }

    /// The probed address.
    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl Condition for SocketCondition {
    async fn eval(&self) -> Result<bool, StepError> {
        if self.address.is_empty() {
            return Err(StepError::fail("no address specified for socket condition"));
        }
        Ok(TcpStream::connect(self.address.as_ref()).await.is_ok())
    }
}

/// True once `key` is present in the signal source.
pub struct SignalCondition {
    key: String,
    source: Arc<dyn SignalSource>,
}

impl SignalCondition {
    /// Creates a condition watching `key` in `source`.
    pub fn new(key: impl Into<String>, source: Arc<dyn SignalSource>) -> Self {
        Self {
            key: key.into(),
            source,
        }
    }
}

#[async_trait]
impl Condition for SignalCondition {
    async fn eval(&self) -> Result<bool, StepError> {
        Ok(self.source.get(&self.key).is_some())
    }
}
