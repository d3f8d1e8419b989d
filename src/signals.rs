//! # Out-of-band failure signals.
//!
//! Test steps often record failures without raising them (a report writer
//! that notes "3 tests failed" and carries on). Such steps set a key in a
//! [`SignalSource`]; after teardown the orchestrator checks the configured
//! failure key and fails the run if it is present.
//!
//! [`SignalStore`] is the in-memory implementation: cheap to clone, shared
//! between the steps that write it and the orchestrator that reads it.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Read-only view of externally set signals.
pub trait SignalSource: Send + Sync + 'static {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;
}

/// Thread-safe in-memory signal table.
///
/// ## Example
/// ```rust
/// use funtest::{SignalSource, SignalStore};
///
/// let signals = SignalStore::new();
/// let writer = signals.clone();
/// writer.set("tests.failed", "true");
///
/// assert_eq!(signals.get("tests.failed").as_deref(), Some("true"));
/// assert!(signals.get("other").is_none());
/// ```
#[derive(Clone, Default, Debug)]
pub struct SignalStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl SignalStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut map = self.inner.write().unwrap_or_else(|p| p.into_inner());
        map.insert(key.into(), value.into());
    }

    /// Removes `key`, returning its previous value.
    pub fn unset(&self, key: &str) -> Option<String> {
        let mut map = self.inner.write().unwrap_or_else(|p| p.into_inner());
        map.remove(key)
    }
}

impl SignalSource for SignalStore {
    fn get(&self, key: &str) -> Option<String> {
        let map = self.inner.read().unwrap_or_else(|p| p.into_inner());
        map.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let a = SignalStore::new();
        let b = a.clone();
        b.set("k", "v");
        assert_eq!(a.get("k").as_deref(), Some("v"));

        assert_eq!(a.unset("k").as_deref(), Some("v"));
        assert!(b.get("k").is_none());
    }
}
