//! # Run event subscriber.
//!
//! [`Subscribe`] receives every [`Event`] a run publishes: phase progress,
//! worker lifecycle (`WorkerStarted`, `ForcedShutdown`, `WorkerLeaked`) and
//! the final verdict (`SecondaryFault`, `FailureSignalled`, `OutcomeResolved`).
//!
//! Subscribers are driven by [`SubscriberSet`](crate::SubscriberSet), off the
//! orchestrator's path: each one has its own worker and bounded queue. A full
//! queue drops the event for that subscriber and publishes
//! `SubscriberOverflow`; a panic in `on_event` is caught and published as
//! `SubscriberPanicked`.
//!
//! ## Example
//! ```rust
//! use std::sync::Mutex;
//! use async_trait::async_trait;
//! use funtest::{Event, EventKind, Subscribe};
//!
//! /// Collects faults that lost arbitration.
//! #[derive(Default)]
//! struct Secondary(Mutex<Vec<String>>);
//!
//! #[async_trait]
//! impl Subscribe for Secondary {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::SecondaryFault {
//!             if let Some(reason) = &ev.reason {
//!                 self.0.lock().unwrap().push(reason.to_string());
//!             }
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "secondary" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Receives run events.
///
/// `on_event` runs on the subscriber's own worker, one event at a time in
/// publish order. Keep it non-blocking.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event.
    async fn on_event(&self, event: &Event);

    /// Name reported in `SubscriberOverflow` and `SubscriberPanicked`.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Queue size for this subscriber, at least 1.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
