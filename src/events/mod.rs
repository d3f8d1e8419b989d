//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted while a workflow runs.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Funtest::execute`, the condition gate, `core::group`,
//!   the application worker, the shutdown coordinator, `SubscriberSet`
//!   workers (overflow/panic).
//! - **Consumers**: the subscriber listener (fans out to `SubscriberSet`)
//!   and any receiver obtained from [`Bus::subscribe`].

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
