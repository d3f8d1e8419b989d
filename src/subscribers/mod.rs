//! # Event subscribers for the funtest runtime.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and the built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Funtest ── publish(Event) ──► Bus ──► listener ──► SubscriberSet::emit(&Event)
//!                                                         │
//!                                               ┌─────────┼─────────┐
//!                                               ▼         ▼         ▼
//!                                           LogWriter  Metrics   Custom
//! ```

mod set;
mod subscriber;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscriber::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
