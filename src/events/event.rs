//! # Runtime events emitted by the orchestrator.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Definition events**: workflow assembly (phase overridden)
//! - **Phase events**: phase execution flow (starting, completed, failed, timeout)
//! - **Worker events**: application worker lifecycle (started, finished, forced shutdown, leaked)
//! - **Outcome events**: fault arbitration (skip, secondary faults, failure signal, final outcome)
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the
//! phase, a human-readable reason and deadlines.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use funtest::{Event, EventKind, Phase};
//!
//! let ev = Event::new(EventKind::TimeoutHit)
//!     .with_phase(Phase::Tests)
//!     .with_timeout(Duration::from_secs(5));
//!
//! assert_eq!(ev.kind, EventKind::TimeoutHit);
//! assert_eq!(ev.phase, Some(Phase::Tests));
//! assert_eq!(ev.timeout_ms, Some(5_000));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::core::Phase;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `reason`: subscriber name and panic info
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `reason`: subscriber name and drop reason
    SubscriberOverflow,

    // === Definition events ===
    /// A phase was assigned twice; the later definition replaces the earlier one.
    ///
    /// Sets:
    /// - `phase`: the overridden phase (absent for the condition)
    /// - `reason`: element name, e.g. `"<tests>"`
    DefinitionOverridden,

    // === Gate ===
    /// Guard condition evaluated to false; the run is skipped.
    ConditionSkipped,

    // === Phase lifecycle events ===
    /// A phase is starting.
    ///
    /// Sets:
    /// - `phase`: phase
    /// - `timeout_ms`: phase deadline, if bounded
    PhaseStarting,

    /// A phase finished without fault.
    ///
    /// Sets:
    /// - `phase`: phase
    PhaseCompleted,

    /// A phase finished with a fault (including timeouts).
    ///
    /// Sets:
    /// - `phase`: phase
    /// - `reason`: fault message
    PhaseFailed,

    /// A phase exceeded its deadline (always followed by `PhaseFailed`).
    ///
    /// Sets:
    /// - `phase`: phase
    /// - `timeout_ms`: deadline (ms)
    TimeoutHit,

    // === Application worker events ===
    /// Application worker started.
    WorkerStarted,

    /// Application worker finished (with or without fault).
    ///
    /// Sets:
    /// - `reason`: fault message, if the application failed
    WorkerFinished,

    /// Worker still alive after the first grace wait; it is being interrupted.
    ///
    /// Sets:
    /// - `timeout_ms`: grace period (ms)
    ForcedShutdown,

    /// A termination signal cut the shutdown wait short.
    ShutdownInterrupted,

    /// Worker still alive after the interrupt and second wait; left running.
    WorkerLeaked,

    // === Outcome events ===
    /// A fault that was not surfaced (superseded or suppressed).
    ///
    /// Sets:
    /// - `phase`: phase of the fault
    /// - `reason`: fault message
    SecondaryFault,

    /// The failure signal was found set after teardown.
    ///
    /// Sets:
    /// - `reason`: failure message
    FailureSignalled,

    /// The run resolved its outcome.
    ///
    /// Sets:
    /// - `reason`: surfaced fault message (absent on success)
    OutcomeResolved,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Phase the event refers to, if applicable.
    pub phase: Option<Phase>,
    /// Deadline or grace period in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Human-readable reason (fault messages, override details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            phase: None,
            timeout_ms: None,
            reason: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a phase.
    #[inline]
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Attaches a deadline (stored as milliseconds, saturating).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} info={info}"))
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }
}
