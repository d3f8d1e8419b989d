//! # Workflow configuration.
//!
//! Provides [`Config`] centralized settings for one functional-test run, and
//! [`TimeUnit`] the multiplier applied to the numeric `timeout` and
//! `shutdown_time` values.
//!
//! ## Sentinel values
//! - `timeout = 0` → no deadline for setup, application, teardown and the
//!   per-phase contributions to the test-sequence deadline
//! - `shutdown_time = 0` → no grace wait; the worker's liveness is checked immediately

use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Unit multiplier for timeouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TimeUnit {
    /// 1 ms (default).
    #[default]
    Millisecond,
    /// 1 000 ms.
    Second,
    /// 60 000 ms.
    Minute,
    /// 3 600 000 ms.
    Hour,
    /// 86 400 000 ms.
    Day,
    /// 604 800 000 ms.
    Week,
}

impl TimeUnit {
    /// Number of milliseconds in one unit.
    pub const fn multiplier(self) -> u64 {
        match self {
            TimeUnit::Millisecond => 1,
            TimeUnit::Second => 1_000,
            TimeUnit::Minute => 60_000,
            TimeUnit::Hour => 3_600_000,
            TimeUnit::Day => 86_400_000,
            TimeUnit::Week => 604_800_000,
        }
    }

    /// Converts `value` units into a [`Duration`], saturating on overflow.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use funtest::TimeUnit;
    ///
    /// assert_eq!(TimeUnit::Minute.duration(2), Duration::from_secs(120));
    /// ```
    pub fn duration(self, value: u64) -> Duration {
        Duration::from_millis(value.saturating_mul(self.multiplier()))
    }
}

impl FromStr for TimeUnit {
    type Err = ConfigError;

    /// Parses a unit name, case-insensitively; plural forms are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let name = lower.strip_suffix('s').unwrap_or(&lower);
        match name {
            "millisecond" => Ok(TimeUnit::Millisecond),
            "second" => Ok(TimeUnit::Second),
            "minute" => Ok(TimeUnit::Minute),
            "hour" => Ok(TimeUnit::Hour),
            "day" => Ok(TimeUnit::Day),
            "week" => Ok(TimeUnit::Week),
            _ => Err(ConfigError::UnknownUnit(s.to_string())),
        }
    }
}

/// Configuration for a functional-test run.
///
/// ## Field semantics
/// - `timeout` × `timeout_unit`: deadline applied per timed phase (`0` = none)
/// - `shutdown_time` × `shutdown_unit`: grace period for the application worker
/// - `failure_property`: signal key checked after teardown
/// - `failure_message`: message of the fault synthesized from the failure signal
/// - `fail_on_teardown_errors`: whether a teardown fault may fail the run
/// - `interrupt_on_signal`: let SIGINT/SIGTERM cut the shutdown wait short
/// - `bus_capacity`: event bus ring buffer size (min 1)
#[derive(Clone, Debug)]
pub struct Config {
    /// Per-phase timeout, in `timeout_unit`s.
    pub timeout: u64,
    /// Unit of `timeout`.
    pub timeout_unit: TimeUnit,

    /// Grace period for the application worker, in `shutdown_unit`s.
    ///
    /// The worker gets this long to finish on its own, then is interrupted
    /// and gets this long once more.
    pub shutdown_time: u64,
    /// Unit of `shutdown_time`.
    pub shutdown_unit: TimeUnit,

    /// Signal key that marks out-of-band test failures.
    pub failure_property: Option<String>,
    /// Message used when the failure signal fails the run.
    pub failure_message: String,
    /// If `false`, teardown faults are only logged.
    pub fail_on_teardown_errors: bool,

    /// Let an OS termination signal end the shutdown wait early.
    pub interrupt_on_signal: bool,

    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,
}

impl Config {
    /// Returns `timeout × timeout_unit` (zero if unset).
    #[inline]
    pub fn phase_duration(&self) -> Duration {
        self.timeout_unit.duration(self.timeout)
    }

    /// Returns the per-phase deadline as an `Option`.
    ///
    /// - `None` → no deadline
    /// - `Some(d)` → setup, application and teardown are each bounded by `d`
    #[inline]
    pub fn phase_timeout(&self) -> Option<Duration> {
        let d = self.phase_duration();
        if d == Duration::ZERO { None } else { Some(d) }
    }

    /// Returns `shutdown_time × shutdown_unit`.
    #[inline]
    pub fn shutdown_grace(&self) -> Duration {
        self.shutdown_unit.duration(self.shutdown_time)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `timeout = 0` (no deadline)
    /// - `shutdown_time = 10 seconds`
    /// - `failure_property = None`, `failure_message = "Tests failed"`
    /// - `fail_on_teardown_errors = true`
    /// - `interrupt_on_signal = false`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            timeout: 0,
            timeout_unit: TimeUnit::Millisecond,
            shutdown_time: 10,
            shutdown_unit: TimeUnit::Second,
            failure_property: None,
            failure_message: "Tests failed".to_string(),
            fail_on_teardown_errors: true,
            interrupt_on_signal: false,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unit_names() {
        assert_eq!("second".parse::<TimeUnit>(), Ok(TimeUnit::Second));
        assert_eq!("Minutes".parse::<TimeUnit>(), Ok(TimeUnit::Minute));
        assert_eq!(" WEEK ".parse::<TimeUnit>(), Ok(TimeUnit::Week));
        assert_eq!(
            "fortnight".parse::<TimeUnit>(),
            Err(ConfigError::UnknownUnit("fortnight".into()))
        );
    }

    #[test]
    fn zero_timeout_means_no_deadline() {
        let cfg = Config::default();
        assert_eq!(cfg.phase_duration(), Duration::ZERO);
        assert_eq!(cfg.phase_timeout(), None);

        let cfg = Config {
            timeout: 3,
            timeout_unit: TimeUnit::Second,
            ..Config::default()
        };
        assert_eq!(cfg.phase_timeout(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn default_grace_is_ten_seconds() {
        assert_eq!(Config::default().shutdown_grace(), Duration::from_secs(10));
    }

    #[test]
    fn durations_saturate() {
        assert_eq!(
            TimeUnit::Week.duration(u64::MAX),
            Duration::from_millis(u64::MAX)
        );
    }
}
