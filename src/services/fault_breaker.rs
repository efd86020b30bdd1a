//! Per-worker fault breaker.
//!
//! A finite-state guard that throttles a worker after repeated consecutive
//! failures and re-enables it after a cool-down. Each worker owns exactly
//! one breaker; the struct is never shared across workers, so it needs no
//! interior locking.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Configuration for a fault breaker instance.
#[derive(Debug, Clone)]
pub struct FaultBreakerConfig {
    /// Consecutive failures before the breaker opens.
    pub failure_threshold: u32,
    /// How long the breaker stays open before probing is allowed.
    pub cool_down: Duration,
}

impl Default for FaultBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            cool_down: Duration::minutes(5),
        }
    }
}

/// State of a fault breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakerState {
    /// Healthy, execution allowed.
    Closed,
    /// Too many recent failures, execution blocked until cool-down.
    Open,
    /// Cool-down elapsed, probing allowed pending a definitive record.
    HalfOpen,
}

impl BreakerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        }
    }
}

/// Read-only diagnostic view of a breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerSnapshot {
    pub state: BreakerState,
    pub failure_count: u32,
    pub failure_threshold: u32,
}

/// Per-worker guard over step execution.
///
/// While half-open, every `can_execute` call returns true: probing is not
/// limited to a single trial. The breaker leaves half-open only through an
/// explicit `record_success` or `record_failure`, never on its own.
#[derive(Debug, Clone)]
pub struct FaultBreaker {
    config: FaultBreakerConfig,
    state: BreakerState,
    failure_count: u32,
    last_failure_at: Option<DateTime<Utc>>,
}

impl FaultBreaker {
    /// Create a closed breaker with the given configuration.
    pub fn new(config: FaultBreakerConfig) -> Self {
        Self {
            config,
            state: BreakerState::Closed,
            failure_count: 0,
            last_failure_at: None,
        }
    }

    /// Create a breaker with default thresholds.
    pub fn with_defaults() -> Self {
        Self::new(FaultBreakerConfig::default())
    }

    /// Record a successful execution: reset the failure count and close.
    pub fn record_success(&mut self) {
        self.failure_count = 0;
        self.last_failure_at = None;
        self.state = BreakerState::Closed;
    }

    /// Record a failed execution; opens the breaker once the consecutive
    /// failure count reaches the threshold.
    pub fn record_failure(&mut self) {
        self.failure_count += 1;
        self.last_failure_at = Some(Utc::now());
        if self.failure_count >= self.config.failure_threshold {
            self.state = BreakerState::Open;
        }
    }

    /// Check whether execution may currently be attempted.
    ///
    /// When open and the cool-down since the last failure has elapsed, the
    /// check itself transitions the breaker to half-open and returns true.
    pub fn can_execute(&mut self) -> bool {
        match self.state {
            BreakerState::Closed | BreakerState::HalfOpen => true,
            BreakerState::Open => {
                let cooled = self
                    .last_failure_at
                    .is_none_or(|at| Utc::now() - at >= self.config.cool_down);
                if cooled {
                    self.state = BreakerState::HalfOpen;
                }
                cooled
            }
        }
    }

    /// Whether the breaker is currently open.
    pub fn is_open(&self) -> bool {
        self.state == BreakerState::Open
    }

    /// Diagnostic snapshot of the breaker.
    pub fn snapshot(&self) -> BreakerSnapshot {
        BreakerSnapshot {
            state: self.state,
            failure_count: self.failure_count,
            failure_threshold: self.config.failure_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker(threshold: u32, cool_down: Duration) -> FaultBreaker {
        FaultBreaker::new(FaultBreakerConfig {
            failure_threshold: threshold,
            cool_down,
        })
    }

    #[test]
    fn test_starts_closed() {
        let mut b = FaultBreaker::with_defaults();
        assert!(!b.is_open());
        assert!(b.can_execute());
        assert_eq!(b.snapshot().state, BreakerState::Closed);
    }

    #[test]
    fn test_opens_at_threshold() {
        let mut b = breaker(3, Duration::minutes(5));

        b.record_failure();
        b.record_failure();
        assert!(!b.is_open());
        assert!(b.can_execute());

        b.record_failure();
        assert!(b.is_open());
        assert!(!b.can_execute());
        assert_eq!(b.snapshot().failure_count, 3);
    }

    #[test]
    fn test_cool_down_transitions_to_half_open() {
        let mut b = breaker(1, Duration::milliseconds(100));

        b.record_failure();
        assert!(b.is_open());
        assert!(!b.can_execute());

        std::thread::sleep(std::time::Duration::from_millis(150));

        // The check itself performs the transition.
        assert!(b.can_execute());
        assert_eq!(b.snapshot().state, BreakerState::HalfOpen);
        assert!(!b.is_open());
    }

    #[test]
    fn test_half_open_is_unbounded() {
        // Deliberate property: half-open does not gate to a single probe.
        let mut b = breaker(1, Duration::milliseconds(50));
        b.record_failure();
        std::thread::sleep(std::time::Duration::from_millis(80));

        for _ in 0..10 {
            assert!(b.can_execute());
        }
        assert_eq!(b.snapshot().state, BreakerState::HalfOpen);
    }

    #[test]
    fn test_success_resets_after_any_failures() {
        let mut b = breaker(3, Duration::minutes(5));
        for _ in 0..7 {
            b.record_failure();
        }
        assert!(b.is_open());

        b.record_success();
        assert_eq!(b.snapshot().state, BreakerState::Closed);
        assert_eq!(b.snapshot().failure_count, 0);
        assert!(b.can_execute());
    }

    #[test]
    fn test_half_open_failure_reopens() {
        let mut b = breaker(2, Duration::milliseconds(50));
        b.record_failure();
        b.record_failure();
        std::thread::sleep(std::time::Duration::from_millis(80));
        assert!(b.can_execute());
        assert_eq!(b.snapshot().state, BreakerState::HalfOpen);

        // The probe failed; the count is already at threshold so the
        // breaker reopens immediately.
        b.record_failure();
        assert!(b.is_open());
        assert!(!b.can_execute());
    }

    #[test]
    fn test_half_open_leaves_only_via_record() {
        let mut b = breaker(1, Duration::milliseconds(50));
        b.record_failure();
        std::thread::sleep(std::time::Duration::from_millis(80));
        assert!(b.can_execute());

        std::thread::sleep(std::time::Duration::from_millis(80));
        assert_eq!(b.snapshot().state, BreakerState::HalfOpen);

        b.record_success();
        assert_eq!(b.snapshot().state, BreakerState::Closed);
    }
}
