//! Circuit breaker protecting the inference backend

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Circuit breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,   // Normal operation
    Open,     // Failing, reject requests
    HalfOpen, // Testing if the backend recovered
}

#[derive(Debug)]
struct BreakerInner {
    state: BreakerState,
    failure_count: usize,
    opened_at: Option<Instant>,
}

/// Circuit breaker configuration
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: usize,
    pub reset_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout: Duration::from_secs(30),
        }
    }
}

/// Single-operation circuit breaker for the generation path
pub struct CircuitBreaker {
    inner: Mutex<BreakerInner>,
    config: CircuitBreakerConfig,
}

impl CircuitBreaker {
    /// Create a new circuit breaker
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            inner: Mutex::new(BreakerInner {
                state: BreakerState::Closed,
                failure_count: 0,
                opened_at: None,
            }),
            config,
        }
    }

    /// Check whether requests should be rejected. An open circuit
    /// transitions to half-open once the reset timeout elapses.
    pub fn is_open(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();

        match inner.state {
            BreakerState::Closed => false,
            BreakerState::Open => {
                if let Some(opened_at) = inner.opened_at {
                    if opened_at.elapsed() >= self.config.reset_timeout {
                        inner.state = BreakerState::HalfOpen;
                        return false;
                    }
                }
                true
            }
            BreakerState::HalfOpen => false,
        }
    }

    /// Mark a successful request, closing the circuit
    pub fn mark_success(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.state = BreakerState::Closed;
        inner.failure_count = 0;
        inner.opened_at = None;
    }

    /// Mark a failed request, opening the circuit once the threshold is hit
    pub fn mark_failure(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.failure_count += 1;

        if inner.failure_count >= self.config.failure_threshold {
            inner.state = BreakerState::Open;
            inner.opened_at = Some(Instant::now());
        }
    }

    /// Current state
    pub fn state(&self) -> BreakerState {
        self.inner.lock().unwrap().state
    }

    /// Failures since the last success
    pub fn failure_count(&self) -> usize {
        self.inner.lock().unwrap().failure_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_by_default() {
        let breaker = CircuitBreaker::new(CircuitBreakerConfig::default());
        assert!(!breaker.is_open());
        assert_eq!(breaker.state(), BreakerState::Closed);
    }

    #[test]
    fn test_opens_after_failures() {
        let config = CircuitBreakerConfig {
            failure_threshold: 3,
            reset_timeout: Duration::from_secs(30),
        };
        let breaker = CircuitBreaker::new(config);

        breaker.mark_failure();
        assert!(!breaker.is_open());

        breaker.mark_failure();
        assert!(!breaker.is_open());

        breaker.mark_failure();
        assert!(breaker.is_open());
        assert_eq!(breaker.state(), BreakerState::Open);
    }

    #[test]
    fn test_resets_on_success() {
        let config = CircuitBreakerConfig {
            failure_threshold: 3,
            reset_timeout: Duration::from_secs(30),
        };
        let breaker = CircuitBreaker::new(config);

        breaker.mark_failure();
        breaker.mark_failure();
        breaker.mark_success();

        assert_eq!(breaker.state(), BreakerState::Closed);
        assert_eq!(breaker.failure_count(), 0);
    }

    #[test]
    fn test_half_open_after_timeout() {
        let config = CircuitBreakerConfig {
            failure_threshold: 2,
            reset_timeout: Duration::from_millis(100),
        };
        let breaker = CircuitBreaker::new(config);

        breaker.mark_failure();
        breaker.mark_failure();
        assert!(breaker.is_open());

        std::thread::sleep(Duration::from_millis(150));

        assert!(!breaker.is_open());
        assert_eq!(breaker.state(), BreakerState::HalfOpen);

        breaker.mark_success();
        assert_eq!(breaker.state(), BreakerState::Closed);
    }
}
