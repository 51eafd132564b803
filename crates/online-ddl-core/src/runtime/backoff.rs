// crates/online-ddl-core/src/runtime/backoff.rs
// ============================================================================
// Module: Backoff Policy
// Description: Deterministic exponential backoff for schema-conflict retries.
// Purpose: Compute the wait before retry n and whether the budget is spent.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! The wait before retry `n` is `base_interval * 2^(n-1)`: with the default
//! one-second base the sequence is 1s, 2s, 4s, 8s, 16s. There is no jitter, so
//! the same attempt number always yields the same delay. Doubling saturates at
//! [`Duration::MAX`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default base interval between schema-conflict retries.
pub const DEFAULT_BASE_INTERVAL: Duration = Duration::from_secs(1);
/// Default number of consecutive schema conflicts that abandon a key.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Invalid backoff parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackoffError {
    /// The budget must allow at least one conflict.
    #[error("max attempts must be at least 1")]
    ZeroAttempts,
    /// The base interval must be positive.
    #[error("base interval must be greater than zero")]
    ZeroInterval,
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Exponential backoff policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Delay before the first retry.
    base_interval: Duration,
    /// Retries allowed per key.
    max_attempts: u32,
}

impl BackoffPolicy {
    /// Creates a policy.
    ///
    /// # Errors
    ///
    /// Returns [`BackoffError`] when `max_attempts` is zero or `base_interval`
    /// is zero.
    pub const fn new(base_interval: Duration, max_attempts: u32) -> Result<Self, BackoffError> {
        if max_attempts == 0 {
            return Err(BackoffError::ZeroAttempts);
        }
        if base_interval.is_zero() {
            return Err(BackoffError::ZeroInterval);
        }
        Ok(Self {
            base_interval,
            max_attempts,
        })
    }

    /// Returns the delay before the first retry.
    #[must_use]
    pub const fn base_interval(&self) -> Duration {
        self.base_interval
    }

    /// Returns the consecutive conflicts that abandon a key.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the wait before retry `attempt` (1-based; 0 is treated as 1).
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.max(1) - 1;
        let factor = 2_u32.checked_pow(exponent);
        factor.and_then(|factor| self.base_interval.checked_mul(factor)).unwrap_or(Duration::MAX)
    }

    /// Returns true once `attempt` consecutive conflicts have used up the budget.
    #[must_use]
    pub const fn exhausted(&self, attempt: u32) -> bool {
        attempt >= self.max_attempts
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base_interval: DEFAULT_BASE_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}
