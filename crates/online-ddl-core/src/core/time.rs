// crates/online-ddl-core/src/core/time.rs
// ============================================================================
// Module: Online DDL Time Model
// Description: Timestamps and clocks used by alter operations and events.
// Purpose: Keep wall-clock reads behind an injectable clock.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Runtime components never call the system clock directly; they ask a
//! [`Clock`]. Hosts use [`SystemClock`]; tests use [`LogicalClock`] so that
//! recorded timestamps are reproducible.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Timestamp recorded on alter operations and emitted events.
///
/// # Invariants
/// - Values come from a [`Clock`]; monotonicity is the clock's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Timestamp {
    /// Unix epoch milliseconds.
    UnixMillis(i64),
    /// Monotonic logical time value.
    Logical(u64),
}

impl Timestamp {
    /// Returns the timestamp as unix milliseconds when available.
    #[must_use]
    pub const fn as_unix_millis(&self) -> Option<i64> {
        match self {
            Self::UnixMillis(value) => Some(*value),
            Self::Logical(_) => None,
        }
    }

    /// Returns the timestamp as logical time when available.
    #[must_use]
    pub const fn as_logical(&self) -> Option<u64> {
        match self {
            Self::UnixMillis(_) => None,
            Self::Logical(value) => Some(*value),
        }
    }

    /// Returns the milliseconds elapsed from `earlier` to `self` when both are
    /// unix timestamps, or the logical distance when both are logical.
    #[must_use]
    pub fn millis_since(&self, earlier: &Self) -> Option<u64> {
        match (self, earlier) {
            (Self::UnixMillis(now), Self::UnixMillis(then)) => {
                u64::try_from(now.saturating_sub(*then)).ok()
            }
            (Self::Logical(now), Self::Logical(then)) => Some(now.saturating_sub(*then)),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Clocks
// ============================================================================

/// Source of timestamps for runtime components.
pub trait Clock: Send + Sync {
    /// Returns the current timestamp.
    fn now(&self) -> Timestamp;
}

/// Wall-clock source reporting unix milliseconds.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
        Timestamp::UnixMillis(i64::try_from(now.as_millis()).unwrap_or(i64::MAX))
    }
}

/// Deterministic clock that advances by one on every read.
#[derive(Debug, Default)]
pub struct LogicalClock {
    /// Next logical value to hand out.
    next: AtomicU64,
}

impl LogicalClock {
    /// Creates a logical clock starting at `start`.
    #[must_use]
    pub const fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl Clock for LogicalClock {
    fn now(&self) -> Timestamp {
        Timestamp::Logical(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
