// crates/online-ddl-core/src/runtime/worker.rs
// ============================================================================
// Module: Write Worker
// Description: Continuous single-row insert loop tolerant of schema changes.
// Purpose: Keep writing rows while another session alters the table.
// Dependencies: crate::{core, interfaces, runtime}, thiserror, tokio
// ============================================================================

//! ## Overview
//! The worker inserts one row per transaction, keyed by the job's `next_key`.
//! A failed attempt is rolled back and classified:
//!
//! - schema conflicts retry the same key after an exponential backoff until
//!   the budget is spent, then the key is abandoned for good;
//! - credential and missing-schema failures stop the worker immediately;
//! - anything else waits a fixed cool-down and retries the same key without
//!   spending the conflict budget.
//!
//! ## Invariants
//! - Every key below `next_key` that was not abandoned was committed exactly
//!   once. The key only advances after a commit or an abandonment.
//! - Cancellation is observed between attempts and during waits, never inside
//!   an in-flight transaction.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::core::Clock;
use crate::core::EventRecord;
use crate::core::FailureOutcome;
use crate::core::StoreFailure;
use crate::core::SystemClock;
use crate::core::TableName;
use crate::core::TaskKind;
use crate::core::WorkerEvent;
use crate::core::WriteJobState;
use crate::interfaces::ErrorClassifier;
use crate::interfaces::EventSink;
use crate::interfaces::Pacer;
use crate::interfaces::SqlValue;
use crate::interfaces::StoreSession;
use crate::runtime::backoff::BackoffPolicy;
use crate::runtime::cancel::CancelSignal;
use crate::runtime::sql;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default wait after an unclassified failure.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(2);

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Write worker settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Table receiving rows.
    pub table: TableName,
    /// Schema-conflict retry policy.
    pub backoff: BackoffPolicy,
    /// Fixed wait after a [`FailureOutcome::FatalOther`] failure.
    pub cooldown: Duration,
    /// Consecutive cool-downs allowed for one key; `None` retries forever.
    pub max_cooldowns: Option<u32>,
    /// Time spent inside the transaction between insert and commit.
    pub txn_hold: Duration,
    /// Stop after this many committed rows; `None` runs until cancelled.
    pub max_rows: Option<u64>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            table: TableName::default(),
            backoff: BackoffPolicy::default(),
            cooldown: DEFAULT_COOLDOWN,
            max_cooldowns: None,
            txn_hold: Duration::ZERO,
            max_rows: None,
        }
    }
}

// ============================================================================
// SECTION: Results
// ============================================================================

/// Normal termination of [`WriteWorker::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// The host cancelled the worker.
    Cancelled,
    /// The configured row budget was reached.
    Completed,
}

impl WorkerExit {
    /// Returns a stable label for the exit.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

/// What a single attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStep {
    /// The row was committed and the key advanced.
    Committed {
        /// Committed key.
        key: u64,
    },
    /// A schema conflict; the same key is retried after `delay`.
    Retry {
        /// Key to retry.
        key: u64,
        /// Backoff before the retry.
        delay: Duration,
    },
    /// The retry budget ran out; the key was abandoned and the key advanced.
    Abandoned {
        /// Abandoned key.
        key: u64,
    },
    /// An unclassified failure; the same key is retried after `delay`.
    Cooldown {
        /// Key to retry.
        key: u64,
        /// Cool-down before the retry.
        delay: Duration,
    },
}

/// Write worker failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkerError {
    /// A failure that must not be retried.
    #[error("{outcome} on key {key}: {failure}")]
    Fatal {
        /// Key in flight.
        key: u64,
        /// Classified outcome.
        outcome: FailureOutcome,
        /// Raw failure.
        failure: StoreFailure,
    },
    /// Unclassified failures persisted past the cool-down limit.
    #[error("key {key} still failing after {cooldowns} cool-downs: {failure}")]
    CooldownsExhausted {
        /// Key in flight.
        key: u64,
        /// Cool-downs taken.
        cooldowns: u32,
        /// Last raw failure.
        failure: StoreFailure,
    },
}

impl WorkerError {
    /// Returns the raw failure that stopped the worker.
    #[must_use]
    pub const fn failure(&self) -> &StoreFailure {
        match self {
            Self::Fatal {
                failure, ..
            }
            | Self::CooldownsExhausted {
                failure, ..
            } => failure,
        }
    }

    /// Returns a stable label for the stop reason.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fatal {
                ..
            } => "fatal",
            Self::CooldownsExhausted {
                ..
            } => "cooldowns_exhausted",
        }
    }
}

// ============================================================================
// SECTION: Worker
// ============================================================================

/// Schema-change-tolerant insert loop bound to one store session.
pub struct WriteWorker<S, C, P> {
    /// Session owned exclusively by this worker.
    session: S,
    /// Failure classifier.
    classifier: C,
    /// Delay provider.
    pacer: P,
    /// Event destination.
    sink: Arc<dyn EventSink>,
    /// Timestamp source for events.
    clock: Arc<dyn Clock>,
    /// Worker settings.
    config: WorkerConfig,
    /// Rendered insert statement.
    insert_sql: String,
}

impl<S, C, P> WriteWorker<S, C, P>
where
    S: StoreSession,
    C: ErrorClassifier,
    P: Pacer,
{
    /// Creates a worker that owns `session`.
    #[must_use]
    pub fn new(
        session: S,
        classifier: C,
        pacer: P,
        sink: Arc<dyn EventSink>,
        config: WorkerConfig,
    ) -> Self {
        let insert_sql = sql::insert_row(&config.table);
        Self {
            session,
            classifier,
            pacer,
            sink,
            clock: Arc::new(SystemClock),
            config,
            insert_sql,
        }
    }

    /// Replaces the event clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the worker settings.
    #[must_use]
    pub const fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Returns the owned session.
    pub const fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    /// Releases the owned session.
    #[must_use]
    pub fn into_session(self) -> S {
        self.session
    }

    /// Runs attempts until cancelled, the row budget is reached, or a fatal
    /// failure occurs. Emits a `worker_stopped` event on every exit.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError`] on a failure that must not be retried.
    pub async fn run(
        &mut self,
        state: &mut WriteJobState,
        cancel: &mut CancelSignal,
    ) -> Result<WorkerExit, WorkerError> {
        let result = self.drive(state, cancel).await;
        let reason = match &result {
            Ok(exit) => exit.as_str(),
            Err(err) => err.as_str(),
        };
        self.emit(WorkerEvent::WorkerStopped {
            reason,
            next_key: state.next_key,
            committed: state.committed,
            abandoned: state.abandoned_keys.iter().copied().collect(),
        });
        result
    }

    /// Performs one attempt for `state.next_key` and updates `state`.
    ///
    /// The returned step tells the caller how long to wait before the next
    /// attempt; this method never waits outside the transaction itself.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError`] on a failure that must not be retried.
    pub async fn attempt(&mut self, state: &mut WriteJobState) -> Result<AttemptStep, WorkerError> {
        let key = state.next_key;
        let failure = match self.insert_once(key).await {
            Ok(()) => {
                state.record_commit();
                self.emit(WorkerEvent::RowCommitted {
                    key,
                });
                return Ok(AttemptStep::Committed {
                    key,
                });
            }
            Err(failure) => failure,
        };
        if let Err(rollback) = self.session.rollback().await {
            self.emit(WorkerEvent::RollbackFailed {
                key,
                code: rollback.code,
                message: rollback.message,
            });
        }

        match self.classifier.classify_failure(&failure) {
            FailureOutcome::RetryableConflict => {
                state.retry_count = state.retry_count.saturating_add(1);
                if self.config.backoff.exhausted(state.retry_count) {
                    let attempts = state.retry_count;
                    state.abandon_current();
                    self.emit(WorkerEvent::KeyAbandoned {
                        key,
                        attempts,
                    });
                    return Ok(AttemptStep::Abandoned {
                        key,
                    });
                }
                let delay = self.config.backoff.delay(state.retry_count);
                self.emit(WorkerEvent::ConflictRetry {
                    key,
                    attempt: state.retry_count,
                    delay_ms: duration_ms(delay),
                    code: failure.code,
                    message: failure.message,
                });
                Ok(AttemptStep::Retry {
                    key,
                    delay,
                })
            }
            outcome @ (FailureOutcome::FatalAuth | FailureOutcome::FatalSchema) => {
                self.emit_fatal(key, outcome, &failure);
                Err(WorkerError::Fatal {
                    key,
                    outcome,
                    failure,
                })
            }
            FailureOutcome::FatalOther => {
                state.cooldowns = state.cooldowns.saturating_add(1);
                if let Some(limit) = self.config.max_cooldowns
                    && state.cooldowns > limit
                {
                    self.emit_fatal(key, FailureOutcome::FatalOther, &failure);
                    return Err(WorkerError::CooldownsExhausted {
                        key,
                        cooldowns: limit,
                        failure,
                    });
                }
                let delay = self.config.cooldown;
                self.emit(WorkerEvent::Cooldown {
                    key,
                    cooldown_ms: duration_ms(delay),
                    cooldowns: state.cooldowns,
                    code: failure.code,
                    message: failure.message,
                });
                Ok(AttemptStep::Cooldown {
                    key,
                    delay,
                })
            }
        }
    }

    /// Loops attempts and waits.
    async fn drive(
        &mut self,
        state: &mut WriteJobState,
        cancel: &mut CancelSignal,
    ) -> Result<WorkerExit, WorkerError> {
        loop {
            if cancel.is_cancelled() {
                return Ok(WorkerExit::Cancelled);
            }
            if let Some(limit) = self.config.max_rows
                && state.committed >= limit
            {
                return Ok(WorkerExit::Completed);
            }
            let delay = match self.attempt(state).await? {
                AttemptStep::Committed {
                    ..
                }
                | AttemptStep::Abandoned {
                    ..
                } => continue,
                AttemptStep::Retry {
                    delay, ..
                }
                | AttemptStep::Cooldown {
                    delay, ..
                } => delay,
            };
            tokio::select! {
                () = self.pacer.pause(delay) => {}
                () = cancel.cancelled() => return Ok(WorkerExit::Cancelled),
            }
        }
    }

    /// Inserts `key` in its own transaction.
    async fn insert_once(&mut self, key: u64) -> Result<(), StoreFailure> {
        self.session.begin_transaction().await?;
        self.session.execute(&self.insert_sql, &[SqlValue::UInt(key)]).await?;
        if !self.config.txn_hold.is_zero() {
            self.pacer.pause(self.config.txn_hold).await;
        }
        self.session.commit().await
    }

    /// Emits a fatal event.
    fn emit_fatal(&self, key: u64, outcome: FailureOutcome, failure: &StoreFailure) {
        self.emit(WorkerEvent::Fatal {
            key: Some(key),
            outcome,
            code: failure.code,
            message: failure.message.clone(),
        });
    }

    /// Records a writer event.
    fn emit(&self, event: WorkerEvent) {
        self.sink.record(&EventRecord {
            at: self.clock.now(),
            task: TaskKind::Writer,
            event,
        });
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Converts a duration to whole milliseconds, saturating.
pub(crate) fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
