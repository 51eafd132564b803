// crates/online-ddl-core/src/runtime/mod.rs
// ============================================================================
// Module: Online DDL Runtime
// Description: Write worker, alter controller, and their collaborators.
// Purpose: Run the schema-change-tolerant write loop against a store session.
// Dependencies: crate::{core, interfaces}, tokio
// ============================================================================

//! ## Overview
//! The runtime drives the write loop ([`WriteWorker`]) and the independent
//! schema change ([`AlterController`]). The two never talk to each other; they
//! meet only in the store, which reports conflicts that the
//! [`TidbErrorClassifier`] (or a backend's own classifier) turns into retries.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod alter;
pub mod backoff;
pub mod cancel;
pub mod classifier;
pub mod pacer;
pub mod setup;
pub mod sinks;
pub mod sql;
pub mod worker;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use alter::AlterController;
pub use alter::AlterError;
pub use alter::AlterReport;
pub use backoff::BackoffError;
pub use backoff::BackoffPolicy;
pub use backoff::DEFAULT_BASE_INTERVAL;
pub use backoff::DEFAULT_MAX_ATTEMPTS;
pub use cancel::CancelHandle;
pub use cancel::CancelSignal;
pub use cancel::cancel_pair;
pub use classifier::TidbErrorClassifier;
pub use pacer::TokioPacer;
pub use setup::SetupError;
pub use setup::TableSetup;
pub use sinks::FileEventSink;
pub use sinks::MemoryEventSink;
pub use sinks::NoopEventSink;
pub use sinks::StderrEventSink;
pub use worker::AttemptStep;
pub use worker::DEFAULT_COOLDOWN;
pub use worker::WorkerConfig;
pub use worker::WorkerError;
pub use worker::WorkerExit;
pub use worker::WriteWorker;
