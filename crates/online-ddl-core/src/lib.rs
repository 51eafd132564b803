// crates/online-ddl-core/src/lib.rs
// ============================================================================
// Module: Online DDL Core Library
// Description: Public API surface for the online DDL write loop.
// Purpose: Expose core types, store interfaces, and runtime components.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Online DDL core provides a write loop that keeps inserting rows while an
//! independent task alters the target table's schema. The write loop survives
//! the transient conflicts the store reports during the schema change without
//! losing or duplicating rows. The core is backend-agnostic: stores plug in
//! through the [`StoreSession`] interface and report raw `(code, message)`
//! failures that an [`ErrorClassifier`] maps into abstract outcomes.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::ColumnInfo;
pub use interfaces::Dialect;
pub use interfaces::ErrorClassifier;
pub use interfaces::EventSink;
pub use interfaces::Pacer;
pub use interfaces::SqlValue;
pub use interfaces::StoreSession;
pub use runtime::AlterController;
pub use runtime::AlterError;
pub use runtime::AlterReport;
pub use runtime::AttemptStep;
pub use runtime::BackoffError;
pub use runtime::BackoffPolicy;
pub use runtime::CancelHandle;
pub use runtime::CancelSignal;
pub use runtime::DEFAULT_BASE_INTERVAL;
pub use runtime::DEFAULT_COOLDOWN;
pub use runtime::DEFAULT_MAX_ATTEMPTS;
pub use runtime::FileEventSink;
pub use runtime::MemoryEventSink;
pub use runtime::NoopEventSink;
pub use runtime::SetupError;
pub use runtime::StderrEventSink;
pub use runtime::TableSetup;
pub use runtime::TidbErrorClassifier;
pub use runtime::TokioPacer;
pub use runtime::WorkerConfig;
pub use runtime::WorkerError;
pub use runtime::WorkerExit;
pub use runtime::WriteWorker;
pub use runtime::cancel_pair;
