// crates/online-ddl-core/src/core/mod.rs
// ============================================================================
// Module: Online DDL Core Types
// Description: Data model shared by the write loop and the alter controller.
// Purpose: Group identifiers, job state, failure outcomes, events, and time.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Core types are plain data: they carry no connections and perform no I/O.
//! Runtime components own and mutate them; hosts inspect them after a task
//! finishes.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod events;
pub mod identifiers;
pub mod outcome;
pub mod state;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use events::EventRecord;
pub use events::TaskKind;
pub use events::WorkerEvent;
pub use identifiers::ColumnSpec;
pub use identifiers::DEFAULT_COLUMN_DEFINITION;
pub use identifiers::DEFAULT_COLUMN_NAME;
pub use identifiers::DEFAULT_TABLE_NAME;
pub use identifiers::IdentifierError;
pub use identifiers::MAX_IDENTIFIER_LENGTH;
pub use identifiers::TableName;
pub use identifiers::quote_identifier;
pub use outcome::FailureOutcome;
pub use outcome::StoreFailure;
pub use state::AlterOperation;
pub use state::WriteJobState;
pub use time::Clock;
pub use time::LogicalClock;
pub use time::SystemClock;
pub use time::Timestamp;
