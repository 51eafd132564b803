// crates/online-ddl-core/src/runtime/pacer.rs
// ============================================================================
// Module: Tokio Pacer
// Description: Timer-backed implementation of the pacer interface.
// Purpose: Provide real delays to the write loop in production.
// Dependencies: async-trait, tokio
// ============================================================================

//! ## Overview
//! [`TokioPacer`] sleeps on the tokio timer. Tests substitute pacers that
//! record requested delays instead of waiting.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;

use crate::interfaces::Pacer;

// ============================================================================
// SECTION: Pacer
// ============================================================================

/// Pacer that sleeps on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
