// crates/online-ddl-core/src/runtime/cancel.rs
// ============================================================================
// Module: Cancellation
// Description: Cooperative stop signal shared by the host and its tasks.
// Purpose: Let the host stop the write loop between attempts.
// Dependencies: tokio
// ============================================================================

//! ## Overview
//! The host keeps a [`CancelHandle`] and gives each task a [`CancelSignal`].
//! Tasks check the signal at the top of each iteration and race every wait
//! against [`CancelSignal::cancelled`]. Cancellation never interrupts a
//! statement that is already in flight. Dropping every handle without
//! cancelling leaves the signal permanently un-cancelled.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tokio::sync::watch;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Host side of a cancellation pair.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    /// Sender flipped to `true` on cancel.
    sender: watch::Sender<bool>,
}

/// Task side of a cancellation pair.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    /// Receiver observing the cancel flag.
    receiver: watch::Receiver<bool>,
}

/// Creates a connected handle and signal.
#[must_use]
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (sender, receiver) = watch::channel(false);
    (
        CancelHandle {
            sender,
        },
        CancelSignal {
            receiver,
        },
    )
}

impl CancelHandle {
    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    /// Returns true once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }
}

impl CancelSignal {
    /// Returns true once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves when cancellation is requested.
    ///
    /// Never resolves if every [`CancelHandle`] is dropped first.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.receiver.borrow_and_update() {
                return;
            }
            if self.receiver.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
