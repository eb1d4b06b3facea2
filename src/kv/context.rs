//! Operation Context
//!
//! Call context threaded from the caller through the facade into the backend.
//! Carries a request id for correlation, an optional deadline and a
//! cancellation flag. Backends consult it; nothing above them enforces it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use uuid::Uuid;

use super::errors::{KvError, KvResult};

/// Context carried through every key-value call
#[derive(Debug, Clone)]
pub struct OpContext {
    /// Request ID for correlating observer events
    pub request_id: Uuid,

    /// Point in time after which backends must refuse work
    deadline: Option<Instant>,

    /// Shared with every clone and every `CancelHandle`
    cancelled: Arc<AtomicBool>,
}

impl OpContext {
    /// Context with no deadline that is never cancelled unless asked to be
    pub fn background() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            deadline: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Context that expires `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().with_deadline(Instant::now() + timeout)
    }

    /// Set an absolute deadline
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Override the request id
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Handle that cancels this context and all of its clones
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fail if the context was cancelled or its deadline has passed
    pub fn check(&self) -> KvResult<()> {
        if self.is_cancelled() {
            return Err(KvError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(KvError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

impl Default for OpContext {
    fn default() -> Self {
        Self::background()
    }
}

/// Cancels the `OpContext` it was taken from
#[derive(Debug, Clone)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}
