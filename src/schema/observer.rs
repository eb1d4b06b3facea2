//! Store observers
//!
//! The facade never logs on its own. It reports one `StoreEvent` per
//! operation (plus one per undecodable entry skipped by `list`) to the
//! observer it was built with. The default observer discards everything.

use std::fmt;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use super::errors::{ErrorKind, Operation, SchemaStoreError};
use crate::observability::{Logger, Severity};

/// How an observed operation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Operation completed
    Success,
    /// Operation returned an error of this kind
    Failed(ErrorKind),
    /// `list` dropped an entry it could not decode
    Skipped,
}

impl EventOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventOutcome::Success => "SUCCESS",
            EventOutcome::Failed(_) => "FAILED",
            EventOutcome::Skipped => "SKIPPED",
        }
    }
}

impl fmt::Display for EventOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One observed facade event
#[derive(Debug, Clone)]
pub struct StoreEvent {
    pub operation: Operation,

    /// Request ID from the caller's context
    pub request_id: Uuid,

    /// Record id, when the operation addressed one
    pub id: Option<String>,

    pub outcome: EventOutcome,

    /// Records returned by `list`
    pub count: Option<usize>,

    /// Error or decode failure text
    pub detail: Option<String>,
}

impl StoreEvent {
    pub fn success(operation: Operation, request_id: Uuid, id: Option<&str>) -> Self {
        Self {
            operation,
            request_id,
            id: id.map(str::to_string),
            outcome: EventOutcome::Success,
            count: None,
            detail: None,
        }
    }

    pub fn failed(request_id: Uuid, error: &SchemaStoreError) -> Self {
        Self {
            operation: error.operation(),
            request_id,
            id: error.id().map(str::to_string),
            outcome: EventOutcome::Failed(error.kind()),
            count: None,
            detail: Some(error.to_string()),
        }
    }

    pub fn skipped(request_id: Uuid, detail: impl Into<String>) -> Self {
        Self {
            operation: Operation::List,
            request_id,
            id: None,
            outcome: EventOutcome::Skipped,
            count: None,
            detail: Some(detail.into()),
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Event name, e.g. `SCHEMA_GET_FAILED`
    pub fn name(&self) -> String {
        format!(
            "SCHEMA_{}_{}",
            self.operation.as_str().to_ascii_uppercase(),
            self.outcome.as_str()
        )
    }

    pub fn severity(&self) -> Severity {
        match self.outcome {
            EventOutcome::Success => Severity::Info,
            EventOutcome::Skipped => Severity::Warn,
            EventOutcome::Failed(kind) => kind.severity(),
        }
    }
}

/// Receives facade events. Must not block for long or panic.
pub trait StoreObserver: Send + Sync {
    fn observe(&self, event: &StoreEvent);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl StoreObserver for NoopObserver {
    fn observe(&self, _event: &StoreEvent) {}
}

/// Forwards events to a structured `Logger`
#[derive(Debug)]
pub struct LoggingObserver {
    logger: Logger,
}

impl LoggingObserver {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl StoreObserver for LoggingObserver {
    fn observe(&self, event: &StoreEvent) {
        let severity = event.severity();
        if !self.logger.enabled(severity) {
            return;
        }

        let request_id = event.request_id.to_string();
        let count = event.count.map(|c| c.to_string());

        let mut fields: Vec<(&str, &str)> = vec![("request_id", request_id.as_str())];
        if let Some(ref id) = event.id {
            fields.push(("id", id.as_str()));
        }
        if let EventOutcome::Failed(kind) = event.outcome {
            fields.push(("code", kind.code()));
        }
        if let Some(ref count) = count {
            fields.push(("count", count.as_str()));
        }
        if let Some(ref detail) = event.detail {
            fields.push(("detail", detail.as_str()));
        }

        self.logger.log(severity, &event.name(), &fields);
    }
}

/// Keeps every event in memory, for tests
#[derive(Debug, Default, Clone)]
pub struct MemoryObserver {
    events: Arc<Mutex<Vec<StoreEvent>>>,
}

impl MemoryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded events
    pub fn events(&self) -> Vec<StoreEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StoreObserver for MemoryObserver {
    fn observe(&self, event: &StoreEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
