//! Structured JSON logger
//!
//! - One log line = one event
//! - `event` first, then `severity`, then `ts`, then fields sorted by key
//! - Synchronous, no buffering
//! - Owned by whoever needs it; there is no process-wide logger

use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
    /// Unrecoverable, caller must stop
    Fatal = 4,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Parse a configured level name (case-insensitive)
    pub fn parse(level: &str) -> Option<Self> {
        match level.to_ascii_lowercase().as_str() {
            "trace" => Some(Severity::Trace),
            "info" => Some(Severity::Info),
            "warn" => Some(Severity::Warn),
            "error" => Some(Severity::Error),
            "fatal" => Some(Severity::Fatal),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured logger writing JSON lines to an injected sink
pub struct Logger {
    min_severity: Severity,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("min_severity", &self.min_severity)
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Logger writing to `sink`, dropping events below `min_severity`
    pub fn new(sink: impl Write + Send + 'static, min_severity: Severity) -> Self {
        Self {
            min_severity,
            sink: Mutex::new(Box::new(sink)),
        }
    }

    /// Logger writing to stderr
    pub fn stderr(min_severity: Severity) -> Self {
        Self::new(io::stderr(), min_severity)
    }

    pub fn min_severity(&self) -> Severity {
        self.min_severity
    }

    pub fn enabled(&self, severity: Severity) -> bool {
        severity >= self.min_severity
    }

    /// Log an event with the given severity and fields
    pub fn log(&self, severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if !self.enabled(severity) {
            return;
        }
        let line = format_line(severity, event, fields, Utc::now());

        // A broken sink must never fail the operation being logged
        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.write_all(line.as_bytes());
            let _ = sink.flush();
        }
    }

    pub fn trace(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Trace, event, fields);
    }

    pub fn info(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Info, event, fields);
    }

    pub fn warn(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Warn, event, fields);
    }

    pub fn error(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Error, event, fields);
    }
}

/// Render one JSON log line, newline-terminated
pub(crate) fn format_line(
    severity: Severity,
    event: &str,
    fields: &[(&str, &str)],
    ts: DateTime<Utc>,
) -> String {
    let mut output = String::with_capacity(256);

    output.push_str("{\"event\":");
    push_json_str(&mut output, event);
    output.push_str(",\"severity\":\"");
    output.push_str(severity.as_str());
    output.push_str("\",\"ts\":");
    push_json_str(&mut output, &ts.to_rfc3339_opts(SecondsFormat::Millis, true));

    let mut sorted_fields: Vec<_> = fields.iter().collect();
    sorted_fields.sort_by_key(|(k, _)| *k);

    for (key, value) in sorted_fields {
        output.push(',');
        push_json_str(&mut output, key);
        output.push(':');
        push_json_str(&mut output, value);
    }

    output.push_str("}\n");
    output
}

fn push_json_str(output: &mut String, s: &str) {
    match serde_json::to_string(s) {
        Ok(encoded) => output.push_str(&encoded),
        Err(_) => output.push_str("\"\""),
    }
}

/// Write sink shared with the test that inspects it
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct CaptureBuffer(std::sync::Arc<Mutex<Vec<u8>>>);

#[cfg(test)]
impl CaptureBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

#[cfg(test)]
impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
