//! Output sinks for trace lines.
//!
//! The tracer hands each finished line to a [`LineSink`]; sinks decide where
//! it goes. Production traces go to stderr, tests capture into memory, and
//! a disabled tracer drops everything through [`NullSink`].

use std::io::Write;
use std::sync::{Arc, Mutex};

/// Destination for finished trace lines.
///
/// Implementations must be cheap to call per line; the tracer holds its
/// shared lock while writing.
pub trait LineSink: Send {
    /// Whether the sink accepts output at all.
    ///
    /// A disabled sink short-circuits the tracer before any rendering work
    /// happens.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Writes one finished line, without a trailing newline.
    fn write_line(&self, line: &str);
}

/// Writes trace lines to standard error.
///
/// Write failures are ignored; tracing output must never take down the
/// program being traced.
#[derive(Debug, Default)]
pub struct StderrSink;

impl StderrSink {
    /// Creates a stderr sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl LineSink for StderrSink {
    fn write_line(&self, line: &str) {
        let _ = writeln!(std::io::stderr(), "{line}");
    }
}

/// Captures trace lines in memory, for tests and assertions.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    /// Creates an empty memory sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to the captured lines, usable after the sink has
    /// been moved into a tracer.
    #[must_use]
    pub fn handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.lines)
    }
}

impl LineSink for MemorySink {
    fn write_line(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}

/// Discards everything; reports itself disabled so the tracer skips
/// rendering entirely.
#[derive(Debug, Default)]
pub struct NullSink;

impl NullSink {
    /// Creates a null sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl LineSink for NullSink {
    fn is_enabled(&self) -> bool {
        false
    }

    fn write_line(&self, _line: &str) {}
}
