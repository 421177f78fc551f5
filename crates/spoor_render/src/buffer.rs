//! Output line buffer.
//!
//! Accumulates rendered fragments into logical lines and tracks the
//! data-nesting level, which is independent of call-nesting indentation.
//! Width-based wrapping happens here: a plain append that would push the
//! in-progress line past the maximum width flushes the line first, while a
//! no-break append never wraps (atomic tokens like closing brackets).
//!
//! The nest level recorded for a line is the level at the time of
//! `line_feed`, not at append time.

/// One finished logical line: data-nest level plus text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedLine {
    /// Data-nesting level at the time the line was fed.
    pub nest: usize,
    /// Line text, without indentation.
    pub text: String,
}

/// Accumulates rendered fragments into `(nest, text)` lines.
///
/// Owned exclusively by one render pass and discarded after its lines are
/// flushed to the sink.
#[derive(Debug)]
pub struct LineBuffer {
    max_width: usize,
    nest: usize,
    lines: Vec<RenderedLine>,
    current: String,
    /// Width of `current` in characters, tracked to avoid recounting.
    current_width: usize,
}

impl LineBuffer {
    /// Creates an empty buffer that wraps at `max_width` characters.
    #[must_use]
    pub fn new(max_width: usize) -> Self {
        Self {
            max_width,
            nest: 0,
            lines: Vec::new(),
            current: String::new(),
            current_width: 0,
        }
    }

    /// Current data-nesting level.
    #[must_use]
    pub fn nest(&self) -> usize {
        self.nest
    }

    /// Increments the data-nesting level.
    pub fn up_nest(&mut self) {
        self.nest += 1;
    }

    /// Decrements the data-nesting level.
    pub fn down_nest(&mut self) {
        self.nest = self.nest.saturating_sub(1);
    }

    /// Appends a fragment, wrapping to a new line first when the in-progress
    /// line would exceed the maximum width.
    pub fn append(&mut self, fragment: &str) {
        let width = fragment.chars().count();
        if self.current_width > 0 && self.current_width + width > self.max_width {
            self.line_feed();
        }
        self.current.push_str(fragment);
        self.current_width += width;
    }

    /// Appends a fragment without ever wrapping.
    pub fn no_break_append(&mut self, fragment: &str) {
        self.current.push_str(fragment);
        self.current_width += fragment.chars().count();
    }

    /// Finishes the in-progress line at the current nest level.
    pub fn line_feed(&mut self) {
        let text = std::mem::take(&mut self.current);
        self.current_width = 0;
        self.lines.push(RenderedLine {
            nest: self.nest,
            text: text.trim_end().to_string(),
        });
    }

    /// Number of finished lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if no line has been finished and nothing is in progress.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.current.is_empty()
    }

    /// Finishes any in-progress line and returns all lines.
    #[must_use]
    pub fn take_lines(mut self) -> Vec<RenderedLine> {
        if !self.current.is_empty() {
            self.line_feed();
        }
        self.lines
    }
}
