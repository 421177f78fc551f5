//! Per-thread trace state.

/// Nesting state for one traced thread.
///
/// The nest level is signed: an unbalanced `leave` drives it negative, and
/// indentation clamps at zero rather than panicking. The previous level is
/// recorded on every change so the tracer can detect a leave-then-enter
/// sequence and separate the two call groups with a blank line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThreadState {
    nest_level: i32,
    previous_nest_level: i32,
    data_nest_level: i32,
}

impl ThreadState {
    /// Creates a state at nest level zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current call-nest level; may be negative after unbalanced leaves.
    #[must_use]
    pub fn nest_level(&self) -> i32 {
        self.nest_level
    }

    /// Nest level before the most recent change.
    #[must_use]
    pub fn previous_nest_level(&self) -> i32 {
        self.previous_nest_level
    }

    /// Extra data-nest level applied during a multi-line print.
    #[must_use]
    pub fn data_nest_level(&self) -> i32 {
        self.data_nest_level
    }

    /// Records an `enter`.
    pub fn up_nest(&mut self) {
        self.previous_nest_level = self.nest_level;
        self.nest_level += 1;
    }

    /// Records a `leave`.
    pub fn down_nest(&mut self) {
        self.previous_nest_level = self.nest_level;
        self.nest_level -= 1;
    }

    /// Sets the data-nest level for the line currently being flushed.
    pub fn set_data_nest_level(&mut self, level: i32) {
        self.data_nest_level = level;
    }

    /// Nest level clamped for indentation, zero at the least and
    /// `max_indents` at the most.
    #[must_use]
    pub fn clamped_nest(&self, max_indents: usize) -> usize {
        usize::try_from(self.nest_level).unwrap_or(0).min(max_indents)
    }
}
