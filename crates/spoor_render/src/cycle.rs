//! Cycle guard for structural rendering.
//!
//! An identity stack of the objects currently being rendered structurally.
//! Identity is the object's `Arc` pointer address, never value equality, so
//! two equal but distinct objects do not trip the guard while a true
//! self-reference does. The guard belongs to one render pass and is never
//! shared across threads.

/// Identity of an object under structural rendering.
pub type ObjectId = usize;

/// Identity stack of objects currently under structural rendering.
#[derive(Debug, Default)]
pub struct CycleGuard {
    stack: Vec<ObjectId>,
}

impl CycleGuard {
    /// Creates an empty guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the object is already being rendered on this stack.
    #[must_use]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.stack.contains(&id)
    }

    /// Pushes an object for the duration of its structural rendering.
    pub fn push(&mut self, id: ObjectId) {
        self.stack.push(id);
    }

    /// Pops the most recently pushed object.
    pub fn pop(&mut self) {
        self.stack.pop();
    }

    /// Current nesting depth of structural rendering.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
