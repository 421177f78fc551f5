//! Large-object handles.
//!
//! BLOB/CLOB-like values are not materialized when captured; the renderer
//! pulls a bounded prefix through these traits at render time. A retrieval
//! failure is reported as an error value and rendered as its text, never
//! propagated out of the renderer.

use std::sync::Arc;

use crate::error::LobError;

/// A binary large-object handle.
pub trait BinaryLob: Send + Sync {
    /// Total length in bytes.
    fn len(&self) -> u64;

    /// Returns true if the object is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads up to `max` bytes from the start of the object.
    ///
    /// # Errors
    ///
    /// Returns [`LobError`] when the backing source cannot be read.
    fn read_prefix(&self, max: usize) -> Result<Vec<u8>, LobError>;
}

/// A text large-object handle.
pub trait TextLob: Send + Sync {
    /// Total length in characters.
    fn len(&self) -> u64;

    /// Returns true if the object is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads up to `max` characters from the start of the object.
    ///
    /// # Errors
    ///
    /// Returns [`LobError`] when the backing source cannot be read.
    fn read_prefix(&self, max: usize) -> Result<String, LobError>;
}

/// An in-memory [`BinaryLob`].
#[derive(Clone)]
pub struct MemoryBlob(Arc<[u8]>);

impl MemoryBlob {
    /// Creates a blob over the given bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }
}

impl BinaryLob for MemoryBlob {
    fn len(&self) -> u64 {
        self.0.len() as u64
    }

    fn read_prefix(&self, max: usize) -> Result<Vec<u8>, LobError> {
        Ok(self.0[..self.0.len().min(max)].to_vec())
    }
}

/// An in-memory [`TextLob`].
#[derive(Clone)]
pub struct MemoryClob(Arc<str>);

impl MemoryClob {
    /// Creates a clob over the given text.
    #[must_use]
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }
}

impl TextLob for MemoryClob {
    fn len(&self) -> u64 {
        self.0.chars().count() as u64
    }

    fn read_prefix(&self, max: usize) -> Result<String, LobError> {
        Ok(self.0.chars().take(max).collect())
    }
}

/// A [`BinaryLob`] whose reads always fail; exercises the failure path.
#[derive(Clone)]
pub struct BrokenBlob {
    message: String,
}

impl BrokenBlob {
    /// Creates a blob that fails with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl BinaryLob for BrokenBlob {
    fn len(&self) -> u64 {
        0
    }

    fn read_prefix(&self, _max: usize) -> Result<Vec<u8>, LobError> {
        Err(LobError::Unavailable(self.message.clone()))
    }
}

/// A [`TextLob`] whose reads always fail; exercises the failure path.
#[derive(Clone)]
pub struct BrokenClob {
    message: String,
}

impl BrokenClob {
    /// Creates a clob that fails with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl TextLob for BrokenClob {
    fn len(&self) -> u64 {
        0
    }

    fn read_prefix(&self, _max: usize) -> Result<String, LobError> {
        Err(LobError::Unavailable(self.message.clone()))
    }
}
