//! Error types for the foundation layer.
//!
//! Uses `thiserror` for ergonomic error definition.

use thiserror::Error;

/// A malformed decimal literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecimalError {
    /// The literal had no digits, stray characters, or a bad exponent.
    #[error("malformed decimal literal: {0:?}")]
    Malformed(String),
}

/// A large-object retrieval failure.
///
/// Rendered as its text representation in place of the object's contents;
/// never propagated past the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LobError {
    /// The backing source could not be reached at all.
    #[error("lob source unavailable: {0}")]
    Unavailable(String),

    /// The read started but failed partway through.
    #[error("lob read failed at offset {offset}: {message}")]
    Read {
        /// Offset at which the read failed.
        offset: u64,
        /// Description of the failure.
        message: String,
    },
}
