//! Core value model for spoor.
//!
//! This crate provides:
//! - [`Value`] - The runtime value shape consumed by the renderer
//! - [`Decimal`] - Exact-precision decimals in plain (non-scientific) notation
//! - [`Describe`] - The structural-description capability used when a value
//!   has no natural text form
//! - [`BinaryLob`] / [`TextLob`] - Large-object handles materialized lazily
//!   and bounded at render time

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod describe;
pub mod error;
pub mod lob;
pub mod value;

pub use describe::{ClassLevel, Describe, Field, FieldRead, Record};
pub use error::{DecimalError, LobError};
pub use lob::{BinaryLob, BrokenBlob, BrokenClob, MemoryBlob, MemoryClob, TextLob};
pub use value::{ArrayValue, Decimal, ElemType, MapValue, SeqValue, Value};
