//! Spoor - Readable value rendering and call tracing
//!
//! This crate re-exports all layers of the spoor system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: spoor_trace      — Tracer facade, per-thread nesting, sinks
//! Layer 1: spoor_render     — Recursive renderer, line buffer, settings
//! Layer 0: spoor_foundation — Core types (Value, Describe, lobs)
//! ```

pub use spoor_foundation as foundation;
pub use spoor_render as render;
pub use spoor_trace as trace;
