//! Call tracing for spoor.
//!
//! Provides the [`Tracer`] facade: enter/leave markers with per-thread
//! nesting, rendered value printing via [`spoor_render`], visible boundaries
//! when output switches threads, and pluggable [`sink::LineSink`] output.
//! The disabled tracer costs one mutex lock per call and renders nothing.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod sink;
pub mod state;
pub mod tracer;

pub use sink::{LineSink, MemorySink, NullSink, StderrSink};
pub use state::ThreadState;
pub use tracer::Tracer;
