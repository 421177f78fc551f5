//! Integration tests for Layer 2: Tracing
//!
//! Tests for the tracer facade and its cross-thread behavior.

mod facade;
