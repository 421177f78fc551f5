//! Integration tests for Layer 1: Rendering
//!
//! Tests for scalar formatting, composite bodies, and structural walks.

mod composites;
mod structural;
