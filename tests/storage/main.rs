//! Integration tests for Layer 1: Storage
//!
//! Tests for the composite-key map, mixed level layouts, and weak collection.

mod collection;
mod mixed;
