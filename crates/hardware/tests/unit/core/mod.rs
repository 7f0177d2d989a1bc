//! Tests for the hierarchy building blocks.
