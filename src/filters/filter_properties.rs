//! Property-based tests for container item filtering.
