//! Property-based tests for generation length and digest stability

mod digests;
mod local_generation;
