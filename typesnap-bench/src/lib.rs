//! # typesnap Bench
//!
//! Benchmarking utilities for typesnap performance testing.

pub mod fixtures;
