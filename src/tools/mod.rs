//! The tools module provides helper functions for huff.
//!
//! The tools are:
//! - cli: Command line interface for huff.
//! - freq_count: Symbol frequency counting.
//!
pub mod cli;
pub mod freq_count;
