//! Utility functions module
//!
//! Contains helpers for clock formatting and time-limit parsing.

pub mod format;

// Re-export commonly used functions
pub use format::{format_elapsed, format_hms, parse_time_limit, progress_ratio};
