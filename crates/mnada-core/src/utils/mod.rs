//! Utility functions for display formatting.

pub mod format;

pub use format::{format_datetime, format_price, truncate_string};
