//! Utility functions for string formatting and manipulation.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{
    escape_html, format_number, looks_like_html, parse_calendar_date, sanitize_html,
    strip_html, truncate_string,
};
