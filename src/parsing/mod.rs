//! Shared parsing utilities.
//!
//! - [`timestamp`] - Timestamp patterns, pattern sets and extraction
//! - [`duration`] - Unit-suffixed threshold durations (`250ms`, `1h45m`)

pub mod duration;
pub mod timestamp;

pub use duration::parse_duration;
pub use timestamp::{DEFAULT_PATTERNS, ParsedInstant, PatternSet, TimestampPattern};
