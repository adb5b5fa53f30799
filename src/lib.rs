//! # tsgap
//!
//! Highlight timestamp gaps in log streams.
//!
//! ## Overview
//!
//! tsgap reads text lines, finds a timestamp in each one and measures the time
//! between consecutive timestamps. When a gap exceeds the threshold, a
//! separator line is inserted before the later line. Every input line is
//! passed through unchanged and in order.
//!
//! ```text
//! 15:04:05.000000 start
//! --------------------------------------------------------------------------------
//! 15:04:05.600000 slow step
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::io::Cursor;
//! use tsgap::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = DeltaConfig::new().with_threshold_str("250ms")?;
//!     let mut processor = LineProcessor::from_config(&config)?;
//!
//!     let input = Cursor::new("10:00:00.000 request\n10:00:00.900 response\n");
//!     let mut out = Vec::new();
//!     let stats = annotate(input, &mut processor, &mut out, StreamingConfig::default())?;
//!
//!     assert_eq!(stats.separators, 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Timestamp Formats
//!
//! Without configuration these are tried in order; the first one that both
//! matches and parses wins:
//!
//! | Format | Example |
//! |--------|---------|
//! | `HH:MM:SS.ffffff` | `15:04:05.000000` |
//! | `HH:MM:SS.fff` | `15:04:05.000` |
//! | `HH:MM:SS` | `15:04:05` |
//! | `HH:MM` | `15:04` |
//!
//! A custom pattern ([`config::DeltaConfig::with_custom_pattern`]) replaces
//! the whole list.
//!
//! ## Module Structure
//!
//! - [`parsing`]: Timestamp patterns and duration parsing
//!   - [`PatternSet`](parsing::PatternSet), [`TimestampPattern`](parsing::TimestampPattern)
//!   - [`parse_duration`](parsing::parse_duration)
//! - [`core`]: Gap detection and per-line processing
//!   - [`DeltaStrategy`](core::DeltaStrategy): fixed or adaptive threshold
//!   - [`LineProcessor`](core::LineProcessor), [`ProcessingStats`](core::ProcessingStats)
//! - [`streaming`]: Line reader and the read-process-write loop
//! - [`config`]: [`DeltaConfig`](config::DeltaConfig) and friends
//! - `cli`: CLI argument types (feature `cli`)
//! - [`error`]: Unified error types ([`DeltaError`], [`Result`])
//! - [`prelude`]: Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod parsing;
pub mod streaming;

// Re-export the main types at the crate root for convenience
pub use error::{DeltaError, Result};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use tsgap::prelude::*;
/// ```
pub mod prelude {
    // Error types
    pub use crate::error::{DeltaError, Result};

    // Configuration
    pub use crate::config::{CustomPattern, DeltaConfig, SeparatorConfig, StrategyKind};

    // Timestamp extraction
    pub use crate::parsing::{ParsedInstant, PatternSet, TimestampPattern, parse_duration};

    // Processing
    pub use crate::core::{DeltaStrategy, LineProcessor, ProcessingStats, Separator};

    // Streaming
    pub use crate::streaming::{InputSource, LineReader, StreamingConfig, annotate, run};
}
