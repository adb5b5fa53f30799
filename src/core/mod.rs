//! Core annotation logic.
//!
//! This module contains:
//! - [`strategy`] - Gap-detection policies (fixed and adaptive thresholds)
//! - [`processor`] - Per-line orchestration, separator and run statistics
//!
//! # Quick Start
//!
//! ```rust
//! use tsgap::config::DeltaConfig;
//! use tsgap::core::LineProcessor;
//!
//! # fn main() -> tsgap::Result<()> {
//! let mut processor = LineProcessor::from_config(&DeltaConfig::default())?;
//! let mut out = Vec::new();
//! for line in ["10:00:00 boot", "10:00:03 ready"] {
//!     processor.write_line(line.as_bytes(), &mut out)?;
//! }
//! assert_eq!(processor.stats().separators, 1);
//! # Ok(())
//! # }
//! ```

pub mod processor;
pub mod strategy;

pub use processor::{LineProcessor, ProcessingStats, Separator};
pub use strategy::{ADAPTIVE_SMOOTHING, AdaptiveThreshold, DeltaStrategy, FixedThreshold};
