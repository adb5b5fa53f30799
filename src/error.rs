//! Unified error types for tsgap.
//!
//! Everything fallible in the crate returns [`DeltaError`]. Per-line timestamp
//! parse failures are not errors: the extractor recovers from them locally and
//! never surfaces them here.
//!
//! # Error Kinds
//!
//! - **Configuration**: bad threshold, bad custom pattern, oversized separator,
//!   unopenable input
//! - **I/O**: read or write failure in the middle of a run

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for tsgap operations.
///
/// # Example
///
/// ```rust
/// use tsgap::error::Result;
/// use tsgap::parsing::parse_duration;
///
/// fn threshold() -> Result<chrono::TimeDelta> {
///     parse_duration("250ms")
/// }
/// # assert!(threshold().is_ok());
/// ```
pub type Result<T> = std::result::Result<T, DeltaError>;

/// The error type for all tsgap operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeltaError {
    /// An I/O error occurred while reading input or writing output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The input file could not be opened.
    #[error("Cannot open '{}': {source}", path.display())]
    OpenInput {
        /// The path that was requested
        path: PathBuf,
        /// The underlying open error
        #[source]
        source: io::Error,
    },

    /// The threshold duration string could not be parsed.
    #[error("Invalid duration '{input}': {reason}")]
    InvalidDuration {
        /// The rejected duration string
        input: String,
        /// What is wrong with it
        reason: &'static str,
    },

    /// A detection pattern failed to compile.
    #[error("Invalid timestamp pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The regular expression source
        pattern: String,
        /// The underlying regex error
        #[source]
        source: regex::Error,
    },

    /// The separator line is too long to build.
    #[error("Invalid separator: '{pattern}' repeated {repeat} times is too long")]
    InvalidSeparator {
        /// The separator unit
        pattern: String,
        /// The requested repeat count
        repeat: usize,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl DeltaError {
    /// Creates an open-input error for `path`.
    pub fn open_input(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DeltaError::OpenInput {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid duration error.
    pub fn invalid_duration(input: impl Into<String>, reason: &'static str) -> Self {
        DeltaError::InvalidDuration {
            input: input.into(),
            reason,
        }
    }

    /// Creates an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        DeltaError::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Creates an invalid separator error.
    pub fn invalid_separator(pattern: impl Into<String>, repeat: usize) -> Self {
        DeltaError::InvalidSeparator {
            pattern: pattern.into(),
            repeat,
        }
    }

    /// Returns `true` if this is an I/O error raised mid-stream.
    pub fn is_io(&self) -> bool {
        matches!(self, DeltaError::Io(_))
    }

    /// Returns `true` if the error stems from bad configuration rather than
    /// from the data stream.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            DeltaError::OpenInput { .. }
                | DeltaError::InvalidDuration { .. }
                | DeltaError::InvalidPattern { .. }
                | DeltaError::InvalidSeparator { .. }
        )
    }
}
