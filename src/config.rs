//! Configuration types for the annotator.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`DeltaConfig`] - Everything a run needs: patterns, threshold, strategy, separator
//! - [`SeparatorConfig`] - How the separator line is built
//! - [`CustomPattern`] - A user-supplied detection pattern + parse template
//! - [`StrategyKind`] - Fixed or adaptive gap detection
//!
//! # Example
//!
//! ```rust
//! use chrono::TimeDelta;
//! use tsgap::config::{DeltaConfig, SeparatorConfig};
//!
//! # fn main() -> tsgap::Result<()> {
//! let config = DeltaConfig::new()
//!     .with_threshold(TimeDelta::milliseconds(250))
//!     .with_separator(SeparatorConfig::new("=", 40));
//!
//! assert_eq!(config.separator.build_line()?, "=".repeat(40));
//! # Ok(())
//! # }
//! ```

use std::fmt;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::{DeltaError, Result};
use crate::parsing::parse_duration;

/// Default gap threshold for the fixed strategy.
pub const DEFAULT_THRESHOLD: TimeDelta = TimeDelta::milliseconds(100);

/// Default separator unit.
pub const DEFAULT_SEPARATOR_PATTERN: &str = "-";

/// Default separator repeat count.
pub const DEFAULT_SEPARATOR_REPEAT: usize = 80;

/// Which gap-detection policy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Separate when the gap exceeds a configured duration.
    #[default]
    Fixed,

    /// Track an exponential moving average of gaps. Experimental: never
    /// separates.
    Adaptive,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Fixed => write!(f, "fixed"),
            StrategyKind::Adaptive => write!(f, "adaptive"),
        }
    }
}

/// A custom timestamp format replacing the built-in set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPattern {
    /// Regular expression locating the timestamp. The first capture group,
    /// if any, delimits the text handed to the parser.
    pub detection: String,

    /// chrono format string, e.g. `%H:%M:%S%.3f` or `%Y-%m-%d %H:%M:%S`.
    pub template: String,
}

impl CustomPattern {
    /// Pairs a detection regex with a chrono parse template.
    pub fn new(detection: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            detection: detection.into(),
            template: template.into(),
        }
    }
}

/// Separator line configuration.
///
/// The line is `pattern` repeated `repeat` times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeparatorConfig {
    /// Unit string (default: `-`)
    pub pattern: String,

    /// Number of repetitions (default: 80)
    pub repeat: usize,
}

impl Default for SeparatorConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_SEPARATOR_PATTERN.to_string(),
            repeat: DEFAULT_SEPARATOR_REPEAT,
        }
    }
}

impl SeparatorConfig {
    /// Creates a separator of `pattern` repeated `repeat` times.
    pub fn new(pattern: impl Into<String>, repeat: usize) -> Self {
        Self {
            pattern: pattern.into(),
            repeat,
        }
    }

    /// Sets the unit pattern.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Sets the repeat count.
    #[must_use]
    pub fn with_repeat(mut self, repeat: usize) -> Self {
        self.repeat = repeat;
        self
    }

    /// Renders the separator line.
    ///
    /// # Errors
    ///
    /// Returns [`DeltaError::InvalidSeparator`] if the line would not fit in
    /// memory.
    pub fn build_line(&self) -> Result<String> {
        if self.pattern.is_empty() {
            return Ok(String::new());
        }
        let too_long = || DeltaError::invalid_separator(&self.pattern, self.repeat);
        let len = self
            .pattern
            .len()
            .checked_mul(self.repeat)
            .ok_or_else(too_long)?;

        let mut line = String::new();
        line.try_reserve_exact(len).map_err(|_| too_long())?;
        for _ in 0..self.repeat {
            line.push_str(&self.pattern);
        }
        Ok(line)
    }
}

/// Run configuration.
///
/// # Example
///
/// ```rust
/// use tsgap::config::{DeltaConfig, StrategyKind};
///
/// # fn main() -> tsgap::Result<()> {
/// let config = DeltaConfig::new()
///     .with_threshold_str("1h45m")?
///     .with_custom_pattern(r"T(\d{2}:\d{2})", "%H:%M");
///
/// assert_eq!(config.strategy, StrategyKind::Fixed);
/// assert!(config.custom_pattern.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaConfig {
    /// Gap threshold for the fixed strategy (default: 100ms). May be
    /// negative, in which case every timestamp after the first separates.
    #[serde(with = "nanos")]
    pub threshold: TimeDelta,

    /// Gap-detection policy (default: fixed)
    pub strategy: StrategyKind,

    /// Replaces the built-in patterns when set (default: none)
    pub custom_pattern: Option<CustomPattern>,

    /// Separator line settings
    pub separator: SeparatorConfig,
}

impl Default for DeltaConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            strategy: StrategyKind::Fixed,
            custom_pattern: None,
            separator: SeparatorConfig::default(),
        }
    }
}

impl DeltaConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fixed-strategy threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: TimeDelta) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the threshold from a unit-suffixed string such as `250ms` or `-5s`.
    pub fn with_threshold_str(self, threshold: &str) -> Result<Self> {
        Ok(self.with_threshold(parse_duration(threshold)?))
    }

    /// Selects the gap-detection policy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Shorthand for switching between fixed and adaptive strategies.
    #[must_use]
    pub fn with_adaptive(self, adaptive: bool) -> Self {
        self.with_strategy(if adaptive {
            StrategyKind::Adaptive
        } else {
            StrategyKind::Fixed
        })
    }

    /// Replaces the built-in timestamp patterns with a single custom one.
    #[must_use]
    pub fn with_custom_pattern(
        mut self,
        detection: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.custom_pattern = Some(CustomPattern::new(detection, template));
        self
    }

    /// Sets the separator configuration.
    #[must_use]
    pub fn with_separator(mut self, separator: SeparatorConfig) -> Self {
        self.separator = separator;
        self
    }
}

/// Serializes a [`TimeDelta`] as a signed nanosecond count.
mod nanos {
    use chrono::TimeDelta;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(delta: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
        delta
            .num_nanoseconds()
            .ok_or_else(|| S::Error::custom("duration exceeds i64 nanoseconds"))?
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        i64::deserialize(deserializer).map(TimeDelta::nanoseconds)
    }
}
