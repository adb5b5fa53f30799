use std::io::{self, Write};

use crate::config::{DeltaConfig, SeparatorConfig};
use crate::core::strategy::DeltaStrategy;
use crate::error::Result;
use crate::parsing::PatternSet;

/// The separator line, rendered once and reused for every emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Separator(String);

impl Separator {
    /// Renders the line described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DeltaError::InvalidSeparator`](crate::DeltaError::InvalidSeparator)
    /// if the line is too long to build.
    pub fn new(config: &SeparatorConfig) -> Result<Self> {
        config.build_line().map(Self)
    }

    /// The rendered line, without a trailing newline.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The rendered line as bytes, ready for output.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Counters for a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingStats {
    /// Lines seen.
    pub lines: usize,
    /// Lines in which a timestamp was found.
    pub timestamped: usize,
    /// Separator lines emitted.
    pub separators: usize,
}

impl ProcessingStats {
    /// Share of lines carrying a timestamp, in percent.
    pub fn coverage(&self) -> f64 {
        if self.lines == 0 {
            return 0.0;
        }
        self.timestamped as f64 / self.lines as f64 * 100.0
    }
}

/// Turns one input line into its output lines.
///
/// Every input line comes out exactly once and unchanged, optionally
/// preceded by the separator.
///
/// # Example
///
/// ```rust
/// use tsgap::config::DeltaConfig;
/// use tsgap::core::LineProcessor;
///
/// # fn main() -> tsgap::Result<()> {
/// let mut processor = LineProcessor::from_config(&DeltaConfig::default())?;
///
/// let first: Vec<&[u8]> = processor.process(b"15:04:05.000000 start").collect();
/// assert_eq!(first.len(), 1);
///
/// let second: Vec<&[u8]> = processor.process(b"15:04:05.600000 slow step").collect();
/// assert_eq!(second.len(), 2);
/// assert_eq!(second[0], "-".repeat(80).as_bytes());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LineProcessor {
    patterns: PatternSet,
    strategy: DeltaStrategy,
    separator: Separator,
    stats: ProcessingStats,
}

impl LineProcessor {
    /// Assembles a processor from already-built parts.
    pub fn new(patterns: PatternSet, strategy: DeltaStrategy, separator: Separator) -> Self {
        Self {
            patterns,
            strategy,
            separator,
            stats: ProcessingStats::default(),
        }
    }

    /// Compiles patterns and sets up the strategy and separator from `config`.
    pub fn from_config(config: &DeltaConfig) -> Result<Self> {
        let patterns = PatternSet::build(config.custom_pattern.as_ref())?;
        let separator = Separator::new(&config.separator)?;
        Ok(Self::new(
            patterns,
            DeltaStrategy::from_config(config),
            separator,
        ))
    }

    /// Runs extraction and the strategy; `true` if a separator is due
    /// before `line`.
    fn observe(&mut self, line: &[u8]) -> bool {
        self.stats.lines += 1;
        let Some(instant) = self.patterns.extract(line) else {
            return false;
        };
        self.stats.timestamped += 1;

        let gap = self.strategy.decide(instant);
        if gap {
            self.stats.separators += 1;
        }
        gap
    }

    /// Yields the separator (when due) followed by `line`.
    pub fn process<'a>(&'a mut self, line: &'a [u8]) -> impl Iterator<Item = &'a [u8]> {
        let gap = self.observe(line);
        let separator = gap.then_some(self.separator.as_bytes());
        separator.into_iter().chain(std::iter::once(line))
    }

    /// Writes the output lines for `line`, each newline-terminated.
    pub fn write_line<W: Write>(&mut self, line: &[u8], out: &mut W) -> io::Result<()> {
        for part in self.process(line) {
            out.write_all(part)?;
            out.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> ProcessingStats {
        self.stats
    }

    /// The gap-detection strategy and its state.
    pub fn strategy(&self) -> &DeltaStrategy {
        &self.strategy
    }

    /// The separator emitted before each gap.
    pub fn separator(&self) -> &Separator {
        &self.separator
    }

    /// The timestamp patterns in priority order.
    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }
}
