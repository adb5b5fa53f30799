//! Command-line interface definition using clap.
//!
//! This module defines [`Args`], the CLI argument structure, and its
//! conversion into a library [`DeltaConfig`].

use std::path::PathBuf;

use clap::Parser;

use crate::config::{DEFAULT_SEPARATOR_PATTERN, DeltaConfig, SeparatorConfig};
use crate::error::{DeltaError, Result};
use crate::streaming::InputSource;

/// Highlight timestamp gaps.
///
/// Reads lines from stdin (or a file), finds timestamps and computes the
/// delta between subsequent ones. Whenever the delta exceeds the limit, a
/// separator line is inserted before the later line.
#[derive(Parser, Debug, Clone)]
#[command(name = "tsgap")]
#[command(version, about, long_about)]
#[command(after_help = "EXAMPLES:
    tail -f /var/log/messages | tsgap
    tsgap -f app.log -d 250ms
    tsgap -f app.log -d 1h45m -p '=' -r 40
    tsgap -c 'T(\\d{2}:\\d{2}:\\d{2})' -e '%H:%M:%S' < trace.log

Logging goes to stderr; set RUST_LOG or pass -v to see it.")]
pub struct Args {
    /// Read from this file instead of stdin
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Custom timestamp regex replacing the built-in formats (requires -e)
    #[arg(short = 'c', long = "custom", value_name = "REGEX", requires = "example")]
    pub custom: Option<String>,

    /// chrono format for the custom timestamp, e.g. '%H:%M:%S%.3f' (requires -c)
    #[arg(short = 'e', long = "example", value_name = "FORMAT", requires = "custom")]
    pub example: Option<String>,

    /// Gap limit with unit suffix, e.g. 250ms, 1h45m, -5s (units: ns, us, ms, s, m, h)
    #[arg(
        short = 'd',
        long = "duration",
        value_name = "DURATION",
        default_value = "100ms",
        allow_hyphen_values = true
    )]
    pub duration: String,

    /// Separator pattern
    #[arg(short = 'p', long = "pattern", default_value = DEFAULT_SEPARATOR_PATTERN)]
    pub pattern: String,

    /// How often the separator pattern is repeated
    #[arg(short = 'r', long = "repeat", value_name = "N", default_value_t = 80)]
    pub repeat: usize,

    /// Experimental adaptive threshold (tracks a moving average, never separates)
    #[arg(short = 'a', long = "adaptive")]
    pub adaptive: bool,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Where to read lines from.
    pub fn input_source(&self) -> InputSource {
        InputSource::from_path(self.file.clone())
    }

    /// Default log filter directive for the verbosity level.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl TryFrom<&Args> for DeltaConfig {
    type Error = DeltaError;

    fn try_from(args: &Args) -> Result<Self> {
        let mut config = DeltaConfig::new()
            .with_threshold_str(&args.duration)?
            .with_adaptive(args.adaptive)
            .with_separator(SeparatorConfig::new(args.pattern.clone(), args.repeat));

        if let (Some(detection), Some(template)) = (&args.custom, &args.example) {
            config = config.with_custom_pattern(detection.clone(), template.clone());
        }
        Ok(config)
    }
}
