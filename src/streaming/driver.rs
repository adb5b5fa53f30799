//! The read-process-write loop.

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use tracing::debug;

use crate::core::{LineProcessor, ProcessingStats};
use crate::error::{DeltaError, Result};

use super::{LineReader, StreamingConfig};

/// Where input lines come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputSource {
    /// The process's standard input.
    #[default]
    Stdin,
    /// A file opened for reading.
    File(PathBuf),
}

impl InputSource {
    /// `File` for `Some(path)`, `Stdin` otherwise.
    pub fn from_path(path: Option<PathBuf>) -> Self {
        path.map_or(InputSource::Stdin, InputSource::File)
    }

    /// Opens the source for reading.
    ///
    /// # Errors
    ///
    /// Returns [`DeltaError::OpenInput`] if the file cannot be opened.
    pub fn open(&self) -> Result<Box<dyn Read>> {
        match self {
            InputSource::Stdin => Ok(Box::new(io::stdin())),
            InputSource::File(path) => File::open(path)
                .map(|file| Box::new(file) as Box<dyn Read>)
                .map_err(|e| DeltaError::open_input(path, e)),
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Stdin => write!(f, "<stdin>"),
            InputSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Feeds every line of `input` through `processor` into `out`.
///
/// Output is flushed whenever the input has no more buffered data, so a
/// live stream shows up line by line, and once more before returning,
/// whether the run ended at end of input or on a read error.
///
/// # Example
///
/// ```rust
/// use std::io::Cursor;
/// use tsgap::config::DeltaConfig;
/// use tsgap::core::LineProcessor;
/// use tsgap::streaming::{StreamingConfig, annotate};
///
/// # fn main() -> tsgap::Result<()> {
/// let input = Cursor::new("12:00:00 a\n12:00:09 b\n");
/// let mut processor = LineProcessor::from_config(&DeltaConfig::default())?;
/// let mut out = Vec::new();
///
/// let stats = annotate(input, &mut processor, &mut out, StreamingConfig::default())?;
/// assert_eq!(stats.separators, 1);
/// # Ok(())
/// # }
/// ```
pub fn annotate<R: Read, W: Write>(
    input: R,
    processor: &mut LineProcessor,
    out: &mut W,
    config: StreamingConfig,
) -> Result<ProcessingStats> {
    let mut lines = LineReader::with_config(input, config);
    let result = pump(&mut lines, processor, out);
    let flushed = out.flush();
    result?;
    flushed?;

    let stats = processor.stats();
    debug!(
        lines = stats.lines,
        timestamped = stats.timestamped,
        separators = stats.separators,
        bytes = lines.bytes_processed(),
        "input exhausted"
    );
    Ok(stats)
}

fn pump<R: Read, W: Write>(
    lines: &mut LineReader<R>,
    processor: &mut LineProcessor,
    out: &mut W,
) -> Result<()> {
    while let Some(line) = lines.next() {
        processor.write_line(&line?, out)?;
        if !lines.has_buffered_data() {
            out.flush()?;
        }
    }
    Ok(())
}

/// Opens `source` and annotates it into `out`.
///
/// The input handle is dropped, and a file closed, before this returns on
/// every path.
pub fn run<W: Write>(
    source: &InputSource,
    processor: &mut LineProcessor,
    out: &mut W,
    config: StreamingConfig,
) -> Result<ProcessingStats> {
    let input = source.open()?;
    debug!(%source, buffer_size = config.buffer_size, "reading input");
    annotate(input, processor, out, config)
}
