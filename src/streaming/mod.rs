//! Streaming input for constant-memory annotation.
//!
//! Input is consumed one line at a time: a line is read, processed and its
//! output written before the next one is read, so arbitrarily large files and
//! endless pipes (`tail -f app.log | tsgap`) work the same way.
//!
//! # Architecture
//!
//! - [`LineReader`]: iterator of raw byte lines; `None` is end of input,
//!   `Some(Err(_))` a read failure
//! - [`annotate`]: the read-process-write loop over any [`Read`](std::io::Read)
//! - [`run`]: opens an [`InputSource`] and annotates it
//!
//! # Example
//!
//! ```rust,no_run
//! use std::io;
//! use tsgap::config::DeltaConfig;
//! use tsgap::core::LineProcessor;
//! use tsgap::streaming::{InputSource, StreamingConfig, run};
//!
//! # fn main() -> tsgap::Result<()> {
//! let mut processor = LineProcessor::from_config(&DeltaConfig::default())?;
//! let source = InputSource::File("/var/log/app.log".into());
//! let stats = run(&source, &mut processor, &mut io::stdout().lock(), StreamingConfig::default())?;
//! eprintln!("{} separators", stats.separators);
//! # Ok(())
//! # }
//! ```

mod driver;
mod reader;

pub use driver::{InputSource, annotate, run};
pub use reader::{LineReader, StreamingConfig};
