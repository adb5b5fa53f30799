//! # tsgap CLI
//!
//! Command-line interface for the tsgap library.

use std::io::{self, BufWriter, ErrorKind};
use std::process;

use clap::Parser as ClapParser;
use clap::error::ErrorKind as ClapErrorKind;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tsgap::DeltaError;
use tsgap::cli::Args;
use tsgap::config::DeltaConfig;
use tsgap::core::{LineProcessor, ProcessingStats};
use tsgap::streaming::{self, StreamingConfig};

fn main() {
    let args = match <Args as ClapParser>::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Help and usage errors both exit 2; only --version is a success.
            let code = if e.kind() == ClapErrorKind::DisplayVersion { 0 } else { 2 };
            let _ = e.print();
            process::exit(code);
        }
    };

    init_logging(args.log_level());

    match run(&args) {
        Ok(_) => {}
        // Downstream closed the pipe (`tsgap | head`): nothing left to do.
        Err(DeltaError::Io(e)) if e.kind() == ErrorKind::BrokenPipe => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Logs go to stderr so they never mix with the annotated stream.
fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<ProcessingStats, DeltaError> {
    let config = DeltaConfig::try_from(args)?;
    let mut processor = LineProcessor::from_config(&config)?;
    let source = args.input_source();

    info!(
        %source,
        threshold = ?config.threshold,
        strategy = %config.strategy,
        patterns = processor.patterns().len(),
        "annotating"
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let stats = streaming::run(&source, &mut processor, &mut out, StreamingConfig::default())?;

    info!(
        lines = stats.lines,
        separators = stats.separators,
        coverage = %format_args!("{:.1}%", stats.coverage()),
        "done"
    );
    Ok(stats)
}
