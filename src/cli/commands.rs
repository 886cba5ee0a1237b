//! Command execution for the HURDAT2 processor CLI
//!
//! Opens the input source, streams it through the parser, and writes each
//! completed storm aggregate as one JSON line on standard output.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cli::args::Args;
use crate::parser::Hurdat2Parser;
use crate::parser::stats::ParseStats;
use crate::{Error, Result};

/// Run the conversion described by the CLI arguments
///
/// Reads HURDAT2 records from the input file (or stdin when none is given)
/// and emits one JSON aggregate per completed storm, in input order.
/// Cancelling the token stops input consumption at the next line boundary.
pub async fn run(args: Args, cancellation_token: CancellationToken) -> Result<ParseStats> {
    setup_logging(&args)?;
    debug!(?args, "starting HURDAT2 conversion");

    let input = open_input(&args)?;

    // The parse is blocking I/O; run it off the async runtime so the CTRL+C
    // handler in main stays responsive while lines are being consumed
    let stats = tokio::task::spawn_blocking(move || {
        let stdout = io::stdout();
        let mut writer = BufWriter::new(stdout.lock());

        let parser = Hurdat2Parser::with_cancellation(cancellation_token);
        let stats = parser.parse(input, |aggregate| {
            let line = serde_json::to_string(aggregate)?;
            writeln!(writer, "{}", line)
                .map_err(|e| Error::io("failed to write aggregate to stdout", e))
        })?;

        // A broken pipe during the final flush is a normal early termination
        if let Err(e) = writer.flush() {
            if e.kind() != io::ErrorKind::BrokenPipe {
                return Err(Error::io("failed to flush stdout", e));
            }
        }

        Ok(stats)
    })
    .await
    .map_err(|e| Error::io("parser task failed", io::Error::other(e)))??;

    info!(
        "emitted {} storms from {} lines ({:.1}% of lines consumed)",
        stats.storms_emitted,
        stats.total_lines,
        stats.success_rate()
    );
    Ok(stats)
}

/// Open the input source named by the CLI arguments
///
/// A missing or unreadable input file is the one fatal error of the run.
fn open_input(args: &Args) -> Result<Box<dyn Read + Send>> {
    match &args.input_file {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| Error::input_unavailable(path.display().to_string(), e.to_string()))?;
            info!("reading from {}", path.display());
            Ok(Box::new(BufReader::new(file)))
        }
        None => {
            info!("reading from standard input");
            Ok(Box::new(io::stdin()))
        }
    }
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hurdat2_processor={}", log_level)));

    // Diagnostics go to stderr so the JSON stream on stdout stays clean
    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(io::stderr),
            )
            .init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_input_reports_missing_file() {
        let args = Args {
            input_file: Some("/nonexistent/hurdat2.txt".into()),
            debug: false,
            verbose: 0,
            quiet: false,
        };

        let err = match open_input(&args) {
            Ok(_) => panic!("expected open_input to fail for missing file"),
            Err(e) => e,
        };
        assert!(matches!(err, Error::InputUnavailable { .. }));
    }

    #[test]
    fn test_open_input_reads_existing_file() {
        use std::io::Write as _;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "AL011851, UNNAMED, 0,").unwrap();

        let args = Args {
            input_file: Some(file.path().to_path_buf()),
            debug: false,
            verbose: 0,
            quiet: false,
        };

        let mut contents = String::new();
        open_input(&args)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert!(contents.starts_with("AL011851"));
    }
}
