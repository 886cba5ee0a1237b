//! Command-line argument definitions for the HURDAT2 processor

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the HURDAT2 hurricane data processor
///
/// Converts NOAA HURDAT2 best-track data into JSON Lines: one complete,
/// self-contained JSON object per storm on standard output.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hurdat2-processor",
    version,
    about = "Convert NOAA hurricane track data to JSON",
    long_about = "Converts public NOAA HURDAT2 hurricane best-track data into JSON Lines \
                  for easier ingestion into analysis tools. Emits one complete JSON object \
                  per storm on standard output, combining the storm's header with all of \
                  its declared track observations."
)]
pub struct Args {
    /// Input file containing HURDAT2 hurricane data
    ///
    /// Reads from standard input when no file is given.
    #[arg(value_name = "INPUT_FILE")]
    pub input_file: Option<PathBuf>,

    /// Dump classified fields and intermediate records while parsing
    #[arg(long = "debug", hide = true)]
    pub debug: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress diagnostics except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl Args {
    /// Determine the appropriate log level based on verbosity flags
    ///
    /// The hidden `--debug` flag forces at least debug-level tracing.
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.debug {
            "debug"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level() {
        let mut args = Args {
            input_file: None,
            debug: false,
            verbose: 0,
            quiet: false,
        };

        assert_eq!(args.get_log_level(), "warn");

        args.verbose = 1;
        assert_eq!(args.get_log_level(), "info");

        args.verbose = 2;
        assert_eq!(args.get_log_level(), "debug");

        args.verbose = 3;
        assert_eq!(args.get_log_level(), "trace");

        args.verbose = 0;
        args.debug = true;
        assert_eq!(args.get_log_level(), "debug");

        args.quiet = true;
        assert_eq!(args.get_log_level(), "error");
    }

    #[test]
    fn test_parses_positional_input_file() {
        let args = Args::parse_from(["hurdat2-processor", "hurdat2.txt"]);
        assert_eq!(args.input_file, Some(PathBuf::from("hurdat2.txt")));
        assert!(!args.debug);

        let args = Args::parse_from(["hurdat2-processor", "--debug", "hurdat2.txt"]);
        assert!(args.debug);

        let args = Args::parse_from(["hurdat2-processor"]);
        assert!(args.input_file.is_none());
    }
}
