use clap::Parser;
use hurdat2_processor::Error;
use hurdat2_processor::cli::{args::Args, commands};
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Create async runtime and run the conversion with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Cancellation token lets the parser stop at the line-read boundary
        let cancellation_token = CancellationToken::new();

        let shutdown_signal = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install CTRL+C signal handler");

            // Stop consuming input; no partial aggregate is emitted
            cancellation_token.cancel();
        };

        tokio::select! {
            result = commands::run(args, cancellation_token.clone()) => result,
            _ = shutdown_signal => {
                eprintln!("\nInterrupted, shutting down");
                Err(Error::interrupted("interrupted by user"))
            }
        }
    });

    match result {
        Ok(_stats) => {
            // Success - the summary has already been reported via tracing
            process::exit(0);
        }
        Err(Error::Interrupted { .. }) => {
            // An interrupt is a normal early termination
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
