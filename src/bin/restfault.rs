//! # restfault - send one API request and report how it failed
//!
//! Issues a single request and prints either the response or the uniform
//! error it was classified as. Exits with status 1 on any failure.
//!
//! ## Usage
//!
//! ```bash
//! restfault get https://api.example.com/v4/profile
//! restfault post https://api.example.com/v4/instances Authorization:Bearer123 label=web-1
//! restfault --config api.yaml get /profile
//! RUST_LOG=debug restfault get /profile
//! ```

use clap::Parser;
use restfault::{logging::init_logging, run, AppError, Cli};

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(e) = run(Cli::parse()).await {
        // Request failures were already printed with the outcome
        if !matches!(e, AppError::Request(_)) {
            eprintln!("Error: {e}");
        }
        if let Some(suggestion) = e.suggestion() {
            eprintln!("Suggestion: {suggestion}");
        }
        std::process::exit(1);
    }
}
