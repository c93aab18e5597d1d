//! Cacheside - Entry Point
//!
//! Binary entry point for the `cacheside` command line. Lives in the
//! facade crate next to the library so the providers are linked once.

// Force-link cacheside-providers so linkme registrations are included
extern crate cacheside_providers;

use std::process::ExitCode;

use cacheside::cli::{Cli, error_report, run};
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(output) => {
            println!("{output:#}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{:#}", error_report(&error));
            ExitCode::FAILURE
        }
    }
}
