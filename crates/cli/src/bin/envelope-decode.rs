//! `envelope-decode` entry point.
//!
//! Startup sequence:
//! 1. Load and validate configuration from `ENVELOPE_*` environment variables.
//! 2. Initialise logging to stderr.
//! 3. Read the input from stdin, decode it, print the report to stdout.

use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use envelope_cli::{config, decode, exit_code, telemetry};

fn main() -> ExitCode {
    let args = decode::DecodeArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(args: &decode::DecodeArgs) -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = config::Config::from_env().context("configuration invalid")?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level, cfg.log_format)?;

    // -----------------------------------------------------------------------
    // 3. Decode
    // -----------------------------------------------------------------------
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read input from stdin")?;

    decode::run(args, &input, &mut io::stdout().lock())
}
