//! `envelope-encode` entry point.
//!
//! Startup sequence:
//! 1. Load and validate configuration from `ENVELOPE_*` environment variables.
//! 2. Initialise logging to stderr.
//! 3. Read the payload from stdin, seal it, print the envelope to stdout.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use envelope_cli::{config, encode, exit_code, telemetry};

fn main() -> ExitCode {
    let args = encode::EncodeArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(args: &encode::EncodeArgs) -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = config::Config::from_env().context("configuration invalid")?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level, cfg.log_format)?;

    // -----------------------------------------------------------------------
    // 3. Encode
    // -----------------------------------------------------------------------
    let mut payload = String::new();
    io::stdin()
        .read_to_string(&mut payload)
        .context("failed to read payload from stdin")?;

    let text = encode::run(args, &payload, &mut io::stderr().lock())?;

    let mut out = io::stdout().lock();
    writeln!(out, "{text}").context("failed to write envelope to stdout")?;
    Ok(())
}
