//! obsoleter CLI binary.
//!
//! This is the entry point for the `obsoleter` command-line tool. It
//! initializes logging via `tracing`, parses arguments with `clap`, and
//! dispatches to the appropriate command handler.

mod cli;
mod commands;

use miette::{IntoDiagnostic, Result};

fn main() -> Result<()> {
    // metalink URLs in errors must stay on one line to be copyable
    miette::set_hook(Box::new(|_| {
        Box::new(miette::MietteHandlerOpts::new().wrap_lines(false).build())
    }))
    .into_diagnostic()?;

    let args = cli::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    // stdout carries the directives, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    commands::dispatch(args)
}
