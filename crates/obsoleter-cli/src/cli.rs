//! CLI argument definitions for obsoleter.
//!
//! Uses `clap` derive macros. Without a subcommand the obsolete computation
//! runs; `compare` produces the release-diffing report.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "obsoleter",
    version,
    about = "Compute %obsolete directives for packages stranded by a retired runtime",
    long_about = "Walks reverse dependencies of the retired runtime's capabilities through \
                  the legacy releases and prints an %obsolete directive for every dependent \
                  the current release no longer ships."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Configuration file (default: obsoleter.toml in this or a parent directory)
    #[arg(long, global = true, env = "OBSOLETER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding mirrored repodata and built indices
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compare package versions between two repoquery listings
    Compare {
        /// File with one package name per line
        #[arg(long)]
        packages: PathBuf,
        /// NEVRA listing of the reference build root
        #[arg(long)]
        baseline: PathBuf,
        /// NEVRA listing of the build root under test
        #[arg(long)]
        candidate: PathBuf,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
