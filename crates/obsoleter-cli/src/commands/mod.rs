//! Command dispatch and handler modules.

mod compare;
mod obsolete;

use miette::Result;

use obsoleter_core::config::Config;
use obsoleter_util::errors::ObsoleterError;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().map_err(ObsoleterError::Io)?;
    let mut config = Config::load(cli.config.as_deref(), &cwd)?;
    if let Some(cache_dir) = cli.cache_dir {
        config.cache_dir = cache_dir;
    }

    match cli.command {
        None => obsolete::exec(&config),
        Some(Command::Compare {
            packages,
            baseline,
            candidate,
        }) => compare::exec(&config, packages, baseline, candidate),
    }
}
