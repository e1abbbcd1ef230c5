//! Handler for `obsoleter` without a subcommand.

use std::io::Write;

use miette::Result;

use obsoleter_core::config::Config;
use obsoleter_ops::ops_obsolete;
use obsoleter_util::errors::ObsoleterError;

pub fn exec(config: &Config) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    // left unlocked: status lines and the spinner share it
    let mut diag = std::io::stderr();

    ops_obsolete::obsolete(config, &mut out, &mut diag)?;
    out.flush().map_err(ObsoleterError::Io)?;
    Ok(())
}
