//! Handler for `obsoleter compare`.

use std::path::PathBuf;

use miette::Result;

use obsoleter_core::config::Config;
use obsoleter_ops::ops_compare::{self, CompareOptions};

pub fn exec(
    config: &Config,
    packages: PathBuf,
    baseline: PathBuf,
    candidate: PathBuf,
) -> Result<()> {
    let opts = CompareOptions {
        packages,
        baseline,
        candidate,
    };
    let cmp = config.comparator.build();
    let stdout = std::io::stdout();
    ops_compare::compare(&opts, cmp.as_ref(), &mut stdout.lock())?;
    Ok(())
}
