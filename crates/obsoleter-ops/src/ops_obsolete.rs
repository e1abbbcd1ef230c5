//! Operation: compute `%obsolete` directives for the retired capabilities.

use std::io::Write;

use obsoleter_closure::{
    format_entries, removed_packages, ClosureOptions, FormatOptions, ObsoleteEntry,
};
use obsoleter_core::config::Config;
use obsoleter_core::PackageIndex;
use obsoleter_evr::evr::needs_manual_review;
use obsoleter_evr::EvrComparator;
use obsoleter_repo::{IndexCache, IndexStore, RepodataSource};
use obsoleter_util::errors::ObsoleterError;

/// Counts of what a run printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObsoleteSummary {
    pub directives: usize,
    pub skipped: usize,
    /// Directives whose release carries the `MANUAL` marker.
    pub manual: usize,
}

/// Run against the repodata mirrored under the configured cache dir.
///
/// Directives go to `out`, one per line in name order. Packages that are
/// already obsoleted by something real go to `diag`.
pub fn obsolete(
    config: &Config,
    out: &mut dyn Write,
    diag: &mut dyn Write,
) -> miette::Result<ObsoleteSummary> {
    let source = RepodataSource::new(&config.cache_dir, &config.arch);
    let store = IndexStore::new(&config.cache_dir, &config.arch);
    let mut index = IndexCache::with_store(source, store);
    let cmp = config.comparator.build();
    tracing::debug!(
        "cache dir {}, comparator {}",
        config.cache_dir.display(),
        config.comparator
    );

    obsolete_with(config, &mut index, cmp.as_ref(), out, diag)
}

/// Run against any package index and comparator.
///
/// Nothing is written until the closure and every formatter query have
/// completed, so a failing index leaves both outputs empty.
pub fn obsolete_with(
    config: &Config,
    index: &mut dyn PackageIndex,
    cmp: &dyn EvrComparator,
    out: &mut dyn Write,
    diag: &mut dyn Write,
) -> miette::Result<ObsoleteSummary> {
    let releases = config.release_set();
    let removed = removed_packages(
        index,
        &releases,
        &config.capabilities,
        cmp,
        ClosureOptions {
            expand_retained: config.expand_retained,
        },
    )?;
    tracing::debug!("{removed}");

    let entries = format_entries(
        &removed,
        index,
        &releases.current,
        FormatOptions {
            dist_tag_prefix: &config.dist_tag_prefix,
            placeholder: &config.placeholder,
        },
    )?;

    let mut summary = ObsoleteSummary::default();
    for entry in &entries {
        match entry {
            ObsoleteEntry::Directive { name, evr } => {
                writeln!(out, "{entry}").map_err(ObsoleterError::Io)?;
                summary.directives += 1;
                if needs_manual_review(evr) {
                    obsoleter_util::progress::status_warn("Manual", &format!("{name} {evr}"));
                    summary.manual += 1;
                }
            }
            ObsoleteEntry::Skipped { .. } => {
                writeln!(diag, "{entry}").map_err(ObsoleterError::Io)?;
                summary.skipped += 1;
            }
        }
    }

    obsoleter_util::progress::status(
        "Finished",
        &format!(
            "{} directives, {} already obsoleted",
            summary.directives, summary.skipped
        ),
    );
    Ok(summary)
}
