//! Turns the removed-package map into `%obsolete` directives.

use std::collections::BTreeSet;
use std::fmt;

use obsoleter_core::{PackageIndex, Release};
use obsoleter_evr::evr::{bump_release, drop_0epoch, drop_dist};

use crate::removed::RemovedPackages;

/// One output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObsoleteEntry {
    /// Publishable: nothing but the placeholder obsoletes the package yet.
    Directive { name: String, evr: String },
    /// Already obsoleted by a real package.
    Skipped {
        name: String,
        evr: String,
        obsoleters: Vec<String>,
    },
}

impl ObsoleteEntry {
    pub fn name(&self) -> &str {
        match self {
            ObsoleteEntry::Directive { name, .. } | ObsoleteEntry::Skipped { name, .. } => name,
        }
    }

    pub fn is_directive(&self) -> bool {
        matches!(self, ObsoleteEntry::Directive { .. })
    }
}

impl fmt::Display for ObsoleteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObsoleteEntry::Directive { name, evr } => write!(f, "%obsolete {name} {evr}"),
            ObsoleteEntry::Skipped {
                name,
                evr,
                obsoleters,
            } => write!(f, "# {name} {evr} obsoleted by {}", obsoleters.join(", ")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FormatOptions<'a> {
    pub dist_tag_prefix: &'a str,
    /// Catch-all obsoleter that does not count as handling a removal.
    pub placeholder: &'a str,
}

/// Strip the dist tag, then a zero epoch: `0:2.0-3.fc39` becomes `2.0-3`.
pub fn normalize_evr(evr: &str, dist_tag_prefix: &str) -> String {
    drop_0epoch(&drop_dist(evr, dist_tag_prefix)).to_string()
}

/// Decide, in name order, which removed packages get a directive.
///
/// A package obsoleted only by the placeholder (or by nothing) gets
/// `%obsolete <name> <bumped normalized evr>`. Anything else is skipped
/// with the sorted names of its obsoleters.
pub fn format_entries(
    removed: &RemovedPackages,
    index: &mut dyn PackageIndex,
    current: &Release,
    options: FormatOptions<'_>,
) -> miette::Result<Vec<ObsoleteEntry>> {
    let mut entries = Vec::with_capacity(removed.len());

    for (name, evr) in removed.iter() {
        let version = normalize_evr(evr, options.dist_tag_prefix);
        let obsoleters: BTreeSet<String> = index
            .packages_obsoleting(&format!("{name} = {version}"), current)?
            .into_iter()
            .map(|p| p.name)
            .collect();

        let placeholder_only =
            obsoleters.len() == 1 && obsoleters.contains(options.placeholder);
        if obsoleters.is_empty() || placeholder_only {
            let bumped = bump_release(&version)?;
            if obsoleter_evr::evr::needs_manual_review(&bumped) {
                tracing::warn!("{name} {bumped} needs a manually chosen release");
            }
            entries.push(ObsoleteEntry::Directive {
                name: name.to_string(),
                evr: bumped,
            });
        } else {
            entries.push(ObsoleteEntry::Skipped {
                name: name.to_string(),
                evr: version,
                obsoleters: obsoleters.into_iter().collect(),
            });
        }
    }

    Ok(entries)
}
