//! Reverse-dependency closure over the legacy releases.

use std::collections::VecDeque;

use obsoleter_core::{Package, PackageIndex, ReleaseSet};
use obsoleter_evr::EvrComparator;

use crate::removed::RemovedPackages;
use crate::visited::VisitedSet;

#[derive(Debug, Clone, Copy)]
pub struct ClosureOptions {
    /// Walk the dependents of packages that still exist in the current
    /// release. When off, only dropped packages are expanded.
    pub expand_retained: bool,
}

impl Default for ClosureOptions {
    fn default() -> Self {
        Self {
            expand_retained: true,
        }
    }
}

/// Find every package that transitively requires one of `capabilities` in a
/// legacy release and is missing from the current release, with the
/// greatest EVR it was seen at.
///
/// Each name is expanded at most once and each build is queued at most once,
/// so requirement cycles terminate.
pub fn removed_packages(
    index: &mut dyn PackageIndex,
    releases: &ReleaseSet,
    capabilities: &[String],
    cmp: &dyn EvrComparator,
    options: ClosureOptions,
) -> miette::Result<RemovedPackages> {
    let mut queue: VecDeque<Package> = VecDeque::new();
    let mut visited = VisitedSet::new();

    for release in &releases.legacy {
        for capability in capabilities {
            let seeds = index.packages_requiring_exact(capability, release)?;
            tracing::debug!("{release}: {} packages require {capability}", seeds.len());
            for package in seeds {
                if visited.enqueue(&package) {
                    queue.push_back(package);
                }
            }
        }
    }
    tracing::debug!("seeded worklist with {} packages", queue.len());

    let current_names = index.all_latest_package_names(&releases.current)?;
    let mut removed = RemovedPackages::new();

    while let Some(package) = queue.pop_front() {
        let dropped = !current_names.contains(&package.name);
        if dropped && removed.record(&package.name, &package.evr(), cmp)? {
            tracing::debug!("{} is gone from {}", package.nevra(), releases.current);
        }

        if !dropped && !options.expand_retained {
            continue;
        }
        if !visited.visit(&package.name) {
            continue;
        }

        for release in &releases.legacy {
            for dependent in index.packages_requiring(&package.name, release)? {
                if visited.enqueue(&dependent) {
                    tracing::trace!("{} requires {}", dependent.nevra(), package.name);
                    queue.push_back(dependent);
                }
            }
        }
    }

    tracing::info!(
        "{} packages examined, {} removed from {}",
        visited.queued(),
        removed.len(),
        releases.current
    );
    Ok(removed)
}
