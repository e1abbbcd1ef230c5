//! The query contract the closure engine needs from a package index.

use std::collections::BTreeSet;

use crate::package::Package;
use crate::release::Release;

/// Per-release package queries.
///
/// Implementations may build indices lazily, so every query takes
/// `&mut self` and may fail; a failure means the release has no usable index
/// and the run cannot continue.
pub trait PackageIndex {
    /// Packages whose requirements contain exactly `capability`, compared as
    /// rendered text (`python(abi) = 3.9`).
    fn packages_requiring_exact(
        &mut self,
        capability: &str,
        release: &Release,
    ) -> miette::Result<Vec<Package>>;

    /// Packages requiring anything the latest non-i686 build of `provider`
    /// provides. Empty when no such build exists.
    fn packages_requiring(&mut self, provider: &str, release: &Release)
        -> miette::Result<Vec<Package>>;

    /// Every package name available in `release`.
    fn all_latest_package_names(&mut self, release: &Release) -> miette::Result<BTreeSet<String>>;

    /// Packages whose obsoletes cover `spec`, a `name = evr` string.
    fn packages_obsoleting(&mut self, spec: &str, release: &Release)
        -> miette::Result<Vec<Package>>;
}
