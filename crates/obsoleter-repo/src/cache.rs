//! Per-run index memoization backed by an on-disk index store.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use obsoleter_core::{Package, PackageIndex, Release};
use obsoleter_util::errors::ObsoleterError;

use crate::index::RepoIndex;
use crate::primary::PackageRecord;
use crate::source::IndexSource;

/// Directory under the cache dir holding built indices.
pub const INDICES_DIR: &str = "indices";

#[derive(Serialize, Deserialize)]
struct StoredIndex {
    release: String,
    arch: String,
    #[serde(default)]
    releasever: String,
    #[serde(default)]
    channels: Vec<String>,
    records: Vec<PackageRecord>,
}

impl StoredIndex {
    fn describes(&self, release: &Release, arch: &str) -> bool {
        self.release == release.id
            && self.arch == arch
            && self.releasever == release.releasever
            && self.channels == release.channels
    }
}

/// Built indices persisted as `<cache_dir>/indices/<release-id>-<arch>.json`.
///
/// An entry is only reused while the release keeps the same `releasever`
/// and channels. Otherwise it is rebuilt from the mirrored metadata.
#[derive(Debug, Clone)]
pub struct IndexStore {
    root: PathBuf,
    arch: String,
}

impl IndexStore {
    pub fn new(cache_dir: &Path, arch: impl Into<String>) -> Self {
        Self {
            root: cache_dir.join(INDICES_DIR),
            arch: arch.into(),
        }
    }

    /// The root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entry_path(&self, release: &Release) -> PathBuf {
        self.root.join(format!("{}-{}.json", release.id, self.arch))
    }

    /// Load the stored index of `release`, if there is one.
    pub fn load(&self, release: &Release) -> miette::Result<Option<RepoIndex>> {
        let path = self.entry_path(release);
        if !path.is_file() {
            return Ok(None);
        }
        let stale = |message: String| ObsoleterError::Index {
            release: release.id.clone(),
            message,
        };
        let content = std::fs::read_to_string(&path)
            .map_err(|e| stale(format!("cannot read {}: {e}", path.display())))?;
        let stored: StoredIndex = serde_json::from_str(&content)
            .map_err(|e| stale(format!("corrupt index {}: {e}", path.display())))?;
        if !stored.describes(release, &self.arch) {
            tracing::warn!(
                "{} holds {}-{} ({} {}), rebuilding it",
                path.display(),
                stored.release,
                stored.arch,
                stored.releasever,
                stored.channels.join(",")
            );
            return Ok(None);
        }
        tracing::debug!("loaded index for {release} from {}", path.display());
        Ok(Some(RepoIndex::new(stored.records)))
    }

    /// Persist `records` as the index of `release`.
    pub fn save(&self, release: &Release, records: &[PackageRecord]) -> miette::Result<PathBuf> {
        #[derive(Serialize)]
        struct StoredRef<'a> {
            release: &'a str,
            arch: &'a str,
            releasever: &'a str,
            channels: &'a [String],
            records: &'a [PackageRecord],
        }

        let path = self.entry_path(release);
        let json = serde_json::to_vec(&StoredRef {
            release: &release.id,
            arch: &self.arch,
            releasever: &release.releasever,
            channels: &release.channels,
            records,
        })
        .map_err(|e| ObsoleterError::Generic {
            message: format!("Failed to serialize index for {release}: {e}"),
        })?;
        obsoleter_util::fs::write_replace(&path, &json).map_err(ObsoleterError::Io)?;
        tracing::debug!("stored index for {release} at {}", path.display());
        Ok(path)
    }
}

/// Builds each release's index at most once per run.
///
/// The first request for a release loads it from the [`IndexStore`] or, on a
/// miss, from the [`IndexSource`] (then stores it). Later requests reuse the
/// in-memory index.
pub struct IndexCache<S> {
    source: S,
    store: Option<IndexStore>,
    indices: HashMap<String, RepoIndex>,
}

impl<S: IndexSource> IndexCache<S> {
    /// A cache without persistence.
    pub fn new(source: S) -> Self {
        Self {
            source,
            store: None,
            indices: HashMap::new(),
        }
    }

    pub fn with_store(source: S, store: IndexStore) -> Self {
        Self {
            source,
            store: Some(store),
            indices: HashMap::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The index of `release`, building it on first use.
    pub fn index_for(&mut self, release: &Release) -> miette::Result<&RepoIndex> {
        match self.indices.entry(release.id.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let index = build(&mut self.source, self.store.as_ref(), release)?;
                tracing::info!("{release}: {} packages indexed", index.len());
                Ok(entry.insert(index))
            }
        }
    }
}

fn build<S: IndexSource>(
    source: &mut S,
    store: Option<&IndexStore>,
    release: &Release,
) -> miette::Result<RepoIndex> {
    if let Some(store) = store {
        if let Some(index) = store.load(release)? {
            return Ok(index);
        }
    }
    let records = source.load(release)?;
    if let Some(store) = store {
        store.save(release, &records)?;
    }
    Ok(RepoIndex::new(records))
}

impl<S: IndexSource> PackageIndex for IndexCache<S> {
    fn packages_requiring_exact(
        &mut self,
        capability: &str,
        release: &Release,
    ) -> miette::Result<Vec<Package>> {
        Ok(self.index_for(release)?.requiring_exact(capability))
    }

    fn packages_requiring(
        &mut self,
        provider: &str,
        release: &Release,
    ) -> miette::Result<Vec<Package>> {
        Ok(self.index_for(release)?.requiring(provider))
    }

    fn all_latest_package_names(&mut self, release: &Release) -> miette::Result<BTreeSet<String>> {
        Ok(self.index_for(release)?.names())
    }

    fn packages_obsoleting(
        &mut self,
        spec: &str,
        release: &Release,
    ) -> miette::Result<Vec<Package>> {
        Ok(self.index_for(release)?.obsoleting(spec))
    }
}
