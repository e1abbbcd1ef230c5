//! Repository channels: repo ids, cache layout and mirror endpoints.

use std::path::{Path, PathBuf};

use obsoleter_core::Release;

/// Fedora's mirror manager.
pub const METALINK_BASE_URL: &str = "https://mirrors.fedoraproject.org/metalink";

/// One repository channel of a release, e.g. `updates` of Fedora 34.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpmRepository {
    /// Channel name as configured (`fedora`, `updates`, ...).
    pub channel: String,
    /// Repo id, also the directory name under the cache dir (`updates34`).
    pub id: String,
    /// Metalink URL the metadata is mirrored from.
    pub metalink: String,
}

impl RpmRepository {
    /// Resolve `channel` of `release` for `arch`.
    pub fn new(channel: &str, release: &Release, arch: &str) -> Self {
        let ver = &release.releasever;
        let (id, repo) = match channel {
            "rawhide" => ("rawhide".to_string(), "rawhide".to_string()),
            "fedora" => (format!("fedora{ver}"), format!("fedora-{ver}")),
            "updates" => (format!("updates{ver}"), format!("updates-released-f{ver}")),
            other => (format!("{other}{ver}"), format!("{other}-f{ver}")),
        };
        Self {
            channel: channel.to_string(),
            metalink: format!("{METALINK_BASE_URL}?repo={repo}&arch={arch}"),
            id,
        }
    }

    /// Every channel of `release`, in configured order.
    pub fn for_release(release: &Release, arch: &str) -> Vec<Self> {
        release
            .channels
            .iter()
            .map(|channel| Self::new(channel, release, arch))
            .collect()
    }

    /// `<cache_dir>/<repo-id>/`, the root that `repomd.xml` locations are
    /// relative to.
    pub fn base_dir(&self, cache_dir: &Path) -> PathBuf {
        cache_dir.join(&self.id)
    }

    /// `<cache_dir>/<repo-id>/repodata/repomd.xml`
    pub fn repomd_path(&self, cache_dir: &Path) -> PathBuf {
        self.base_dir(cache_dir).join("repodata").join("repomd.xml")
    }
}
