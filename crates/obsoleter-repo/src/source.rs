//! Where package records come from when an index has to be built.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use obsoleter_core::Release;
use obsoleter_util::errors::ObsoleterError;
use obsoleter_util::progress;

use crate::primary::{self, PackageRecord};
use crate::repository::RpmRepository;

/// Loads every binary package record of a release.
pub trait IndexSource {
    fn load(&mut self, release: &Release) -> miette::Result<Vec<PackageRecord>>;
}

/// Reads rpm-md repodata mirrored under `<cache_dir>/<repo-id>/repodata/`.
#[derive(Debug, Clone)]
pub struct RepodataSource {
    cache_dir: PathBuf,
    arch: String,
}

impl RepodataSource {
    pub fn new(cache_dir: impl Into<PathBuf>, arch: impl Into<String>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            arch: arch.into(),
        }
    }

    fn load_repo(&self, repo: &RpmRepository) -> miette::Result<Vec<PackageRecord>> {
        let repomd_path = repo.repomd_path(&self.cache_dir);
        let repomd = std::fs::read_to_string(&repomd_path).map_err(|e| {
            ObsoleterError::Metadata {
                message: format!("cannot read {}: {e}", repomd_path.display()),
            }
        })?;
        let href = primary::primary_location(&repomd)?;
        let primary_path = repo.base_dir(&self.cache_dir).join(href);

        let pb = progress::spinner(&format!("Parsing {} primary metadata", repo.id));
        let parsed = read_metadata(&primary_path).and_then(|xml| primary::parse_primary(&xml));
        pb.finish_and_clear();
        let records = parsed?;

        tracing::debug!("{}: {} package records", repo.id, records.len());
        Ok(records)
    }
}

/// Read a metadata file, decompressing `.gz`.
pub fn read_metadata(path: &Path) -> miette::Result<String> {
    let read_error = |e: std::io::Error| ObsoleterError::Metadata {
        message: format!("cannot read {}: {e}", path.display()),
    };
    let mut content = String::new();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("gz") => {
            let file = File::open(path).map_err(read_error)?;
            GzDecoder::new(file)
                .read_to_string(&mut content)
                .map_err(read_error)?;
        }
        Some("xml") => {
            content = std::fs::read_to_string(path).map_err(read_error)?;
        }
        other => {
            return Err(ObsoleterError::Metadata {
                message: format!(
                    "unsupported compression `{}` for {}",
                    other.unwrap_or(""),
                    path.display()
                ),
            }
            .into());
        }
    }
    Ok(content)
}

impl IndexSource for RepodataSource {
    fn load(&mut self, release: &Release) -> miette::Result<Vec<PackageRecord>> {
        let repos = RpmRepository::for_release(release, &self.arch);
        let ids: Vec<&str> = repos.iter().map(|r| r.id.as_str()).collect();
        progress::status("Loading", &format!("{release} ({})", ids.join(", ")));

        let mut records = Vec::new();
        for repo in &repos {
            let loaded = self.load_repo(repo).map_err(|e| ObsoleterError::Index {
                release: release.id.clone(),
                message: format!("{}: {e} (mirror it from {})", repo.id, repo.metalink),
            })?;
            records.extend(loaded);
        }
        Ok(records)
    }
}

/// Records held in memory, keyed by release id.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    releases: HashMap<String, Vec<PackageRecord>>,
    loads: usize,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_release(mut self, release_id: &str, records: Vec<PackageRecord>) -> Self {
        self.releases.insert(release_id.to_string(), records);
        self
    }

    /// How many times [`IndexSource::load`] has been called.
    pub fn loads(&self) -> usize {
        self.loads
    }
}

impl IndexSource for StaticSource {
    fn load(&mut self, release: &Release) -> miette::Result<Vec<PackageRecord>> {
        self.loads += 1;
        self.releases.get(&release.id).cloned().ok_or_else(|| {
            ObsoleterError::Index {
                release: release.id.clone(),
                message: "no package records".to_string(),
            }
            .into()
        })
    }
}
