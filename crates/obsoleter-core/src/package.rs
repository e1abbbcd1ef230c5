use std::fmt;

use serde::{Deserialize, Serialize};

use obsoleter_evr::evr::join_evr;

/// Architecture of 32-bit multilib compatibility builds.
pub const COMPAT_ARCH: &str = "i686";

/// One package build as seen by the closure: name, EVR and architecture.
///
/// Equality and hashing cover the full NEVRA, so the same build found in two
/// releases is one identity while two builds of the same name are not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    #[serde(default = "default_epoch")]
    pub epoch: String,
    pub version: String,
    pub release: String,
    pub arch: String,
}

fn default_epoch() -> String {
    "0".to_string()
}

impl Package {
    pub fn new(
        name: impl Into<String>,
        epoch: impl Into<String>,
        version: impl Into<String>,
        release: impl Into<String>,
        arch: impl Into<String>,
    ) -> Self {
        let epoch = epoch.into();
        Self {
            name: name.into(),
            epoch: if epoch.is_empty() { default_epoch() } else { epoch },
            version: version.into(),
            release: release.into(),
            arch: arch.into(),
        }
    }

    /// Canonical `epoch:version-release`, epoch always present.
    pub fn evr(&self) -> String {
        join_evr(&self.epoch, &self.version, &self.release)
    }

    /// `name-epoch:version-release.arch`
    pub fn nevra(&self) -> String {
        format!("{}-{}.{}", self.name, self.evr(), self.arch)
    }

    /// Whether this build is a 32-bit compatibility package.
    pub fn is_compat_arch(&self) -> bool {
        self.arch == COMPAT_ARCH
    }

    /// Parse a `repoquery` style NEVRA: `name-[epoch:]version-release.arch`,
    /// optionally followed by `.rpm`.
    ///
    /// Returns `None` when any component is missing.
    pub fn parse_nevra(s: &str) -> Option<Self> {
        let s = s.trim();
        let s = s.strip_suffix(".rpm").unwrap_or(s);
        let (nev, ra) = s.rsplit_once('-')?;
        let (name, ev) = nev.rsplit_once('-')?;
        let (epoch, version) = ev.rsplit_once(':').unwrap_or(("0", ev));
        let (release, arch) = ra.rsplit_once('.')?;
        if [name, version, release, arch].iter().any(|part| part.is_empty()) {
            return None;
        }
        Some(Self::new(name, epoch, version, release, arch))
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.nevra())
    }
}
