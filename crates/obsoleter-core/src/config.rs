use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use obsoleter_evr::ComparatorKind;
use obsoleter_util::errors::ObsoleterError;

use crate::release::{Release, ReleaseSet};

/// File name looked up in the working directory and its ancestors.
pub const CONFIG_FILE: &str = "obsoleter.toml";

/// Run configuration, normally loaded from `obsoleter.toml`.
///
/// Every key is optional. The defaults describe the python3.9 retirement:
/// Fedora 33 and 34 are scanned, Rawhide (35) is the target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default = "default_arch")]
    pub arch: String,

    /// Mirrored repodata (`<repo-id>/repodata/`) and the `indices/` store.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    #[serde(default = "default_dist_tag_prefix")]
    pub dist_tag_prefix: String,

    /// Catch-all package whose obsoletes do not count as handling a removal.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    #[serde(default)]
    pub comparator: ComparatorKind,

    /// Also walk reverse dependencies of packages that still exist in the
    /// current release.
    #[serde(default = "default_expand_retained")]
    pub expand_retained: bool,

    /// Capabilities only the retired runtime provides.
    #[serde(default = "default_capabilities")]
    pub capabilities: Vec<String>,

    #[serde(default = "default_current")]
    pub current: Release,

    #[serde(default = "default_legacy")]
    pub legacy: Vec<Release>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            arch: default_arch(),
            cache_dir: default_cache_dir(),
            dist_tag_prefix: default_dist_tag_prefix(),
            placeholder: default_placeholder(),
            comparator: ComparatorKind::default(),
            expand_retained: default_expand_retained(),
            capabilities: default_capabilities(),
            current: default_current(),
            legacy: default_legacy(),
        }
    }
}

fn default_arch() -> String {
    "x86_64".to_string()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("_dnf_cache_dir")
}

fn default_dist_tag_prefix() -> String {
    obsoleter_evr::evr::DEFAULT_DIST_TAG_PREFIX.to_string()
}

fn default_placeholder() -> String {
    "fedora-obsolete-packages".to_string()
}

fn default_expand_retained() -> bool {
    true
}

fn default_capabilities() -> Vec<String> {
    vec![
        "python(abi) = 3.9".to_string(),
        "libpython3.9.so.1.0()(64bit)".to_string(),
        "libpython3.9d.so.1.0()(64bit)".to_string(),
    ]
}

fn default_current() -> Release {
    Release::rawhide(35)
}

fn default_legacy() -> Vec<Release> {
    vec![Release::fedora(33), Release::fedora(34)]
}

impl Config {
    /// Parse configuration from TOML text and validate it.
    pub fn parse(content: &str) -> miette::Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ObsoleterError::Config {
            message: format!("Failed to parse {CONFIG_FILE}: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ObsoleterError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        let config = Self::parse(&content)?;
        tracing::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `explicit` if given, otherwise the nearest `obsoleter.toml` at or
    /// above `start`, otherwise the built-in defaults.
    pub fn load(explicit: Option<&Path>, start: &Path) -> miette::Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match obsoleter_util::fs::find_ancestor_with(start, CONFIG_FILE) {
            Some(dir) => Self::load_from(&dir.join(CONFIG_FILE)),
            None => {
                tracing::debug!("no {CONFIG_FILE} found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Reject configurations the run cannot do anything useful with.
    pub fn validate(&self) -> miette::Result<()> {
        let fail = |message: String| -> miette::Result<()> {
            Err(ObsoleterError::Config { message }.into())
        };
        if self.legacy.is_empty() {
            return fail("at least one [[legacy]] release is required".to_string());
        }
        if self.capabilities.is_empty() {
            return fail("`capabilities` must name at least one capability".to_string());
        }
        for release in self.legacy.iter().chain(std::iter::once(&self.current)) {
            if release.channels.is_empty() {
                return fail(format!("release `{}` has no channels", release.id));
            }
        }
        if self.legacy.iter().any(|r| r.id == self.current.id) {
            return fail(format!(
                "release `{}` is both legacy and current",
                self.current.id
            ));
        }
        Ok(())
    }

    pub fn release_set(&self) -> ReleaseSet {
        ReleaseSet::new(self.legacy.clone(), self.current.clone())
    }
}
