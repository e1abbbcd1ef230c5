use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// One distribution release: a set of repository channels sharing a
/// `releasever`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Release {
    /// Short identifier used in logs and as the index store key (`f33`).
    pub id: String,
    /// Value substituted for `$releasever` in repo ids and endpoints.
    #[serde(deserialize_with = "string_or_number")]
    pub releasever: String,
    /// Channel names (`fedora`, `updates`, `updates-testing`, `rawhide`).
    pub channels: Vec<String>,
}

impl Release {
    pub fn new(
        id: impl Into<String>,
        releasever: impl Into<String>,
        channels: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: id.into(),
            releasever: releasever.into(),
            channels: channels.into_iter().map(Into::into).collect(),
        }
    }

    /// A stable Fedora release with its update streams.
    pub fn fedora(releasever: u32) -> Self {
        Self::new(
            format!("f{releasever}"),
            releasever.to_string(),
            ["fedora", "updates", "updates-testing"],
        )
    }

    /// Rawhide, branched as `releasever`.
    pub fn rawhide(releasever: u32) -> Self {
        Self::new("rawhide", releasever.to_string(), ["rawhide"])
    }
}

/// Accept both `releasever = "33"` and `releasever = 33`.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// The releases scanned by one run: the legacy snapshots to search and the
/// current release against which removal is judged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSet {
    pub legacy: Vec<Release>,
    pub current: Release,
}

impl ReleaseSet {
    pub fn new(legacy: Vec<Release>, current: Release) -> Self {
        Self { legacy, current }
    }
}
