//! rpm capabilities (`name [op evr]`) and range overlap.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use obsoleter_evr::vercmp::{compare_epoch, rpmvercmp, split_evr};

/// Comparison operator of a versioned capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flag {
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
}

impl Flag {
    /// Parse the rpm-md `flags` attribute (`LT`, `LE`, `EQ`, `GE`, `GT`).
    pub fn from_repomd(s: &str) -> Option<Self> {
        match s {
            "LT" => Some(Flag::Lt),
            "LE" => Some(Flag::Le),
            "EQ" => Some(Flag::Eq),
            "GE" => Some(Flag::Ge),
            "GT" => Some(Flag::Gt),
            _ => None,
        }
    }

    /// Parse the textual operator (`<`, `<=`, `=`, `>=`, `>`).
    pub fn from_operator(s: &str) -> Option<Self> {
        match s {
            "<" => Some(Flag::Lt),
            "<=" => Some(Flag::Le),
            "=" | "==" => Some(Flag::Eq),
            ">=" => Some(Flag::Ge),
            ">" => Some(Flag::Gt),
            _ => None,
        }
    }

    pub fn operator(self) -> &'static str {
        match self {
            Flag::Lt => "<",
            Flag::Le => "<=",
            Flag::Eq => "=",
            Flag::Ge => ">=",
            Flag::Gt => ">",
        }
    }

    fn less(self) -> bool {
        matches!(self, Flag::Lt | Flag::Le)
    }

    fn equal(self) -> bool {
        matches!(self, Flag::Le | Flag::Eq | Flag::Ge)
    }

    fn greater(self) -> bool {
        matches!(self, Flag::Ge | Flag::Gt)
    }
}

/// A provide, requirement or obsolete entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capability {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<Flag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epoch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
}

impl Capability {
    /// An unversioned capability.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flag: None,
            epoch: None,
            version: None,
            release: None,
        }
    }

    /// Parse `name`, or `name op [epoch:]version[-release]`.
    ///
    /// Text that does not end in a valid operator and version is taken as an
    /// unversioned name, which covers rich dependencies such as
    /// `(foo if bar)`.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        let mut parts = s.rsplitn(3, ' ');
        if let (Some(evr), Some(op), Some(name)) = (parts.next(), parts.next(), parts.next()) {
            if let Some(flag) = Flag::from_operator(op) {
                let (epoch, version, release) = split_evr(evr);
                return Self {
                    name: name.trim_end().to_string(),
                    flag: Some(flag),
                    epoch: epoch.map(str::to_string),
                    version: Some(version.to_string()),
                    release: release.map(str::to_string),
                };
            }
        }
        Self::named(s)
    }

    pub fn is_versioned(&self) -> bool {
        self.flag.is_some() && self.version.is_some()
    }

    /// `[epoch:]version[-release]`, without a zero epoch.
    pub fn evr(&self) -> Option<String> {
        let version = self.version.as_deref()?;
        let mut evr = String::new();
        if let Some(epoch) = self.epoch.as_deref().filter(|e| !e.is_empty() && *e != "0") {
            evr.push_str(epoch);
            evr.push(':');
        }
        evr.push_str(version);
        if let Some(release) = self.release.as_deref().filter(|r| !r.is_empty()) {
            evr.push('-');
            evr.push_str(release);
        }
        Some(evr)
    }

    /// Whether the two version ranges intersect, the way rpm decides whether
    /// a provide satisfies a requirement.
    ///
    /// Names are not compared. An unversioned side matches everything. The
    /// release is only compared when both sides carry one.
    pub fn overlaps(&self, other: &Capability) -> bool {
        let (Some(a), Some(b)) = (self.flag, other.flag) else {
            return true;
        };
        let (Some(va), Some(vb)) = (self.version.as_deref(), other.version.as_deref()) else {
            return true;
        };

        let mut sense = compare_epoch(
            self.epoch.as_deref().unwrap_or("0"),
            other.epoch.as_deref().unwrap_or("0"),
        );
        if sense == Ordering::Equal {
            sense = rpmvercmp(va, vb);
        }
        if sense == Ordering::Equal {
            if let (Some(ra), Some(rb)) = (
                self.release.as_deref().filter(|r| !r.is_empty()),
                other.release.as_deref().filter(|r| !r.is_empty()),
            ) {
                sense = rpmvercmp(ra, rb);
            }
        }

        match sense {
            Ordering::Less => a.greater() || b.less(),
            Ordering::Greater => a.less() || b.greater(),
            Ordering::Equal => {
                (a.equal() && b.equal()) || (a.less() && b.less()) || (a.greater() && b.greater())
            }
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let (Some(flag), Some(evr)) = (self.flag, self.evr()) {
            write!(f, " {} {evr}", flag.operator())?;
        }
        Ok(())
    }
}
