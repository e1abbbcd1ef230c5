//! The removed-package map: name to the greatest EVR seen while missing from
//! the current release.

use std::collections::BTreeMap;
use std::fmt;

use obsoleter_evr::EvrComparator;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovedPackages {
    entries: BTreeMap<String, String>,
}

impl RemovedPackages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `evr` into the entry for `name`, keeping the greater EVR per
    /// `cmp`. On a tie the stored string stays.
    ///
    /// Returns `true` if the map changed.
    pub fn record(&mut self, name: &str, evr: &str, cmp: &dyn EvrComparator) -> miette::Result<bool> {
        match self.entries.get_mut(name) {
            Some(stored) => {
                if cmp.is_less(stored, evr)? {
                    *stored = evr.to_string();
                    return Ok(true);
                }
                Ok(false)
            }
            None => {
                self.entries.insert(name.to_string(), evr.to_string());
                Ok(true)
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, e)| (n.as_str(), e.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for RemovedPackages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return write!(f, "No removed packages.");
        }
        writeln!(f, "Removed packages ({}):", self.entries.len())?;
        for (name, evr) in &self.entries {
            writeln!(f, "  {name} {evr}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obsoleter_evr::NativeVercmp;

    #[test]
    fn keeps_greatest() {
        let mut removed = RemovedPackages::new();
        assert!(removed.record("foo", "0:1.0-1", &NativeVercmp).unwrap());
        assert!(removed.record("foo", "0:1.0-2", &NativeVercmp).unwrap());
        assert!(!removed.record("foo", "0:1.0-1", &NativeVercmp).unwrap());
        assert_eq!(removed.get("foo"), Some("0:1.0-2"));
        assert_eq!(removed.len(), 1);
    }

    #[test]
    fn tie_keeps_first_seen() {
        let mut removed = RemovedPackages::new();
        removed.record("foo", "0:1.0-1", &NativeVercmp).unwrap();
        assert!(!removed.record("foo", "0:1.0-01", &NativeVercmp).unwrap());
        assert_eq!(removed.get("foo"), Some("0:1.0-1"));
    }

    #[test]
    fn iterates_in_name_order() {
        let mut removed = RemovedPackages::new();
        removed.record("zeta", "0:1-1", &NativeVercmp).unwrap();
        removed.record("alpha", "0:1-1", &NativeVercmp).unwrap();
        let names: Vec<&str> = removed.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["alpha", "zeta"]);
    }

    #[test]
    fn report_display() {
        let mut removed = RemovedPackages::new();
        assert_eq!(removed.to_string(), "No removed packages.");
        removed.record("foo", "0:1.0-2", &NativeVercmp).unwrap();
        let s = removed.to_string();
        assert!(s.contains("Removed packages (1):"));
        assert!(s.contains("  foo 0:1.0-2"));
    }
}
