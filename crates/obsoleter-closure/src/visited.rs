//! Worklist bookkeeping for the closure walk.

use std::collections::HashSet;

use obsoleter_core::Package;

/// Tracks which names have been expanded and which package builds have
/// entered the worklist, so requirement cycles terminate.
#[derive(Debug, Default)]
pub struct VisitedSet {
    names: HashSet<String>,
    queued: HashSet<Package>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a name as expanded. Returns `false` if it already was.
    pub fn visit(&mut self, name: &str) -> bool {
        self.names.insert(name.to_string())
    }

    /// Record that `package` entered the worklist. Returns `false` if the
    /// same build was queued before.
    pub fn enqueue(&mut self, package: &Package) -> bool {
        if self.queued.contains(package) {
            return false;
        }
        self.queued.insert(package.clone())
    }

    pub fn queued(&self) -> usize {
        self.queued.len()
    }
}
