//! In-memory package index of one release, with reverse maps for the
//! closure queries.

use std::collections::{BTreeSet, HashMap};

use obsoleter_core::Package;
use obsoleter_evr::vercmp::compare_evr;

use crate::capability::Capability;
use crate::primary::PackageRecord;

/// All package records of one release.
#[derive(Debug, Clone, Default)]
pub struct RepoIndex {
    records: Vec<PackageRecord>,
    // Record ids for each name, newest first
    by_name: HashMap<String, Vec<usize>>,
    requires_by_name: HashMap<String, Vec<usize>>,
    obsoletes_by_name: HashMap<String, Vec<usize>>,
}

fn push_unique(map: &mut HashMap<String, Vec<usize>>, key: &str, id: usize) {
    let ids = map.entry(key.to_string()).or_default();
    if ids.last() != Some(&id) {
        ids.push(id);
    }
}

impl RepoIndex {
    pub fn new(records: Vec<PackageRecord>) -> Self {
        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        let mut requires_by_name = HashMap::new();
        let mut obsoletes_by_name = HashMap::new();

        for (id, record) in records.iter().enumerate() {
            by_name
                .entry(record.package.name.clone())
                .or_default()
                .push(id);
            for req in &record.requires {
                push_unique(&mut requires_by_name, &req.name, id);
            }
            for obs in &record.obsoletes {
                push_unique(&mut obsoletes_by_name, &obs.name, id);
            }
        }

        for ids in by_name.values_mut() {
            ids.sort_by(|&a, &b| {
                compare_evr(&records[b].package.evr(), &records[a].package.evr())
            });
        }

        Self {
            records,
            by_name,
            requires_by_name,
            obsoletes_by_name,
        }
    }

    pub fn records(&self) -> &[PackageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every package name in the release.
    pub fn names(&self) -> BTreeSet<String> {
        self.by_name.keys().cloned().collect()
    }

    /// The highest-EVR record named `name` that is not a 32-bit compat build.
    pub fn latest_eligible(&self, name: &str) -> Option<&PackageRecord> {
        self.by_name
            .get(name)?
            .iter()
            .map(|&id| &self.records[id])
            .find(|record| !record.package.is_compat_arch())
    }

    fn packages(&self, ids: BTreeSet<usize>) -> Vec<Package> {
        ids.into_iter()
            .map(|id| self.records[id].package.clone())
            .collect()
    }

    fn candidates<'a>(
        map: &'a HashMap<String, Vec<usize>>,
        name: &str,
    ) -> impl Iterator<Item = usize> + 'a {
        map.get(name).into_iter().flatten().copied()
    }

    /// Packages with a requirement that renders exactly as `capability`.
    pub fn requiring_exact(&self, capability: &str) -> Vec<Package> {
        let wanted = Capability::parse(capability);
        let rendered = wanted.to_string();
        let ids = Self::candidates(&self.requires_by_name, &wanted.name)
            .filter(|&id| {
                self.records[id]
                    .requires
                    .iter()
                    .any(|req| req.to_string() == rendered)
            })
            .collect();
        self.packages(ids)
    }

    /// Packages requiring anything the latest eligible `provider` build
    /// provides, including its files.
    pub fn requiring(&self, provider: &str) -> Vec<Package> {
        let Some(record) = self.latest_eligible(provider) else {
            tracing::debug!("no eligible provider named {provider}");
            return Vec::new();
        };

        let mut ids = BTreeSet::new();
        for provide in &record.provides {
            ids.extend(
                Self::candidates(&self.requires_by_name, &provide.name).filter(|&id| {
                    self.records[id]
                        .requires
                        .iter()
                        .any(|req| req.name == provide.name && req.overlaps(provide))
                }),
            );
        }
        for file in &record.files {
            ids.extend(
                Self::candidates(&self.requires_by_name, file).filter(|&id| {
                    self.records[id]
                        .requires
                        .iter()
                        .any(|req| req.name == *file && !req.is_versioned())
                }),
            );
        }
        self.packages(ids)
    }

    /// Packages whose obsoletes cover `spec` (`name = evr`). Every record is
    /// searched, not only the newest of each name.
    pub fn obsoleting(&self, spec: &str) -> Vec<Package> {
        let wanted = Capability::parse(spec);
        let ids = Self::candidates(&self.obsoletes_by_name, &wanted.name)
            .filter(|&id| {
                self.records[id]
                    .obsoletes
                    .iter()
                    .any(|obs| obs.name == wanted.name && obs.overlaps(&wanted))
            })
            .collect();
        self.packages(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(nevra: &str, provides: &[&str], requires: &[&str]) -> PackageRecord {
        let package = Package::parse_nevra(nevra).unwrap();
        let mut provides: Vec<Capability> = provides.iter().map(|p| Capability::parse(p)).collect();
        provides.push(Capability::parse(&format!(
            "{} = {}",
            package.name,
            package.evr()
        )));
        PackageRecord {
            package,
            provides,
            requires: requires.iter().map(|r| Capability::parse(r)).collect(),
            obsoletes: Vec::new(),
            files: Vec::new(),
        }
    }

    fn names(packages: &[Package]) -> Vec<String> {
        packages.iter().map(|p| p.nevra()).collect()
    }

    #[test]
    fn requiring_exact_matches_rendered_text() {
        let index = RepoIndex::new(vec![
            record("a-1.0-1.fc34.noarch", &[], &["python(abi) = 3.9"]),
            record("b-1.0-1.fc34.noarch", &[], &["python(abi) = 3.10"]),
            record("c-1.0-1.fc34.noarch", &[], &["python(abi)"]),
        ]);
        let found = index.requiring_exact("python(abi) = 3.9");
        assert_eq!(names(&found), ["a-0:1.0-1.fc34.noarch"]);
    }

    #[test]
    fn requiring_follows_latest_provider() {
        let index = RepoIndex::new(vec![
            record("libfoo-1.0-1.fc34.x86_64", &["libfoo.so.1()(64bit)"], &[]),
            record("libfoo-2.0-1.fc34.x86_64", &["libfoo.so.2()(64bit)"], &[]),
            record("old-1-1.x86_64", &[], &["libfoo.so.1()(64bit)"]),
            record("new-1-1.x86_64", &[], &["libfoo.so.2()(64bit)"]),
        ]);
        let found = index.requiring("libfoo");
        assert_eq!(names(&found), ["new-0:1-1.x86_64"]);
    }

    #[test]
    fn requiring_skips_compat_provider() {
        let index = RepoIndex::new(vec![
            record("libfoo-2.0-1.i686", &["libfoo.so.2"], &[]),
            record("libfoo-1.0-1.x86_64", &["libfoo.so.1()(64bit)"], &[]),
            record("user32-1-1.i686", &[], &["libfoo.so.2"]),
            record("user64-1-1.x86_64", &[], &["libfoo.so.1()(64bit)"]),
        ]);
        let latest = index.latest_eligible("libfoo").unwrap();
        assert_eq!(latest.package.arch, "x86_64");
        assert_eq!(names(&index.requiring("libfoo")), ["user64-0:1-1.x86_64"]);
    }

    #[test]
    fn requiring_unknown_provider_is_empty() {
        let index = RepoIndex::new(vec![record("a-1-1.noarch", &[], &["b"])]);
        assert!(index.requiring("missing").is_empty());
    }

    #[test]
    fn requiring_respects_version_ranges() {
        let index = RepoIndex::new(vec![
            record("foo-2.0-3.x86_64", &[], &[]),
            record("ok-1-1.x86_64", &[], &["foo >= 2.0"]),
            record("too-new-1-1.x86_64", &[], &["foo >= 3.0"]),
            record("any-1-1.x86_64", &[], &["foo"]),
        ]);
        let found = index.requiring("foo");
        assert_eq!(
            names(&found),
            ["ok-0:1-1.x86_64", "any-0:1-1.x86_64"]
        );
    }

    #[test]
    fn requiring_matches_file_provides() {
        let mut tool = record("tool-1-1.x86_64", &[], &[]);
        tool.files.push("/usr/bin/tool".to_string());
        let index = RepoIndex::new(vec![
            tool,
            record("script-1-1.noarch", &[], &["/usr/bin/tool"]),
        ]);
        assert_eq!(names(&index.requiring("tool")), ["script-0:1-1.noarch"]);
    }

    #[test]
    fn obsoleting_searches_all_builds() {
        let mut catchall_old = record("fedora-obsolete-packages-34-1.noarch", &[], &[]);
        catchall_old.obsoletes.push(Capability::parse("libfoo-compat < 2.0-5"));
        let mut catchall_new = record("fedora-obsolete-packages-35-1.noarch", &[], &[]);
        catchall_new.obsoletes.push(Capability::parse("other < 1"));
        let index = RepoIndex::new(vec![catchall_old, catchall_new]);

        let found = index.obsoleting("libfoo-compat = 2.0-3");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].version, "34");
        assert!(index.obsoleting("libfoo-compat = 2.0-5").is_empty());
    }

    #[test]
    fn names_cover_every_record() {
        let index = RepoIndex::new(vec![
            record("a-1-1.noarch", &[], &[]),
            record("a-2-1.noarch", &[], &[]),
            record("b-1-1.noarch", &[], &[]),
        ]);
        let names: Vec<String> = index.names().into_iter().collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(index.len(), 3);
    }
}
