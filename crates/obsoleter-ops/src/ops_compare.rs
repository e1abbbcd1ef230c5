//! Operation: compare package versions between two repoquery listings.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use obsoleter_core::Package;
use obsoleter_evr::EvrComparator;
use obsoleter_util::errors::ObsoleterError;

/// Inputs for `obsoleter compare`.
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Package names to report on, one per line.
    pub packages: PathBuf,
    /// `repoquery` NEVRA listing of the reference build root.
    pub baseline: PathBuf,
    /// `repoquery` NEVRA listing of the build root under test.
    pub candidate: PathBuf,
}

/// One package present in both listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareLine {
    pub name: String,
    pub baseline: String,
    pub candidate: String,
    pub ordering: Ordering,
}

impl CompareLine {
    fn sign(&self) -> &'static str {
        match self.ordering {
            Ordering::Greater => ">",
            Ordering::Equal => "==",
            Ordering::Less => "<",
        }
    }
}

impl fmt::Display for CompareLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<30} {} {} {}",
            self.name,
            self.baseline,
            self.sign(),
            self.candidate
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompareReport {
    pub lines: Vec<CompareLine>,
}

impl CompareReport {
    /// Names whose baseline build is newer than the candidate's, sorted.
    pub fn newer_in_baseline(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|line| line.ordering == Ordering::Greater)
            .map(|line| line.name.as_str())
            .collect()
    }
}

impl fmt::Display for CompareReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        writeln!(f)?;
        for name in self.newer_in_baseline() {
            writeln!(f, "{name}")?;
        }
        Ok(())
    }
}

fn read(path: &Path) -> miette::Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        ObsoleterError::Generic {
            message: format!("cannot read {}: {e}", path.display()),
        }
        .into()
    })
}

/// Read a list of package names, ignoring blank lines.
pub fn read_names(path: &Path) -> miette::Result<BTreeSet<String>> {
    Ok(read(path)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Read a `repoquery` listing into name -> newest build.
///
/// Lines that are not a NEVRA are skipped with a warning.
pub fn read_listing(
    path: &Path,
    cmp: &dyn EvrComparator,
) -> miette::Result<HashMap<String, Package>> {
    let mut listing: HashMap<String, Package> = HashMap::new();
    for (lineno, line) in read(path)?.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let Some(package) = Package::parse_nevra(line) else {
            tracing::warn!("{}:{}: not a NEVRA: {line}", path.display(), lineno + 1);
            continue;
        };
        let newer = match listing.get(&package.name) {
            Some(seen) => cmp.is_less(&seen.evr(), &package.evr())?,
            None => true,
        };
        if newer {
            listing.insert(package.name.clone(), package);
        }
    }
    Ok(listing)
}

/// Compare every name in `names` present in both listings.
pub fn build_report(
    names: &BTreeSet<String>,
    baseline: &HashMap<String, Package>,
    candidate: &HashMap<String, Package>,
    cmp: &dyn EvrComparator,
) -> miette::Result<CompareReport> {
    let mut report = CompareReport::default();
    for name in names {
        let (Some(base), Some(cand)) = (baseline.get(name), candidate.get(name)) else {
            tracing::debug!("{name} is missing from a listing");
            continue;
        };
        let (base_evr, cand_evr) = (base.evr(), cand.evr());
        let ordering = cmp.compare(&base_evr, &cand_evr)?;
        report.lines.push(CompareLine {
            name: name.clone(),
            baseline: base_evr,
            candidate: cand_evr,
            ordering,
        });
    }
    Ok(report)
}

/// Read the three inputs and write the report to `out`.
pub fn compare(
    opts: &CompareOptions,
    cmp: &dyn EvrComparator,
    out: &mut dyn Write,
) -> miette::Result<CompareReport> {
    let names = read_names(&opts.packages)?;
    let baseline = read_listing(&opts.baseline, cmp)?;
    let candidate = read_listing(&opts.candidate, cmp)?;
    let report = build_report(&names, &baseline, &candidate, cmp)?;
    write!(out, "{report}").map_err(ObsoleterError::Io)?;
    Ok(report)
}
