//! Injectable three-way EVR comparison.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use obsoleter_util::errors::ObsoleterError;
use obsoleter_util::process::CommandBuilder;

use crate::vercmp;

/// A total order over full EVR strings.
///
/// Implementations are authoritative: callers derive equality and
/// less-than from [`compare`](EvrComparator::compare) and never fall back to
/// string equality.
pub trait EvrComparator {
    fn compare(&self, a: &str, b: &str) -> miette::Result<Ordering>;

    fn is_equal(&self, a: &str, b: &str) -> miette::Result<bool> {
        Ok(self.compare(a, b)? == Ordering::Equal)
    }

    fn is_less(&self, a: &str, b: &str) -> miette::Result<bool> {
        Ok(self.compare(a, b)? == Ordering::Less)
    }

    /// The greatest EVR in `evrs`. On ties the first one seen wins.
    fn max_evr<'a>(&self, evrs: &[&'a str]) -> miette::Result<Option<&'a str>> {
        let mut best: Option<&'a str> = None;
        for &evr in evrs {
            best = match best {
                Some(current) if !self.is_less(current, evr)? => Some(current),
                _ => Some(evr),
            };
        }
        Ok(best)
    }
}

/// In-process rpmvercmp.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeVercmp;

impl EvrComparator for NativeVercmp {
    fn compare(&self, a: &str, b: &str) -> miette::Result<Ordering> {
        Ok(vercmp::compare_evr(a, b))
    }
}

/// Delegates to the `rpmdev-vercmp` tool from rpmdevtools.
///
/// Exit status 0 means equal, 11 means the first EVR is newer and 12 means
/// the second is newer.
#[derive(Debug, Clone)]
pub struct RpmdevVercmp {
    program: String,
    leading_args: Vec<String>,
}

impl RpmdevVercmp {
    pub fn new() -> Self {
        Self::with_command("rpmdev-vercmp", Vec::<String>::new())
    }

    /// Use a different executable with the same exit-code protocol. The two
    /// EVRs are appended after `leading_args`.
    pub fn with_command(
        program: impl Into<String>,
        leading_args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            program: program.into(),
            leading_args: leading_args.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for RpmdevVercmp {
    fn default() -> Self {
        Self::new()
    }
}

impl EvrComparator for RpmdevVercmp {
    fn compare(&self, a: &str, b: &str) -> miette::Result<Ordering> {
        let cmd = CommandBuilder::new(&self.program)
            .args(self.leading_args.iter().cloned())
            .args([a, b]);
        let code = cmd.exit_code().map_err(|e| ObsoleterError::Comparator {
            message: format!("failed to run {}: {e}", cmd.display()),
        })?;
        match code {
            Some(0) => Ok(Ordering::Equal),
            Some(11) => Ok(Ordering::Greater),
            Some(12) => Ok(Ordering::Less),
            Some(other) => Err(ObsoleterError::Comparator {
                message: format!("{} exited with status {other}", cmd.display()),
            }
            .into()),
            None => Err(ObsoleterError::Comparator {
                message: format!("{} was terminated by a signal", cmd.display()),
            }
            .into()),
        }
    }
}

/// Comparator selection as spelled in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComparatorKind {
    #[default]
    Native,
    RpmdevVercmp,
}

impl ComparatorKind {
    pub fn build(self) -> Box<dyn EvrComparator> {
        match self {
            ComparatorKind::Native => Box::new(NativeVercmp),
            ComparatorKind::RpmdevVercmp => Box::new(RpmdevVercmp::new()),
        }
    }
}

impl fmt::Display for ComparatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparatorKind::Native => f.write_str("native"),
            ComparatorKind::RpmdevVercmp => f.write_str("rpmdev-vercmp"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_predicates() {
        let cmp = NativeVercmp;
        assert!(cmp.is_less("0:1.0-1", "0:1.0-2").unwrap());
        assert!(!cmp.is_less("0:1.0-2", "0:1.0-1").unwrap());
        assert!(cmp.is_equal("0:1.0-1", "1.0-1").unwrap());
    }

    #[test]
    fn max_picks_greatest() {
        let cmp = NativeVercmp;
        let evrs = ["0:1.0-1", "0:1.0-2", "0:0.9-7"];
        assert_eq!(cmp.max_evr(&evrs).unwrap(), Some("0:1.0-2"));
    }

    #[test]
    fn max_keeps_first_on_tie() {
        let cmp = NativeVercmp;
        let evrs = ["1.0-1", "0:1.0-1"];
        assert_eq!(cmp.max_evr(&evrs).unwrap(), Some("1.0-1"));
    }

    #[test]
    fn max_of_nothing() {
        assert_eq!(NativeVercmp.max_evr(&[]).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn external_tool_exit_codes() {
        // `sh -c 'exit N' vercmp A B` follows the rpmdev-vercmp protocol.
        let scripted = |code: &str| {
            RpmdevVercmp::with_command(
                "sh",
                ["-c".to_string(), format!("exit {code}"), "vercmp".to_string()],
            )
        };
        assert_eq!(scripted("0").compare("1", "1").unwrap(), Ordering::Equal);
        assert_eq!(scripted("11").compare("2", "1").unwrap(), Ordering::Greater);
        assert_eq!(scripted("12").compare("1", "2").unwrap(), Ordering::Less);
        assert!(scripted("3").compare("1", "2").is_err());
    }

    #[test]
    fn missing_tool_is_comparator_error() {
        let cmp =
            RpmdevVercmp::with_command("nonexistent_vercmp_xyz_123", Vec::<String>::new());
        let err = cmp.compare("1.0-1", "1.0-2").unwrap_err();
        assert!(err.to_string().contains("Version comparison failed"), "got: {err}");
    }

    #[test]
    fn kind_display_matches_config_spelling() {
        assert_eq!(ComparatorKind::default().to_string(), "native");
        assert_eq!(ComparatorKind::RpmdevVercmp.to_string(), "rpmdev-vercmp");
    }
}
