//! String-level EVR normalization used to build `%obsolete` directives.
//!
//! None of these functions interpret version numbers. They only reshape the
//! dot-separated release component, or the `epoch:` prefix.

use obsoleter_util::errors::ObsoleterError;

/// Segment appended to a release that could not be bumped automatically.
pub const MANUAL_MARKER: &str = "MANUAL";

/// Default distribution-tag prefix (`fc40`, `fc39`, ...).
pub const DEFAULT_DIST_TAG_PREFIX: &str = "fc";

/// Build the canonical `epoch:version-release` string used throughout the
/// closure. The epoch is always spelled out; an empty epoch becomes `0`.
pub fn join_evr(epoch: &str, version: &str, release: &str) -> String {
    let epoch = if epoch.is_empty() { "0" } else { epoch };
    format!("{epoch}:{version}-{release}")
}

/// Remove every release segment starting with `dist_prefix`.
///
/// `1:2.0-3.fc40` becomes `1:2.0-3`. An EVR without a release component is
/// returned unchanged.
pub fn drop_dist(evr: &str, dist_prefix: &str) -> String {
    let Some((ev, release)) = evr.rsplit_once('-') else {
        return evr.to_string();
    };
    let release = release
        .split('.')
        .filter(|part| !part.starts_with(dist_prefix))
        .collect::<Vec<_>>()
        .join(".");
    format!("{ev}-{release}")
}

/// Drop an `epoch:` prefix when the epoch is exactly `0`.
pub fn drop_0epoch(evr: &str) -> &str {
    match evr.split_once(':') {
        Some(("0", vr)) => vr,
        _ => evr,
    }
}

/// Increment the first non-zero release segment.
///
/// Segments equal to `0` are skipped over. The first other segment is
/// incremented and everything after it is kept: `x-1.fc40` becomes
/// `x-2.fc40` and `x-0.1` becomes `x-0.2`.
///
/// A non-numeric segment cannot be bumped. It is kept, followed by a
/// [`MANUAL_MARKER`] segment, and the rest of the release is dropped:
/// `x-a.1` becomes `x-a.MANUAL`.
///
/// A release made only of zeros (or an EVR without a release) has nothing to
/// bump and is an error.
pub fn bump_release(evr: &str) -> Result<String, ObsoleterError> {
    let cannot_bump = || ObsoleterError::Evr {
        evr: evr.to_string(),
        message: "release has no segment that can be bumped".to_string(),
    };

    let (ev, release) = evr.rsplit_once('-').ok_or_else(cannot_bump)?;
    let parts: Vec<&str> = release.split('.').collect();
    let mut bumped: Vec<String> = Vec::with_capacity(parts.len() + 1);

    for (pos, part) in parts.iter().enumerate() {
        if *part == "0" {
            bumped.push(part.to_string());
            continue;
        }
        match increment(part) {
            Some(next) => {
                bumped.push(next);
                bumped.extend(parts[pos + 1..].iter().map(|p| p.to_string()));
            }
            None => {
                tracing::warn!("release segment {part:?} of {evr} is not numeric");
                bumped.push(part.to_string());
                bumped.push(MANUAL_MARKER.to_string());
            }
        }
        return Ok(format!("{ev}-{}", bumped.join(".")));
    }

    Err(cannot_bump())
}

/// Add one to an all-digit segment. Segments that fit in a `u64` come back
/// without leading zeros; longer ones are incremented digit by digit.
fn increment(segment: &str) -> Option<String> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(next) = segment.parse::<u64>().ok().and_then(|n| n.checked_add(1)) {
        return Some(next.to_string());
    }

    let mut digits = segment.trim_start_matches('0').as_bytes().to_vec();
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return String::from_utf8(digits).ok();
        }
    }
    digits.insert(0, b'1');
    String::from_utf8(digits).ok()
}

/// Whether a bumped EVR needs a human to finish it.
pub fn needs_manual_review(evr: &str) -> bool {
    evr.rsplit_once('-')
        .is_some_and(|(_, release)| release.split('.').any(|p| p == MANUAL_MARKER))
}
