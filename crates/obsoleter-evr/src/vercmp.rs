//! Native port of rpm's version comparison.
//!
//! `rpmvercmp` splits both strings into alternating alphabetic and numeric
//! segments, skipping every other character as a separator:
//! - Numeric segments compare as integers (leading zeros ignored)
//! - Alphabetic segments compare byte-wise
//! - A numeric segment is always newer than an alphabetic one
//! - `~` sorts before everything, including the end of the string
//!   (`1.0~rc1 < 1.0`)
//! - `^` sorts after the end of the string but before any other segment
//!   (`1.0 < 1.0^git1 < 1.0.1`)
//!
//! [`compare_evr`] applies it to the epoch, version and release of two full
//! EVR strings in turn.

use std::cmp::Ordering;

/// Split an EVR into `(epoch, version, release)`.
///
/// The epoch is `None` when there is no `epoch:` prefix and the release is
/// `None` when there is no `-release` suffix. The release is everything after
/// the last `-`.
pub fn split_evr(evr: &str) -> (Option<&str>, &str, Option<&str>) {
    let (epoch, vr) = match evr.split_once(':') {
        Some((e, vr)) => (Some(e), vr),
        None => (None, evr),
    };
    match vr.rsplit_once('-') {
        Some((v, r)) => (epoch, v, Some(r)),
        None => (epoch, vr, None),
    }
}

/// Compare two full EVR strings the way `rpmdev-vercmp` does.
///
/// A missing epoch counts as `0`. A missing release sorts before any
/// present release.
pub fn compare_evr(a: &str, b: &str) -> Ordering {
    let (ea, va, ra) = split_evr(a);
    let (eb, vb, rb) = split_evr(b);
    compare_epoch(ea.unwrap_or("0"), eb.unwrap_or("0"))
        .then_with(|| rpmvercmp(va, vb))
        .then_with(|| rpmvercmp(ra.unwrap_or(""), rb.unwrap_or("")))
}

/// Compare two epochs numerically, falling back to `rpmvercmp` for
/// non-numeric input.
pub fn compare_epoch(a: &str, b: &str) -> Ordering {
    let a = if a.is_empty() { "0" } else { a };
    let b = if b.is_empty() { "0" } else { b };
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => rpmvercmp(a, b),
    }
}

fn is_separator(c: u8) -> bool {
    !c.is_ascii_alphanumeric() && c != b'~' && c != b'^'
}

/// Compare two version (or release) strings with rpm's segment rules.
pub fn rpmvercmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let mut one = a.as_bytes();
    let mut two = b.as_bytes();

    loop {
        while let Some(&c) = one.first() {
            if !is_separator(c) {
                break;
            }
            one = &one[1..];
        }
        while let Some(&c) = two.first() {
            if !is_separator(c) {
                break;
            }
            two = &two[1..];
        }

        let (c1, c2) = (one.first().copied(), two.first().copied());

        if c1 == Some(b'~') || c2 == Some(b'~') {
            if c1 != Some(b'~') {
                return Ordering::Greater;
            }
            if c2 != Some(b'~') {
                return Ordering::Less;
            }
            one = &one[1..];
            two = &two[1..];
            continue;
        }

        if c1 == Some(b'^') || c2 == Some(b'^') {
            match (c1, c2) {
                (None, _) => return Ordering::Less,
                (_, None) => return Ordering::Greater,
                (Some(x), _) if x != b'^' => return Ordering::Greater,
                (_, Some(y)) if y != b'^' => return Ordering::Less,
                _ => {}
            }
            one = &one[1..];
            two = &two[1..];
            continue;
        }

        let (Some(first), Some(_)) = (c1, c2) else {
            break;
        };

        let numeric = first.is_ascii_digit();
        let segment_len = |s: &[u8]| {
            s.iter()
                .take_while(|c| {
                    if numeric {
                        c.is_ascii_digit()
                    } else {
                        c.is_ascii_alphabetic()
                    }
                })
                .count()
        };
        let n1 = segment_len(one);
        let n2 = segment_len(two);

        // Segments of different types: numeric is newer.
        if n2 == 0 {
            return if numeric {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        let (seg1, seg2) = (&one[..n1], &two[..n2]);
        let ord = if numeric {
            compare_numeric(seg1, seg2)
        } else {
            seg1.cmp(seg2)
        };
        if ord != Ordering::Equal {
            return ord;
        }

        one = &one[n1..];
        two = &two[n2..];
    }

    match (one.is_empty(), two.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        _ => Ordering::Greater,
    }
}

fn compare_numeric(a: &[u8], b: &[u8]) -> Ordering {
    fn strip(s: &[u8]) -> &[u8] {
        let zeros = s.iter().take_while(|&&c| c == b'0').count();
        &s[zeros..]
    }
    let (a, b) = (strip(a), strip(b));
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
