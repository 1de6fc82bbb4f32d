//! Lenient semantic version parsing and total ordering.
//!
//! Registry version strings are messier than strict semver: PyPI publishes
//! `1.2` and `1.0.0a1`, npm packages occasionally carry build metadata.
//! This parser accepts all of those while keeping the precedence rules
//! callers rely on for ranking candidates:
//!
//! - release segments compare numerically, missing segments count as zero
//!   (`1.2` == `1.2.0`);
//! - a pre-release sorts before the release it precedes
//!   (`1.0.0-rc.1` < `1.0.0`);
//! - numeric pre-release identifiers sort below alphanumeric ones, matching
//!   semver precedence.

use crate::error::{CoreError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A parsed version with total ordering.
///
/// # Examples
///
/// ```
/// use pkgquery_core::Version;
///
/// let a: Version = "1.2".parse().unwrap();
/// let b: Version = "1.2.0".parse().unwrap();
/// assert_eq!(a, b);
///
/// let pre: Version = "2.0.0-rc.1".parse().unwrap();
/// let rel: Version = "2.0.0".parse().unwrap();
/// assert!(pre < rel);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    release: Vec<u64>,
    pre: Vec<PreSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PreSegment {
    Num(u64),
    Alpha(String),
}

impl Version {
    /// Parses a version string.
    ///
    /// Accepts an optional leading `v`, dotted numeric release segments,
    /// an optional pre-release part after `-` or glued to a release segment
    /// (`1.0.0a1`), and build metadata after `+` (ignored for ordering).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidVersion` if no leading numeric release
    /// segment can be extracted.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || CoreError::InvalidVersion(input.to_string());

        let s = input.trim().trim_start_matches('v');
        // Build metadata never affects precedence
        let s = s.split('+').next().unwrap_or(s);
        if s.is_empty() {
            return Err(invalid());
        }

        let (release_part, dash_pre) = match s.split_once('-') {
            Some((head, tail)) => (head, Some(tail)),
            None => (s, None),
        };

        let mut release = Vec::new();
        let mut pre = Vec::new();
        let mut segments = release_part.split('.');

        for segment in segments.by_ref() {
            if segment.is_empty() {
                return Err(invalid());
            }
            if let Ok(n) = segment.parse::<u64>() {
                release.push(n);
                continue;
            }
            // PEP 440 style glue: "0a1" is release 0 followed by pre "a1"
            let digits: String = segment
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if digits.is_empty() {
                return Err(invalid());
            }
            release.push(digits.parse().map_err(|_| invalid())?);
            push_pre_segments(&segment[digits.len()..], &mut pre);
            break;
        }

        if release.is_empty() {
            return Err(invalid());
        }

        // Anything left after a glued pre-release marker is also pre-release
        for segment in segments {
            push_pre_segments(segment, &mut pre);
        }
        if let Some(tail) = dash_pre {
            for segment in tail.split('.') {
                push_pre_segments(segment, &mut pre);
            }
        }

        Ok(Self { release, pre })
    }

    /// Whether this version carries a pre-release marker.
    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }
}

/// Splits a raw identifier into alternating alpha/numeric runs so that
/// `a10` orders above `a2`.
fn push_pre_segments(raw: &str, out: &mut Vec<PreSegment>) {
    if raw.is_empty() {
        return;
    }
    let mut rest = raw;
    while !rest.is_empty() {
        let numeric = rest.starts_with(|c: char| c.is_ascii_digit());
        let run_len = rest
            .chars()
            .take_while(|c| c.is_ascii_digit() == numeric)
            .map(char::len_utf8)
            .sum();
        let (run, tail) = rest.split_at(run_len);
        if numeric {
            match run.parse() {
                Ok(n) => out.push(PreSegment::Num(n)),
                Err(_) => out.push(PreSegment::Alpha(run.to_ascii_lowercase())),
            }
        } else {
            out.push(PreSegment::Alpha(run.to_ascii_lowercase()));
        }
        rest = tail;
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.release.len().max(other.release.len());
        for i in 0..len {
            let a = self.release.get(i).copied().unwrap_or(0);
            let b = other.release.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => {}
                order => return order,
            }
        }

        // A release outranks its own pre-releases
        match (self.pre.is_empty(), other.pre.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => compare_pre(&self.pre, &other.pre),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn compare_pre(a: &[PreSegment], b: &[PreSegment]) -> Ordering {
    for pair in a.iter().zip(b.iter()) {
        let order = match pair {
            (PreSegment::Num(x), PreSegment::Num(y)) => x.cmp(y),
            (PreSegment::Alpha(x), PreSegment::Alpha(y)) => x.cmp(y),
            // Numeric identifiers have lower precedence than alphanumeric
            (PreSegment::Num(_), PreSegment::Alpha(_)) => Ordering::Less,
            (PreSegment::Alpha(_), PreSegment::Num(_)) => Ordering::Greater,
        };
        if order != Ordering::Equal {
            return order;
        }
    }
    a.len().cmp(&b.len())
}

impl FromStr for Version {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.release.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{seg}")?;
        }
        if !self.pre.is_empty() {
            f.write_str("-")?;
            for (i, seg) in self.pre.iter().enumerate() {
                if i > 0 {
                    f.write_str(".")?;
                }
                match seg {
                    PreSegment::Num(n) => write!(f, "{n}")?,
                    PreSegment::Alpha(a) => f.write_str(a)?,
                }
            }
        }
        Ok(())
    }
}

/// Compares two raw version strings under the lenient total order.
///
/// Falls back to lexical comparison when either side cannot be parsed,
/// so sorting a mixed candidate list stays deterministic.
///
/// # Examples
///
/// ```
/// use pkgquery_core::version::compare_versions;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_versions("1.2", "1.2.0"), Ordering::Equal);
/// assert_eq!(compare_versions("1.10.0", "1.9.0"), Ordering::Greater);
/// ```
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (Version::parse(a), Version::parse(b)) {
        (Ok(va), Ok(vb)) => va.cmp(&vb),
        _ => a.cmp(b),
    }
}
