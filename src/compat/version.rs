//! Compatibility file versioning.
//!
//! A version is `major.minor.build.revision`. Unless pinned, build counts days
//! since a start date and revision counts regenerations on that day.

use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::compat::CompatError;

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

const MAX_COMPONENT: u32 = 65535;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompatVersion(pub [u32; 4]);

impl fmt::Display for CompatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{a}, {b}, {c}, {d}")
    }
}

/// What `--set-version` asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionRequest {
    /// Major and minor; build and revision are derived.
    Auto { major: u32, minor: u32 },
    /// Exact version.
    Pinned(CompatVersion),
}

impl Default for VersionRequest {
    fn default() -> Self {
        VersionRequest::Auto { major: 2, minor: 0 }
    }
}

impl std::str::FromStr for VersionRequest {
    type Err = CompatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let numbers: Vec<u64> = NUMBER
            .find_iter(s)
            .map(|m| m.as_str().parse::<u64>().unwrap_or(u64::MAX))
            .collect();
        if numbers.len() != 2 && numbers.len() != 4 {
            return Err(CompatError::BadVersion(s.to_string()));
        }
        if numbers.iter().any(|&n| n >= u64::from(MAX_COMPONENT)) {
            return Err(CompatError::VersionOutOfRange(s.to_string()));
        }
        let n: Vec<u32> = numbers.into_iter().map(|n| n as u32).collect();
        Ok(match n.as_slice() {
            [major, minor] => VersionRequest::Auto { major: *major, minor: *minor },
            [a, b, c, d] => VersionRequest::Pinned(CompatVersion([*a, *b, *c, *d])),
            _ => unreachable!("length checked above"),
        })
    }
}

/// Numbers on a `version = { ... }` line.
pub fn parse_version_line(line: &str) -> CompatVersion {
    let mut out = [0u32; 4];
    for (slot, m) in out.iter_mut().zip(NUMBER.find_iter(line)) {
        *slot = m.as_str().parse().unwrap_or(0);
    }
    CompatVersion(out)
}

/// Whole days from `start` to `today` (negative before the start date).
pub fn days_since(start: NaiveDate, today: NaiveDate) -> i64 {
    (today - start).num_days()
}

/// Resolve the version to write given the previous file's version.
pub fn next_version(request: VersionRequest, previous: CompatVersion, days_since_start: i64) -> CompatVersion {
    match request {
        VersionRequest::Pinned(v) => v,
        VersionRequest::Auto { major, minor } => {
            // Components stay below MAX_COMPONENT whatever the previous file held.
            let build = days_since_start.clamp(0, i64::from(MAX_COMPONENT - 1)) as u32;
            let revision = if build == previous.0[2] {
                previous.0[3].saturating_add(1).min(MAX_COMPONENT - 1)
            } else {
                0
            };
            CompatVersion([major, minor, build, revision])
        }
    }
}
