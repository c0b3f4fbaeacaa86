//! # Scan Target Model
//!
//! Parsing and normalization of operator-supplied scan targets.
//!
//! A target is a bare domain name or a dotted IPv4 address. URLs are
//! tolerated on input and reduced to their host portion; everything else
//! is rejected up front. IPv6, explicit ports and internationalized
//! domains are unsupported by design.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ScanError;

/// A validated, normalized scan target.
///
/// Invariant: lower-case, no scheme prefix, no path suffix, and matches
/// either domain or IPv4 dotted-quad syntax. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Target(String);

impl Target {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Target {
    type Err = ScanError;

    /// Parses a raw string into a `Target`.
    ///
    /// Accepted forms:
    /// * **Domain**: `example.com`, `sub.host-1.example.com`
    /// * **IPv4**: `10.0.0.5`
    /// * Either of the above wrapped in `http://`/`https://` and/or
    ///   followed by a path, which are stripped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ScanError::InvalidTarget(s.to_string()));
        }

        let without_scheme = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .unwrap_or(trimmed);

        let host = without_scheme
            .split('/')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        if is_domain(&host) || is_ipv4(&host) {
            Ok(Target(host))
        } else {
            Err(ScanError::InvalidTarget(s.to_string()))
        }
    }
}

/// Domain syntax: alphanumeric first and last character, interior limited
/// to alphanumerics, hyphen, underscore and dot, minimum three characters.
fn is_domain(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() < 3 {
        return false;
    }
    let first = bytes[0];
    let last = bytes[bytes.len() - 1];
    first.is_ascii_alphanumeric()
        && last.is_ascii_alphanumeric()
        && bytes
            .iter()
            .all(|&b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

/// IPv4 dotted-quad syntax: four dot-separated groups of one to three
/// digits. Octet range is deliberately not enforced, matching the
/// reference behavior.
fn is_ipv4(s: &str) -> bool {
    let mut groups = 0;
    for group in s.split('.') {
        if group.is_empty() || group.len() > 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        groups += 1;
    }
    groups == 4
}
