//! Whitelist matching for scan authorization.
//!
//! An empty whitelist denies everything. A target is authorized if it
//! equals an entry or is a subdomain of one; the containment check
//! requires the separator dot so that `evilexample.com` does not match
//! an `example.com` entry.

use crate::error::ScanError;
use crate::target::Target;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Whitelist {
    entries: Vec<String>,
}

impl Whitelist {
    /// Builds a whitelist from a comma-separated configuration string.
    /// Entries are trimmed and lowercased; empty entries are dropped.
    pub fn from_csv(raw: &str) -> Self {
        let entries = raw
            .split(',')
            .map(|entry| entry.trim().to_ascii_lowercase())
            .filter(|entry| !entry.is_empty())
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decides whether `target` may be scanned.
    pub fn authorize(&self, target: &Target) -> Result<(), ScanError> {
        if self.entries.is_empty() {
            return Err(ScanError::WhitelistEmpty);
        }

        let host = target.as_str();
        for entry in &self.entries {
            if host == entry || host.ends_with(&format!(".{entry}")) {
                return Ok(());
            }
        }

        Err(ScanError::NotAuthorized {
            target: host.to_string(),
            whitelist: self.entries.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(s: &str) -> Target {
        s.parse().unwrap()
    }

    #[test]
    fn empty_whitelist_denies_everything() {
        let wl = Whitelist::from_csv("");
        assert_eq!(
            wl.authorize(&target("example.com")),
            Err(ScanError::WhitelistEmpty)
        );
    }

    #[test]
    fn exact_match_is_authorized() {
        let wl = Whitelist::from_csv("example.com");
        assert!(wl.authorize(&target("example.com")).is_ok());
    }

    #[test]
    fn subdomain_is_authorized() {
        let wl = Whitelist::from_csv("example.com");
        assert!(wl.authorize(&target("sub.example.com")).is_ok());
        assert!(wl.authorize(&target("a.b.example.com")).is_ok());
    }

    #[test]
    fn substring_is_not_subdomain() {
        let wl = Whitelist::from_csv("example.com");
        let denied = wl.authorize(&target("evilexample.com"));
        match denied {
            Err(ScanError::NotAuthorized { target, whitelist }) => {
                assert_eq!(target, "evilexample.com");
                assert_eq!(whitelist, vec!["example.com".to_string()]);
            }
            other => panic!("expected NotAuthorized, got {other:?}"),
        }
    }

    #[test]
    fn entries_are_normalized() {
        let wl = Whitelist::from_csv(" Example.COM , ,10.0.0.5 ");
        assert_eq!(wl.entries(), ["example.com", "10.0.0.5"]);
        assert!(wl.authorize(&target("EXAMPLE.com")).is_ok());
        assert!(wl.authorize(&target("10.0.0.5")).is_ok());
    }
}
