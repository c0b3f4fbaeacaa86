//! Findings and report model shared by both scan kinds.
//!
//! Severity is a total order with `Critical` highest. Findings are kept
//! in per-severity buckets with insertion order preserved, which gives
//! the presentation layer a uniform "top-N, critical first" view no
//! matter which scanner produced them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::target::Target;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Presentation order: most severe first.
    pub const DESCENDING: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Info => "info",
        }
    }

    /// Parses a scanner-supplied severity label, case-insensitively.
    pub fn parse_label(s: &str) -> Option<Severity> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Some(Severity::Critical),
            "high" => Some(Severity::High),
            "medium" => Some(Severity::Medium),
            "low" => Some(Severity::Low),
            "info" => Some(Severity::Info),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two scan kinds the engine can dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanKind {
    Ports,
    Vuln,
}

impl ScanKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ScanKind::Ports => "ports",
            ScanKind::Vuln => "vuln",
        }
    }
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ports" | "nmap" => Ok(ScanKind::Ports),
            "vuln" | "nuclei" => Ok(ScanKind::Vuln),
            other => Err(format!("unknown scan kind '{other}' (expected ports|vuln)")),
        }
    }
}

/// Kind-specific detail attached to a finding.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FindingDetail {
    OpenPort {
        port: u16,
        protocol: String,
        service: String,
    },
    Vulnerability {
        template_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        matched_at: Option<String>,
    },
}

/// One normalized observation with an assigned severity.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
    #[serde(flatten)]
    pub detail: FindingDetail,
}

/// Per-severity counts derived from a [`Findings`] collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SeveritySummary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
}

/// Findings bucketed by severity, insertion order preserved per bucket.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Findings {
    buckets: BTreeMap<Severity, Vec<Finding>>,
}

impl Findings {
    pub fn push(&mut self, finding: Finding) {
        self.buckets
            .entry(finding.severity)
            .or_default()
            .push(finding);
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.buckets.get(&severity).map_or(0, Vec::len)
    }

    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterates all findings, most severe bucket first.
    pub fn iter_descending(&self) -> impl Iterator<Item = &Finding> {
        Severity::DESCENDING
            .iter()
            .filter_map(|sev| self.buckets.get(sev))
            .flatten()
    }

    /// The top `n` findings for presentation: critical, then high, then
    /// medium. Low and info findings are never elaborated here; they are
    /// reported through [`Self::summary`] counts only.
    pub fn top(&self, n: usize) -> Vec<&Finding> {
        [Severity::Critical, Severity::High, Severity::Medium]
            .iter()
            .filter_map(|sev| self.buckets.get(sev))
            .flatten()
            .take(n)
            .collect()
    }

    pub fn summary(&self) -> SeveritySummary {
        SeveritySummary {
            critical: self.count(Severity::Critical),
            high: self.count(Severity::High),
            medium: self.count(Severity::Medium),
            low: self.count(Severity::Low),
            info: self.count(Severity::Info),
        }
    }
}

/// Output of one completed scan.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScanResult {
    pub target: Target,
    pub kind: ScanKind,
    pub duration_secs: f64,
    pub total_findings: usize,
    pub summary: SeveritySummary,
    pub findings: Findings,
    /// Bounded capture of the scanner's raw output.
    pub raw_excerpt: String,
}

impl ScanResult {
    pub fn new(
        target: Target,
        kind: ScanKind,
        duration: Duration,
        findings: Findings,
        raw_excerpt: String,
    ) -> Self {
        Self {
            target,
            kind,
            duration_secs: duration.as_secs_f64(),
            total_findings: findings.total(),
            summary: findings.summary(),
            findings,
            raw_excerpt,
        }
    }
}
