//! Classification of raw scanner output into severity buckets.
//!
//! Both parsers follow the same "parse what you can, skip what you
//! can't" rule: unrecognized lines are ignored without aborting the
//! rest of the classification.

use serde::Deserialize;
use tracing::trace;

use warrant_common::findings::{Finding, FindingDetail, Findings, Severity};

/// Fixed risk policy for well-known ports. Severity is keyed by port
/// number alone, never inferred from the detected service banner; a port
/// absent from this table is informational.
const PORT_RISK: &[(u16, Severity)] = &[
    (21, Severity::High),      // FTP
    (22, Severity::Medium),    // SSH
    (23, Severity::Critical),  // Telnet
    (25, Severity::Medium),    // SMTP
    (445, Severity::High),     // SMB
    (3306, Severity::High),    // MySQL
    (3389, Severity::High),    // RDP
    (5432, Severity::High),    // PostgreSQL
    (27017, Severity::High),   // MongoDB
];

pub fn port_severity(port: u16) -> Severity {
    PORT_RISK
        .iter()
        .find(|(risky, _)| *risky == port)
        .map(|(_, severity)| *severity)
        .unwrap_or(Severity::Info)
}

/// Parses line-oriented port-scanner output. Recognized lines have the
/// shape `<port>/<tcp|udp> <state> <service...>`; banners and headers
/// fall through silently.
pub fn classify_port_scan(output: &str) -> Findings {
    let mut findings = Findings::default();
    for line in output.lines() {
        if let Some(finding) = parse_port_line(line) {
            findings.push(finding);
        }
    }
    findings
}

fn parse_port_line(line: &str) -> Option<Finding> {
    // Port tables are flush-left; indented continuation lines (script
    // output and the like) are not port rows.
    if line.starts_with(char::is_whitespace) {
        return None;
    }

    let mut parts = line.split_whitespace();
    let head = parts.next()?;
    let (port_str, protocol) = head.split_once('/')?;
    if protocol != "tcp" && protocol != "udp" {
        return None;
    }
    let port: u16 = port_str.parse().ok()?;
    let state = parts.next()?;
    if !state.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }

    let service = parts.collect::<Vec<_>>().join(" ");
    Some(Finding {
        severity: port_severity(port),
        message: format!("Port {port} ({service}) is open"),
        detail: FindingDetail::OpenPort {
            port,
            protocol: protocol.to_string(),
            service,
        },
    })
}

#[derive(Debug, Deserialize)]
struct VulnRecord {
    #[serde(rename = "template-id")]
    template_id: Option<String>,
    #[serde(rename = "matched-at")]
    matched_at: Option<String>,
    #[serde(default)]
    info: VulnInfo,
}

#[derive(Debug, Default, Deserialize)]
struct VulnInfo {
    name: Option<String>,
    severity: Option<String>,
    description: Option<String>,
}

/// Parses newline-delimited JSON vulnerability-scanner output. Each line
/// is one independent record; lines that are not JSON are skipped. A
/// missing severity defaults to info, an unrecognized severity label
/// drops the record.
pub fn classify_vuln_scan(output: &str) -> Findings {
    let mut findings = Findings::default();
    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let record: VulnRecord = match serde_json::from_str(line) {
            Ok(record) => record,
            Err(err) => {
                trace!(%err, "skipping unparseable scanner line");
                continue;
            }
        };

        let severity = match &record.info.severity {
            None => Severity::Info,
            Some(label) => match Severity::parse_label(label) {
                Some(severity) => severity,
                None => {
                    trace!(label = %label, "skipping record with unknown severity");
                    continue;
                }
            },
        };

        let template_id = record.template_id.unwrap_or_default();
        let message = record
            .info
            .name
            .clone()
            .unwrap_or_else(|| template_id.clone());

        findings.push(Finding {
            severity,
            message,
            detail: FindingDetail::Vulnerability {
                template_id,
                description: record.info.description,
                matched_at: record.matched_at,
            },
        });
    }
    findings
}
