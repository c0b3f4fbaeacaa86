use colored::*;
use unicode_width::UnicodeWidthStr;

use warrant_common::error::ScanError;
use warrant_common::findings::{ScanKind, ScanResult, Severity};
use warrant_core::token::ConfirmationToken;

pub const TOTAL_WIDTH: usize = 64;

/// Findings elaborated per report; everything below the cut is
/// summarized by count only.
const TOP_FINDINGS: usize = 3;

pub fn header(msg: &str) {
    let formatted = format!("⟦ {} ⟧", msg.to_uppercase());
    let width = UnicodeWidthStr::width(formatted.as_str());

    let dash_count = TOTAL_WIDTH.saturating_sub(width);
    let left = dash_count / 2;
    let right = dash_count - left;

    println!(
        "{}{}{}",
        "─".repeat(left).bright_black(),
        formatted.bright_green(),
        "─".repeat(right).bright_black()
    );
}

pub fn status_line(key: &str, value: impl std::fmt::Display) {
    let dots = ".".repeat(12usize.saturating_sub(key.len()));
    println!(
        "{} {}{}{} {}",
        ">".bright_black(),
        key.cyan(),
        dots.bright_black(),
        ":".bright_black(),
        value
    );
}

pub fn token_issued(token: &ConfirmationToken) {
    header("scan authorization");
    status_line("target", token.target.as_str().bold());
    status_line("token", token.id.yellow());
    status_line(
        "expires",
        format!("in {} minutes", token.expires_in.as_secs() / 60),
    );
    println!();
    println!(
        "{}",
        "Confirm by re-running `warrant scan` with --token.".bright_black()
    );
}

pub fn rerun_hint(kind: ScanKind, target: &str) {
    println!();
    println!(
        "{}",
        format!("Next: warrant scan {kind} {target} --token <TOKEN>").bright_black()
    );
}

pub fn denial(err: &ScanError) {
    match err {
        ScanError::NotAuthorized { target, whitelist } => {
            header("scan blocked");
            status_line("target", target.as_str().red().bold());
            println!();
            println!("{}", "Whitelisted targets:".bold());
            for entry in whitelist {
                println!("  {} {}", "•".bright_black(), entry);
            }
        }
        ScanError::WhitelistEmpty => {
            header("scan blocked");
            println!("{}", "No whitelist configured; all targets are denied.".red());
        }
        ScanError::TokenInvalid | ScanError::TokenExpired => {
            header("scan blocked");
            println!("{}", format!("{err}").red());
            println!(
                "{}",
                "Re-run `warrant validate` to obtain a fresh token.".bright_black()
            );
        }
        _ => {}
    }
}

pub fn scan_report(result: &ScanResult) {
    let kind_label = match result.kind {
        ScanKind::Ports => "port scan results",
        ScanKind::Vuln => "vulnerability scan results",
    };
    header(kind_label);

    status_line("target", result.target.as_str().bold());
    status_line("duration", format!("{:.1}s", result.duration_secs));
    match result.kind {
        ScanKind::Ports => status_line("open ports", result.total_findings),
        ScanKind::Vuln => status_line("findings", result.total_findings),
    }

    let summary = &result.summary;
    println!(
        "{} {} | {} | {} | {} | {}",
        ">".bright_black(),
        format!("{} critical", summary.critical).red().bold(),
        format!("{} high", summary.high).yellow(),
        format!("{} medium", summary.medium).cyan(),
        format!("{} low", summary.low).green(),
        format!("{} info", summary.info).bright_black(),
    );

    let top = result.findings.top(TOP_FINDINGS);
    if !top.is_empty() {
        println!();
        println!("{}", "Top findings:".bold());
        for finding in &top {
            println!(
                "  {} {} {}",
                "•".bright_black(),
                severity_tag(finding.severity),
                finding.message
            );
        }

        let elaborated: usize = summary.critical + summary.high + summary.medium;
        let remaining = elaborated.saturating_sub(top.len());
        if remaining > 0 {
            println!("  {}", format!("... and {remaining} more").bright_black());
        }
    }

    if result.findings.is_empty() {
        println!();
        println!("{}", "No findings.".green().bold());
    }
}

fn severity_tag(severity: Severity) -> ColoredString {
    let label = format!("[{}]", severity);
    match severity {
        Severity::Critical => label.red().bold(),
        Severity::High => label.yellow().bold(),
        Severity::Medium => label.cyan(),
        Severity::Low => label.green(),
        Severity::Info => label.bright_black(),
    }
}
