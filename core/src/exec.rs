//! Scan execution against external scanner binaries.
//!
//! Commands are built as argument vectors and handed straight to the
//! process spawner; the target is never spliced into a shell string.
//! When a remote transport is configured, the same argv is wrapped in an
//! `ssh` invocation so local and remote scans produce identical output
//! shapes for the classifier.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time;
use tracing::debug;

use warrant_common::config::RemoteConfig;
use warrant_common::error::ScanError;
use warrant_common::findings::ScanKind;
use warrant_common::target::Target;

const MAX_DIAGNOSTIC_CHARS: usize = 400;

#[derive(Clone, Debug)]
pub enum Transport {
    Local,
    Remote(RemoteConfig),
}

/// Seam between the orchestrator and the external scanner processes.
/// Integration tests substitute a stub implementation here.
#[async_trait]
pub trait ScanRunner: Send + Sync {
    async fn run(&self, kind: ScanKind, target: &Target) -> Result<String, ScanError>;
}

/// Runs the scanner binaries as subprocesses, locally or over SSH,
/// bounded by the configured timeout.
pub struct ProcessRunner {
    transport: Transport,
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(transport: Transport, timeout: Duration) -> Self {
        Self { transport, timeout }
    }
}

/// Fixed per-kind command template with the target appended as its own
/// argument.
pub fn scan_argv(kind: ScanKind, target: &Target) -> Vec<String> {
    match kind {
        // Quick service/version sweep of the most common ports.
        ScanKind::Ports => vec![
            "nmap".to_string(),
            "-sV".to_string(),
            "-sC".to_string(),
            "--top-ports".to_string(),
            "100".to_string(),
            "-T4".to_string(),
            "--max-retries".to_string(),
            "2".to_string(),
            target.as_str().to_string(),
        ],
        // Template scan over HTTPS, machine-readable output, noisy
        // low/info templates filtered at the source.
        ScanKind::Vuln => vec![
            "nuclei".to_string(),
            "-u".to_string(),
            format!("https://{target}"),
            "-severity".to_string(),
            "critical,high,medium".to_string(),
            "-json".to_string(),
            "-silent".to_string(),
        ],
    }
}

/// Wraps a scan argv in a non-interactive SSH call.
pub fn remote_argv(remote: &RemoteConfig, argv: &[String]) -> Vec<String> {
    let mut wrapped = vec![
        "ssh".to_string(),
        "-i".to_string(),
        remote.key_path.clone(),
        "-o".to_string(),
        "BatchMode=yes".to_string(),
        "-o".to_string(),
        "StrictHostKeyChecking=no".to_string(),
        format!("{}@{}", remote.user, remote.host),
        "--".to_string(),
    ];
    wrapped.extend_from_slice(argv);
    wrapped
}

#[async_trait]
impl ScanRunner for ProcessRunner {
    async fn run(&self, kind: ScanKind, target: &Target) -> Result<String, ScanError> {
        let argv = match &self.transport {
            Transport::Local => scan_argv(kind, target),
            Transport::Remote(remote) => remote_argv(remote, &scan_argv(kind, target)),
        };
        debug!(command = ?argv, timeout_secs = self.timeout.as_secs(), "spawning scanner");

        let mut command = Command::new(&argv[0]);
        command
            .args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| ScanError::Timeout(self.timeout.as_secs()))?
            .map_err(|err| ScanError::ExecutionFailed(truncate(&err.to_string())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScanError::ExecutionFailed(truncate(stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn truncate(s: &str) -> String {
    s.chars().take(MAX_DIAGNOSTIC_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(s: &str) -> Target {
        s.parse().unwrap()
    }

    #[test]
    fn port_scan_argv_appends_target_as_single_argument() {
        let argv = scan_argv(ScanKind::Ports, &target("example.com"));
        assert_eq!(argv[0], "nmap");
        assert_eq!(argv.last().map(String::as_str), Some("example.com"));
        assert!(argv.contains(&"--top-ports".to_string()));
        assert!(argv.contains(&"100".to_string()));
    }

    #[test]
    fn vuln_scan_argv_targets_https_with_severity_filter() {
        let argv = scan_argv(ScanKind::Vuln, &target("example.com"));
        assert_eq!(argv[0], "nuclei");
        assert!(argv.contains(&"https://example.com".to_string()));
        assert!(argv.contains(&"critical,high,medium".to_string()));
        assert!(argv.contains(&"-json".to_string()));
    }

    #[test]
    fn remote_argv_preserves_scan_argv_verbatim() {
        let remote = RemoteConfig {
            host: "scanbox.internal".to_string(),
            user: "scanner".to_string(),
            key_path: "/home/op/.ssh/scan_key".to_string(),
        };
        let inner = scan_argv(ScanKind::Ports, &target("example.com"));
        let wrapped = remote_argv(&remote, &inner);

        assert_eq!(wrapped[0], "ssh");
        assert!(wrapped.contains(&"scanner@scanbox.internal".to_string()));
        assert!(wrapped.contains(&"BatchMode=yes".to_string()));
        assert_eq!(&wrapped[wrapped.len() - inner.len()..], inner.as_slice());
    }

    #[test]
    fn diagnostics_are_truncated() {
        let long = "x".repeat(1000);
        assert_eq!(truncate(&long).len(), MAX_DIAGNOSTIC_CHARS);
    }
}
