//! Orchestration of the authorize → confirm → execute pipeline.
//!
//! `request_scan` and `perform_scan` are deliberately separate entry
//! points so a human confirmation step can sit between them. No scan
//! runs without a valid, unconsumed token bound to the exact target,
//! and the token is gone before the external scanner starts.

use std::time::Instant;

use tracing::{info, warn};

use warrant_common::config::Config;
use warrant_common::error::ScanError;
use warrant_common::findings::{ScanKind, ScanResult};
use warrant_common::target::Target;
use warrant_common::whitelist::Whitelist;

use crate::classify;
use crate::exec::{ProcessRunner, ScanRunner, Transport};
use crate::token::{ConfirmationToken, TOKEN_WINDOW, TokenRegistry};

/// Raw scanner output kept on the result, bounded so hostile or verbose
/// scanners cannot grow memory without limit.
const MAX_RAW_EXCERPT_CHARS: usize = 5000;

pub struct ScanService {
    whitelist: Whitelist,
    registry: TokenRegistry,
    runner: Box<dyn ScanRunner>,
}

impl ScanService {
    pub fn new(whitelist: Whitelist, runner: Box<dyn ScanRunner>) -> Self {
        Self {
            whitelist,
            registry: TokenRegistry::new(TOKEN_WINDOW),
            runner,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let transport = match &config.remote {
            Some(remote) => Transport::Remote(remote.clone()),
            None => Transport::Local,
        };
        let runner = ProcessRunner::new(transport, config.timeout);
        Self::new(config.whitelist.clone(), Box::new(runner))
    }

    /// Validates and authorizes a target, then issues a single-use
    /// confirmation token. Validation or authorization failures deny
    /// early and never touch the token registry.
    pub fn request_scan(&self, raw_target: &str) -> Result<ConfirmationToken, ScanError> {
        let target: Target = raw_target.parse()?;
        self.whitelist.authorize(&target)?;
        info!(target = %target, "target authorized, issuing confirmation token");
        Ok(self.registry.issue(target))
    }

    /// Redeems a confirmation token and runs the scan it authorizes.
    ///
    /// The token is consumed atomically before execution begins; a scan
    /// that fails afterwards does not get the token back.
    pub async fn perform_scan(
        &self,
        kind: ScanKind,
        raw_target: &str,
        token_id: &str,
    ) -> Result<ScanResult, ScanError> {
        let requested: Target = raw_target.parse()?;
        let bound = self.registry.redeem(token_id)?;

        if bound != requested {
            warn!(bound = %bound, requested = %requested, "token bound to a different target");
            return Err(ScanError::TokenInvalid);
        }

        info!(target = %bound, kind = %kind, "starting scan");
        let started = Instant::now();
        let raw = self.runner.run(kind, &bound).await?;
        let duration = started.elapsed();

        let findings = match kind {
            ScanKind::Ports => classify::classify_port_scan(&raw),
            ScanKind::Vuln => classify::classify_vuln_scan(&raw),
        };
        info!(
            target = %bound,
            kind = %kind,
            findings = findings.total(),
            duration_secs = duration.as_secs_f64(),
            "scan complete"
        );

        Ok(ScanResult::new(bound, kind, duration, findings, excerpt(&raw)))
    }
}

fn excerpt(raw: &str) -> String {
    raw.chars().take(MAX_RAW_EXCERPT_CHARS).collect()
}
