pub mod scan;
pub mod validate;

use clap::{Parser, Subcommand};
use warrant_common::findings::ScanKind;

#[derive(Parser)]
#[command(name = "warrant")]
#[command(about = "Authorized network scans behind a human confirmation step.")]
pub struct CommandLine {
    /// Emit the result as JSON instead of terminal output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a target against the whitelist and issue a confirmation token
    #[command(alias = "v")]
    Validate { target: String },
    /// Run an authorized scan; requires a token from `validate`
    #[command(alias = "s")]
    Scan {
        /// Scan kind: ports (nmap) or vuln (nuclei)
        kind: ScanKind,
        target: String,
        /// Confirmation token issued by `validate`
        #[arg(long)]
        token: Option<String>,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
