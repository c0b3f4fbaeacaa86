mod commands;
mod terminal;

use commands::{CommandLine, Commands, scan, validate};
use terminal::logging;
use warrant_common::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init();

    let cfg = Config::from_env();

    match commands.command {
        Commands::Validate { target } => validate::validate(&cfg, &target, commands.json),
        Commands::Scan {
            kind,
            target,
            token,
        } => scan::scan(&cfg, kind, &target, token.as_deref(), commands.json).await,
    }
}
