use warrant_common::config::Config;
use warrant_common::findings::ScanKind;
use warrant_core::service::ScanService;

use crate::commands::validate;
use crate::terminal::{print, spinner};

/// Runs the execution half of the workflow. Without a token this falls
/// back to the validate flow so the operator gets one to confirm with.
pub async fn scan(
    cfg: &Config,
    kind: ScanKind,
    target: &str,
    token: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let Some(token) = token else {
        validate::validate(cfg, target, json)?;
        print::rerun_hint(kind, target);
        return Ok(());
    };

    let service = ScanService::from_config(cfg);

    let progress = spinner::start_scan_spinner(format!("running {kind} scan against {target}"));
    let result = service.perform_scan(kind, target, token).await;
    progress.finish_and_clear();

    match result {
        Ok(result) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print::scan_report(&result);
            }
            Ok(())
        }
        Err(err) => {
            print::denial(&err);
            Err(err.into())
        }
    }
}
