use warrant_common::config::Config;
use warrant_core::service::ScanService;

use crate::terminal::print;

/// Runs the authorization half of the workflow: validate the target,
/// check the whitelist, and hand the operator a confirmation token.
pub fn validate(cfg: &Config, target: &str, json: bool) -> anyhow::Result<()> {
    let service = ScanService::from_config(cfg);

    match service.request_scan(target) {
        Ok(token) => {
            if json {
                let body = serde_json::json!({
                    "target": token.target.as_str(),
                    "token": token.id,
                    "expires_in_secs": token.expires_in.as_secs(),
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                print::token_issued(&token);
            }
            Ok(())
        }
        Err(err) => {
            print::denial(&err);
            Err(err.into())
        }
    }
}
