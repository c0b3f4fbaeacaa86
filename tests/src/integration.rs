//! End-to-end exercises of the authorize → confirm → execute pipeline
//! with the external scanner replaced by a stub runner.

use async_trait::async_trait;
use warrant_common::error::ScanError;
use warrant_common::findings::ScanKind;
use warrant_common::target::Target;
use warrant_common::whitelist::Whitelist;
use warrant_core::exec::ScanRunner;
use warrant_core::service::ScanService;

const NMAP_OUTPUT: &str = "\
Starting Nmap 7.94 ( https://nmap.org )
Nmap scan report for example.com
PORT     STATE SERVICE
22/tcp   open  ssh
80/tcp   open  http
3306/tcp open  mysql
";

const NUCLEI_OUTPUT: &str = concat!(
    r#"{"template-id":"tls-expired","info":{"name":"Expired TLS cert","severity":"critical"}}"#,
    "\n",
    r#"{"template-id":"http-title","info":{"name":"HTTP title","severity":"info"}}"#,
    "\n",
    "this line is not JSON\n",
);

/// Canned-output stand-in for the external scanner binaries.
struct StubRunner {
    output: Result<&'static str, ScanError>,
}

#[async_trait]
impl ScanRunner for StubRunner {
    async fn run(&self, _kind: ScanKind, _target: &Target) -> Result<String, ScanError> {
        self.output.clone().map(str::to_string)
    }
}

fn service_with(output: Result<&'static str, ScanError>) -> ScanService {
    ScanService::new(
        Whitelist::from_csv("example.com"),
        Box::new(StubRunner { output }),
    )
}

#[tokio::test]
async fn full_port_scan_flow() {
    let service = service_with(Ok(NMAP_OUTPUT));

    let token = service.request_scan("example.com").expect("authorized");
    assert_eq!(token.target.as_str(), "example.com");
    assert_eq!(token.id.len(), 16);

    let result = service
        .perform_scan(ScanKind::Ports, "example.com", &token.id)
        .await
        .expect("scan runs");

    assert_eq!(result.total_findings, 3);
    assert_eq!(result.summary.high, 1); // 3306
    assert_eq!(result.summary.medium, 1); // 22
    assert_eq!(result.summary.info, 1); // 80
    assert_eq!(result.summary.critical, 0);
    assert!(result.raw_excerpt.contains("3306/tcp"));
}

#[tokio::test]
async fn token_is_single_use() {
    let service = service_with(Ok(NMAP_OUTPUT));
    let token = service.request_scan("example.com").unwrap();

    service
        .perform_scan(ScanKind::Ports, "example.com", &token.id)
        .await
        .expect("first scan succeeds");

    let second = service
        .perform_scan(ScanKind::Ports, "example.com", &token.id)
        .await;
    assert_eq!(second.unwrap_err(), ScanError::TokenInvalid);
}

#[tokio::test]
async fn full_vuln_scan_flow_skips_garbage_lines() {
    let service = service_with(Ok(NUCLEI_OUTPUT));
    let token = service.request_scan("example.com").unwrap();

    let result = service
        .perform_scan(ScanKind::Vuln, "example.com", &token.id)
        .await
        .expect("scan runs");

    assert_eq!(result.total_findings, 2);
    assert_eq!(result.summary.critical, 1);
    assert_eq!(result.summary.info, 1);
}

#[tokio::test]
async fn a_token_redeems_either_scan_kind() {
    // Tokens are bound to a target only, not to a scan kind.
    let service = service_with(Ok(NUCLEI_OUTPUT));
    let token = service.request_scan("example.com").unwrap();

    let result = service
        .perform_scan(ScanKind::Vuln, "example.com", &token.id)
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn unlisted_target_is_denied_before_token_issue() {
    let service = service_with(Ok(NMAP_OUTPUT));

    let denied = service.request_scan("evilexample.com");
    assert!(matches!(
        denied,
        Err(ScanError::NotAuthorized { ref target, .. }) if target == "evilexample.com"
    ));
}

#[tokio::test]
async fn subdomain_of_whitelisted_entry_is_authorized() {
    let service = service_with(Ok(NMAP_OUTPUT));
    assert!(service.request_scan("sub.example.com").is_ok());
}

#[tokio::test]
async fn empty_whitelist_denies_valid_targets() {
    let service = ScanService::new(
        Whitelist::from_csv(""),
        Box::new(StubRunner {
            output: Ok(NMAP_OUTPUT),
        }),
    );
    assert_eq!(
        service.request_scan("example.com").unwrap_err(),
        ScanError::WhitelistEmpty
    );
}

#[tokio::test]
async fn invalid_target_never_reaches_the_registry() {
    let service = service_with(Ok(NMAP_OUTPUT));
    assert!(matches!(
        service.request_scan("bad target!"),
        Err(ScanError::InvalidTarget(_))
    ));
}

#[tokio::test]
async fn token_bound_to_other_target_is_rejected() {
    let service = service_with(Ok(NMAP_OUTPUT));
    let token = service.request_scan("sub.example.com").unwrap();

    let mismatched = service
        .perform_scan(ScanKind::Ports, "example.com", &token.id)
        .await;
    assert_eq!(mismatched.unwrap_err(), ScanError::TokenInvalid);

    // The mismatch consumed the token; the bound target cannot reuse it.
    let retry = service
        .perform_scan(ScanKind::Ports, "sub.example.com", &token.id)
        .await;
    assert_eq!(retry.unwrap_err(), ScanError::TokenInvalid);
}

#[tokio::test]
async fn failed_scans_do_not_refund_the_token() {
    let service = service_with(Err(ScanError::ExecutionFailed(
        "connection refused".to_string(),
    )));
    let token = service.request_scan("example.com").unwrap();

    let first = service
        .perform_scan(ScanKind::Ports, "example.com", &token.id)
        .await;
    assert!(matches!(first, Err(ScanError::ExecutionFailed(_))));

    let second = service
        .perform_scan(ScanKind::Ports, "example.com", &token.id)
        .await;
    assert_eq!(second.unwrap_err(), ScanError::TokenInvalid);
}

#[tokio::test]
async fn url_form_target_normalizes_to_whitelisted_host() -> anyhow::Result<()> {
    let service = service_with(Ok(NMAP_OUTPUT));

    let token = service.request_scan("https://EXAMPLE.com/admin")?;
    assert_eq!(token.target.as_str(), "example.com");

    let result = service
        .perform_scan(ScanKind::Ports, "example.com", &token.id)
        .await?;
    assert_eq!(result.target.as_str(), "example.com");
    Ok(())
}
