//! Bulk health-check flow against a wiremock server.

use apidex::healthcheck::{self, candidates};
use apidex::{ApiEntry, Auth, Cors, Dispatcher, ResponseKind, Status, TryIt};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn entry(name: &str, status: Status, try_url: Option<String>) -> ApiEntry {
    ApiEntry {
        name: name.to_string(),
        url: format!("https://{name}.example/docs"),
        description: String::new(),
        auth: Auth::None,
        https: true,
        cors: Cors::Unknown,
        category: "animals".to_string(),
        status,
        notes: String::new(),
        date_checked: None,
        try_it: try_url.map(|url| TryIt {
            url,
            response_type: ResponseKind::Json,
            params: None,
        }),
    }
}

#[tokio::test]
async fn test_check_passes_healthy_and_fails_broken() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/healthy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dead"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let entries = vec![
        entry(
            "Healthy",
            Status::Working,
            Some(format!("{}/healthy", mock_server.uri())),
        ),
        entry(
            "Dead",
            Status::Working,
            Some(format!("{}/dead", mock_server.uri())),
        ),
        // Not working: never probed.
        entry("Ignored", Status::Pending, None),
        // Working but untestable: skipped.
        entry("Untestable", Status::Working, None),
    ];

    let targets = candidates(&entries, None);
    assert_eq!(targets, vec![0, 1]);
    assert_eq!(healthcheck::untestable(&entries, None).len(), 1);

    let dispatcher = Dispatcher::new().unwrap();

    let healthy = healthcheck::probe(&dispatcher, &entries, 0).await;
    assert!(healthy.passed);
    assert_eq!(healthy.detail, "valid JSON");

    let dead = healthcheck::probe(&dispatcher, &entries, 1).await;
    assert!(!dead.passed);
    assert!(dead.detail.contains("HTTP 503"), "detail: {}", dead.detail);
}

#[tokio::test]
async fn test_probe_resolves_template_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status/200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"code": 200})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut e = entry(
        "Statuses",
        Status::Working,
        Some(format!("{}/status/{{code}}", mock_server.uri())),
    );
    e.try_it.as_mut().unwrap().params =
        Some([("code".to_string(), "200".to_string())].into());

    let dispatcher = Dispatcher::new().unwrap();
    let entries = vec![e];
    let result = healthcheck::probe(&dispatcher, &entries, 0).await;
    assert!(result.passed);
    assert!(result.url.ends_with("/status/200"));
}

#[tokio::test]
async fn test_fix_marks_failures_broken() {
    let entries = vec![entry(
        "Gone",
        Status::Working,
        // Unreachable per RFC 2606.
        Some("http://gone.invalid/api".to_string()),
    )];

    let dispatcher = Dispatcher::new().unwrap();
    let result = healthcheck::probe(&dispatcher, &entries, 0).await;
    assert!(!result.passed);

    let mut entries = entries;
    let today = chrono::NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
    healthcheck::mark_broken(&mut entries[0], &result.detail, today);

    assert_eq!(entries[0].status, Status::Broken);
    assert!(entries[0].try_it.is_none());
    assert_eq!(entries[0].date_checked, Some(today));
    assert!(entries[0].notes.starts_with("Health check failed on 2026-08-07"));
}
