//! End-to-end flow against the feature-gated mock probe target.
//!
//! Run with: cargo test --features test-server

#![cfg(feature = "test-server")]

use apidex::mock_server::MockServer;
use apidex::{CallOutcome, Dispatcher, Payload, ResponseKind, UrlTemplate};

#[tokio::test]
async fn test_full_probe_flow_over_real_http() {
    let server = MockServer::start().await;
    let dispatcher = Dispatcher::new().unwrap();

    // JSON endpoint parses and pretty-prints.
    let outcome = dispatcher
        .dispatch(&format!("{}/json", server.url()), &ResponseKind::Json)
        .await;
    match &outcome {
        CallOutcome::Success(Payload::Json(value)) => {
            assert_eq!(value["service"], "apidex-mock");
        }
        other => panic!("expected JSON success, got {other:?}"),
    }

    // Text endpoint comes back verbatim.
    let outcome = dispatcher
        .dispatch(&format!("{}/text", server.url()), &ResponseKind::Text)
        .await;
    assert!(matches!(outcome, CallOutcome::Success(Payload::Text(_))));

    // Image endpoint is accepted without decoding the body.
    let outcome = dispatcher
        .dispatch(&format!("{}/image", server.url()), &ResponseKind::Image)
        .await;
    match outcome {
        CallOutcome::Success(Payload::Image { content_type, bytes }) => {
            assert_eq!(content_type, "image/png");
            assert!(bytes > 0);
        }
        other => panic!("expected image success, got {other:?}"),
    }

    server.shutdown().await;
}

#[tokio::test]
async fn test_template_resolution_drives_parameterized_endpoint() {
    let server = MockServer::start().await;
    let dispatcher = Dispatcher::new().unwrap();

    let template = UrlTemplate::parse(&format!("{}/breeds/{{breed}}", server.url()));
    let params = [("breed".to_string(), "husky".to_string())].into();
    let url = template.resolve_encoded(&params);

    let outcome = dispatcher.dispatch(&url, &ResponseKind::Json).await;
    match outcome {
        CallOutcome::Success(Payload::Json(value)) => {
            assert_eq!(value["breed"], "husky");
        }
        other => panic!("expected JSON success, got {other:?}"),
    }

    assert_eq!(server.requests().await, vec!["/breeds/husky"]);
    server.shutdown().await;
}

#[tokio::test]
async fn test_error_statuses_terminate_with_http_outcomes() {
    let server = MockServer::start().await;
    let dispatcher = Dispatcher::new().unwrap();

    for code in [404u16, 429, 500] {
        let outcome = dispatcher
            .dispatch(&format!("{}/status/{code}", server.url()), &ResponseKind::Json)
            .await;
        match outcome {
            CallOutcome::HttpError { status, .. } => assert_eq!(status, code),
            other => panic!("expected HTTP {code}, got {other:?}"),
        }
    }

    server.shutdown().await;
}
