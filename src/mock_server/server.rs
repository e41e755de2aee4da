//! Axum-based mock probe target.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Smallest valid PNG: 1×1 transparent pixel.
const PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0b, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x60,
    0x00, 0x02, 0x00, 0x00, 0x05, 0x00, 0x01, 0x7a, 0x5e, 0xab, 0x3f, 0x00, 0x00, 0x00, 0x00,
    0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

type RequestLog = Arc<RwLock<Vec<String>>>;

/// A mock probe target for testing the dispatcher.
///
/// The server runs in the background on an ephemeral port and serves a
/// fixed set of endpoints shaped like the APIs the catalogue points at.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Paths of every request served, in order.
    requests: RequestLog,
}

impl MockServer {
    /// Start a new mock probe target.
    ///
    /// The server listens on a random available port and returns
    /// immediately. Use `url()` to get the base URL.
    pub async fn start() -> Self {
        let requests: RequestLog = Arc::new(RwLock::new(Vec::new()));
        let app = Self::create_router(requests.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            requests,
        }
    }

    /// Get the base URL of the mock server.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Paths of every request served so far.
    pub async fn requests(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    fn create_router(requests: RequestLog) -> Router {
        Router::new()
            .route("/json", get(json_doc))
            .route("/text", get(text_doc))
            .route("/image", get(image))
            .route("/status/:code", get(status_code))
            .route("/breeds/:breed", get(breed))
            .route("/health", get(health_check))
            .with_state(requests)
    }
}

async fn record(requests: &RequestLog, path: String) {
    requests.write().await.push(path);
}

/// Well-formed JSON document.
async fn json_doc(State(requests): State<RequestLog>) -> impl IntoResponse {
    record(&requests, "/json".to_string()).await;
    Json(serde_json::json!({
        "status": "ok",
        "service": "apidex-mock",
        "facts": ["probe targets respond", "bodies parse"],
    }))
}

/// Plain text body.
async fn text_doc(State(requests): State<RequestLog>) -> impl IntoResponse {
    record(&requests, "/text".to_string()).await;
    "A plain text body, served verbatim.\n"
}

/// A real PNG with the proper content type.
async fn image(State(requests): State<RequestLog>) -> impl IntoResponse {
    record(&requests, "/image".to_string()).await;
    ([(header::CONTENT_TYPE, "image/png")], PIXEL_PNG)
}

/// Respond with the requested status code and an empty body.
async fn status_code(
    State(requests): State<RequestLog>,
    Path(code): Path<u16>,
) -> impl IntoResponse {
    record(&requests, format!("/status/{code}")).await;
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Parameterized path, for template-resolution tests.
async fn breed(
    State(requests): State<RequestLog>,
    Path(breed): Path<String>,
) -> impl IntoResponse {
    record(&requests, format!("/breeds/{breed}")).await;
    Json(serde_json::json!({
        "breed": breed,
        "images": [format!("https://images.example/{breed}/1.jpg")],
    }))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{CallOutcome, Dispatcher, Payload};
    use crate::models::ResponseKind;

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/health", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_json_endpoint_dispatches() {
        let server = MockServer::start().await;
        let dispatcher = Dispatcher::new().unwrap();

        let outcome = dispatcher
            .dispatch(&format!("{}/json", server.url()), &ResponseKind::Json)
            .await;
        match outcome {
            CallOutcome::Success(Payload::Json(value)) => {
                assert_eq!(value["service"], "apidex-mock");
            }
            other => panic!("expected JSON success, got {other:?}"),
        }

        assert_eq!(server.requests().await, vec!["/json"]);
        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_status_endpoint_maps_to_http_error() {
        let server = MockServer::start().await;
        let dispatcher = Dispatcher::new().unwrap();

        let outcome = dispatcher
            .dispatch(&format!("{}/status/503", server.url()), &ResponseKind::Json)
            .await;
        match outcome {
            CallOutcome::HttpError { status, .. } => assert_eq!(status, 503),
            other => panic!("expected HTTP error, got {other:?}"),
        }

        server.shutdown().await;
    }
}
