//! Live-call dispatch against catalogued endpoints.
//!
//! [`Dispatcher::dispatch`] performs one HTTP GET and categorizes whatever
//! happens into a [`CallOutcome`]. It never returns `Err`: HTTP failures,
//! transport failures, and body-shape mismatches are all terminal outcome
//! variants, rendered inline by the caller. The in-flight state is simply
//! the unresolved future; each call is an independent instance with no
//! shared state between concurrent dispatches.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::error::{ApidexError, Result};
use crate::models::ResponseKind;

const USER_AGENT: &str = concat!("apidex/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "application/json, text/plain, image/*, */*";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Body size below which a non-`image/*` response is rejected as not an
/// image. Some hosts serve images with sloppy content types; a body this
/// small cannot be one.
const MIN_IMAGE_BYTES: usize = 100;

/// Terminal outcome of one live call.
#[derive(Debug, Clone)]
pub enum CallOutcome {
    /// The call succeeded and the body matched the declared kind.
    Success(Payload),
    /// The server answered with a non-success status.
    HttpError { status: u16, reason: String },
    /// The call never produced a usable response: connect/DNS/timeout
    /// failures, or a body that failed to parse as the declared kind.
    /// Carries a copyable shell fallback for the same URL.
    TransportError { message: String, curl_hint: String },
}

impl CallOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Success(_))
    }

    fn transport(url: &str, message: impl Into<String>) -> Self {
        CallOutcome::TransportError {
            message: message.into(),
            curl_hint: curl_hint(url),
        }
    }
}

/// Successfully fetched response body, per declared kind.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Parsed JSON document.
    Json(Value),
    /// Verbatim body text.
    Text(String),
    /// Image metadata; the body is fetched but never decoded.
    Image { content_type: String, bytes: usize },
}

/// Suggested command-line equivalent for a failed call.
fn curl_hint(url: &str) -> String {
    format!("curl -sSL '{url}'")
}

/// Performs live calls. Cheap to construct, reusable across calls; clones
/// share the underlying connection pool.
#[derive(Clone)]
pub struct Dispatcher {
    http: Client,
}

impl Dispatcher {
    /// Dispatcher with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Dispatcher with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(timeout)
            .build()
            .map_err(ApidexError::Http)?;
        Ok(Self { http })
    }

    /// Perform one GET and categorize the outcome.
    ///
    /// Unknown response kinds are dispatched as text.
    #[tracing::instrument(skip(self))]
    pub async fn dispatch(&self, url: &str, kind: &ResponseKind) -> CallOutcome {
        let response = match self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(error = %err, "transport failure");
                return CallOutcome::transport(url, err.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "http error outcome");
            return CallOutcome::HttpError {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            };
        }

        match kind {
            ResponseKind::Json => {
                let body = match response.text().await {
                    Ok(body) => body,
                    Err(err) => return CallOutcome::transport(url, err.to_string()),
                };
                match serde_json::from_str::<Value>(&body) {
                    Ok(value) => CallOutcome::Success(Payload::Json(value)),
                    Err(err) => CallOutcome::transport(
                        url,
                        format!("response was not valid JSON: {err}"),
                    ),
                }
            }
            ResponseKind::Image => {
                let content_type = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let body = match response.bytes().await {
                    Ok(body) => body,
                    Err(err) => return CallOutcome::transport(url, err.to_string()),
                };
                if content_type.to_lowercase().contains("image") || body.len() > MIN_IMAGE_BYTES {
                    CallOutcome::Success(Payload::Image {
                        content_type,
                        bytes: body.len(),
                    })
                } else {
                    CallOutcome::transport(
                        url,
                        format!("expected an image, got '{content_type}' ({} bytes)", body.len()),
                    )
                }
            }
            // Unknown kinds degrade to text rather than refusing to call.
            ResponseKind::Text | ResponseKind::Other(_) => match response.text().await {
                Ok(body) => CallOutcome::Success(Payload::Text(body)),
                Err(err) => CallOutcome::transport(url, err.to_string()),
            },
        }
    }
}
