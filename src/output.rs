//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::dispatch::{CallOutcome, Payload};
use crate::models::ApiEntry;

/// Trait for human-readable key-value output.
///
/// Implemented by types that get formatted for terminal display when
/// `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for ApiEntry {
    fn pretty_print(&self) -> String {
        let header = format!("{} ({})", self.name, self.category);
        let divider = "─".repeat(header.chars().count().max(30));

        let mut lines = vec![
            header,
            divider,
            format!("Docs:           {}", self.url),
            format!("Description:    {}", self.description),
            format!("Auth:           {}", self.auth),
            format!("HTTPS:          {}", if self.https { "yes" } else { "no" }),
            format!("CORS:           {}", self.cors),
            format!("Status:         {}", self.status),
        ];

        if !self.notes.is_empty() {
            lines.push(format!("Notes:          {}", self.notes));
        }

        if let Some(checked) = self.date_checked {
            lines.push(format!("Checked:        {checked}"));
        }

        match &self.try_it {
            Some(tryit) => {
                lines.push(format!(
                    "Try it:         {} ({})",
                    tryit.url, tryit.response_type
                ));
                if let Some(params) = &tryit.params {
                    let rendered: Vec<String> =
                        params.iter().map(|(k, v)| format!("{k}={v}")).collect();
                    lines.push(format!("Params:         {}", rendered.join(", ")));
                }
            }
            None => lines.push("Try it:         (none)".to_string()),
        }

        lines.join("\n")
    }
}

impl PrettyPrint for CallOutcome {
    fn pretty_print(&self) -> String {
        match self {
            CallOutcome::Success(Payload::Json(value)) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            CallOutcome::Success(Payload::Text(body)) => body.clone(),
            CallOutcome::Success(Payload::Image { content_type, bytes }) => {
                let kind = if content_type.is_empty() {
                    "image"
                } else {
                    content_type
                };
                format!("{kind} ({bytes} bytes)")
            }
            CallOutcome::HttpError { status, reason } => {
                if reason.is_empty() {
                    format!("HTTP {status}")
                } else {
                    format!("HTTP {status} {reason}")
                }
            }
            CallOutcome::TransportError { message, curl_hint } => {
                format!("request failed: {message}\nTry it from your shell:\n  {curl_hint}")
            }
        }
    }
}
