//! Bulk health check over the catalogue's working entries.
//!
//! Probes every `working` entry that carries a try-it URL, in dataset
//! order, one call at a time, and reports pass/fail per endpoint. `--fix`
//! support lives here too: a failed entry is marked broken, its try-it
//! descriptor cleared, and the check date stamped.

use chrono::NaiveDate;

use crate::dispatch::{CallOutcome, Dispatcher, Payload};
use crate::models::{ApiEntry, Status};
use crate::template::UrlTemplate;

/// Result of probing one entry.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    /// Index into the entry slice the check ran over.
    pub index: usize,
    pub name: String,
    pub category: String,
    /// The URL actually requested, defaults resolved and encoded.
    pub url: String,
    pub passed: bool,
    /// One-line outcome description for the progress listing.
    pub detail: String,
}

/// Indices of the entries a check run would probe: status `working` with a
/// non-empty try-it URL, optionally narrowed to one category.
pub fn candidates(entries: &[ApiEntry], category: Option<&str>) -> Vec<usize> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.status == Status::Working && e.is_testable())
        .filter(|(_, e)| category.is_none_or(|c| e.category == c))
        .map(|(i, _)| i)
        .collect()
}

/// Working entries skipped for lack of a try-it URL.
pub fn untestable<'a>(entries: &'a [ApiEntry], category: Option<&'a str>) -> Vec<&'a ApiEntry> {
    entries
        .iter()
        .filter(|e| e.status == Status::Working && !e.is_testable())
        .filter(|e| category.is_none_or(|c| e.category == c))
        .collect()
}

/// Probe a single entry's try-it endpoint.
///
/// The template is resolved against the descriptor's default params with
/// percent-encoding, exactly as an interactive `try` would request it.
pub async fn probe(dispatcher: &Dispatcher, entries: &[ApiEntry], index: usize) -> ProbeResult {
    let entry = &entries[index];

    let Some(tryit) = entry.try_it.as_ref().filter(|t| !t.url.is_empty()) else {
        return ProbeResult {
            index,
            name: entry.name.clone(),
            category: entry.category.clone(),
            url: String::new(),
            passed: false,
            detail: "no try-it URL".to_string(),
        };
    };

    let url = UrlTemplate::parse(&tryit.url).resolve_encoded(&tryit.default_params());
    tracing::debug!(name = %entry.name, url = %url, "probing");
    let outcome = dispatcher.dispatch(&url, &tryit.response_type).await;

    let (passed, detail) = match &outcome {
        CallOutcome::Success(Payload::Json(_)) => (true, "valid JSON".to_string()),
        CallOutcome::Success(Payload::Text(body)) => (true, format!("{} bytes", body.len())),
        CallOutcome::Success(Payload::Image { content_type, bytes }) => {
            (true, format!("{content_type} ({bytes} bytes)"))
        }
        CallOutcome::HttpError { status, reason } => (false, format!("HTTP {status} {reason}")),
        CallOutcome::TransportError { message, .. } => (false, message.clone()),
    };

    ProbeResult {
        index,
        name: entry.name.clone(),
        category: entry.category.clone(),
        url,
        passed,
        detail,
    }
}

/// Mark an entry broken after a failed probe.
pub fn mark_broken(entry: &mut ApiEntry, detail: &str, today: NaiveDate) {
    let previous = std::mem::take(&mut entry.notes);
    entry.status = Status::Broken;
    entry.notes = format!("Health check failed on {today}: {detail}. Previous: {previous}");
    entry.date_checked = Some(today);
    entry.try_it = None;
}
