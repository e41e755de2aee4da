//! Catalogue entry model and field enumerations.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One catalogued public API.
///
/// Entries are stored as kebab-case JSON objects in the dataset file. The
/// pair (`name`, `url`) identifies an entry for duplicate detection; the
/// rest is descriptive. `try_it` is present only for endpoints that can be
/// probed without payment or auth friction, but nothing here enforces that;
/// the entry renders whatever is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApiEntry {
    /// Display name, also the default sort key.
    pub name: String,

    /// Documentation link.
    pub url: String,

    /// One-line description.
    pub description: String,

    /// Authentication scheme required by the API.
    pub auth: Auth,

    /// Whether the API is served over HTTPS.
    pub https: bool,

    /// Cross-origin support as documented upstream.
    pub cors: Cors,

    /// Category slug (kebab-case, drawn from the dataset's observed set).
    pub category: String,

    /// Testing status.
    pub status: Status,

    /// Free-form testing notes.
    #[serde(default)]
    pub notes: String,

    /// Date the entry was last checked, absent until first tested.
    #[serde(default)]
    pub date_checked: Option<NaiveDate>,

    /// Live-probe descriptor, absent or null for untestable entries.
    #[serde(default)]
    pub try_it: Option<TryIt>,
}

impl ApiEntry {
    /// Identity pair used for duplicate detection.
    pub fn identity(&self) -> (&str, &str) {
        (&self.name, &self.url)
    }

    /// True when the entry carries a non-empty try-it URL.
    pub fn is_testable(&self) -> bool {
        self.try_it.as_ref().is_some_and(|t| !t.url.is_empty())
    }
}

/// Describes how to fire a live request against a catalogued API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TryIt {
    /// Endpoint URL, possibly containing `{name}`-style placeholders.
    pub url: String,

    /// How the response body should be interpreted.
    pub response_type: ResponseKind,

    /// Default values for the URL placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, String>>,
}

impl TryIt {
    /// Default parameter values, empty when none are declared.
    pub fn default_params(&self) -> BTreeMap<String, String> {
        self.params.clone().unwrap_or_default()
    }
}

/// Authentication scheme for a catalogued API.
///
/// Unrecognized values are preserved in [`Auth::Other`] so rendering can
/// degrade to the raw string instead of failing; the `validate` subcommand
/// is what enforces the closed set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Auth {
    None,
    ApiKey,
    OAuth,
    XMashapeKey,
    UserAgent,
    Other(String),
}

impl Auth {
    /// Canonical members of the closed set.
    pub const ALL: [Auth; 5] = [
        Auth::None,
        Auth::ApiKey,
        Auth::OAuth,
        Auth::XMashapeKey,
        Auth::UserAgent,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Auth::None => "none",
            Auth::ApiKey => "api-key",
            Auth::OAuth => "oauth",
            Auth::XMashapeKey => "x-mashape-key",
            Auth::UserAgent => "user-agent",
            Auth::Other(raw) => raw,
        }
    }

    /// False for values outside the closed enumeration.
    pub fn is_known(&self) -> bool {
        !matches!(self, Auth::Other(_))
    }
}

impl From<String> for Auth {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "none" => Auth::None,
            "api-key" => Auth::ApiKey,
            "oauth" => Auth::OAuth,
            "x-mashape-key" => Auth::XMashapeKey,
            "user-agent" => Auth::UserAgent,
            _ => Auth::Other(raw),
        }
    }
}

impl From<Auth> for String {
    fn from(auth: Auth) -> Self {
        auth.as_str().to_string()
    }
}

impl fmt::Display for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cross-origin support as documented by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Cors {
    Yes,
    No,
    Unknown,
    Other(String),
}

impl Cors {
    pub const ALL: [Cors; 3] = [Cors::Yes, Cors::No, Cors::Unknown];

    pub fn as_str(&self) -> &str {
        match self {
            Cors::Yes => "yes",
            Cors::No => "no",
            Cors::Unknown => "unknown",
            Cors::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Cors::Other(_))
    }
}

impl From<String> for Cors {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "yes" => Cors::Yes,
            "no" => Cors::No,
            "unknown" => Cors::Unknown,
            _ => Cors::Other(raw),
        }
    }
}

impl From<Cors> for String {
    fn from(cors: Cors) -> Self {
        cors.as_str().to_string()
    }
}

impl fmt::Display for Cors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Testing status of a catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Pending,
    Working,
    Broken,
    PaidOnly,
    NeedsKey,
    Skipped,
    Other(String),
}

impl Status {
    /// Canonical members, in the order progress displays use.
    pub const ALL: [Status; 6] = [
        Status::Working,
        Status::Broken,
        Status::NeedsKey,
        Status::PaidOnly,
        Status::Skipped,
        Status::Pending,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Status::Pending => "pending",
            Status::Working => "working",
            Status::Broken => "broken",
            Status::PaidOnly => "paid-only",
            Status::NeedsKey => "needs-key",
            Status::Skipped => "skipped",
            Status::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Status::Other(_))
    }

    /// Display rank for category detail listings: tested states first,
    /// pending last, out-of-set values at the very end.
    pub fn rank(&self) -> u8 {
        match self {
            Status::Working => 0,
            Status::Broken => 1,
            Status::NeedsKey => 2,
            Status::PaidOnly => 3,
            Status::Skipped => 4,
            Status::Pending => 5,
            Status::Other(_) => 9,
        }
    }
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => Status::Pending,
            "working" => Status::Working,
            "broken" => Status::Broken,
            "paid-only" => Status::PaidOnly,
            "needs-key" => Status::NeedsKey,
            "skipped" => Status::Skipped,
            _ => Status::Other(raw),
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared shape of a try-it response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResponseKind {
    Json,
    Image,
    Text,
    Other(String),
}

impl ResponseKind {
    pub const ALL: [ResponseKind; 3] =
        [ResponseKind::Json, ResponseKind::Image, ResponseKind::Text];

    pub fn as_str(&self) -> &str {
        match self {
            ResponseKind::Json => "json",
            ResponseKind::Image => "image",
            ResponseKind::Text => "text",
            ResponseKind::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ResponseKind::Other(_))
    }
}

impl From<String> for ResponseKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "json" => ResponseKind::Json,
            "image" => ResponseKind::Image,
            "text" => ResponseKind::Text,
            _ => ResponseKind::Other(raw),
        }
    }
}

impl From<ResponseKind> for String {
    fn from(kind: ResponseKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "name": "Dogs",
            "url": "https://dog.ceo/dog-api/",
            "description": "Based on the Stanford Dogs Dataset",
            "auth": "none",
            "https": true,
            "cors": "yes",
            "category": "animals",
            "status": "working",
            "notes": "GET /api/breeds/image/random",
            "date-checked": "2026-08-01",
            "try-it": {
                "url": "https://dog.ceo/api/breeds/{breed}/images",
                "response-type": "json",
                "params": { "breed": "husky" }
            }
        })
    }

    #[test]
    fn test_entry_deserializes_kebab_case() {
        let entry: ApiEntry = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(entry.name, "Dogs");
        assert_eq!(entry.auth, Auth::None);
        assert_eq!(entry.status, Status::Working);
        assert_eq!(entry.date_checked.unwrap().to_string(), "2026-08-01");

        let tryit = entry.try_it.as_ref().unwrap();
        assert_eq!(tryit.response_type, ResponseKind::Json);
        assert_eq!(tryit.params.as_ref().unwrap()["breed"], "husky");
        assert!(entry.is_testable());
    }

    #[test]
    fn test_entry_serializes_kebab_case() {
        let entry: ApiEntry = serde_json::from_value(sample_json()).unwrap();
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["date-checked"], "2026-08-01");
        assert_eq!(value["try-it"]["response-type"], "json");
        assert_eq!(value["auth"], "none");
    }

    #[test]
    fn test_null_try_it_and_missing_date() {
        let entry: ApiEntry = serde_json::from_value(serde_json::json!({
            "name": "Cat Facts",
            "url": "https://catfact.ninja",
            "description": "Daily cat facts",
            "auth": "none",
            "https": true,
            "cors": "no",
            "category": "animals",
            "status": "pending",
            "notes": "",
            "date-checked": null,
            "try-it": null
        }))
        .unwrap();
        assert!(entry.date_checked.is_none());
        assert!(entry.try_it.is_none());
        assert!(!entry.is_testable());
    }

    #[test]
    fn test_unrecognized_enum_values_degrade_to_raw() {
        let status = Status::from("experimental".to_string());
        assert_eq!(status, Status::Other("experimental".to_string()));
        assert_eq!(status.as_str(), "experimental");
        assert!(!status.is_known());

        let auth = Auth::from("basic".to_string());
        assert_eq!(auth.as_str(), "basic");

        // Round-trips back out as the same raw string.
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json, "experimental");
    }

    #[test]
    fn test_status_rank_orders_pending_last() {
        assert!(Status::Working.rank() < Status::Broken.rank());
        assert!(Status::Skipped.rank() < Status::Pending.rank());
        assert!(Status::Pending.rank() < Status::Other("x".into()).rank());
    }
}
