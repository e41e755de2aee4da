//! Dataset validation, the pre-commit collaborator.
//!
//! The query and render layers tolerate almost anything; this is where the
//! rules actually get enforced: identity uniqueness, closed enum sets, and
//! the URL safety boundary for try-it endpoints (no non-http schemes, no
//! loopback or private-range hosts; these URLs get requested verbatim by
//! the health check).

use std::collections::HashMap;
use std::fmt;

use url::{Host, Url};

use crate::models::ApiEntry;
use crate::template::UrlTemplate;

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Entry name, or "dataset" for cross-entry findings.
    pub subject: String,
    pub message: String,
}

impl Violation {
    fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

/// Validate the whole dataset. Empty result means it is good to commit.
pub fn validate(entries: &[ApiEntry]) -> Vec<Violation> {
    let mut violations = Vec::new();

    // Identity: (name, url) must be unique across the dataset.
    let mut seen: HashMap<(&str, &str), usize> = HashMap::new();
    for entry in entries {
        *seen.entry(entry.identity()).or_default() += 1;
    }
    for ((name, url), count) in seen {
        if count > 1 {
            violations.push(Violation::new(
                "dataset",
                format!("duplicate entry ({name}, {url}) appears {count} times"),
            ));
        }
    }

    for entry in entries {
        validate_entry(entry, &mut violations);
    }

    violations
}

fn validate_entry(entry: &ApiEntry, violations: &mut Vec<Violation>) {
    let subject = if entry.name.is_empty() {
        "(unnamed)"
    } else {
        entry.name.as_str()
    };

    if entry.name.trim().is_empty() {
        violations.push(Violation::new(subject, "name is empty"));
    }
    if entry.url.trim().is_empty() {
        violations.push(Violation::new(subject, "documentation url is empty"));
    } else {
        match Url::parse(&entry.url) {
            Ok(url) if !matches!(url.scheme(), "http" | "https") => {
                violations.push(Violation::new(
                    subject,
                    format!("documentation url has scheme '{}'", url.scheme()),
                ));
            }
            Ok(_) => {}
            Err(err) => violations.push(Violation::new(
                subject,
                format!("documentation url does not parse: {err}"),
            )),
        }
    }

    if !entry.auth.is_known() {
        violations.push(Violation::new(
            subject,
            format!("auth '{}' is not in the closed set", entry.auth),
        ));
    }
    if !entry.cors.is_known() {
        violations.push(Violation::new(
            subject,
            format!("cors '{}' is not in the closed set", entry.cors),
        ));
    }
    if !entry.status.is_known() {
        violations.push(Violation::new(
            subject,
            format!("status '{}' is not in the closed set", entry.status),
        ));
    }

    if let Some(tryit) = &entry.try_it {
        if !tryit.response_type.is_known() {
            violations.push(Violation::new(
                subject,
                format!(
                    "try-it response-type '{}' is not in the closed set",
                    tryit.response_type
                ),
            ));
        }

        let template = UrlTemplate::parse(&tryit.url);
        let defaults = tryit.default_params();
        let placeholders = template.placeholders();

        for key in &placeholders {
            if !defaults.contains_key(*key) {
                violations.push(Violation::new(
                    subject,
                    format!("try-it placeholder '{{{key}}}' has no default param"),
                ));
            }
        }
        for key in defaults.keys() {
            if !placeholders.contains(&key.as_str()) {
                violations.push(Violation::new(
                    subject,
                    format!("try-it param '{key}' matches no placeholder"),
                ));
            }
        }

        let resolved = template.resolve_encoded(&defaults);
        match Url::parse(&resolved) {
            Ok(url) => {
                if !matches!(url.scheme(), "http" | "https") {
                    violations.push(Violation::new(
                        subject,
                        format!("try-it url has scheme '{}'", url.scheme()),
                    ));
                }
                if let Some(reason) = forbidden_host(&url) {
                    violations.push(Violation::new(
                        subject,
                        format!("try-it url targets {reason}"),
                    ));
                }
            }
            Err(err) => violations.push(Violation::new(
                subject,
                format!("try-it url does not parse: {err}"),
            )),
        }
    }
}

/// Loopback and private-range hosts are off limits for try-it URLs.
fn forbidden_host(url: &Url) -> Option<&'static str> {
    match url.host() {
        Some(Host::Domain(domain)) => {
            let domain = domain.to_lowercase();
            if domain == "localhost" || domain.ends_with(".localhost") {
                Some("localhost")
            } else {
                None
            }
        }
        Some(Host::Ipv4(ip)) => {
            if ip.is_loopback() || ip.is_unspecified() {
                Some("a loopback address")
            } else if ip.is_private() || ip.is_link_local() {
                Some("a private address")
            } else {
                None
            }
        }
        Some(Host::Ipv6(ip)) => {
            if ip.is_loopback() || ip.is_unspecified() {
                Some("a loopback address")
            } else {
                None
            }
        }
        None => None,
    }
}
