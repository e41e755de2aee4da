//! `{name}`-style placeholder substitution for try-it URLs.
//!
//! Templates are tokenized once into literal and placeholder segments, so a
//! placeholder that appears twice is substituted everywhere. Placeholders
//! with no matching parameter are rendered back verbatim as `{key}`:
//! resolution is best-effort, and the gap stays visible in the URL preview
//! so the caller can spot it before dispatching.

use std::collections::BTreeMap;

/// A URL template split into literal and placeholder segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

impl UrlTemplate {
    /// Tokenize a template string.
    ///
    /// A placeholder is a brace-delimited span with a non-empty key and no
    /// nested braces; anything else, including an unterminated `{`, stays
    /// literal text.
    pub fn parse(raw: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = raw;

        while let Some(open) = rest.find('{') {
            let (before, tail) = rest.split_at(open);
            literal.push_str(before);

            match tail[1..].find(['{', '}']) {
                // Well-formed, non-empty key.
                Some(end) if tail.as_bytes()[1 + end] == b'}' && end > 0 => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(tail[1..1 + end].to_string()));
                    rest = &tail[end + 2..];
                }
                // `{}`, `{{`, or unterminated: keep the brace literal.
                _ => {
                    literal.push('{');
                    rest = &tail[1..];
                }
            }
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    /// Distinct placeholder keys in first-seen order.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(key) = segment {
                if !keys.contains(&key.as_str()) {
                    keys.push(key);
                }
            }
        }
        keys
    }

    /// True when the template contains at least one placeholder.
    pub fn is_parameterized(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Placeholder(_)))
    }

    /// Substitute raw parameter values; the human-readable preview variant.
    pub fn resolve(&self, params: &BTreeMap<String, String>) -> String {
        self.render(params, |value| value.to_string())
    }

    /// Substitute percent-encoded parameter values; the variant used to
    /// build the actual outbound request URL.
    pub fn resolve_encoded(&self, params: &BTreeMap<String, String>) -> String {
        self.render(params, |value| urlencoding::encode(value).into_owned())
    }

    fn render(
        &self,
        params: &BTreeMap<String, String>,
        encode: impl Fn(&str) -> String,
    ) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(key) => match params.get(key) {
                    Some(value) => out.push_str(&encode(value)),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                },
            }
        }
        out
    }
}

/// One-shot resolution of a template string against raw parameter values.
pub fn resolve(template: &str, params: &BTreeMap<String, String>) -> String {
    UrlTemplate::parse(template).resolve(params)
}
