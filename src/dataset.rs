//! Dataset accessor and the edit operations used by the maintenance tools.
//!
//! A [`Dataset`] is loaded once and read-only for the session; the derived
//! views in [`crate::query`] and [`crate::stats`] are recomputed from it on
//! every invocation. The editing tools (`update`, `check --fix`, `parse`)
//! use a separate load → mutate → save cycle over the raw entry vector and
//! rewrite the whole file.

use std::path::Path;

use chrono::NaiveDate;

use crate::error::{ApidexError, Result};
use crate::models::{ApiEntry, Status, TryIt};
use crate::source::DataSource;

/// The catalogue, loaded once per session.
pub struct Dataset {
    entries: Vec<ApiEntry>,
}

impl Dataset {
    /// Wrap an already-loaded entry list.
    pub fn from_entries(entries: Vec<ApiEntry>) -> Self {
        Self { entries }
    }

    /// Load from a source. This is the session's single suspension point
    /// for dataset IO.
    pub async fn load(source: &dyn DataSource) -> Result<Self> {
        let entries = source.fetch().await?;
        tracing::debug!(count = entries.len(), origin = %source.origin(), "dataset loaded");
        Ok(Self { entries })
    }

    /// The immutable entry sequence.
    pub fn entries(&self) -> &[ApiEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted distinct category slugs.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> =
            self.entries.iter().map(|e| e.category.as_str()).collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    /// Release the entries for an edit cycle.
    pub fn into_entries(self) -> Vec<ApiEntry> {
        self.entries
    }
}

/// Find entries matching a name query, for the single-entry commands.
///
/// Exact (case-insensitive) name matches win; otherwise any entry whose name
/// contains the query is returned. `category` narrows the result.
pub fn find_matches<'a>(
    entries: &'a [ApiEntry],
    query: &str,
    category: Option<&str>,
) -> Vec<&'a ApiEntry> {
    let query_lower = query.to_lowercase();
    let in_category =
        |e: &ApiEntry| category.is_none_or(|c| e.category == c);

    let exact: Vec<&ApiEntry> = entries
        .iter()
        .filter(|e| e.name.to_lowercase() == query_lower && in_category(e))
        .collect();
    if !exact.is_empty() {
        return exact;
    }

    entries
        .iter()
        .filter(|e| e.name.to_lowercase().contains(&query_lower) && in_category(e))
        .collect()
}

/// Resolve a query to exactly one entry index.
pub fn find_one<'a>(
    entries: &'a [ApiEntry],
    query: &str,
    category: Option<&str>,
) -> Result<&'a ApiEntry> {
    let matches = find_matches(entries, query, category);
    match matches.len() {
        0 => Err(ApidexError::NoMatch(query.to_string())),
        1 => Ok(matches[0]),
        _ => Err(ApidexError::Ambiguous {
            query: query.to_string(),
            names: matches.iter().map(|e| e.name.clone()).collect(),
        }),
    }
}

/// Did-you-mean candidates for a missed query: entries whose name contains
/// any word of the query.
pub fn suggest<'a>(entries: &'a [ApiEntry], query: &str, limit: usize) -> Vec<&'a ApiEntry> {
    let words: Vec<String> = query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    entries
        .iter()
        .filter(|e| {
            let name = e.name.to_lowercase();
            words.iter().any(|w| name.contains(w))
        })
        .take(limit)
        .collect()
}

/// How an edit treats the try-it descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TryItChange {
    /// Leave whatever is there.
    #[default]
    Keep,
    /// Replace with a new descriptor.
    Set(TryIt),
    /// Null it out.
    Clear,
}

/// One edit against a catalogue entry.
#[derive(Debug, Clone, Default)]
pub struct EntryUpdate {
    pub status: Option<Status>,
    pub notes: Option<String>,
    pub try_it: TryItChange,
}

impl EntryUpdate {
    /// True when the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.notes.is_none() && self.try_it == TryItChange::Keep
    }
}

/// Apply an edit in place. Moving the status off `pending` stamps
/// `date-checked` with `today`.
pub fn apply_update(entry: &mut ApiEntry, update: &EntryUpdate, today: NaiveDate) {
    if let Some(status) = &update.status {
        entry.status = status.clone();
        if *status != Status::Pending {
            entry.date_checked = Some(today);
        }
    }
    if let Some(notes) = &update.notes {
        entry.notes = notes.clone();
    }
    match &update.try_it {
        TryItChange::Keep => {}
        TryItChange::Set(tryit) => entry.try_it = Some(tryit.clone()),
        TryItChange::Clear => entry.try_it = None,
    }
}

/// Read an entry list from a JSON file.
pub fn load_path(path: &Path) -> Result<Vec<ApiEntry>> {
    let raw = std::fs::read_to_string(path).map_err(|source| ApidexError::DatasetRead {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&raw)?)
}

/// Write an entry list back as pretty-printed JSON with a trailing newline.
pub fn save_path(path: &Path, entries: &[ApiEntry]) -> Result<()> {
    let mut body = serde_json::to_string_pretty(entries)?;
    body.push('\n');
    std::fs::write(path, body).map_err(|source| ApidexError::DatasetWrite {
        path: path.display().to_string(),
        source,
    })
}
