//! In-memory filter and sort over the catalogue.
//!
//! [`compute_view`] is a pure function of its arguments: it never mutates
//! the entry slice, and re-invoking it with identical inputs yields an
//! identical ordering, tie order included.

use std::borrow::Cow;

use crate::models::ApiEntry;

/// Filter criteria, combined with logical AND. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    /// Case-insensitive substring match against name or description.
    pub free_text: String,
    /// Exact category slug.
    pub category: String,
    /// Exact auth value.
    pub auth: String,
    /// Exact status value.
    pub status: String,
}

impl Criteria {
    /// True when no clause is set, so every entry matches.
    pub fn is_empty(&self) -> bool {
        self.free_text.is_empty()
            && self.category.is_empty()
            && self.auth.is_empty()
            && self.status.is_empty()
    }

    /// Whether an entry satisfies every clause.
    pub fn matches(&self, entry: &ApiEntry) -> bool {
        if !self.free_text.is_empty() {
            let needle = self.free_text.to_lowercase();
            let hit = entry.name.to_lowercase().contains(&needle)
                || entry.description.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        if !self.category.is_empty() && self.category != entry.category {
            return false;
        }
        if !self.auth.is_empty() && self.auth != entry.auth.as_str() {
            return false;
        }
        if !self.status.is_empty() && self.status != entry.status.as_str() {
            return false;
        }
        true
    }
}

/// Column a view can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    Category,
    Auth,
    Https,
    Cors,
    Status,
    DateChecked,
    /// Unrecognized column name. Projects every entry to the empty string,
    /// so the view degenerates to filtered order. A documented fallback,
    /// not a failure.
    Unknown,
}

impl SortKey {
    /// Parse a column name; anything unrecognized becomes [`SortKey::Unknown`].
    pub fn parse(key: &str) -> Self {
        match key {
            "name" => SortKey::Name,
            "category" => SortKey::Category,
            "auth" => SortKey::Auth,
            "https" => SortKey::Https,
            "cors" => SortKey::Cors,
            "status" => SortKey::Status,
            "date-checked" => SortKey::DateChecked,
            _ => SortKey::Unknown,
        }
    }

    /// String projection of the sort field; absent values project to "".
    fn project<'a>(&self, entry: &'a ApiEntry) -> Cow<'a, str> {
        match self {
            SortKey::Name => Cow::Borrowed(entry.name.as_str()),
            SortKey::Category => Cow::Borrowed(entry.category.as_str()),
            SortKey::Auth => Cow::Borrowed(entry.auth.as_str()),
            SortKey::Https => Cow::Borrowed(if entry.https { "yes" } else { "no" }),
            SortKey::Cors => Cow::Borrowed(entry.cors.as_str()),
            SortKey::Status => Cow::Borrowed(entry.status.as_str()),
            SortKey::DateChecked => entry
                .date_checked
                .map(|d| Cow::Owned(d.to_string()))
                .unwrap_or(Cow::Borrowed("")),
            SortKey::Unknown => Cow::Borrowed(""),
        }
    }
}

/// Compute the filtered, sorted view of the catalogue.
///
/// The sort is stable: entries with equal sort-key projections keep their
/// filtered (dataset) order regardless of direction.
pub fn compute_view<'a>(
    entries: &'a [ApiEntry],
    criteria: &Criteria,
    sort: SortKey,
    ascending: bool,
) -> Vec<&'a ApiEntry> {
    let mut view: Vec<&ApiEntry> = entries.iter().filter(|e| criteria.matches(e)).collect();
    view.sort_by(|a, b| {
        let (ka, kb) = (sort.project(a), sort.project(b));
        if ascending {
            ka.cmp(&kb)
        } else {
            kb.cmp(&ka)
        }
    });
    view
}
