//! Progress statistics derived from a view of the catalogue.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{ApiEntry, Status};

/// Per-status counts for a sequence of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub working: usize,
    pub broken: usize,
    pub needs_key: usize,
    pub paid_only: usize,
    pub skipped: usize,
    pub pending: usize,
    /// Entries whose status is outside the closed set.
    pub other: usize,
}

impl StatusCounts {
    /// Fold a sequence of entries into per-status totals.
    pub fn tally<'a>(entries: impl IntoIterator<Item = &'a ApiEntry>) -> Self {
        let mut counts = Self::default();
        for entry in entries {
            counts.total += 1;
            match entry.status {
                Status::Working => counts.working += 1,
                Status::Broken => counts.broken += 1,
                Status::NeedsKey => counts.needs_key += 1,
                Status::PaidOnly => counts.paid_only += 1,
                Status::Skipped => counts.skipped += 1,
                Status::Pending => counts.pending += 1,
                Status::Other(_) => counts.other += 1,
            }
        }
        counts
    }

    /// Entries that have been looked at, i.e. everything not pending.
    pub fn tested(&self) -> usize {
        self.total - self.pending
    }

    /// Tested share as a percentage, 0 for an empty set.
    pub fn percent_done(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.tested() as f64 / self.total as f64 * 100.0
        }
    }
}

/// Counts for one category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryProgress {
    pub name: String,
    #[serde(flatten)]
    pub counts: StatusCounts,
}

/// Orderings for the per-category progress table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ProgressSort {
    /// Alphabetical by category name.
    #[default]
    Name,
    /// Largest categories first.
    Total,
    /// Most tested entries first.
    Done,
    /// Most pending entries first.
    Pending,
}

/// Group entries by category, ordered per `sort`.
pub fn by_category<'a>(
    entries: impl IntoIterator<Item = &'a ApiEntry>,
    sort: ProgressSort,
) -> Vec<CategoryProgress> {
    let mut grouped: BTreeMap<&str, Vec<&ApiEntry>> = BTreeMap::new();
    for entry in entries {
        grouped.entry(entry.category.as_str()).or_default().push(entry);
    }

    let mut categories: Vec<CategoryProgress> = grouped
        .into_iter()
        .map(|(name, members)| CategoryProgress {
            name: name.to_string(),
            counts: StatusCounts::tally(members.into_iter()),
        })
        .collect();

    match sort {
        // BTreeMap iteration already yields name order.
        ProgressSort::Name => {}
        ProgressSort::Total => categories.sort_by(|a, b| b.counts.total.cmp(&a.counts.total)),
        ProgressSort::Done => categories.sort_by(|a, b| b.counts.tested().cmp(&a.counts.tested())),
        ProgressSort::Pending => {
            categories.sort_by(|a, b| b.counts.pending.cmp(&a.counts.pending))
        }
    }
    categories
}

/// Categories that still have pending entries, fewest pending first:
/// the ones closest to being fully tested.
pub fn closest_to_completion<'a>(
    entries: impl IntoIterator<Item = &'a ApiEntry>,
    limit: usize,
) -> Vec<CategoryProgress> {
    let mut candidates: Vec<CategoryProgress> = by_category(entries, ProgressSort::Name)
        .into_iter()
        .filter(|c| c.counts.pending > 0)
        .collect();
    candidates.sort_by(|a, b| a.counts.pending.cmp(&b.counts.pending));
    candidates.truncate(limit);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Auth, Cors};

    fn entry(name: &str, category: &str, status: Status) -> ApiEntry {
        ApiEntry {
            name: name.to_string(),
            url: format!("https://{name}.example"),
            description: String::new(),
            auth: Auth::None,
            https: true,
            cors: Cors::Unknown,
            category: category.to_string(),
            status,
            notes: String::new(),
            date_checked: None,
            try_it: None,
        }
    }

    #[test]
    fn test_tally_counts_every_status_once() {
        let entries = vec![
            entry("a", "x", Status::Working),
            entry("b", "x", Status::Working),
            entry("c", "x", Status::Broken),
            entry("d", "x", Status::Pending),
            entry("e", "x", Status::Other("weird".into())),
        ];
        let counts = StatusCounts::tally(&entries);
        assert_eq!(counts.total, 5);
        assert_eq!(counts.working, 2);
        assert_eq!(counts.broken, 1);
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.other, 1);
        assert_eq!(counts.tested(), 4);
        assert_eq!(counts.percent_done(), 80.0);
    }

    #[test]
    fn test_empty_tally_is_zero_percent() {
        let counts = StatusCounts::tally([]);
        assert_eq!(counts.total, 0);
        assert_eq!(counts.percent_done(), 0.0);
    }

    #[test]
    fn test_by_category_groups_and_sorts() {
        let entries = vec![
            entry("a", "books", Status::Working),
            entry("b", "animals", Status::Pending),
            entry("c", "animals", Status::Working),
            entry("d", "animals", Status::Pending),
        ];

        let by_name = by_category(&entries, ProgressSort::Name);
        let names: Vec<&str> = by_name.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["animals", "books"]);
        assert_eq!(by_name[0].counts.total, 3);

        let by_pending = by_category(&entries, ProgressSort::Pending);
        assert_eq!(by_pending[0].name, "animals");

        let by_total = by_category(&entries, ProgressSort::Total);
        assert_eq!(by_total[0].name, "animals");
    }

    #[test]
    fn test_closest_to_completion_skips_finished_categories() {
        let entries = vec![
            entry("a", "books", Status::Working),
            entry("b", "animals", Status::Pending),
            entry("c", "animals", Status::Pending),
            entry("d", "weather", Status::Pending),
        ];
        let next = closest_to_completion(&entries, 10);
        let names: Vec<&str> = next.iter().map(|c| c.name.as_str()).collect();
        // "books" is done; "weather" has fewer pending than "animals".
        assert_eq!(names, vec!["weather", "animals"]);
    }
}
