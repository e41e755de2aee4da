//! Parser for the upstream markdown API list.
//!
//! Turns `| [Name](url) | description | auth | https | cors |` table rows
//! into catalogue entries. Categories come from `### ` headers; rows that
//! appear before the first category header (promotional tables and the
//! like) are skipped. New entries start life as `pending` with empty notes.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{ApiEntry, Auth, Cors, Status};

static ROW_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // Name/link, description, auth (backticked or the literal No), HTTPS,
    // CORS (sometimes empty, sometimes the upstream "Unkown" typo).
    Regex::new(
        r"(?x)
        ^\|\s*\[([^\]]+)\]\(([^)]+)\)\s*\|   # name and url
        \s*(.+?)\s*\|                        # description
        \s*(`[^`]+`|No)\s*\|                 # auth
        \s*(Yes|No|YES)\s*\|                 # https
        \s*(Yes|No|Unknown|Unkown|)\s*       # cors
        \|?\s*$
        ",
    )
    .expect("row pattern is valid")
});

/// Kebab-case slug for a category header.
pub fn slugify(text: &str) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;
    for c in text.chars() {
        if c == '&' {
            continue;
        }
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Normalize the upstream auth column to the catalogue's kebab-case set.
pub fn normalize_auth(raw: &str) -> Auth {
    let stripped = raw.trim_matches(|c| c == '`' || c == ' ').to_lowercase();
    match stripped.as_str() {
        "no" => Auth::None,
        "apikey" => Auth::ApiKey,
        other => Auth::from(other.to_string()),
    }
}

/// Normalize the upstream CORS column, tolerating the "Unkown" typo and
/// missing values.
pub fn normalize_cors(raw: &str) -> Cors {
    match raw.trim().to_lowercase().as_str() {
        "" | "unkown" | "unknown" => Cors::Unknown,
        other => Cors::from(other.to_string()),
    }
}

/// Parse the markdown list into catalogue entries.
pub fn parse_markdown(input: &str) -> Vec<ApiEntry> {
    let mut entries = Vec::new();
    let mut current_category: Option<String> = None;

    for line in input.lines() {
        if let Some(header) = line.strip_prefix("### ") {
            current_category = Some(slugify(header.trim()));
            continue;
        }

        if !line.starts_with("| [") {
            continue;
        }

        let Some(captures) = ROW_PATTERN.captures(line) else {
            continue;
        };
        let Some(category) = &current_category else {
            continue;
        };

        entries.push(ApiEntry {
            name: captures[1].to_string(),
            url: captures[2].to_string(),
            description: captures[3].replace('\t', " ").trim().to_string(),
            auth: normalize_auth(&captures[4]),
            https: captures[5].eq_ignore_ascii_case("yes"),
            cors: normalize_cors(&captures[6]),
            category: category.clone(),
            status: Status::Pending,
            notes: String::new(),
            date_checked: None,
            try_it: None,
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
## Index

| API | Description |
|---|---|
| [Promo](https://promo.example) | Not under a category |

### Animals

| API | Description | Auth | HTTPS | CORS |
|---|---|---|---|---|
| [Dogs](https://dog.ceo/dog-api/) | Based on the Stanford Dogs Dataset | No | Yes | Yes |
| [Petfinder](https://www.petfinder.com/developers/) | Adoptable pets | `OAuth` | Yes | Unkown |

### Books & Comics

| API | Description | Auth | HTTPS | CORS |
|---|---|---|---|---|
| [Open Library](https://openlibrary.org/dev/docs/api/books) | Book metadata | `apiKey` | Yes | No |
";

    #[test]
    fn test_parse_rows_under_categories() {
        let entries = parse_markdown(SAMPLE);
        assert_eq!(entries.len(), 3);

        let dogs = &entries[0];
        assert_eq!(dogs.name, "Dogs");
        assert_eq!(dogs.url, "https://dog.ceo/dog-api/");
        assert_eq!(dogs.auth, Auth::None);
        assert!(dogs.https);
        assert_eq!(dogs.cors, Cors::Yes);
        assert_eq!(dogs.category, "animals");
        assert_eq!(dogs.status, Status::Pending);
        assert!(dogs.try_it.is_none());
    }

    #[test]
    fn test_rows_before_first_category_are_skipped() {
        let entries = parse_markdown(SAMPLE);
        assert!(entries.iter().all(|e| e.name != "Promo"));
    }

    #[test]
    fn test_auth_and_cors_normalization() {
        let entries = parse_markdown(SAMPLE);
        assert_eq!(entries[1].auth, Auth::OAuth);
        assert_eq!(entries[1].cors, Cors::Unknown, "'Unkown' typo normalized");
        assert_eq!(entries[2].auth, Auth::ApiKey);
        assert_eq!(entries[2].cors, Cors::No);
    }

    #[test]
    fn test_category_header_slugified() {
        let entries = parse_markdown(SAMPLE);
        assert_eq!(entries[2].category, "books-comics");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Animals"), "animals");
        assert_eq!(slugify("Books & Comics"), "books-comics");
        assert_eq!(slugify("Continuous Integration"), "continuous-integration");
        assert_eq!(slugify("  Odd--Header  "), "odd-header");
    }
}
