//! Dataset edit round-trips through a temp file.

use apidex::dataset::{self, EntryUpdate, TryItChange};
use apidex::{find_matches, ResponseKind, Status, TryIt};

fn fixture_json() -> String {
    serde_json::json!([
        {
            "name": "Dogs",
            "url": "https://dog.ceo/dog-api/",
            "description": "Based on the Stanford Dogs Dataset",
            "auth": "none",
            "https": true,
            "cors": "yes",
            "category": "animals",
            "status": "pending",
            "notes": "",
            "date-checked": null,
            "try-it": null
        },
        {
            "name": "Cat Facts",
            "url": "https://alexwohlbruck.github.io/cat-facts/",
            "description": "Daily cat facts",
            "auth": "none",
            "https": true,
            "cors": "no",
            "category": "animals",
            "status": "pending",
            "notes": "",
            "date-checked": null,
            "try-it": null
        }
    ])
    .to_string()
}

#[test]
fn test_load_update_save_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("apis.json");
    std::fs::write(&path, fixture_json()).unwrap();

    let mut entries = dataset::load_path(&path).unwrap();
    assert_eq!(entries.len(), 2);

    let index = {
        let matches = find_matches(&entries, "dogs", None);
        assert_eq!(matches.len(), 1);
        entries
            .iter()
            .position(|e| e.name == matches[0].name)
            .unwrap()
    };

    let today = chrono::NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
    dataset::apply_update(
        &mut entries[index],
        &EntryUpdate {
            status: Some(Status::Working),
            notes: Some("GET /api/breeds/image/random".to_string()),
            try_it: TryItChange::Set(TryIt {
                url: "https://dog.ceo/api/breeds/image/random".to_string(),
                response_type: ResponseKind::Json,
                params: None,
            }),
        },
        today,
    );
    dataset::save_path(&path, &entries).unwrap();

    // Reload and verify the edit survived serialization.
    let reloaded = dataset::load_path(&path).unwrap();
    let dogs = &reloaded[index];
    assert_eq!(dogs.status, Status::Working);
    assert_eq!(dogs.notes, "GET /api/breeds/image/random");
    assert_eq!(dogs.date_checked, Some(today));
    assert_eq!(
        dogs.try_it.as_ref().unwrap().url,
        "https://dog.ceo/api/breeds/image/random"
    );

    // The untouched entry is byte-identical in meaning.
    assert_eq!(reloaded[1 - index].status, Status::Pending);
    assert!(reloaded[1 - index].date_checked.is_none());
}

#[test]
fn test_saved_file_is_pretty_printed_with_trailing_newline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("apis.json");
    std::fs::write(&path, fixture_json()).unwrap();

    let entries = dataset::load_path(&path).unwrap();
    dataset::save_path(&path, &entries).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.ends_with('\n'));
    assert!(written.contains("  {\n"), "expected pretty-printed output");
    // Kebab-case field names survive the round trip.
    assert!(written.contains("\"date-checked\""));
    assert!(written.contains("\"try-it\""));
}

#[test]
fn test_unknown_status_value_survives_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("apis.json");
    let raw = fixture_json().replace("\"pending\"", "\"experimental\"");
    std::fs::write(&path, raw).unwrap();

    let entries = dataset::load_path(&path).unwrap();
    assert_eq!(entries[0].status, Status::Other("experimental".to_string()));

    dataset::save_path(&path, &entries).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("\"experimental\""));
}

#[test]
fn test_missing_file_error_names_the_path() {
    let err = dataset::load_path(std::path::Path::new("/nonexistent/apis.json")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/apis.json"));
}
