use std::path::Path;

use moviedb_cli::movie::{Catalog, Movie};
use moviedb_cli::storage::{self, CsvStorage, JsonStorage, MovieStorage, StorageKind};
use moviedb_cli::CatalogError;
use tempfile::TempDir;

/// One of each backend in its own scratch directory.
fn backends(dir: &TempDir) -> Vec<(&'static str, Box<dyn MovieStorage>)> {
    vec![
        (
            "json",
            Box::new(JsonStorage::new(dir.path().join("movies.json"))) as Box<dyn MovieStorage>,
        ),
        (
            "csv",
            Box::new(CsvStorage::open(dir.path().join("movies.csv")).unwrap()) as Box<dyn MovieStorage>,
        ),
    ]
}

#[test]
fn add_list_delete_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    for (name, store) in backends(&dir) {
        store.add_movie("Heat", 1995, 8.3, Some("heat.jpg")).unwrap();

        let catalog = store.list_movies().unwrap();
        assert_eq!(
            catalog.get("Heat"),
            Some(&Movie::new(1995, 8.3, Some("heat.jpg".into()))),
            "{name}"
        );

        assert!(store.delete_movie("Heat").unwrap(), "{name}");
        assert!(!store.list_movies().unwrap().contains("Heat"), "{name}");
    }
}

#[test]
fn deleting_unknown_title_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    for (name, store) in backends(&dir) {
        store.add_movie("Heat", 1995, 8.3, None).unwrap();
        let before = store.list_movies().unwrap();

        assert!(!store.delete_movie("Ronin").unwrap(), "{name}");
        assert!(!store.delete_movie("Ronin").unwrap(), "{name}");
        assert_eq!(store.list_movies().unwrap(), before, "{name}");
    }
}

#[test]
fn duplicate_add_is_rejected_without_overwriting() {
    let dir = tempfile::tempdir().unwrap();
    for (name, store) in backends(&dir) {
        store.add_movie("Heat", 1995, 8.3, None).unwrap();
        let err = store.add_movie("Heat", 2022, 1.0, Some("other.jpg")).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateTitle(ref t) if t == "Heat"), "{name}");

        let catalog = store.list_movies().unwrap();
        assert_eq!(catalog.len(), 1, "{name}");
        assert_eq!(catalog.get("Heat"), Some(&Movie::new(1995, 8.3, None)), "{name}");
    }
}

#[test]
fn update_only_touches_rating() {
    let dir = tempfile::tempdir().unwrap();
    for (name, store) in backends(&dir) {
        store.add_movie("Alien", 1979, 8.5, Some("alien.jpg")).unwrap();
        assert!(store.update_movie("Alien", 9.1).unwrap(), "{name}");
        assert!(!store.update_movie("Aliens", 9.1).unwrap(), "{name}");

        let catalog = store.list_movies().unwrap();
        assert_eq!(
            catalog.get("Alien"),
            Some(&Movie::new(1979, 9.1, Some("alien.jpg".into()))),
            "{name}"
        );
        assert_eq!(catalog.len(), 1, "{name}");
    }
}

#[test]
fn backends_converge_on_same_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let mut results: Vec<Catalog> = Vec::new();
    for (_, store) in backends(&dir) {
        store.add_movie("Heat", 1995, 8.3, None).unwrap();
        store.add_movie("Alien", 1979, 8.5, Some("alien.jpg")).unwrap();
        store.add_movie("Ronin", 1998, 7.2, None).unwrap();
        store.update_movie("Ronin", 7.5).unwrap();
        store.delete_movie("Heat").unwrap();
        store.add_movie("Heat", 1995, 8.0, None).unwrap();
        let _ = store.add_movie("Alien", 1986, 2.0, None);
        results.push(store.list_movies().unwrap());
    }
    assert_eq!(results[0], results[1]);
    let titles: Vec<&str> = results[0].titles().collect();
    assert_eq!(titles, vec!["Alien", "Ronin", "Heat"]);
}

#[test]
fn open_picks_backend_from_kind() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("films.csv");
    let store = storage::open(StorageKind::from_path(&csv_path), &csv_path).unwrap();
    store.add_movie("Heat", 1995, 8.3, None).unwrap();
    assert!(std::fs::read_to_string(&csv_path).unwrap().starts_with("title,rating,year,poster\n"));

    let json_path = dir.path().join("films.json");
    let store = storage::open(StorageKind::Json, &json_path).unwrap();
    assert!(store.list_movies().unwrap().is_empty());
    assert!(!Path::new(&json_path).exists());
}
