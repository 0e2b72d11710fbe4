// Storage layer: the `MovieStorage` trait every backend implements, plus
// the startup helper that picks a backend for a given file.
//
// Backends assume their input was validated by the application layer and
// only deal with persistence. Every call re-reads the file; nothing is
// cached between calls.

use std::path::Path;

use clap::ValueEnum;

use crate::error::Result;
use crate::movie::Catalog;

pub mod csv;
pub mod json;

pub use self::csv::CsvStorage;
pub use self::json::JsonStorage;

/// Persistence contract shared by the JSON and CSV backends.
pub trait MovieStorage {
    /// Returns the full collection. A missing file is an empty collection.
    fn list_movies(&self) -> Result<Catalog>;

    /// Stores a new record.
    ///
    /// Fails with `CatalogError::DuplicateTitle` if the title is taken; the
    /// existing record is left as it was.
    fn add_movie(&self, title: &str, year: i32, rating: f64, poster: Option<&str>) -> Result<()>;

    /// Removes the record. Returns `false` if there was nothing to remove.
    fn delete_movie(&self, title: &str) -> Result<bool>;

    /// Overwrites the rating. Returns `false` if the title is unknown.
    fn update_movie(&self, title: &str, rating: f64) -> Result<bool>;
}

/// Backend selector used by the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageKind {
    Json,
    Csv,
}

impl StorageKind {
    /// Picks CSV for `.csv` files and JSON for everything else.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => StorageKind::Csv,
            _ => StorageKind::Json,
        }
    }
}

/// Opens the backend for `path`. The CSV backend creates its file (header
/// only) when it does not exist yet.
pub fn open(kind: StorageKind, path: &Path) -> Result<Box<dyn MovieStorage>> {
    log::debug!("Opening {:?} storage at {}", kind, path.display());
    Ok(match kind {
        StorageKind::Json => Box::new(JsonStorage::new(path)),
        StorageKind::Csv => Box::new(CsvStorage::open(path)?),
    })
}
