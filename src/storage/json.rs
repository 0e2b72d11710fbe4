// JSON backend: the whole catalog is one object keyed by title, rewritten
// in full (4-space indented) after every change.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::MovieStorage;
use crate::error::{CatalogError, Result};
use crate::movie::{Catalog, Movie};

#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonStorage {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file, treating a missing or unreadable document as empty.
    fn load(&self) -> Result<Catalog> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist yet", self.path.display());
                return Ok(Catalog::new());
            }
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(catalog) => Ok(catalog),
            Err(e) => {
                warn!("Ignoring invalid JSON in {}: {}", self.path.display(), e);
                Ok(Catalog::new())
            }
        }
    }

    fn save(&self, catalog: &Catalog) -> Result<()> {
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        catalog.serialize(&mut ser)?;
        fs::write(&self.path, buf)?;
        debug!("Wrote {} movies to {}", catalog.len(), self.path.display());
        Ok(())
    }
}

impl MovieStorage for JsonStorage {
    fn list_movies(&self) -> Result<Catalog> {
        self.load()
    }

    fn add_movie(&self, title: &str, year: i32, rating: f64, poster: Option<&str>) -> Result<()> {
        let mut catalog = self.load()?;
        let movie = Movie::new(year, rating, poster.map(str::to_string));
        if !catalog.insert(title, movie) {
            return Err(CatalogError::DuplicateTitle(title.to_string()));
        }
        self.save(&catalog)
    }

    fn delete_movie(&self, title: &str) -> Result<bool> {
        let mut catalog = self.load()?;
        if catalog.remove(title).is_none() {
            return Ok(false);
        }
        self.save(&catalog)?;
        Ok(true)
    }

    fn update_movie(&self, title: &str, rating: f64) -> Result<bool> {
        let mut catalog = self.load()?;
        match catalog.get_mut(title) {
            Some(movie) => movie.rating = rating,
            None => return Ok(false),
        }
        self.save(&catalog)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path().join("none.json"));
        assert!(storage.list_movies().unwrap().is_empty());
    }

    #[test]
    fn invalid_json_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(JsonStorage::new(&path).list_movies().unwrap().is_empty());
    }

    #[test]
    fn writes_four_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.json");
        let storage = JsonStorage::new(&path);
        storage.add_movie("Heat", 1995, 8.3, None).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "{\n    \"Heat\": {\n        \"rating\": 8.3,\n        \"year\": 1995\n    }\n}");
    }

    #[test]
    fn update_on_missing_title_does_not_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.json");
        let storage = JsonStorage::new(&path);
        assert!(!storage.update_movie("Heat", 9.0).unwrap());
        assert!(!storage.delete_movie("Heat").unwrap());
        assert!(!path.exists());
    }
}
