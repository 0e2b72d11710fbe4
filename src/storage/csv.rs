// CSV backend: `title,rating,year,poster` rows under a header line.
// Adding appends a single row; deleting and updating rewrite the file.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use ::csv::{ReaderBuilder, StringRecord, WriterBuilder};
use log::{debug, warn};

use super::MovieStorage;
use crate::error::{CatalogError, Result};
use crate::movie::{Catalog, Movie};

pub const CSV_HEADER: [&str; 4] = ["title", "rating", "year", "poster"];

#[derive(Debug, Clone)]
pub struct CsvStorage {
    path: PathBuf,
}

impl CsvStorage {
    /// Opens the backend, writing a header-only file if none exists or the
    /// existing one is empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let storage = CsvStorage {
            path: path.as_ref().to_path_buf(),
        };
        let empty = match fs::metadata(&storage.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };
        if empty {
            debug!("Writing header to {}", storage.path.display());
            storage.save(&Catalog::new())?;
        }
        Ok(storage)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Catalog> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Catalog::new()),
            Err(e) => return Err(e.into()),
        };
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let mut catalog = Catalog::new();
        for (line, row) in reader.records().enumerate() {
            // line 1 is the header
            let line = line + 2;
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    warn!("{}:{}: skipping unreadable row: {}", self.path.display(), line, e);
                    continue;
                }
            };
            match parse_row(&row) {
                Some((title, movie)) => {
                    if !catalog.insert(title.clone(), movie) {
                        warn!("{}:{}: skipping duplicate title {:?}", self.path.display(), line, title);
                    }
                }
                None => warn!("{}:{}: skipping malformed row {:?}", self.path.display(), line, row),
            }
        }
        Ok(catalog)
    }

    fn save(&self, catalog: &Catalog) -> Result<()> {
        let mut writer = WriterBuilder::new().from_path(&self.path)?;
        writer.write_record(CSV_HEADER)?;
        for (title, movie) in catalog.iter() {
            writer.write_record(to_row(title, movie))?;
        }
        writer.flush()?;
        debug!("Wrote {} movies to {}", catalog.len(), self.path.display());
        Ok(())
    }

    fn append(&self, title: &str, movie: &Movie) -> Result<()> {
        let existing = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        if existing.is_empty() {
            let mut catalog = Catalog::new();
            catalog.insert(title, movie.clone());
            return self.save(&catalog);
        }
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        // the last row may have been saved without its line terminator
        if existing.last() != Some(&b'\n') {
            file.write_all(b"\n")?;
        }
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record(to_row(title, movie))?;
        writer.flush()?;
        Ok(())
    }
}

/// Parses one data row. Short rows, rows with unparsable numbers and
/// non-finite ratings yield `None` so the caller can skip them.
fn parse_row(row: &StringRecord) -> Option<(String, Movie)> {
    if row.len() < CSV_HEADER.len() {
        return None;
    }
    let title = row.get(0)?.to_string();
    let rating = row.get(1)?.trim().parse::<f64>().ok().filter(|r| r.is_finite())?;
    let year = row.get(2)?.trim().parse::<i32>().ok()?;
    let poster = row.get(3).map(str::to_string);
    Some((title, Movie::new(year, rating, poster)))
}

fn to_row(title: &str, movie: &Movie) -> [String; 4] {
    [
        title.to_string(),
        movie.rating.to_string(),
        movie.year.to_string(),
        movie.poster.clone().unwrap_or_default(),
    ]
}

impl MovieStorage for CsvStorage {
    fn list_movies(&self) -> Result<Catalog> {
        self.load()
    }

    fn add_movie(&self, title: &str, year: i32, rating: f64, poster: Option<&str>) -> Result<()> {
        if self.load()?.contains(title) {
            return Err(CatalogError::DuplicateTitle(title.to_string()));
        }
        self.append(title, &Movie::new(year, rating, poster.map(str::to_string)))
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
