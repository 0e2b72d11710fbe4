// Data model: a single movie record and the ordered, title-keyed catalog
// that both storage backends load and save. Validation bounds for user
// input live here too so every entry point checks the same ranges.

use std::fmt;

use log::warn;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CatalogError, Result};

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2025;
pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 10.0;

/// Attributes stored for one title. The title itself is the catalog key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub rating: f64,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

impl Movie {
    pub fn new(year: i32, rating: f64, poster: Option<String>) -> Self {
        Movie {
            rating,
            year,
            // an empty poster reference means "no poster"
            poster: poster.filter(|p| !p.is_empty()),
        }
    }
}

/// Movies keyed by title, kept in insertion order.
///
/// On disk the catalog is a JSON object whose keys are titles; decoding keeps
/// the file's key order and skips entries that are not valid movie objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<(String, Movie)>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.position(title).is_some()
    }

    pub fn get(&self, title: &str) -> Option<&Movie> {
        self.position(title).map(|i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, title: &str) -> Option<&mut Movie> {
        self.position(title).map(move |i| &mut self.entries[i].1)
    }

    /// Appends a record. Returns `false` and leaves the catalog untouched if
    /// the title is already present.
    pub fn insert(&mut self, title: impl Into<String>, movie: Movie) -> bool {
        let title = title.into();
        if self.contains(&title) {
            return false;
        }
        self.entries.push((title, movie));
        true
    }

    pub fn remove(&mut self, title: &str) -> Option<Movie> {
        self.position(title).map(|i| self.entries.remove(i).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Movie)> {
        self.entries.iter().map(|(t, m)| (t.as_str(), m))
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    fn position(&self, title: &str) -> Option<usize> {
        self.entries.iter().position(|(t, _)| t == title)
    }
}

impl IntoIterator for Catalog {
    type Item = (String, Movie);
    type IntoIter = std::vec::IntoIter<(String, Movie)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, Movie)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, Movie)>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for (title, movie) in iter {
            catalog.insert(title, movie);
        }
        catalog
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (title, movie) in &self.entries {
            map.serialize_entry(title, movie)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(CatalogVisitor)
    }
}

struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = Catalog;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping movie titles to movie details")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Catalog, A::Error> {
        let mut catalog = Catalog::new();
        while let Some((title, value)) = access.next_entry::<String, serde_json::Value>()? {
            match Movie::deserialize(value) {
                Ok(movie) => {
                    if !catalog.insert(title.clone(), movie) {
                        warn!("Skipping duplicate entry for {title:?}");
                    }
                }
                Err(e) => warn!("Skipping malformed entry for {title:?}: {e}"),
            }
        }
        Ok(catalog)
    }
}

/// Trims the title and rejects it when nothing is left.
pub fn validate_title(title: &str) -> Result<&str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::validation("Movie name cannot be empty!"));
    }
    Ok(trimmed)
}

pub fn validate_year(year: i32) -> Result<i32> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(CatalogError::validation(format!(
            "Please enter a valid year between {MIN_YEAR} and {MAX_YEAR}."
        )))
    }
}

pub fn validate_rating(rating: f64) -> Result<f64> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating)
    } else {
        Err(CatalogError::validation("Rating must be between 0 and 10!"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_rejects_existing_title() {
        let mut catalog = Catalog::new();
        assert!(catalog.insert("Alien", Movie::new(1979, 8.5, None)));
        assert!(!catalog.insert("Alien", Movie::new(1986, 1.0, None)));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("Alien").map(|m| m.year), Some(1979));
    }

    #[test]
    fn titles_are_case_sensitive() {
        let mut catalog = Catalog::new();
        catalog.insert("Alien", Movie::new(1979, 8.5, None));
        assert!(!catalog.contains("alien"));
    }

    #[test]
    fn json_keeps_key_order_and_skips_bad_entries() {
        let raw = r#"{
            "Zodiac": {"rating": 7.7, "year": 2007},
            "Broken": {"rating": "high"},
            "Alien": {"rating": 8.5, "year": 1979, "poster": "a.jpg"}
        }"#;
        let catalog: Catalog = serde_json::from_str(raw).unwrap();
        let titles: Vec<&str> = catalog.titles().collect();
        assert_eq!(titles, vec!["Zodiac", "Alien"]);
        assert_eq!(catalog.get("Alien").unwrap().poster.as_deref(), Some("a.jpg"));
    }

    #[test]
    fn poster_is_omitted_when_absent() {
        let catalog: Catalog = vec![("Heat".to_string(), Movie::new(1995, 8.3, None))]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&catalog).unwrap();
        assert_eq!(json, r#"{"Heat":{"rating":8.3,"year":1995}}"#);
    }

    #[test]
    fn empty_poster_becomes_none() {
        assert_eq!(Movie::new(2000, 5.0, Some(String::new())).poster, None);
    }

    #[test]
    fn validation_bounds_are_inclusive() {
        assert!(validate_year(1900).is_ok());
        assert!(validate_year(2025).is_ok());
        assert!(validate_year(1899).is_err());
        assert!(validate_year(2026).is_err());
        assert!(validate_rating(0.0).is_ok());
        assert!(validate_rating(10.0).is_ok());
        assert!(validate_rating(10.1).is_err());
        assert!(validate_rating(f64::NAN).is_err());
        assert!(validate_title("   ").is_err());
        assert_eq!(validate_title("  Heat ").unwrap(), "Heat");
    }
}
