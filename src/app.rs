// Application layer: the catalog commands behind the menu.
//
// Every command re-reads the catalog through the injected storage backend
// and returns a typed outcome; printing and prompting belong to `ui`. This
// is also the single place where user input is validated before it reaches
// storage.

use std::path::Path;

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::api::{LookupError, MetadataProvider};
use crate::error::{CatalogError, Result};
use crate::fuzzy;
use crate::movie::{validate_rating, validate_title, validate_year, Catalog, Movie};
use crate::storage::MovieStorage;
use crate::{histogram, website};

/// Fuzzy scores at or above this count as the title the user meant.
pub const EXACT_MATCH_SCORE: u8 = 96;

/// How many fuzzy candidates the search fallback offers.
pub const SUGGESTION_LIMIT: usize = 2;

/// Result of checking a title the user wants to add.
#[derive(Debug, Clone, PartialEq)]
pub enum TitleCheck {
    Available(String),
    Empty,
    Taken(String),
}

#[derive(Debug)]
pub enum AddOutcome {
    Added(String),
    EmptyTitle,
    AlreadyExists(String),
    Invalid(String),
    LookupFailed(LookupError),
}

/// Aggregate figures over all ratings.
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub mean: f64,
    pub median: f64,
    pub best_rating: f64,
    pub best: Vec<String>,
    pub worst_rating: f64,
    pub worst: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The catalog has no movies to search.
    Empty,
    /// A title equal to the query, or a fuzzy hit above the exact threshold.
    Exact(String, Movie),
    /// Titles containing the query.
    Matches(Vec<(String, Movie)>),
    /// Closest fuzzy candidates with their scores.
    Suggestions(Vec<(String, Movie, u8)>),
}

pub struct MovieApp {
    storage: Box<dyn MovieStorage>,
    provider: Option<Box<dyn MetadataProvider>>,
}

impl MovieApp {
    pub fn new(storage: Box<dyn MovieStorage>) -> Self {
        MovieApp {
            storage,
            provider: None,
        }
    }

    /// Enables adding movies by title lookup.
    pub fn with_provider(mut self, provider: Box<dyn MetadataProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn list(&self) -> Result<Catalog> {
        self.storage.list_movies()
    }

    pub fn contains(&self, title: &str) -> Result<bool> {
        Ok(self.storage.list_movies()?.contains(title.trim()))
    }

    pub fn check_title(&self, input: &str) -> Result<TitleCheck> {
        let title = match validate_title(input) {
            Ok(title) => title,
            Err(_) => return Ok(TitleCheck::Empty),
        };
        if self.contains(title)? {
            return Ok(TitleCheck::Taken(title.to_string()));
        }
        Ok(TitleCheck::Available(title.to_string()))
    }

    /// Adds a movie from user-entered year and rating.
    pub fn add_manual(&self, input: &str, year: i32, rating: f64) -> Result<AddOutcome> {
        let title = match self.check_title(input)? {
            TitleCheck::Available(title) => title,
            TitleCheck::Empty => return Ok(AddOutcome::EmptyTitle),
            TitleCheck::Taken(title) => return Ok(AddOutcome::AlreadyExists(title)),
        };
        let checked = validate_year(year).and_then(|y| Ok((y, validate_rating(rating)?)));
        let (year, rating) = match checked {
            Ok(values) => values,
            Err(CatalogError::Validation(msg)) => return Ok(AddOutcome::Invalid(msg)),
            Err(e) => return Err(e),
        };
        self.persist(&title, year, rating, None)
    }

    /// Adds a movie using the details the metadata provider returns for
    /// `input`. Nothing is stored when the lookup fails.
    pub fn add_with_lookup(&self, input: &str) -> Result<AddOutcome> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| CatalogError::validation("no movie lookup service is configured"))?;
        let query = match self.check_title(input)? {
            TitleCheck::Available(title) => title,
            TitleCheck::Empty => return Ok(AddOutcome::EmptyTitle),
            TitleCheck::Taken(title) => return Ok(AddOutcome::AlreadyExists(title)),
        };
        let meta = match provider.lookup(&query) {
            Ok(meta) => meta,
            Err(e) => {
                info!("Lookup for {query:?} failed: {e}");
                return Ok(AddOutcome::LookupFailed(e));
            }
        };
        debug!("Lookup for {query:?} returned {meta:?}");
        let poster = Some(meta.poster.as_str()).filter(|p| !p.is_empty());
        self.persist(&meta.title, meta.year, meta.rating, poster)
    }

    fn persist(&self, title: &str, year: i32, rating: f64, poster: Option<&str>) -> Result<AddOutcome> {
        match self.storage.add_movie(title, year, rating, poster) {
            Ok(()) => Ok(AddOutcome::Added(title.to_string())),
            Err(CatalogError::DuplicateTitle(title)) => Ok(AddOutcome::AlreadyExists(title)),
            Err(e) => Err(e),
        }
    }

    /// Returns `false` when there was no such movie. Surrounding whitespace
    /// is ignored, as it is when adding.
    pub fn delete(&self, title: &str) -> Result<bool> {
        self.storage.delete_movie(title.trim())
    }

    /// Sets a new rating. Out-of-range ratings are rejected with
    /// `CatalogError::Validation`; an unknown title returns `false`.
    pub fn update_rating(&self, title: &str, rating: f64) -> Result<bool> {
        let rating = validate_rating(rating)?;
        self.storage.update_movie(title.trim(), rating)
    }

    /// `None` when the catalog is empty.
    pub fn stats(&self) -> Result<Option<Stats>> {
        Ok(compute_stats(&self.storage.list_movies()?))
    }

    /// Picks one movie uniformly at random; `None` when the catalog is empty.
    pub fn random_movie<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Option<(String, Movie)>> {
        let entries: Vec<(String, Movie)> = self.storage.list_movies()?.into_iter().collect();
        Ok(entries.choose(rng).cloned())
    }

    /// Case-insensitive title search with a fuzzy fallback.
    pub fn search(&self, query: &str) -> Result<SearchOutcome> {
        Ok(search_catalog(self.storage.list_movies()?, query))
    }

    /// All movies, best rated first. Equal ratings keep catalog order.
    pub fn sorted_by_rating(&self) -> Result<Vec<(String, Movie)>> {
        let mut entries: Vec<(String, Movie)> = self.storage.list_movies()?.into_iter().collect();
        entries.sort_by(|a, b| b.1.rating.total_cmp(&a.1.rating));
        Ok(entries)
    }

    /// Renders the catalog into the gallery template; returns the number of
    /// movies written.
    pub fn generate_website(&self, template: &Path, output: &Path) -> Result<usize> {
        let catalog = self.storage.list_movies()?;
        website::generate(&catalog, template, output)?;
        Ok(catalog.len())
    }

    /// Writes the rating histogram; returns the number of movies counted.
    pub fn rating_histogram(&self, output: &Path) -> Result<usize> {
        let catalog = self.storage.list_movies()?;
        histogram::generate(&catalog, output)?;
        Ok(catalog.len())
    }
}

pub fn compute_stats(catalog: &Catalog) -> Option<Stats> {
    if catalog.is_empty() {
        return None;
    }
    let mut ratings: Vec<f64> = catalog.iter().map(|(_, m)| m.rating).collect();
    ratings.sort_by(f64::total_cmp);

    let n = ratings.len();
    let mean = ratings.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 1 {
        ratings[n / 2]
    } else {
        (ratings[n / 2 - 1] + ratings[n / 2]) / 2.0
    };
    let worst_rating = ratings[0];
    let best_rating = ratings[n - 1];

    let titles_rated = |target: f64| -> Vec<String> {
        catalog
            .iter()
            .filter(|(_, m)| m.rating == target)
            .map(|(t, _)| t.to_string())
            .collect()
    };

    Some(Stats {
        mean,
        median,
        best_rating,
        best: titles_rated(best_rating),
        worst_rating,
        worst: titles_rated(worst_rating),
    })
}

pub fn search_catalog(catalog: Catalog, query: &str) -> SearchOutcome {
    if catalog.is_empty() {
        return SearchOutcome::Empty;
    }
    let needle = query.trim().to_lowercase();

    if let Some((title, movie)) = catalog.iter().find(|(t, _)| t.to_lowercase() == needle) {
        return SearchOutcome::Exact(title.to_string(), movie.clone());
    }

    let matches: Vec<(String, Movie)> = catalog
        .iter()
        .filter(|(t, _)| t.to_lowercase().contains(&needle))
        .map(|(t, m)| (t.to_string(), m.clone()))
        .collect();
    if !matches.is_empty() {
        return SearchOutcome::Matches(matches);
    }

    let candidates = fuzzy::extract(&needle, catalog.titles(), SUGGESTION_LIMIT);
    debug!("Fuzzy candidates for {needle:?}: {candidates:?}");
    let lookup = |title: &str| catalog.get(title).cloned();

    match candidates.first() {
        Some(&(title, score)) if score >= EXACT_MATCH_SCORE => match lookup(title) {
            Some(movie) => SearchOutcome::Exact(title.to_string(), movie),
            None => SearchOutcome::Suggestions(Vec::new()),
        },
        _ => SearchOutcome::Suggestions(
            candidates
                .iter()
                .filter_map(|&(title, score)| lookup(title).map(|m| (title.to_string(), m, score)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(ratings: &[(&str, f64)]) -> Catalog {
        ratings
            .iter()
            .map(|&(t, r)| (t.to_string(), Movie::new(2000, r, None)))
            .collect()
    }

    #[test]
    fn stats_report_every_tied_title() {
        let stats = compute_stats(&catalog(&[("A", 5.0), ("B", 9.0), ("C", 9.0), ("D", 1.0)])).unwrap();
        assert_eq!(stats.best, vec!["B", "C"]);
        assert_eq!(stats.best_rating, 9.0);
        assert_eq!(stats.worst, vec!["D"]);
        assert_eq!(stats.worst_rating, 1.0);
        assert_eq!(stats.mean, 6.0);
        assert_eq!(stats.median, 7.0);
    }

    #[test]
    fn stats_with_odd_count_use_middle_value() {
        let stats = compute_stats(&catalog(&[("A", 3.0), ("B", 8.0), ("C", 4.0)])).unwrap();
        assert_eq!(stats.median, 4.0);
    }

    #[test]
    fn stats_on_single_movie_is_best_and_worst() {
        let stats = compute_stats(&catalog(&[("Solo", 6.5)])).unwrap();
        assert_eq!(stats.best, vec!["Solo"]);
        assert_eq!(stats.worst, vec!["Solo"]);
    }

    #[test]
    fn stats_on_empty_catalog_is_none() {
        assert_eq!(compute_stats(&Catalog::new()), None);
    }

    #[test]
    fn search_substring_is_case_insensitive() {
        let outcome = search_catalog(catalog(&[("The Matrix", 8.7), ("Heat", 8.3), ("Matrix Reloaded", 7.2)]), "MATRIX");
        match outcome {
            SearchOutcome::Matches(found) => {
                let titles: Vec<&str> = found.iter().map(|(t, _)| t.as_str()).collect();
                assert_eq!(titles, vec!["The Matrix", "Matrix Reloaded"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn search_exact_title_wins_over_substrings() {
        let outcome = search_catalog(catalog(&[("Inception", 8.8), ("Inception 2", 6.0)]), "inception");
        assert!(matches!(outcome, SearchOutcome::Exact(ref t, _) if t == "Inception"));
    }

    #[test]
    fn search_falls_back_to_suggestions() {
        let outcome = search_catalog(catalog(&[("Inception", 8.8), ("Inception 2", 6.0)]), "inceptoin");
        match outcome {
            SearchOutcome::Suggestions(found) => {
                let titles: Vec<&str> = found.iter().map(|(t, _, _)| t.as_str()).collect();
                assert_eq!(titles, vec!["Inception", "Inception 2"]);
                assert!(found.iter().all(|(_, _, score)| *score < EXACT_MATCH_SCORE));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn search_close_fuzzy_hit_counts_as_exact() {
        let outcome = search_catalog(catalog(&[("Spider-Man", 7.4), ("Heat", 8.3)]), "spider man");
        assert!(matches!(outcome, SearchOutcome::Exact(ref t, _) if t == "Spider-Man"));
    }

    #[test]
    fn search_on_empty_catalog() {
        assert_eq!(search_catalog(Catalog::new(), "anything"), SearchOutcome::Empty);
    }
}
