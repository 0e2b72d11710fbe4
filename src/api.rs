// Metadata client module: a small blocking HTTP client that looks titles up
// on OMDb so new catalog entries can be filled in from a single name.
// The `MetadataProvider` trait is what the application depends on, which
// keeps the network out of the command tests.

use anyhow::Context;
use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_OMDB_URL: &str = "https://www.omdbapi.com/";

/// Canonical details returned for a found title.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieMetadata {
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub poster: String,
}

/// Why a lookup produced no metadata.
#[derive(Error, Debug)]
pub enum LookupError {
    /// The provider answered but does not know the title
    #[error("not found: {0}")]
    NotFound(String),

    /// The provider answered with a non-200 status
    #[error("API returned status code {0}")]
    Status(u16),

    /// The provider could not be reached at all
    #[error("cannot connect to the movie database: {0}")]
    Connection(String),

    /// The provider answered with something we could not decode
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

/// Anything that can turn a free-text title into movie details.
pub trait MetadataProvider {
    fn lookup(&self, title: &str) -> Result<MovieMetadata, LookupError>;
}

/// Raw OMDb answer. Only the fields the catalog consumes are decoded; OMDb
/// sends every value as a string.
#[derive(Deserialize, Debug)]
pub struct OmdbResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

impl OmdbResponse {
    /// Converts a decoded answer into metadata, or the provider's reason for
    /// not finding the title.
    pub fn into_metadata(self, query: &str) -> Result<MovieMetadata, LookupError> {
        if !self.response.eq_ignore_ascii_case("true") {
            let reason = self.error.unwrap_or_else(|| "Movie not found!".into());
            return Err(LookupError::NotFound(reason));
        }

        let title = self.title.unwrap_or_else(|| query.to_string());
        let year = self
            .year
            .as_deref()
            .and_then(leading_year)
            .ok_or_else(|| LookupError::InvalidResponse(format!("missing or invalid year for {title}")))?;
        // OMDb reports "N/A" for unrated titles
        let rating = self
            .imdb_rating
            .as_deref()
            .and_then(|r| r.trim().parse::<f64>().ok())
            .unwrap_or(0.0);
        let poster = self.poster.filter(|p| p != "N/A").unwrap_or_default();

        Ok(MovieMetadata {
            title,
            year,
            rating,
            poster,
        })
    }
}

/// OMDb years look like "1999", "2010–2014" or "2019–"; keep the start year.
fn leading_year(raw: &str) -> Option<i32> {
    let digits: String = raw.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Blocking OMDb client holding the reqwest client, the endpoint and the
/// API key.
#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(OmdbClient {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }
}

impl MetadataProvider for OmdbClient {
    fn lookup(&self, title: &str) -> Result<MovieMetadata, LookupError> {
        debug!("Looking up {title:?} at {}", self.base_url);
        let res = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title)])
            .send()
            .map_err(|e| LookupError::Connection(e.to_string()))?;

        let status = res.status();
        if status != reqwest::StatusCode::OK {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body: OmdbResponse = res
            .json()
            .map_err(|e| LookupError::InvalidResponse(e.to_string()))?;
        body.into_metadata(title)
    }
}
