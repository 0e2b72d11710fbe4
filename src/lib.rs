// Library root
// -----------
// This crate exposes the catalog library used by the `moviedb` binary.
// The binary (`main.rs`) parses configuration, opens a storage backend and
// hands an `app::MovieApp` to the interactive menu in `ui`.
//
// Module responsibilities:
// - `movie`: the movie record, the ordered catalog and input bounds.
// - `storage`: the `MovieStorage` trait and its JSON and CSV backends.
// - `api`: OMDb title lookup behind the `MetadataProvider` trait.
// - `app`: the menu commands, returning typed outcomes.
// - `fuzzy`: similarity scoring for the search fallback.
// - `website` / `histogram`: static gallery and rating chart output.
// - `ui`, `cli`, `logging`: presentation, configuration and log setup.
pub mod api;
pub mod app;
pub mod cli;
pub mod error;
pub mod fuzzy;
pub mod histogram;
pub mod logging;
pub mod movie;
pub mod storage;
pub mod ui;
pub mod website;

pub use error::{CatalogError, Result};
