// Command-line configuration. Every flag has a default so the program can
// be started with no arguments; the OMDb settings can also come from the
// environment.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::api::DEFAULT_OMDB_URL;
use crate::storage::StorageKind;

/// What menu entry 9 does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExtraCommand {
    /// Render the catalog into the HTML gallery template
    Website,
    /// Write an SVG histogram of the ratings
    Histogram,
}

/// Manage a personal movie catalog from the terminal
#[derive(Parser, Debug)]
#[command(name = "moviedb", version, about)]
pub struct Cli {
    /// Catalog file (.json or .csv)
    #[arg(short, long, default_value = "movies.json")]
    pub file: PathBuf,

    /// Storage backend; inferred from the file extension when omitted
    #[arg(short, long, value_enum)]
    pub storage: Option<StorageKind>,

    /// OMDb API key; enables adding movies by title lookup
    #[arg(long, env = "OMDB_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// OMDb endpoint
    #[arg(long, env = "OMDB_URL", default_value = DEFAULT_OMDB_URL)]
    pub omdb_url: String,

    /// Always ask for year and rating instead of looking titles up
    #[arg(long)]
    pub manual: bool,

    /// Gallery template containing the grid placeholder
    #[arg(long, default_value = "_static/index_template.html")]
    pub template: PathBuf,

    /// Where the generated gallery is written
    #[arg(long, default_value = "_static/index.html")]
    pub output: PathBuf,

    /// Behaviour of menu entry 9
    #[arg(long, value_enum, default_value_t = ExtraCommand::Website)]
    pub extra: ExtraCommand,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    pub fn storage_kind(&self) -> StorageKind {
        self.storage.unwrap_or_else(|| StorageKind::from_path(&self.file))
    }

    /// The API key to use for lookups, unless manual entry was requested.
    pub fn lookup_key(&self) -> Option<&str> {
        if self.manual {
            return None;
        }
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn help_shows_a_description() {
        let about = Cli::command().get_about().map(|a| a.to_string()).unwrap_or_default();
        assert!(!about.trim().is_empty());
    }

    #[test]
    fn csv_backend_is_inferred() {
        let cli = Cli::parse_from(["moviedb", "--file", "films.csv"]);
        assert_eq!(cli.storage_kind(), StorageKind::Csv);
        let cli = Cli::parse_from(["moviedb", "--file", "films.csv", "--storage", "json"]);
        assert_eq!(cli.storage_kind(), StorageKind::Json);
    }

    #[test]
    fn manual_flag_disables_lookup() {
        let cli = Cli::parse_from(["moviedb", "--api-key", "abc", "--manual"]);
        assert_eq!(cli.lookup_key(), None);
        let cli = Cli::parse_from(["moviedb", "--api-key", "abc"]);
        assert_eq!(cli.lookup_key(), Some("abc"));
    }

    #[test]
    fn extra_command_is_configurable() {
        let cli = Cli::parse_from(["moviedb", "--extra", "histogram"]);
        assert_eq!(cli.extra, ExtraCommand::Histogram);
    }
}
