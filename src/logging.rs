// Logs go to stderr at `warn` by default so they stay out of the way of
// the interactive menu; `RUST_LOG` overrides the level.

use env_logger::{Builder, Env};

const DEFAULT_FILTER: &str = "warn";

/// Builder reading its filter from `filter_var`, falling back to `warn`.
fn builder(filter_var: &str) -> Builder {
    Builder::from_env(Env::new().filter_or(filter_var, DEFAULT_FILTER).write_style("RUST_LOG_STYLE"))
}

pub fn setup_logging() {
    builder("RUST_LOG").init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;

    #[test]
    fn defaults_to_warn_without_filter_variable() {
        let logger = builder("MOVIEDB_TEST_LOG_FILTER_UNSET").build();
        assert_eq!(logger.filter(), LevelFilter::Warn);
    }
}
