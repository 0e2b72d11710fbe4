// Entrypoint for the CLI application.
// - Keeps `main` small: read the configuration, open the catalog and hand
//   it to the UI loop.
// - Returns `anyhow::Result` so startup failures print with context.

use anyhow::Context;
use log::info;
use moviedb_cli::{
    api::OmdbClient,
    app::MovieApp,
    cli::Cli,
    logging, storage,
    ui::{main_menu, Console, MenuOptions},
};

fn main() -> anyhow::Result<()> {
    logging::setup_logging();
    let cli = Cli::parse_args();

    let kind = cli.storage_kind();
    let backend = storage::open(kind, &cli.file)
        .with_context(|| format!("Failed to open catalog {}", cli.file.display()))?;
    info!("Using {:?} catalog at {}", kind, cli.file.display());

    let mut app = MovieApp::new(backend);
    match cli.lookup_key() {
        Some(key) => app = app.with_provider(Box::new(OmdbClient::new(&cli.omdb_url, key)?)),
        None => info!("No OMDb API key configured; movies are added manually"),
    }

    let options = MenuOptions {
        extra: cli.extra,
        template: cli.template.clone(),
        output: cli.output.clone(),
    };

    // Blocks until the user picks "Exit".
    main_menu(&app, &Console::new(!cli.no_color), &options)?;
    Ok(())
}
