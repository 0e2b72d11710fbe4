// UI layer: the numbered menu, the prompts (via `dialoguer`) and the
// coloured rendering of command outcomes. All catalog logic lives in
// `app`; this module only asks questions and prints answers.

use std::fmt::Display;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::style::{style, Color, Stylize};
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::LookupError;
use crate::app::{AddOutcome, MovieApp, SearchOutcome, TitleCheck};
use crate::cli::ExtraCommand;
use crate::error::CatalogError;
use crate::movie::{validate_rating, validate_year, Movie};

const BANNER: &str = "********** My Movies Database **********";
const EMPTY_CATALOG: &str = "No movies in the database yet.";

/// Terminal printer. Colour can be switched off for plain terminals and
/// piped output.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    color: bool,
}

impl Console {
    pub fn new(color: bool) -> Self {
        Console { color }
    }

    fn paint(&self, text: impl Display, color: Color) -> String {
        if self.color {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn plain(&self, text: impl Display) {
        println!("{text}");
    }

    pub fn heading(&self, text: impl Display) {
        println!("{}", self.paint(text, Color::Yellow));
    }

    pub fn item(&self, text: impl Display) {
        println!("{}", self.paint(text, Color::Cyan));
    }

    pub fn success(&self, text: impl Display) {
        println!("{}", self.paint(text, Color::Green));
    }

    pub fn error(&self, text: impl Display) {
        println!("{}", self.paint(text, Color::Red));
    }

    pub fn highlight(&self, text: impl Display) {
        println!("{}", self.paint(text, Color::Magenta));
    }
}

/// Settings for the menu that do not belong to the catalog itself.
#[derive(Debug, Clone)]
pub struct MenuOptions {
    pub extra: ExtraCommand,
    pub template: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Exit,
    List,
    Add,
    Delete,
    Update,
    Stats,
    Random,
    Search,
    SortByRating,
    Extra,
}

impl MenuChoice {
    pub fn from_number(n: i64) -> Option<Self> {
        Some(match n {
            0 => MenuChoice::Exit,
            1 => MenuChoice::List,
            2 => MenuChoice::Add,
            3 => MenuChoice::Delete,
            4 => MenuChoice::Update,
            5 => MenuChoice::Stats,
            6 => MenuChoice::Random,
            7 => MenuChoice::Search,
            8 => MenuChoice::SortByRating,
            9 => MenuChoice::Extra,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceError {
    NotANumber,
    OutOfRange(i64),
}

pub fn parse_choice(input: &str) -> Result<MenuChoice, ChoiceError> {
    let n: i64 = input.trim().parse().map_err(|_| ChoiceError::NotANumber)?;
    MenuChoice::from_number(n).ok_or(ChoiceError::OutOfRange(n))
}

pub fn menu_text(extra: ExtraCommand) -> String {
    let extra_label = match extra {
        ExtraCommand::Website => "Generate website",
        ExtraCommand::Histogram => "Create rating histogram",
    };
    format!(
        "Menu:
0. Exit
1. List movies
2. Add movie
3. Delete movie
4. Update movie
5. Stats
6. Random movie
7. Search movie
8. Movies sorted by rating
9. {extra_label}
"
    )
}

/// Ratings print like "8.5" and "9.0".
pub fn format_rating(rating: f64) -> String {
    if rating.fract() == 0.0 {
        format!("{rating:.1}")
    } else {
        format!("{rating}")
    }
}

/// Main interactive loop. Runs until the user picks 0.
///
/// Catalog errors from a single command are printed and the menu comes
/// back; terminal errors (for example a closed stdin) end the loop.
pub fn main_menu(app: &MovieApp, console: &Console, options: &MenuOptions) -> Result<()> {
    console.heading(BANNER);
    loop {
        println!();
        console.success(menu_text(options.extra));

        let raw: String = Input::new()
            .with_prompt("Enter choice (0-9)")
            .allow_empty(true)
            .interact_text()?;
        let choice = match parse_choice(&raw) {
            Ok(choice) => choice,
            Err(ChoiceError::NotANumber) => {
                console.error("Invalid choice. Please enter a number between 0 and 9.");
                continue;
            }
            Err(ChoiceError::OutOfRange(n)) => {
                console.error(format!("Invalid choice: {n}."));
                continue;
            }
        };

        println!();
        if choice == MenuChoice::Exit {
            console.plain("Bye!");
            return Ok(());
        }

        if let Err(e) = run_command(app, console, options, choice) {
            match e.downcast_ref::<CatalogError>() {
                Some(err) => console.error(format!("Error: {err}")),
                None => return Err(e),
            }
        }

        let _: String = Input::new()
            .with_prompt("Press Enter to continue")
            .allow_empty(true)
            .interact_text()?;
    }
}

fn run_command(app: &MovieApp, console: &Console, options: &MenuOptions, choice: MenuChoice) -> Result<()> {
    match choice {
        MenuChoice::Exit => {}
        MenuChoice::List => handle_list(app, console)?,
        MenuChoice::Add => handle_add(app, console)?,
        MenuChoice::Delete => handle_delete(app, console)?,
        MenuChoice::Update => handle_update(app, console)?,
        MenuChoice::Stats => handle_stats(app, console)?,
        MenuChoice::Random => handle_random(app, console)?,
        MenuChoice::Search => handle_search(app, console)?,
        MenuChoice::SortByRating => handle_sorted(app, console)?,
        MenuChoice::Extra => match options.extra {
            ExtraCommand::Website => {
                app.generate_website(&options.template, &options.output)?;
                console.success(format!(
                    "Website generated successfully as {}.",
                    options.output.display()
                ));
            }
            ExtraCommand::Histogram => handle_histogram(app, console)?,
        },
    }
    Ok(())
}

fn handle_list(app: &MovieApp, console: &Console) -> Result<()> {
    let catalog = app.list()?;
    console.heading(format!("{} in total", catalog.len()));
    for (title, movie) in catalog.iter() {
        console.item(format!("{title} ({}): {}", movie.year, format_rating(movie.rating)));
    }
    Ok(())
}

fn handle_add(app: &MovieApp, console: &Console) -> Result<()> {
    let input: String = Input::new()
        .with_prompt("Enter new movie name")
        .allow_empty(true)
        .interact_text()?;

    let outcome = if app.has_provider() {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
        spinner.set_message(format!("Looking up {}...", input.trim()));
        spinner.enable_steady_tick(Duration::from_millis(100));
        let outcome = app.add_with_lookup(&input);
        spinner.finish_and_clear();
        outcome?
    } else {
        // reject bad titles before asking for the rest
        match app.check_title(&input)? {
            TitleCheck::Empty => AddOutcome::EmptyTitle,
            TitleCheck::Taken(title) => AddOutcome::AlreadyExists(title),
            TitleCheck::Available(title) => {
                let (year, rating) = prompt_year_and_rating()?;
                app.add_manual(&title, year, rating)?
            }
        }
    };

    match outcome {
        AddOutcome::Added(title) => console.success(format!("Movie '{title}' has been added!")),
        AddOutcome::EmptyTitle => console.error("Movie name cannot be empty!"),
        AddOutcome::AlreadyExists(title) => console.error(format!("Movie {title} already exists!")),
        AddOutcome::Invalid(msg) => console.error(msg),
        AddOutcome::LookupFailed(LookupError::NotFound(reason)) => console.error(format!(
            "Sorry, '{}' was not found in OMDb ({reason}).",
            input.trim()
        )),
        AddOutcome::LookupFailed(LookupError::Status(code)) => {
            console.error(format!("Error: API returned status code {code}"))
        }
        AddOutcome::LookupFailed(LookupError::Connection(_)) => {
            console.error("Error: Cannot connect to OMDb. Check your internet.")
        }
        AddOutcome::LookupFailed(err) => console.error(format!("Something went wrong: {err}")),
    }
    Ok(())
}

fn prompt_year_and_rating() -> Result<(i32, f64)> {
    let year: i32 = Input::new()
        .with_prompt("Enter new movie year")
        .validate_with(|y: &i32| validate_year(*y).map(|_| ()).map_err(|e| e.to_string()))
        .interact_text()?;
    let rating = prompt_rating()?;
    Ok((year, rating))
}

fn prompt_rating() -> Result<f64> {
    let rating: f64 = Input::new()
        .with_prompt("Enter new movie rating (0-10)")
        .validate_with(|r: &f64| validate_rating(*r).map(|_| ()).map_err(|e| e.to_string()))
        .interact_text()?;
    Ok(rating)
}

fn handle_delete(app: &MovieApp, console: &Console) -> Result<()> {
    let title: String = Input::new()
        .with_prompt("Enter movie name to delete")
        .allow_empty(true)
        .interact_text()?;
    let title = title.trim();
    if app.delete(title)? {
        console.success(format!("Movie {title} successfully deleted!"));
    } else {
        console.error(format!("Movie {title} doesn't exist!"));
    }
    Ok(())
}

fn handle_update(app: &MovieApp, console: &Console) -> Result<()> {
    let title: String = Input::new()
        .with_prompt("Enter movie name")
        .allow_empty(true)
        .interact_text()?;
    let title = title.trim();
    if !app.contains(title)? {
        console.error(format!("Movie {title} doesn't exist!"));
        return Ok(());
    }
    let rating = prompt_rating()?;
    if app.update_rating(title, rating)? {
        console.success(format!("Movie {title} successfully updated."));
    } else {
        // removed by someone else between the two prompts
        console.error(format!("Movie {title} doesn't exist!"));
    }
    Ok(())
}

fn handle_stats(app: &MovieApp, console: &Console) -> Result<()> {
    let Some(stats) = app.stats()? else {
        console.error(EMPTY_CATALOG);
        return Ok(());
    };
    console.success(format!("Average rating: {:.2}", stats.mean));
    console.success(format!("Median rating: {:.2}", stats.median));
    for title in &stats.best {
        console.success(format!("Best movie: {title}, {}", format_rating(stats.best_rating)));
    }
    for title in &stats.worst {
        console.error(format!("Worst movie: {title}, {}", format_rating(stats.worst_rating)));
    }
    Ok(())
}

fn handle_random(app: &MovieApp, console: &Console) -> Result<()> {
    match app.random_movie(&mut rand::thread_rng())? {
        Some((title, movie)) => console.highlight(format!(
            "Your movie for tonight: {title}, it's rated {}",
            format_rating(movie.rating)
        )),
        None => console.error(EMPTY_CATALOG),
    }
    Ok(())
}

fn handle_search(app: &MovieApp, console: &Console) -> Result<()> {
    let query: String = Input::new()
        .with_prompt("Enter part of movie name")
        .allow_empty(true)
        .interact_text()?;
    match app.search(&query)? {
        SearchOutcome::Empty => console.error(EMPTY_CATALOG),
        SearchOutcome::Exact(title, movie) => console.success(describe(&title, &movie)),
        SearchOutcome::Matches(found) => {
            for (title, movie) in found {
                console.item(format!("{title}: {}", format_rating(movie.rating)));
            }
        }
        SearchOutcome::Suggestions(found) => {
            console.error(format!("Movie {} not found. Did you mean:", query.trim()));
            for (title, movie, _) in found {
                console.item(format!("{title}: {}", format_rating(movie.rating)));
            }
        }
    }
    Ok(())
}

fn handle_sorted(app: &MovieApp, console: &Console) -> Result<()> {
    let sorted = app.sorted_by_rating()?;
    if sorted.is_empty() {
        console.error(EMPTY_CATALOG);
    }
    for (title, movie) in sorted {
        console.item(format!("{title}: {}", format_rating(movie.rating)));
    }
    Ok(())
}

fn handle_histogram(app: &MovieApp, console: &Console) -> Result<()> {
    let file: String = Input::new()
        .with_prompt("Enter the filename to save the histogram")
        .default("ratings_histogram.svg".to_string())
        .interact_text()?;
    app.rating_histogram(&PathBuf::from(&file))?;
    console.success(format!("Plot saved as {file}."));
    Ok(())
}

fn describe(title: &str, movie: &Movie) -> String {
    format!("{title} ({}): {}", movie.year, format_rating(movie.rating))
}
