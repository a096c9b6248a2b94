//! Calorie Board
//!
//! Command-line driver: every command is one action dispatched to the store.

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use calorie_board::db::Database;
use calorie_board::document::{
    export_day, export_library, import_day, parse_library_items, read_import, ImportError,
};
use calorie_board::models::{Category, FoodItemCreate, LibraryFilter, TargetsUpdate};
use calorie_board::report;
use calorie_board::store::{Action, Store};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// SQLite file holding the board, library, targets and pot
    #[arg(long, global = true, env = "CALORIE_BOARD_DATABASE_PATH")]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the day board and the daily summary
    Show,
    /// Put a library item (id or name) on the board
    Add {
        food: String,
        #[arg(short, long, default_value = "extra", value_parser = parse_category)]
        category: Category,
        #[arg(short, long, default_value_t = 0.0)]
        amount: f64,
    },
    /// Create a board entry directly, without a library item
    Create {
        #[arg(value_parser = parse_category)]
        slot: Category,
        #[command(flatten)]
        food: FoodArgs,
    },
    /// Set an entry's amount
    Amount { id: String, value: f64 },
    /// Move an entry to a position within a category (default: last)
    Move {
        id: String,
        #[arg(value_parser = parse_category)]
        category: Category,
        index: Option<usize>,
    },
    /// Remove an entry
    Remove { id: String },
    /// Edit an entry's name, unit, max and profile
    Edit {
        id: String,
        /// Move the entry to another category
        #[arg(long, value_parser = parse_category)]
        to: Option<Category>,
        #[command(flatten)]
        food: FoodArgs,
    },
    /// Zero amounts, for one category or the whole day
    Reset {
        #[arg(short, long, value_parser = parse_category)]
        category: Option<Category>,
    },
    /// Remove entries, for one category or the whole day
    Clear {
        #[arg(short, long, value_parser = parse_category)]
        category: Option<Category>,
    },
    /// Show or edit the daily targets
    Targets(TargetArgs),
    /// Write the day as JSON (stdout when no path is given)
    Export { path: Option<PathBuf> },
    /// Replace the day with an exported file
    Import { path: Option<PathBuf> },
    /// Food library
    #[command(subcommand)]
    Library(LibraryCommand),
    /// Cooking pot
    #[command(subcommand)]
    Pot(PotCommand),
}

#[derive(Subcommand, Debug)]
enum LibraryCommand {
    List {
        #[arg(short, long)]
        query: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        /// `ingredient` or `meal`
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
    },
    Add(FoodArgs),
    Update {
        id: String,
        #[command(flatten)]
        food: FoodArgs,
    },
    Remove { id: String },
    /// Place an item before (or after) another one
    Move {
        id: String,
        target: String,
        #[arg(long)]
        after: bool,
    },
    Export { path: Option<PathBuf> },
    /// Merge items from an exported library
    Import { path: Option<PathBuf> },
}

#[derive(Subcommand, Debug)]
enum PotCommand {
    Show,
    /// One step more of a library item (100 g/ml or 1 piece)
    Add { item: String },
    Amount { id: String, value: f64 },
    Remove { id: String },
    Clear,
    /// Load a saved meal into the pot for editing
    Edit { meal: String },
    /// Save the pot as a meal
    Save { name: String },
    /// Save the pot's per-100 profile as an ingredient
    SaveIngredient {
        name: String,
        #[arg(long)]
        category: Option<String>,
    },
}

/// Ingredient form fields
#[derive(Args, Debug)]
struct FoodArgs {
    name: String,
    /// Library category
    #[arg(long)]
    category: Option<String>,
    #[arg(long, default_value = "g")]
    unit: String,
    #[arg(long, default_value_t = 1000.0)]
    max: f64,
    #[arg(long, default_value_t = 0.0)]
    protein: f64,
    #[arg(long, default_value_t = 0.0)]
    fat: f64,
    #[arg(long, default_value_t = 0.0)]
    sat_fat: f64,
    #[arg(long, default_value_t = 0.0)]
    carbs: f64,
    #[arg(long, default_value_t = 0.0)]
    sugar: f64,
    #[arg(long, default_value_t = 0.0)]
    fiber: f64,
    #[arg(long, default_value_t = 0.0)]
    salt: f64,
    /// Calories per 100; derived from the macros when omitted
    #[arg(long)]
    kcal: Option<f64>,
}

impl From<FoodArgs> for FoodItemCreate {
    fn from(a: FoodArgs) -> Self {
        Self {
            name: a.name,
            category: a.category,
            unit: a.unit,
            max: a.max,
            protein: a.protein,
            fat: a.fat,
            sat_fat: a.sat_fat,
            carbs: a.carbs,
            sugar: a.sugar,
            fiber: a.fiber,
            salt: a.salt,
            kcal: a.kcal,
        }
    }
}

#[derive(Args, Debug)]
struct TargetArgs {
    /// Restore the default targets
    #[arg(long)]
    reset: bool,
    #[arg(long)]
    protein: Option<f64>,
    #[arg(long)]
    fat: Option<f64>,
    #[arg(long)]
    sat_fat: Option<f64>,
    #[arg(long)]
    carbs: Option<f64>,
    #[arg(long)]
    sugar: Option<f64>,
    #[arg(long)]
    fiber: Option<f64>,
    #[arg(long)]
    salt: Option<f64>,
}

impl TargetArgs {
    fn update(&self) -> TargetsUpdate {
        TargetsUpdate {
            protein: self.protein,
            fat: self.fat,
            sat_fat: self.sat_fat,
            carbs: self.carbs,
            sugar: self.sugar,
            fiber: self.fiber,
            salt: self.salt,
        }
    }
}

fn parse_category(s: &str) -> Result<Category, String> {
    Category::from_str(s).ok_or_else(|| {
        let names: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
        format!("expected one of {}", names.join(", "))
    })
}

/// Get the database path from environment or use default
fn get_database_path(flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| {
        let mut path = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));

        // Go up from target/release or target/debug to project root
        if path.ends_with("release") || path.ends_with("debug") {
            if let Some(parent) = path.parent() {
                if let Some(grandparent) = parent.parent() {
                    path = grandparent.to_path_buf();
                }
            }
        }

        path.push("data");
        path.push("calorie-board.db");
        path
    })
}

fn write_json<T: serde::Serialize>(value: &T, path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let text = serde_json::to_string_pretty(value)?;
    match path {
        Some(path) => {
            std::fs::write(path, text)?;
            tracing::info!(path = %path.display(), "Exported");
        }
        None => println!("{}", text),
    }
    Ok(())
}

/// Import text, or `None` when the user chose no file
fn import_text(path: Option<&Path>) -> Result<Option<String>, ImportError> {
    match read_import(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.is_cancelled() => {
            tracing::debug!("Import cancelled");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn run(store: &mut Store, command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Show => {}
        Command::Add { food, category, amount } => {
            store.dispatch(Action::AddFromLibrary { item: food, category, amount })?;
        }
        Command::Create { slot, food } => {
            store.dispatch(Action::CreateEntry { category: slot, data: food.into() })?;
        }
        Command::Amount { id, value } => {
            store.dispatch(Action::SetAmount { id, amount: value })?;
        }
        Command::Move { id, category, index } => {
            let index = index.unwrap_or(usize::MAX);
            store.dispatch(Action::MoveEntry { id, category, index })?;
        }
        Command::Remove { id } => {
            store.dispatch(Action::RemoveEntry { id })?;
        }
        Command::Edit { id, to, food } => {
            store.dispatch(Action::EditEntry { id, category: to, data: food.into() })?;
        }
        Command::Reset { category } => {
            store.dispatch(category.map_or(Action::ResetDay, Action::ResetCategory))?;
        }
        Command::Clear { category } => {
            store.dispatch(category.map_or(Action::ClearDay, Action::ClearCategory))?;
        }
        Command::Targets(args) => {
            if args.reset {
                store.dispatch(Action::ResetTargets)?;
            }
            let update = args.update();
            if update != TargetsUpdate::default() {
                store.dispatch(Action::SetTargets(update))?;
            }
            let t = &store.state().targets;
            println!(
                "kcal {} | protein {} | fat {} | sat fat {} | carbs {} | sugar {} | fiber {} | salt {}",
                t.kcal(),
                t.protein,
                t.fat,
                t.sat_fat,
                t.carbs,
                t.sugar,
                t.fiber,
                t.salt
            );
            return Ok(());
        }
        Command::Export { path } => {
            write_json(&export_day(&store.state().day), path.as_deref())?;
            return Ok(());
        }
        Command::Import { path } => {
            let Some(text) = import_text(path.as_deref())? else {
                return Ok(());
            };
            let board = import_day(&text)?;
            store.dispatch(Action::ReplaceDay(board))?;
            eprintln!("Loaded successfully.");
        }
        Command::Library(cmd) => return run_library(store, cmd),
        Command::Pot(cmd) => return run_pot(store, cmd),
    }

    let state = store.state();
    print!("{}", report::render_day(&state.day, &state.targets));
    Ok(())
}

fn run_library(store: &mut Store, command: LibraryCommand) -> Result<(), Box<dyn Error>> {
    match command {
        LibraryCommand::List { query, category, kind } => {
            let filter = LibraryFilter { query, category, kind };
            print!("{}", report::render_library(&store.state().library.filter(&filter)));
            return Ok(());
        }
        LibraryCommand::Add(food) => {
            store.dispatch(Action::CreateIngredient(food.into()))?;
        }
        LibraryCommand::Update { id, food } => {
            store.dispatch(Action::UpdateIngredient { id, data: food.into() })?;
        }
        LibraryCommand::Remove { id } => {
            store.dispatch(Action::DeleteFood { id })?;
        }
        LibraryCommand::Move { id, target, after } => {
            store.dispatch(Action::MoveFood { id, target, before: !after })?;
        }
        LibraryCommand::Export { path } => {
            write_json(&export_library(&store.state().library), path.as_deref())?;
            return Ok(());
        }
        LibraryCommand::Import { path } => {
            let Some(text) = import_text(path.as_deref())? else {
                return Ok(());
            };
            let items = parse_library_items(&text)?;
            let before = store.state().library.len();
            store.dispatch(Action::MergeLibrary(items))?;
            eprintln!("Imported {} item(s).", store.state().library.len() - before);
        }
    }

    let all = store.state().library.filter(&LibraryFilter::default());
    print!("{}", report::render_library(&all));
    Ok(())
}

fn run_pot(store: &mut Store, command: PotCommand) -> Result<(), Box<dyn Error>> {
    match command {
        PotCommand::Show => {}
        PotCommand::Add { item } => {
            store.dispatch(Action::AddToPot { item })?;
        }
        PotCommand::Amount { id, value } => {
            store.dispatch(Action::SetPotAmount { id, amount: value })?;
        }
        PotCommand::Remove { id } => {
            store.dispatch(Action::RemoveFromPot { id })?;
        }
        PotCommand::Clear => {
            store.dispatch(Action::ClearPot)?;
        }
        PotCommand::Edit { meal } => {
            store.dispatch(Action::EditMeal { id: meal })?;
        }
        PotCommand::Save { name } => {
            store.dispatch(Action::SaveMeal { name })?;
            eprintln!("Meal saved.");
        }
        PotCommand::SaveIngredient { name, category } => {
            store.dispatch(Action::SavePotAsIngredient { name, category })?;
            eprintln!("Ingredient saved.");
        }
    }

    let state = store.state();
    print!("{}", report::render_pot(&state.pot, &state.library));
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    // Log to stderr; stdout carries command output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("calorie_board=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let db_path = get_database_path(cli.database);
    tracing::debug!(path = %db_path.display(), "Database path");

    // Ensure data directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::open(&db_path)?;
    let mut store = Store::open(database);
    run(&mut store, cli.command)
}
