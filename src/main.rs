mod app;
mod domain;
mod input;
mod logging;
mod persistence;
mod store;
mod ticker;
mod ui;

use anyhow::Result;
use app::AppState;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use persistence::{
    ensure_data_dir, init_local_data_dir, log_file, migrate_records, parse_records, storage_file, FileStorage,
    KeyValueStore, MemoryStorage, TODOS_KEY,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use store::TodoStore;

#[derive(Parser)]
#[command(name = "listo")]
#[command(about = "A small terminal to-do list with status tracking and rich-text notes", long_about = None)]
struct Cli {
    /// Keep to-dos in memory only; nothing is written to disk
    #[arg(long)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .listo directory in the current directory
    Init,
    /// Upgrade stored to-dos to the current format and write them back
    Migrate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            let data_dir = init_local_data_dir()?;
            println!("Initialized listo directory: {}", data_dir.display());
            println!();
            println!("listo will now keep its to-dos in this directory.");
            Ok(())
        }
        Some(Commands::Migrate) => {
            ensure_data_dir()?;
            logging::init_file_logging(&log_file()?)?;
            run_migrate()
        }
        None => {
            ensure_data_dir()?;
            logging::init_file_logging(&log_file()?)?;
            if cli.ephemeral {
                tracing::info!("running with in-memory storage");
                run_tui(MemoryStorage::new())
            } else {
                let storage = FileStorage::open(storage_file()?)?;
                eprintln!("Using storage: {}", storage.path().display());
                run_tui(storage)
            }
        }
    }
}

fn run_migrate() -> Result<()> {
    let mut storage = FileStorage::open(storage_file()?)?;
    let raw = storage.get_item(TODOS_KEY)?;
    let mut records = parse_records(raw.as_deref())?;

    let changed = migrate_records(&mut records, domain::now_millis());
    if changed == 0 {
        println!("All {} to-dos are already up to date.", records.len());
        return Ok(());
    }

    storage.set_item(TODOS_KEY, &serde_json::to_string(&records)?)?;
    tracing::info!(changed, total = records.len(), "rewrote migrated to-dos");
    println!("Migrated {} of {} to-dos in {}", changed, records.len(), storage.path().display());
    Ok(())
}

fn run_tui<S: KeyValueStore>(storage: S) -> Result<()> {
    let store = TodoStore::load(storage)?;
    let mut app = AppState::new(store)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(error = %err, "listo stopped with an error");
    } else {
        tracing::info!("listo exited");
    }
    result
}

fn run_app<S: KeyValueStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState<S>,
) -> Result<()> {
    let tick_rate = ticker::tick_duration();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press {
                    app.status_message = None;
                    match input::handle_key(app, key) {
                        Ok(true) => return Ok(()),
                        Ok(false) => {}
                        Err(err) => app.report_error(&err),
                    }
                }
            }
        }

        // Durations refresh once a minute
        app.tick();
    }
}
