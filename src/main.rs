mod boards;
mod cli;
mod config;
mod error;
mod kanban_board;
mod preferences;
mod seed;
mod storage;
mod task;
mod ui;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::process::ExitCode;
use std::sync::Mutex;
use std::{io, panic};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use config::Config;
use kanban_board::KanbanBoard;
use storage::FileStore;

fn init_logging(config: &Config, to_file: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    // The TUI owns the screen, so its log goes to a file.
    if to_file {
        let path = config.log_file();
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => {
                builder.with_ansi(false).with_writer(Mutex::new(file)).init();
                return;
            }
            Err(err) => eprintln!("cannot open log file {}: {err}", path.display()),
        }
    }
    builder.with_writer(io::stderr).init();
}

fn run_tui(board: &mut KanbanBoard<FileStore>) -> Result<(), Box<dyn std::error::Error>> {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, board);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match cli.config.or_else(config::default_config_path) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    let command = cli.command.unwrap_or(Commands::Tui);
    let interactive = matches!(command, Commands::Tui);
    init_logging(&config, interactive);

    let data_file = cli.data.unwrap_or_else(|| config.data_file());
    tracing::debug!(path = %data_file.display(), "opening storage");
    let mut board = KanbanBoard::new(FileStore::new(&data_file));
    if board.initialize()? && !interactive {
        eprintln!("Created {} with sample boards", board.store().path().display());
    }

    if interactive {
        run_tui(&mut board)
    } else {
        cli::execute(&mut board, command)?;
        Ok(())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
