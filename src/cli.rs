use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::boards::BoardState;
use crate::error::{BoardError, Result};
use crate::kanban_board::{tasks_by_status, KanbanBoard};
use crate::preferences::Preferences;
use crate::storage::KeyValueStore;
use crate::task::{NewTask, Task, TaskPatch, TaskStatus};

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(version)]
#[command(about = "Kanban board with Todo, Doing and Done columns")]
pub struct Cli {
    /// Storage document to use instead of the configured one
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive board (default)
    Tui,
    /// Show tasks of a board grouped by column
    List {
        #[arg(long)]
        board: Option<String>,
    },
    /// Add a new task
    Add {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long, default_value = "todo")]
        status: TaskStatus,
        /// Defaults to the active board
        #[arg(short, long)]
        board: Option<String>,
    },
    /// Change fields of an existing task
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        status: Option<TaskStatus>,
        #[arg(short, long)]
        board: Option<String>,
    },
    /// Delete a task
    Delete { id: u64 },
    /// List boards
    Boards,
    /// Make a board the active one
    Switch { board: String },
    /// Task count per column on the active board
    Stats,
    /// Show or hide the sidebar in the interactive board
    Sidebar {
        #[arg(value_parser = ["on", "off"])]
        state: String,
    },
    /// Switch the interactive board between light and dark colors
    Theme {
        #[arg(value_parser = ["light", "dark"])]
        mode: String,
    },
}

fn active_board_name(state: &BoardState) -> Result<String> {
    state
        .active
        .clone()
        .ok_or_else(|| BoardError::not_found("no boards yet, pass --board"))
}

fn column_counts(tasks: &[Task], board: &str) -> [usize; 3] {
    let mut counts = [0; 3];
    for task in tasks.iter().filter(|t| t.board == board) {
        counts[task.status.index()] += 1;
    }
    counts
}

pub fn execute<S: KeyValueStore>(board: &mut KanbanBoard<S>, command: Commands) -> Result<()> {
    let tasks = board.get_tasks()?;
    let state = BoardState::load(board.store(), &tasks)?;

    match command {
        // main opens the terminal UI itself
        Commands::Tui => {}
        Commands::List { board: name } => {
            let name = match name {
                Some(name) => name,
                None => active_board_name(&state)?,
            };
            println!("{name}");
            for status in TaskStatus::ALL {
                println!("{}:", status.title());
                for task in tasks_by_status(&tasks, &name, status) {
                    if task.description.is_empty() {
                        println!("- [#{}] {}", task.id, task.title);
                    } else {
                        println!("- [#{}] {} ({})", task.id, task.title, task.description);
                    }
                }
            }
        }
        Commands::Add {
            title,
            description,
            status,
            board: name,
        } => {
            let name = match name {
                Some(name) => name,
                None => active_board_name(&state)?,
            };
            let task = board.create_new_task(NewTask {
                title,
                description,
                status,
                board: name,
            })?;
            println!("Created task #{} on {}", task.id, task.board);
        }
        Commands::Edit {
            id,
            title,
            description,
            status,
            board: name,
        } => {
            let patch = TaskPatch {
                title,
                description,
                status,
                board: name,
            };
            if patch.is_empty() {
                return Err(BoardError::validation("nothing to change"));
            }
            let task = board.put_task(id, patch)?;
            println!("Updated task #{} ({}, {})", task.id, task.status, task.board);
        }
        Commands::Delete { id } => match board.delete_task(id)? {
            Some(task) => println!("Deleted task #{} {}", task.id, task.title),
            None => println!("No task #{id}"),
        },
        Commands::Boards => {
            for name in &state.boards {
                let marker = if state.active.as_deref() == Some(name.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {name}");
            }
        }
        Commands::Switch { board: name } => {
            let state = state.select_board(board.store_mut(), &name)?;
            if let Some(active) = state.active {
                println!("Active board: {active}");
            }
        }
        Commands::Stats => {
            let name = active_board_name(&state)?;
            println!("{name}");
            for (status, count) in TaskStatus::ALL.iter().zip(column_counts(&tasks, &name)) {
                println!("{}: {count}", status.title());
            }
        }
        Commands::Sidebar { state: flag } => {
            let mut prefs = Preferences::load(board.store())?;
            prefs.set_sidebar(board.store_mut(), flag == "on")?;
        }
        Commands::Theme { mode } => {
            let mut prefs = Preferences::load(board.store())?;
            prefs.set_light_theme(board.store_mut(), mode == "light")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, ACTIVE_BOARD_KEY, LIGHT_THEME_KEY};

    fn seeded() -> KanbanBoard<MemoryStore> {
        let mut board = KanbanBoard::new(MemoryStore::default());
        board.initialize().unwrap();
        board
    }

    #[test]
    fn test_parse_add_with_status() {
        let cli = Cli::try_parse_from(["taskboard", "add", "Ship", "-s", "doing", "-b", "Roadmap"])
            .unwrap();
        match cli.command {
            Some(Commands::Add { title, status, board, .. }) => {
                assert_eq!(title, "Ship");
                assert_eq!(status, TaskStatus::Doing);
                assert_eq!(board.as_deref(), Some("Roadmap"));
            }
            _ => panic!("expected add"),
        }
        assert!(Cli::try_parse_from(["taskboard", "add", "x", "-s", "later"]).is_err());
    }

    #[test]
    fn test_add_defaults_to_active_board() {
        let mut board = seeded();
        execute(
            &mut board,
            Commands::Switch {
                board: "Roadmap".to_string(),
            },
        )
        .unwrap();
        execute(
            &mut board,
            Commands::Add {
                title: "Write launch post".to_string(),
                description: String::new(),
                status: TaskStatus::Todo,
                board: None,
            },
        )
        .unwrap();
        let last = board.get_tasks().unwrap().pop().unwrap();
        assert_eq!(last.board, "Roadmap");
        assert_eq!(
            board.store().entries.get(ACTIVE_BOARD_KEY).map(String::as_str),
            Some("\"Roadmap\"")
        );
    }

    #[test]
    fn test_edit_requires_a_change() {
        let mut board = seeded();
        let err = execute(
            &mut board,
            Commands::Edit {
                id: 1,
                title: None,
                description: None,
                status: None,
                board: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, BoardError::Validation(_)));
    }

    #[test]
    fn test_add_without_boards_needs_explicit_board() {
        let mut board = KanbanBoard::new(MemoryStore::default());
        let err = execute(
            &mut board,
            Commands::Add {
                title: "First".to_string(),
                description: String::new(),
                status: TaskStatus::Todo,
                board: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, BoardError::NotFound(_)));
    }

    #[test]
    fn test_column_counts() {
        let tasks = crate::seed::initial_tasks();
        assert_eq!(column_counts(&tasks, "Launch Career"), [2, 1, 1]);
        assert_eq!(column_counts(&tasks, "Roadmap"), [1, 1, 1]);
        assert_eq!(column_counts(&tasks, "Nope"), [0, 0, 0]);
    }

    #[test]
    fn test_theme_command_sets_flag() {
        let mut board = seeded();
        execute(
            &mut board,
            Commands::Theme {
                mode: "light".to_string(),
            },
        )
        .unwrap();
        assert_eq!(
            board.store().entries.get(LIGHT_THEME_KEY).map(String::as_str),
            Some("enabled")
        );
    }
}
