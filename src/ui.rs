use crate::boards::BoardState;
use crate::error::{BoardError, Result};
use crate::kanban_board::{tasks_by_status, KanbanBoard};
use crate::preferences::Preferences;
use crate::storage::KeyValueStore;
use crate::task::{NewTask, Task, TaskPatch, TaskStatus};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io::{self, Write};

/// Screen state. Everything here is rebuilt from the store after each mutation.
struct UiState {
    tasks: Vec<Task>,
    boards: BoardState,
    prefs: Preferences,
    selected_status: usize,
    selected_task: usize,
    message: Option<String>,
}

impl UiState {
    fn load<S: KeyValueStore>(board: &KanbanBoard<S>) -> Result<Self> {
        let tasks = board.get_tasks()?;
        let boards = BoardState::load(board.store(), &tasks)?;
        let prefs = Preferences::load(board.store())?;
        Ok(Self {
            tasks,
            boards,
            prefs,
            selected_status: 0,
            selected_task: 0,
            message: None,
        })
    }

    fn refresh<S: KeyValueStore>(&mut self, board: &KanbanBoard<S>) -> Result<()> {
        self.tasks = board.get_tasks()?;
        let persisted = self.boards.active.clone();
        self.boards = BoardState::from_tasks(&self.tasks, persisted.as_deref());
        let len = self.column(TaskStatus::ALL[self.selected_status]).len();
        self.selected_task = self.selected_task.min(len.saturating_sub(1));
        Ok(())
    }

    fn active(&self) -> &str {
        self.boards.active.as_deref().unwrap_or("")
    }

    fn column(&self, status: TaskStatus) -> Vec<&Task> {
        tasks_by_status(&self.tasks, self.active(), status)
    }

    fn selected(&self) -> Option<Task> {
        self.column(TaskStatus::ALL[self.selected_status])
            .get(self.selected_task)
            .map(|t| (*t).clone())
    }

    fn palette(&self) -> (Style, Color) {
        if self.prefs.light_theme {
            (Style::default().fg(Color::Black).bg(Color::White), Color::Blue)
        } else {
            (Style::default().fg(Color::White), Color::Cyan)
        }
    }
}

pub fn run_app<B: Backend + Write, S: KeyValueStore>(
    terminal: &mut Terminal<B>,
    board: &mut KanbanBoard<S>,
) -> io::Result<()> {
    let mut state = match UiState::load(board) {
        Ok(state) => state,
        Err(e) => return Err(io::Error::new(io::ErrorKind::Other, e)),
    };

    loop {
        terminal.draw(|f| draw(f, &state))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        state.message = None;

        let outcome = match key.code {
            KeyCode::Char('q') => return Ok(()),
            KeyCode::Left => {
                if state.selected_status > 0 {
                    state.selected_status -= 1;
                    state.selected_task = 0;
                }
                Ok(())
            }
            KeyCode::Right => {
                if state.selected_status < TaskStatus::ALL.len() - 1 {
                    state.selected_status += 1;
                    state.selected_task = 0;
                }
                Ok(())
            }
            KeyCode::Up => {
                state.selected_task = state.selected_task.saturating_sub(1);
                Ok(())
            }
            KeyCode::Down => {
                let max_tasks = state.column(TaskStatus::ALL[state.selected_status]).len();
                if state.selected_task + 1 < max_tasks {
                    state.selected_task += 1;
                }
                Ok(())
            }
            KeyCode::Char('a') => match ask_new_task(terminal, &state)? {
                Some(input) => create_from_input(board, input),
                None => Ok(()),
            },
            KeyCode::Char('e') => match state.selected() {
                Some(task) => {
                    let input = ask_edit(terminal, &task)?;
                    apply_edit(board, task.id, input)
                }
                None => Ok(()),
            },
            KeyCode::Char('d') => match state.selected() {
                Some(task) => board.delete_task(task.id).map(|_| ()),
                None => Ok(()),
            },
            KeyCode::Enter => match state.selected() {
                Some(task) => board.move_task(task.id, 1).map(|_| ()),
                None => Ok(()),
            },
            KeyCode::Backspace => match state.selected() {
                Some(task) => board.move_task(task.id, -1).map(|_| ()),
                None => Ok(()),
            },
            KeyCode::Tab => match state.boards.next_board().map(str::to_string) {
                Some(next) => state
                    .boards
                    .clone()
                    .select_board(board.store_mut(), &next)
                    .map(|selected| {
                        state.boards = selected;
                        state.selected_task = 0;
                    }),
                None => Ok(()),
            },
            KeyCode::Char('s') => {
                let show = !state.prefs.show_sidebar;
                state.prefs.set_sidebar(board.store_mut(), show)
            }
            KeyCode::Char('t') => {
                let light = !state.prefs.light_theme;
                state.prefs.set_light_theme(board.store_mut(), light)
            }
            _ => Ok(()),
        };

        // Redraw only from what the store now holds.
        let outcome = outcome.and_then(|()| state.refresh(board));
        if let Err(err) = outcome {
            tracing::warn!(%err, "board action failed");
            state.message = Some(err.to_string());
        }
    }
}

fn draw(f: &mut Frame, state: &UiState) {
    let (base, accent) = state.palette();
    f.render_widget(Block::default().style(base), f.area());

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            state.boards.active.as_deref().unwrap_or("No boards"),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  ({} tasks)", state.tasks.len())),
    ]))
    .block(Block::default().borders(Borders::ALL).title("taskboard"));
    f.render_widget(header, rows[0]);

    let mut body = rows[1];
    if state.prefs.show_sidebar {
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Length(24), Constraint::Min(10)])
            .split(rows[1]);
        draw_sidebar(f, state, split[0], accent);
        body = split[1];
    }
    draw_columns(f, state, body, accent);

    let footer = match &state.message {
        Some(msg) => Line::from(Span::styled(msg.as_str(), Style::default().fg(Color::Red))),
        None => Line::from(
            "a add  e edit  d delete  Enter/Bksp move  Tab board  s sidebar  t theme  q quit",
        ),
    };
    f.render_widget(Paragraph::new(footer), rows[2]);
}

fn draw_sidebar(f: &mut Frame, state: &UiState, area: Rect, accent: Color) {
    let items: Vec<ListItem> = state
        .boards
        .boards
        .iter()
        .map(|name| {
            let style = if state.boards.active.as_deref() == Some(name.as_str()) {
                Style::default().fg(accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Span::styled(name.as_str(), style))
        })
        .collect();
    let title = format!("All boards ({})", state.boards.boards.len());
    let list = List::new(items).block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(list, area);
}

fn draw_columns(f: &mut Frame, state: &UiState, area: Rect, accent: Color) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(area);

    for status in TaskStatus::ALL {
        let i = status.index();
        let tasks = state.column(status);
        let items: Vec<ListItem> = tasks
            .iter()
            .map(|t| {
                ListItem::new(Line::from(vec![
                    Span::raw(format!("[#{}] ", t.id)),
                    Span::raw(t.title.as_str()),
                ]))
            })
            .collect();

        let selected = state.selected_status == i;
        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!("{} ({})", status.title(), tasks.len()))
                    .borders(Borders::ALL)
                    .border_style(if selected {
                        Style::default().fg(accent)
                    } else {
                        Style::default()
                    }),
            )
            .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));

        let mut list_state = ListState::default();
        if selected && !tasks.is_empty() {
            list_state.select(Some(state.selected_task));
        }
        f.render_stateful_widget(list, chunks[i], &mut list_state);
    }
}

fn ask_new_task<B: Backend + Write>(
    terminal: &mut Terminal<B>,
    state: &UiState,
) -> io::Result<Option<NewTask>> {
    let Some(title) = prompt(terminal, "Task title", "")? else {
        return Ok(None);
    };
    let description = prompt(terminal, "Description", "")?.unwrap_or_default();
    let board = prompt(terminal, "Board", state.active())?
        .unwrap_or_else(|| state.active().to_string());
    Ok(Some(NewTask {
        title,
        description,
        status: TaskStatus::ALL[state.selected_status],
        board,
    }))
}

struct EditInput {
    title: Option<String>,
    description: Option<String>,
    status: Option<String>,
}

fn ask_edit<B: Backend + Write>(terminal: &mut Terminal<B>, task: &Task) -> io::Result<EditInput> {
    Ok(EditInput {
        title: prompt(terminal, "Title", &task.title)?,
        description: prompt(terminal, "Description", &task.description)?,
        status: prompt(terminal, "Status (todo/doing/done)", &task.status.to_string())?,
    })
}

fn create_from_input<S: KeyValueStore>(board: &mut KanbanBoard<S>, input: NewTask) -> Result<()> {
    if input.board.trim().is_empty() {
        return Err(BoardError::validation("board name must not be empty"));
    }
    board.create_new_task(input)?;
    Ok(())
}

fn apply_edit<S: KeyValueStore>(board: &mut KanbanBoard<S>, id: u64, input: EditInput) -> Result<()> {
    let patch = TaskPatch {
        title: input.title,
        description: input.description,
        status: input
            .status
            .map(|s| s.parse::<TaskStatus>())
            .transpose()?,
        board: None,
    };
    if !patch.is_empty() {
        board.put_task(id, patch)?;
    }
    Ok(())
}

/// Empty input keeps `current`; a lone `-` clears it.
fn interpret_answer(input: &str, current: &str) -> Option<String> {
    match input.trim() {
        "" => None,
        "-" if current.is_empty() => None,
        "-" => Some(String::new()),
        answer if answer == current => None,
        answer => Some(answer.to_string()),
    }
}

/// Line prompt on the normal screen.
fn prompt<B: Backend + Write>(
    terminal: &mut Terminal<B>,
    message: &str,
    current: &str,
) -> io::Result<Option<String>> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    if current.is_empty() {
        println!("{message}:");
    } else {
        println!("{message} [{current}] (- clears):");
    }
    let mut input = String::new();
    let read = io::stdin().read_line(&mut input);
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    enable_raw_mode()?;
    terminal.clear()?;
    read?;
    Ok(interpret_answer(&input, current))
}
