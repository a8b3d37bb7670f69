//! Board list and active-board selection, both derived from the flat task list.

use crate::error::{BoardError, Result};
use crate::storage::{KeyValueStore, ACTIVE_BOARD_KEY};
use crate::task::Task;

/// Distinct non-empty board names in order of first appearance.
pub fn derive_boards(tasks: &[Task]) -> Vec<String> {
    let mut boards: Vec<String> = Vec::new();
    for task in tasks {
        if !task.board.is_empty() && !boards.iter().any(|b| *b == task.board) {
            boards.push(task.board.clone());
        }
    }
    boards
}

pub fn resolve_active_board(boards: &[String], persisted: Option<&str>) -> Option<String> {
    match persisted {
        Some(choice) if boards.iter().any(|b| b == choice) => Some(choice.to_string()),
        _ => boards.first().cloned(),
    }
}

pub fn load_active_board<S: KeyValueStore>(store: &S) -> Result<Option<String>> {
    match store.get(ACTIVE_BOARD_KEY)? {
        Some(data) => Ok(serde_json::from_str(&data)?),
        None => Ok(None),
    }
}

/// Boards currently known plus the one on screen. Selection goes through
/// [`BoardState::select_board`], which is the only writer of `activeBoard`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardState {
    pub boards: Vec<String>,
    pub active: Option<String>,
}

impl BoardState {
    pub fn from_tasks(tasks: &[Task], persisted: Option<&str>) -> Self {
        let boards = derive_boards(tasks);
        let active = resolve_active_board(&boards, persisted);
        if let (Some(choice), Some(active)) = (persisted, active.as_deref()) {
            if choice != active {
                tracing::warn!(stale = choice, active, "stored active board no longer exists");
            }
        }
        Self { boards, active }
    }

    pub fn load<S: KeyValueStore>(store: &S, tasks: &[Task]) -> Result<Self> {
        let persisted = load_active_board(store)?;
        Ok(Self::from_tasks(tasks, persisted.as_deref()))
    }

    pub fn select_board<S: KeyValueStore>(self, store: &mut S, name: &str) -> Result<Self> {
        if !self.boards.iter().any(|b| b == name) {
            return Err(BoardError::not_found(format!("board '{name}'")));
        }
        store.set(ACTIVE_BOARD_KEY, &serde_json::to_string(name)?)?;
        tracing::info!(board = name, "active board selected");
        Ok(Self {
            active: Some(name.to_string()),
            ..self
        })
    }

    /// Board after the active one, wrapping around.
    pub fn next_board(&self) -> Option<&str> {
        let active = self.active.as_deref()?;
        let pos = self.boards.iter().position(|b| b == active)?;
        self.boards
            .get((pos + 1) % self.boards.len())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::task::TaskStatus;

    fn on_board(id: u64, board: &str) -> Task {
        Task {
            id,
            title: format!("task {id}"),
            description: String::new(),
            status: TaskStatus::Todo,
            board: board.to_string(),
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_derive_boards_collapses_duplicates() {
        let tasks = vec![on_board(1, "A"), on_board(2, "B"), on_board(3, "A")];
        assert_eq!(derive_boards(&tasks), names(&["A", "B"]));
    }

    #[test]
    fn test_derive_boards_skips_empty_names() {
        let tasks = vec![on_board(1, ""), on_board(2, "B")];
        assert_eq!(derive_boards(&tasks), names(&["B"]));
        assert!(derive_boards(&[]).is_empty());
    }

    #[test]
    fn test_resolve_active_board() {
        let boards = names(&["A", "B"]);
        assert_eq!(resolve_active_board(&boards, Some("B")).as_deref(), Some("B"));
        assert_eq!(resolve_active_board(&boards, Some("C")).as_deref(), Some("A"));
        assert_eq!(resolve_active_board(&boards, None).as_deref(), Some("A"));
        assert_eq!(resolve_active_board(&[], Some("A")), None);
        assert_eq!(resolve_active_board(&[], None), None);
    }

    #[test]
    fn test_select_board_persists_choice() {
        let tasks = vec![on_board(1, "A"), on_board(2, "B")];
        let mut store = MemoryStore::default();
        let state = BoardState::load(&store, &tasks).unwrap();
        assert_eq!(state.active.as_deref(), Some("A"));

        let state = state.select_board(&mut store, "B").unwrap();
        assert_eq!(state.active.as_deref(), Some("B"));
        assert_eq!(
            store.entries.get(ACTIVE_BOARD_KEY).map(String::as_str),
            Some("\"B\"")
        );

        let reloaded = BoardState::load(&store, &tasks).unwrap();
        assert_eq!(reloaded, state);
    }

    #[test]
    fn test_select_unknown_board_fails_without_writing() {
        let tasks = vec![on_board(1, "A")];
        let mut store = MemoryStore::default();
        let state = BoardState::load(&store, &tasks).unwrap();
        let err = state.select_board(&mut store, "Z").unwrap_err();
        assert!(matches!(err, BoardError::NotFound(_)));
        assert!(store.entries.get(ACTIVE_BOARD_KEY).is_none());
    }

    #[test]
    fn test_stale_choice_falls_back_to_first() {
        let tasks = vec![on_board(1, "A"), on_board(2, "B")];
        let mut store = MemoryStore::default();
        store
            .entries
            .insert(ACTIVE_BOARD_KEY.to_string(), "\"Gone\"".to_string());
        let state = BoardState::load(&store, &tasks).unwrap();
        assert_eq!(state.active.as_deref(), Some("A"));
    }

    #[test]
    fn test_next_board_wraps() {
        let state = BoardState::from_tasks(&[on_board(1, "A"), on_board(2, "B")], Some("B"));
        assert_eq!(state.next_board(), Some("A"));
        assert_eq!(BoardState::default().next_board(), None);
    }
}
