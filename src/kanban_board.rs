use crate::error::{BoardError, Result};
use crate::seed;
use crate::storage::{KeyValueStore, SHOW_SIDEBAR_KEY, TASKS_KEY};
use crate::task::{NewTask, Task, TaskPatch, TaskStatus};

/// Next free id: one past the largest id in use.
pub fn next_id(tasks: &[Task]) -> Result<u64> {
    match tasks.iter().map(|t| t.id).max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| BoardError::validation("no task ids left")),
    }
}

pub fn tasks_by_status<'a>(tasks: &'a [Task], board: &str, status: TaskStatus) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| t.board == board && t.status == status)
        .collect()
}

/// Task list persisted as one JSON document. Every mutation reads the whole
/// list, changes it, and writes it back in a single `set`.
#[derive(Debug)]
pub struct KanbanBoard<S> {
    store: S,
}

impl<S: KeyValueStore> KanbanBoard<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Seed the built-in dataset when no task list exists yet.
    pub fn initialize(&mut self) -> Result<bool> {
        if self.store.get(TASKS_KEY)?.is_some() {
            tracing::debug!("task list already present, skipping seed");
            return Ok(false);
        }
        // `tasks` marks seeding as done, so it goes last.
        self.store.set(SHOW_SIDEBAR_KEY, "true")?;
        self.save_tasks(&seed::initial_tasks())?;
        tracing::info!("seeded built-in tasks");
        Ok(true)
    }

    pub fn get_tasks(&self) -> Result<Vec<Task>> {
        match self.store.get(TASKS_KEY)? {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => Ok(Vec::new()),
        }
    }

    fn save_tasks(&mut self, tasks: &[Task]) -> Result<()> {
        let data = serde_json::to_string(tasks)?;
        self.store.set(TASKS_KEY, &data)
    }

    pub fn create_new_task(&mut self, input: NewTask) -> Result<Task> {
        input.validate()?;
        let mut tasks = self.get_tasks()?;
        let task = input.into_task(next_id(&tasks)?);
        tasks.push(task.clone());
        self.save_tasks(&tasks)?;
        tracing::info!(id = task.id, board = %task.board, "task created");
        Ok(task)
    }

    pub fn put_task(&mut self, id: u64, patch: TaskPatch) -> Result<Task> {
        patch.validate()?;
        let mut tasks = self.get_tasks()?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| BoardError::not_found(format!("task #{id}")))?;
        patch.apply(task);
        let updated = task.clone();
        self.save_tasks(&tasks)?;
        tracing::info!(id, status = %updated.status, "task updated");
        Ok(updated)
    }

    /// Remove a task. Returns `None` without writing when the id is unknown.
    pub fn delete_task(&mut self, id: u64) -> Result<Option<Task>> {
        let mut tasks = self.get_tasks()?;
        let Some(pos) = tasks.iter().position(|t| t.id == id) else {
            tracing::debug!(id, "delete of unknown task ignored");
            return Ok(None);
        };
        let removed = tasks.remove(pos);
        self.save_tasks(&tasks)?;
        tracing::info!(id, "task deleted");
        Ok(Some(removed))
    }

    /// Shift a task one column left (-1) or right (+1).
    pub fn move_task(&mut self, id: u64, direction: isize) -> Result<Task> {
        let current = self
            .get_tasks()?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| BoardError::not_found(format!("task #{id}")))?;
        let status = current.status.shifted(direction);
        if status == current.status {
            return Ok(current);
        }
        self.put_task(
            id,
            TaskPatch {
                status: Some(status),
                ..Default::default()
            },
        )
    }
}
