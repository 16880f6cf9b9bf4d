use std::collections::VecDeque;

use tracing::{debug, info};

use super::TaskRepository;
use crate::domain::task::{Stats, Task, TaskId};
use crate::error::TaskError;

/// Process-lifetime task collection. Newest task sits at the front.
pub struct InMemoryTaskRepo {
    items: VecDeque<Task>,
    next_id: u64,
}

impl Default for InMemoryTaskRepo {
    fn default() -> Self {
        Self {
            items: VecDeque::new(),
            next_id: 1,
        }
    }
}

impl InMemoryTaskRepo {
    /// Builds a collection by adding each text in order; blank entries are skipped.
    pub fn with_seed<I, S>(seed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut repo = Self::default();
        for text in seed {
            let _ = repo.add(text.as_ref());
        }
        repo
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.items.iter().position(|t| t.id == id)
    }
}

impl TaskRepository for InMemoryTaskRepo {
    fn all(&self) -> Vec<Task> {
        self.items.iter().cloned().collect()
    }

    fn add(&mut self, raw_text: &str) -> Result<Task, TaskError> {
        let text = raw_text.trim();
        if text.is_empty() {
            debug!("rejected blank task text");
            return Err(TaskError::EmptyInput);
        }

        let id = TaskId(self.next_id);
        self.next_id += 1;

        let task = Task::new(id, text);
        self.items.push_front(task.clone());
        debug!(%id, total = self.items.len(), "task added");
        Ok(task)
    }

    fn toggle(&mut self, id: TaskId) -> Result<Task, TaskError> {
        let Some(task) = self.items.iter_mut().find(|t| t.id == id) else {
            debug!(%id, "toggle target not found");
            return Err(TaskError::NotFound(id));
        };
        task.completed = !task.completed;
        debug!(%id, completed = task.completed, "task toggled");
        Ok(task.clone())
    }

    fn delete(&mut self, id: TaskId) -> Result<Task, TaskError> {
        let removed = self.position(id).and_then(|pos| self.items.remove(pos));
        match removed {
            Some(task) => {
                debug!(%id, total = self.items.len(), "task deleted");
                Ok(task)
            }
            None => {
                debug!(%id, "delete target not found");
                Err(TaskError::NotFound(id))
            }
        }
    }

    fn clear_all(&mut self) -> usize {
        let cleared = self.items.len();
        if cleared > 0 {
            self.items.clear();
            info!(cleared, "cleared all tasks");
        }
        cleared
    }

    fn stats(&self) -> Stats {
        Stats {
            total: self.items.len(),
            completed: self.items.iter().filter(|t| t.completed).count(),
        }
    }
}
