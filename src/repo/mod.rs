use crate::domain::task::{Stats, Task, TaskId};
use crate::error::TaskError;

pub mod memory;

/// Operation set of a task collection. Ordering of `all` is newest first.
pub trait TaskRepository {
    fn all(&self) -> Vec<Task>;
    fn add(&mut self, raw_text: &str) -> Result<Task, TaskError>;
    fn toggle(&mut self, id: TaskId) -> Result<Task, TaskError>;
    fn delete(&mut self, id: TaskId) -> Result<Task, TaskError>;
    fn clear_all(&mut self) -> usize;
    fn stats(&self) -> Stats;
}
