use std::time::{Duration, Instant};

use time::{OffsetDateTime, UtcOffset};

use crate::domain::relative::relative_label;
use crate::domain::task::{Snapshot, Stats, Task, TaskId};
use crate::error::TaskError;
use crate::repo::TaskRepository;

/// How long a deleted row lingers on screen.
pub const FADE_DURATION: Duration = Duration::from_millis(250);
/// How long the input border stays red after a blank submit.
pub const INPUT_ERROR_FLASH: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
    ConfirmClear,
}

/// A row that has already been deleted but is still being drawn.
#[derive(Debug, Clone)]
pub struct FadingRow {
    pub task: Task,
    pub index: usize,
    pub since: Instant,
}

pub struct App<R: TaskRepository> {
    repo: R,
    pub tasks: Vec<Task>,
    pub stats: Stats,
    pub selected: usize,
    pub mode: InputMode,
    pub input: String,
    pub status: Option<String>,
    pub input_error_until: Option<Instant>,
    pub fading: Vec<FadingRow>,
    pub offset: UtcOffset,
}

impl<R: TaskRepository> App<R> {
    pub fn new(repo: R, offset: UtcOffset) -> Self {
        let tasks = repo.all();
        let stats = repo.stats();
        Self {
            repo,
            tasks,
            stats,
            selected: 0,
            mode: InputMode::Normal,
            input: String::new(),
            status: None,
            input_error_until: None,
            fading: Vec::new(),
            offset,
        }
    }

    pub fn reload(&mut self) {
        self.tasks = self.repo.all();
        self.stats = self.repo.stats();
        if self.tasks.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.tasks.len() {
            self.selected = self.tasks.len() - 1;
        }
    }

    /// Drops expired visual effects.
    pub fn tick(&mut self, now: Instant) {
        self.fading
            .retain(|row| now.duration_since(row.since) < FADE_DURATION);
        if self.input_error_until.is_some_and(|until| now >= until) {
            self.input_error_until = None;
        }
    }

    pub fn select_next(&mut self) {
        if !self.tasks.is_empty() {
            self.selected = (self.selected + 1).min(self.tasks.len() - 1);
        }
    }

    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    fn selected_id(&self) -> Option<TaskId> {
        self.tasks.get(self.selected).map(|t| t.id)
    }

    pub fn start_editing(&mut self) {
        self.mode = InputMode::Editing;
        self.input.clear();
        self.set_status("Type new task and press Enter");
    }

    pub fn cancel_editing(&mut self) {
        self.mode = InputMode::Normal;
        self.input.clear();
        self.input_error_until = None;
        self.set_status("Canceled");
    }

    pub fn add_task(&mut self) {
        match self.repo.add(&self.input) {
            Ok(_) => {
                self.input.clear();
                self.mode = InputMode::Normal;
                self.input_error_until = None;
                self.reload();
                self.selected = 0;
                self.set_status("Added");
            }
            Err(TaskError::EmptyInput) => {
                self.input_error_until = Some(Instant::now() + INPUT_ERROR_FLASH);
                self.set_status("Cannot add an empty task");
            }
            Err(err) => self.set_status(&err.to_string()),
        }
    }

    pub fn toggle_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        match self.repo.toggle(id) {
            Ok(task) if task.completed => self.set_status("Marked done"),
            Ok(_) => self.set_status("Marked open"),
            Err(err) => self.set_status(&err.to_string()),
        }
        self.reload();
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let index = self.selected;
        match self.repo.delete(id) {
            Ok(task) => {
                self.fading.push(FadingRow {
                    task,
                    index,
                    since: Instant::now(),
                });
                self.set_status("Deleted");
            }
            Err(err) => self.set_status(&err.to_string()),
        }
        self.reload();
    }

    /// Asks for confirmation before clearing; a no-op on an empty list.
    pub fn request_clear_all(&mut self) {
        if self.tasks.is_empty() {
            self.set_status("No tasks to clear");
            return;
        }
        self.mode = InputMode::ConfirmClear;
        self.set_status(&format!("Delete all {} tasks? (y/n)", self.tasks.len()));
    }

    pub fn confirm_clear_all(&mut self) {
        let cleared = self.repo.clear_all();
        self.mode = InputMode::Normal;
        self.fading.clear();
        self.reload();
        self.set_status(&format!("Cleared {cleared} tasks"));
    }

    pub fn cancel_clear_all(&mut self) {
        self.mode = InputMode::Normal;
        self.set_status("Canceled");
    }

    pub fn set_status(&mut self, msg: &str) {
        self.status = Some(msg.to_string());
    }

    pub fn input_error(&self) -> bool {
        self.input_error_until.is_some()
    }

    /// Age label for `task`, with absolute dates shown in the local offset.
    pub fn age_label(&self, task: &Task, now: OffsetDateTime) -> String {
        relative_label(task.created_at, now.to_offset(self.offset))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tasks: self.repo.all(),
            stats: self.repo.stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::memory::InMemoryTaskRepo;

    fn app_with(texts: &[&str]) -> App<InMemoryTaskRepo> {
        App::new(
            InMemoryTaskRepo::with_seed(texts.iter().copied()),
            UtcOffset::UTC,
        )
    }

    fn texts(app: &App<InMemoryTaskRepo>) -> Vec<String> {
        app.tasks.iter().map(|t| t.text.clone()).collect()
    }

    #[test]
    fn adding_selects_the_new_task_and_leaves_editing() {
        let mut app = app_with(&["old"]);
        app.select_next();
        app.start_editing();
        app.input.push_str("  new  ");
        app.add_task();

        assert_eq!(texts(&app), ["new", "old"]);
        assert_eq!(app.selected, 0);
        assert_eq!(app.mode, InputMode::Normal);
        assert!(app.input.is_empty());
        assert_eq!(app.stats.total, 2);
    }

    #[test]
    fn blank_submit_keeps_editing_and_flashes() {
        let mut app = app_with(&[]);
        app.start_editing();
        app.input.push_str("   ");
        app.add_task();

        assert_eq!(app.mode, InputMode::Editing);
        assert!(app.input_error());
        assert!(app.tasks.is_empty());
        assert_eq!(app.status.as_deref(), Some("Cannot add an empty task"));

        app.tick(Instant::now() + INPUT_ERROR_FLASH);
        assert!(!app.input_error());
    }

    #[test]
    fn toggle_updates_stats() {
        let mut app = app_with(&["a", "b"]);
        app.toggle_selected();
        assert_eq!(app.stats.completed, 1);
        assert!(app.tasks[0].completed);
        assert_eq!(app.status.as_deref(), Some("Marked done"));

        app.toggle_selected();
        assert_eq!(app.stats.completed, 0);
        assert_eq!(app.status.as_deref(), Some("Marked open"));
    }

    #[test]
    fn delete_removes_immediately_and_leaves_a_fading_row() {
        let mut app = app_with(&["a", "b", "c"]);
        app.selected = 2;
        app.delete_selected();

        assert_eq!(texts(&app), ["c", "b"]);
        assert_eq!(app.selected, 1);
        assert_eq!(app.fading.len(), 1);
        assert_eq!(app.fading[0].task.text, "a");
        assert_eq!(app.fading[0].index, 2);

        let since = app.fading[0].since;
        app.tick(since + FADE_DURATION / 2);
        assert_eq!(app.fading.len(), 1);
        app.tick(since + FADE_DURATION);
        assert!(app.fading.is_empty());
    }

    #[test]
    fn actions_on_empty_list_are_noops() {
        let mut app = app_with(&[]);
        app.toggle_selected();
        app.delete_selected();
        app.request_clear_all();

        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(app.status.as_deref(), Some("No tasks to clear"));
        assert!(app.fading.is_empty());
    }

    #[test]
    fn clear_all_goes_through_confirmation() {
        let mut app = app_with(&["a", "b", "c"]);
        app.request_clear_all();
        assert_eq!(app.mode, InputMode::ConfirmClear);
        assert_eq!(app.status.as_deref(), Some("Delete all 3 tasks? (y/n)"));

        app.cancel_clear_all();
        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(app.tasks.len(), 3);

        app.request_clear_all();
        app.confirm_clear_all();
        assert!(app.tasks.is_empty());
        assert_eq!(app.stats, Stats::default());
        assert_eq!(app.status.as_deref(), Some("Cleared 3 tasks"));
    }

    #[test]
    fn snapshot_matches_current_state() {
        let mut app = app_with(&["a", "b"]);
        app.toggle_selected();
        let snapshot = app.snapshot();

        assert_eq!(snapshot.tasks, app.tasks);
        assert_eq!(
            snapshot.stats,
            Stats {
                total: 2,
                completed: 1
            }
        );
    }

    #[test]
    fn age_label_uses_display_offset() {
        let mut app = app_with(&["a"]);
        app.offset = time::macros::offset!(+9);
        let mut task = app.tasks[0].clone();
        task.created_at = time::macros::datetime!(2026-02-28 20:00 UTC);

        let now = time::macros::datetime!(2026-03-20 00:00 UTC);
        assert_eq!(app.age_label(&task, now), "Mar 1");
    }
}
