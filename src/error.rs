use thiserror::Error;

use crate::domain::task::TaskId;

/// Non-fatal outcomes of task collection operations.
///
/// Neither variant leaves the collection in a different state than before the
/// call, so callers can report it and carry on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("task text is empty")]
    EmptyInput,

    #[error("task {0} not found")]
    NotFound(TaskId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(TaskError::EmptyInput.to_string(), "task text is empty");
        assert_eq!(
            TaskError::NotFound(TaskId(4)).to_string(),
            "task #4 not found"
        );
    }
}
