//! Errors raised while resolving or mutating a task list

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskListError {
    #[error("There is no section (add a '## ' heading first)")]
    NoSection,

    #[error("Section not found: {ordinal} (document has {count} section(s))")]
    SectionNotFound { ordinal: isize, count: usize },

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Item {index} of section {section} is out of range")]
    IndexOutOfRange { section: usize, index: usize },

    #[error("Item {index} of section {section} is not a task (expected 'ID: text')")]
    MalformedTask { section: usize, index: usize },

    #[error("Task already exists: {0}")]
    DuplicateTask(String),

    #[error("Invalid task ID '{0}': must be non-empty and must not contain ':'")]
    InvalidTaskId(String),
}

impl TaskListError {
    pub(crate) fn section_not_found(ordinal: impl TryInto<isize>, count: usize) -> Self {
        TaskListError::SectionNotFound {
            ordinal: ordinal.try_into().unwrap_or(isize::MAX),
            count,
        }
    }
}
