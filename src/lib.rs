//! md-tasks - Simple task management based on Markdown
//!
//! Tasks live in an ordinary markdown file: every `## ` heading opens a
//! section, and every list item of the form `id: text` under it is a task.
//! The crate parses the file into a small block tree, moves items between
//! sections and writes the file back.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Document, Task, TaskList, TaskListError};
