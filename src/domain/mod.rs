//! Domain models for md-tasks
//!
//! Contains the section/task addressing and mutation logic without any I/O concerns.

mod document;
mod error;
mod id;
mod locator;
mod section;
mod task_list;

pub use document::{BlockNode, Document, Inline, List, ListItem};
pub use error::TaskListError;
pub use id::{IdGenerator, IdStyle};
pub use locator::{format_task_text, normalize_task_text, parse_task_text, Task};
pub use task_list::{SectionInfo, SectionTasks, Shifted, TaskList};
