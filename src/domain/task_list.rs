//! Mutation engine for a markdown task list
//!
//! [`TaskList`] owns a private copy of a [`Document`] and exposes
//! ordinal-based operations over it. Every operation resolves positions
//! fresh, right before it edits, because any splice invalidates positions
//! computed earlier.

use serde::Serialize;

use super::document::{BlockNode, Document, List, ListItem};
use super::error::TaskListError;
use super::locator::{find_task, format_task_text, item_task, tasks_in, Task};
use super::section::{section_at, section_containing, sections, Section};

/// Summary of one section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionInfo {
    pub ordinal: usize,
    pub title: String,
    pub task_count: usize,
}

/// A section together with its tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionTasks {
    pub ordinal: usize,
    pub title: String,
    pub tasks: Vec<Task>,
}

/// Result of moving a task between sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shifted {
    pub id: String,
    pub text: String,
    pub from: usize,
    pub to: usize,
}

/// A task list backed by a markdown document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskList {
    document: Document,
}

impl From<Document> for TaskList {
    fn from(document: Document) -> Self {
        Self { document }
    }
}

impl TaskList {
    /// Creates a task list over a copy of `document`
    ///
    /// The caller's document is never modified.
    pub fn new(document: &Document) -> Self {
        Self {
            document: document.clone(),
        }
    }

    /// Returns the current document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Consumes the list and returns the document for serialization
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Lists every section with its task count
    pub fn sections(&self) -> Vec<SectionInfo> {
        sections(&self.document)
            .iter()
            .map(|section| SectionInfo {
                ordinal: section.ordinal,
                title: section.title.clone(),
                task_count: tasks_in(&self.document, section).len(),
            })
            .collect()
    }

    /// Lists every section with its tasks
    pub fn tasks_by_section(&self) -> Vec<SectionTasks> {
        sections(&self.document)
            .iter()
            .map(|section| SectionTasks {
                ordinal: section.ordinal,
                title: section.title.clone(),
                tasks: tasks_in(&self.document, section)
                    .into_iter()
                    .map(|loc| loc.into_task())
                    .collect(),
            })
            .collect()
    }

    /// Finds a task by identifier (first match in document order)
    pub fn find_task(&self, id: &str) -> Result<Task, TaskListError> {
        find_task(&self.document, id).map(|loc| loc.into_task())
    }

    /// Looks up the `index`-th list item of a section
    ///
    /// Items are counted across all lists of the section. Unlike
    /// [`TaskList::find_task`], an item that is not shaped like a task is an error.
    pub fn task_at(&self, section: usize, index: usize) -> Result<Task, TaskListError> {
        let section = section_at(&self.document, section)?;

        let item = section
            .list_positions(&self.document)
            .filter_map(|pos| self.document.children[pos].as_list())
            .flat_map(|list| list.items.iter())
            .nth(index)
            .ok_or(TaskListError::IndexOutOfRange {
                section: section.ordinal,
                index,
            })?;

        let (id, text) = item_task(item).ok_or(TaskListError::MalformedTask {
            section: section.ordinal,
            index,
        })?;

        Ok(Task {
            id: id.to_string(),
            text: text.to_string(),
            section: section.ordinal,
        })
    }

    /// Adds a task to a section and returns its identifier
    ///
    /// The item is appended to the last list of the section, or to a new
    /// list placed right after the section heading.
    pub fn add_item(&mut self, id: &str, text: &str, section: usize) -> Result<String, TaskListError> {
        let id = id.trim();
        if id.is_empty() || id.contains(':') {
            return Err(TaskListError::InvalidTaskId(id.to_string()));
        }

        if sections(&self.document).is_empty() {
            return Err(TaskListError::NoSection);
        }

        if find_task(&self.document, id).is_ok() {
            return Err(TaskListError::DuplicateTask(id.to_string()));
        }

        let target = section_at(&self.document, section)?;
        self.append_to_section(&target, ListItem::with_text(format_task_text(id, text)));

        Ok(id.to_string())
    }

    /// Removes a task and returns it
    ///
    /// The owning list stays in place even when it becomes empty.
    pub fn remove_item(&mut self, id: &str) -> Result<Task, TaskListError> {
        let location = find_task(&self.document, id)?;

        if let Some(list) = self.document.children[location.list].as_list_mut() {
            list.items.remove(location.item);
        }

        Ok(location.into_task())
    }

    /// Moves a task to the section with the given ordinal
    pub fn shift_item(&mut self, id: &str, target: usize) -> Result<Shifted, TaskListError> {
        let source = find_task(&self.document, id)?;
        let destination = section_at(&self.document, target)?;

        let item = self.document.children[source.list]
            .as_list()
            .map(|list| list.items[source.item].clone())
            .ok_or_else(|| TaskListError::TaskNotFound(source.id.clone()))?;

        // Insert first, then remove. A new list spliced in at or before the
        // source list pushes the source one position down.
        let mut source_list = source.list;
        if let Some(inserted_at) = self.append_to_section(&destination, item) {
            if inserted_at <= source_list {
                source_list += 1;
            }
        }

        if let Some(list) = self.document.children[source_list].as_list_mut() {
            list.items.remove(source.item);
        }

        Ok(Shifted {
            id: source.id,
            text: source.text,
            from: source.section,
            to: destination.ordinal,
        })
    }

    /// Moves a task `step` sections forward (or backward when negative)
    pub fn shift_by(&mut self, id: &str, step: isize) -> Result<Shifted, TaskListError> {
        let from = find_task(&self.document, id)?.section;
        let count = sections(&self.document).len();

        let target = from as isize + step;
        if target < 0 || target as usize >= count {
            return Err(TaskListError::section_not_found(target, count));
        }

        self.shift_item(id, target as usize)
    }

    /// Returns the ordinal of the section that holds the task
    pub fn section_of_task(&self, id: &str) -> Result<usize, TaskListError> {
        let location = find_task(&self.document, id)?;
        section_containing(&self.document, location.list).map(|section| section.ordinal)
    }

    /// Appends an item to the last list of a section, creating the list if needed
    ///
    /// Returns the position of the newly inserted list, if one was created.
    fn append_to_section(&mut self, section: &Section, item: ListItem) -> Option<usize> {
        let last_list = section.list_positions(&self.document).last();

        if let Some(list) = last_list.and_then(|pos| self.document.children[pos].as_list_mut()) {
            list.items.push(item);
            return None;
        }

        let at = section.anchor + 1;
        self.document
            .children
            .insert(at, BlockNode::List(List::bullet(vec![item])));
        Some(at)
    }
}
