//! Task locator
//!
//! Tasks are list items whose leading text reads `<id>: <text>`. Items with
//! any other shape (nested lists first, emphasis, images, no colon) are not
//! tasks and are skipped without error.

use std::fmt;

use serde::Serialize;

use super::document::{Document, ListItem};
use super::error::TaskListError;
use super::section::{sections, Section};

/// A task as seen by callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    /// Ordinal of the owning section
    pub section: usize,
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.text)
    }
}

/// Physical location of a task, valid until the next structural edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TaskLocation {
    pub section: usize,
    /// Position of the owning list node
    pub list: usize,
    /// Index of the item within that list
    pub item: usize,
    pub id: String,
    pub text: String,
}

impl TaskLocation {
    pub fn into_task(self) -> Task {
        Task {
            id: self.id,
            text: self.text,
            section: self.section,
        }
    }
}

/// Splits `<id>: <text>` at the first colon
///
/// Returns `None` when there is no colon or the identifier is empty.
pub fn parse_task_text(value: &str) -> Option<(&str, &str)> {
    let (id, text) = value.split_once(':')?;
    let id = id.trim();
    if id.is_empty() {
        return None;
    }
    Some((id, text.trim()))
}

/// Folds task text onto a single line
///
/// Line breaks would split the item into several paragraphs (or blocks), so
/// each line is trimmed and blank lines are dropped before joining with a space.
pub fn normalize_task_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats the wire form of a task: `<id>: <text>`
pub fn format_task_text(id: &str, text: &str) -> String {
    format!("{}: {}", id, normalize_task_text(text))
}

/// Parses a list item as a task
pub(crate) fn item_task(item: &ListItem) -> Option<(&str, &str)> {
    parse_task_text(item.leading_text()?)
}

/// Every task of one section, in document order
pub(crate) fn tasks_in(doc: &Document, section: &Section) -> Vec<TaskLocation> {
    let mut found = Vec::new();

    for list_pos in section.list_positions(doc) {
        let Some(list) = doc.children[list_pos].as_list() else {
            continue;
        };

        for (index, item) in list.items.iter().enumerate() {
            if let Some((id, text)) = item_task(item) {
                found.push(TaskLocation {
                    section: section.ordinal,
                    list: list_pos,
                    item: index,
                    id: id.to_string(),
                    text: text.to_string(),
                });
            }
        }
    }

    found
}

/// Finds the first task with the given identifier
pub(crate) fn find_task(doc: &Document, id: &str) -> Result<TaskLocation, TaskListError> {
    let id = id.trim();

    for section in sections(doc) {
        if let Some(location) = tasks_in(doc, &section).into_iter().find(|t| t.id == id) {
            return Ok(location);
        }
    }

    Err(TaskListError::TaskNotFound(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::parse_markdown;

    #[test]
    fn parse_task_text_splits_at_first_colon() {
        assert_eq!(parse_task_text("a1: do it"), Some(("a1", "do it")));
        assert_eq!(parse_task_text("  a1 :  spaced  "), Some(("a1", "spaced")));
        assert_eq!(parse_task_text("a1: at 10:30"), Some(("a1", "at 10:30")));
        assert_eq!(parse_task_text("a1:"), Some(("a1", "")));
    }

    #[test]
    fn parse_task_text_rejects_non_tasks() {
        assert_eq!(parse_task_text("no colon here"), None);
        assert_eq!(parse_task_text(": missing id"), None);
    }

    #[test]
    fn task_text_is_folded_onto_one_line() {
        assert_eq!(normalize_task_text("  one\n\n two \r\nthree  "), "one two three");
        assert_eq!(normalize_task_text("keep  inner  spaces"), "keep  inner  spaces");
        assert_eq!(format_task_text("a", "one\n\ntwo"), "a: one two");
    }

    #[test]
    fn find_task_reports_location() {
        let doc = parse_markdown("## first\n\n* id1: item 1\n\n## second\n\n* id2: item 2\n* id3: item 3\n");

        let loc = find_task(&doc, "id3").unwrap();
        assert_eq!(loc.section, 1);
        assert_eq!(loc.list, 3);
        assert_eq!(loc.item, 1);
        assert_eq!(loc.text, "item 3");
    }

    #[test]
    fn find_task_missing() {
        let doc = parse_markdown("## first\n\n* id1: item 1\n");
        assert_eq!(
            find_task(&doc, "nope"),
            Err(TaskListError::TaskNotFound("nope".to_string()))
        );
    }

    #[test]
    fn find_task_first_match_wins() {
        let doc = parse_markdown("## first\n\n* dup: one\n\n## second\n\n* dup: two\n");
        let loc = find_task(&doc, "dup").unwrap();
        assert_eq!(loc.section, 0);
        assert_eq!(loc.text, "one");
    }

    #[test]
    fn lists_before_first_section_are_ignored() {
        let doc = parse_markdown("* early: not in a section\n\n## first\n");
        assert!(find_task(&doc, "early").is_err());
    }

    #[test]
    fn malformed_items_are_skipped() {
        let doc = parse_markdown(
            "## first\n\n* plain item\n* *bold*: emphasized\n* ![img](x.png)\n* ok: found\n",
        );

        let loc = find_task(&doc, "ok").unwrap();
        assert_eq!(loc.item, 3);

        let all = tasks_in(&doc, &sections(&doc)[0]);
        assert_eq!(all.len(), 1);
    }
}
