//! Section resolver
//!
//! A section starts at a level-2 heading and owns every following node up to
//! the next level-2 heading (or the end of the document). Headings of any
//! other depth are ordinary members.
//!
//! Two numbering schemes exist and must not be mixed:
//! - ordinal: rank among level-2 headings (what callers pass around)
//! - position: index into [`Document::children`] (internal only)

use std::ops::Range;

use super::document::{BlockNode, Document, Inline};
use super::error::TaskListError;

/// A section view over a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Section {
    pub ordinal: usize,
    pub title: String,
    /// Position of the level-2 heading
    pub anchor: usize,
    /// Positions of the member nodes
    pub members: Range<usize>,
}

impl Section {
    /// Positions of member lists, in document order
    pub fn list_positions<'a>(&'a self, doc: &'a Document) -> impl Iterator<Item = usize> + 'a {
        self.members
            .clone()
            .filter(move |&pos| matches!(doc.children[pos], BlockNode::List(_)))
    }
}

fn heading_title(node: &BlockNode) -> String {
    match node {
        BlockNode::Heading { children, .. } => children
            .first()
            .and_then(Inline::as_text)
            .map(|t| t.trim().to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Positions of every level-2 heading
fn anchors(doc: &Document) -> Vec<usize> {
    doc.children
        .iter()
        .enumerate()
        .filter(|(_, node)| node.is_section_heading())
        .map(|(pos, _)| pos)
        .collect()
}

/// All sections, in document order
pub(crate) fn sections(doc: &Document) -> Vec<Section> {
    let anchors = anchors(doc);

    anchors
        .iter()
        .enumerate()
        .map(|(ordinal, &anchor)| {
            let end = anchors.get(ordinal + 1).copied().unwrap_or(doc.len());
            Section {
                ordinal,
                title: heading_title(&doc.children[anchor]),
                anchor,
                members: anchor + 1..end,
            }
        })
        .collect()
}

/// Resolves a section by ordinal
pub(crate) fn section_at(doc: &Document, ordinal: usize) -> Result<Section, TaskListError> {
    let mut all = sections(doc);
    let count = all.len();

    if ordinal >= count {
        return Err(TaskListError::section_not_found(ordinal, count));
    }

    Ok(all.swap_remove(ordinal))
}

/// Resolves the section whose member range contains `pos`
///
/// A position before the first level-2 heading has no section.
pub(crate) fn section_containing(doc: &Document, pos: usize) -> Result<Section, TaskListError> {
    sections(doc)
        .into_iter()
        .filter(|section| section.anchor < pos)
        .last()
        .ok_or(TaskListError::NoSection)
}
