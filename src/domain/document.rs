//! Document model
//!
//! A task file is a flat, ordered sequence of block nodes. Sections and tasks
//! are never stored; they are computed over this sequence on demand.

use serde::{Deserialize, Serialize};

/// Inline content of a heading or paragraph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Inline {
    /// Plain text, already unescaped
    Text(String),
    /// Any other inline construct, kept as raw markdown
    Other(String),
}

impl Inline {
    pub fn text(value: impl Into<String>) -> Self {
        Inline::Text(value.into())
    }

    /// Returns the text value if this is plain text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Inline::Text(value) => Some(value),
            Inline::Other(_) => None,
        }
    }
}

/// A list and its items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub ordered: bool,
    /// Start number for ordered lists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
    /// Loose list (blank lines between items)
    pub spread: bool,
    pub items: Vec<ListItem>,
}

impl List {
    /// Creates a tight, unordered list
    pub fn bullet(items: Vec<ListItem>) -> Self {
        Self {
            ordered: false,
            start: None,
            spread: false,
            items,
        }
    }
}

/// A list item holding nested blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ListItem {
    pub children: Vec<BlockNode>,
}

impl ListItem {
    /// Creates an item whose only content is one paragraph of plain text
    pub fn with_text(value: impl Into<String>) -> Self {
        Self {
            children: vec![BlockNode::Paragraph(vec![Inline::text(value)])],
        }
    }

    /// Returns the leading text of the item, if it has the task shape
    ///
    /// The first child must be a paragraph and its first inline must be plain text.
    pub fn leading_text(&self) -> Option<&str> {
        match self.children.first()? {
            BlockNode::Paragraph(inlines) => inlines.first()?.as_text(),
            _ => None,
        }
    }
}

/// A top-level (or list-item-level) block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "node", rename_all = "snake_case")]
pub enum BlockNode {
    Heading { depth: u8, children: Vec<Inline> },
    List(List),
    Paragraph(Vec<Inline>),
    /// Opaque block, preserved verbatim
    Other(String),
}

impl BlockNode {
    /// Returns true for a level-2 heading, the only section boundary
    pub fn is_section_heading(&self) -> bool {
        matches!(self, BlockNode::Heading { depth: 2, .. })
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            BlockNode::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut List> {
        match self {
            BlockNode::List(list) => Some(list),
            _ => None,
        }
    }
}

/// The whole task file as a flat block sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Document {
    pub children: Vec<BlockNode>,
}

impl Document {
    pub fn new(children: Vec<BlockNode>) -> Self {
        Self { children }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_text_of_plain_item() {
        let item = ListItem::with_text("a: b");
        assert_eq!(item.leading_text(), Some("a: b"));
    }

    #[test]
    fn leading_text_skips_other_shapes() {
        let nested = ListItem {
            children: vec![BlockNode::List(List::bullet(vec![ListItem::with_text("x: y")]))],
        };
        assert_eq!(nested.leading_text(), None);

        let emphasized = ListItem {
            children: vec![BlockNode::Paragraph(vec![
                Inline::Other("*x*".to_string()),
                Inline::text(": y"),
            ])],
        };
        assert_eq!(emphasized.leading_text(), None);

        assert_eq!(ListItem::default().leading_text(), None);
    }

    #[test]
    fn only_depth_two_headings_are_sections() {
        let h1 = BlockNode::Heading { depth: 1, children: vec![] };
        let h2 = BlockNode::Heading { depth: 2, children: vec![] };
        let h3 = BlockNode::Heading { depth: 3, children: vec![] };
        assert!(!h1.is_section_heading());
        assert!(h2.is_section_heading());
        assert!(!h3.is_section_heading());
    }
}
