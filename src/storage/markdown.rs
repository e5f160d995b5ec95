//! Markdown codec for task files
//!
//! Parsing flattens a markdown file into the block sequence of a
//! [`Document`]. Headings, paragraphs and lists are typed; every other block
//! (code, quotes, tables, HTML, rules) is kept as its raw source slice so it
//! survives a rewrite byte for byte.

use std::iter::Peekable;
use std::ops::Range;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag};

use crate::domain::{BlockNode, Document, Inline, List, ListItem};

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH
}

/// Parses markdown text into a document
pub fn parse_markdown(source: &str) -> Document {
    let events = Parser::new_ext(source, parser_options()).into_offset_iter();
    let mut reader = Reader {
        source,
        events: events.peekable(),
    };

    let mut children = Vec::new();
    while let Some((event, range)) = reader.events.next() {
        if let Some(node) = reader.block(event, range) {
            children.push(node);
        }
    }

    Document::new(children)
}

/// Walks the event stream of one source text
struct Reader<'a, I: Iterator<Item = (Event<'a>, Range<usize>)>> {
    source: &'a str,
    events: Peekable<I>,
}

impl<'a, I: Iterator<Item = (Event<'a>, Range<usize>)>> Reader<'a, I> {
    fn raw(&self, range: Range<usize>) -> String {
        self.source[range]
            .trim_end_matches(['\n', '\r'])
            .to_string()
    }

    /// Converts one block-level event (and everything it encloses)
    fn block(&mut self, event: Event<'a>, range: Range<usize>) -> Option<BlockNode> {
        match event {
            Event::Start(Tag::Heading { level, .. }) => Some(BlockNode::Heading {
                depth: heading_depth(level),
                children: self.inlines_until_end(),
            }),
            Event::Start(Tag::Paragraph) => Some(BlockNode::Paragraph(self.inlines_until_end())),
            Event::Start(Tag::List(start)) => Some(BlockNode::List(self.list(start))),
            Event::Start(_) => {
                self.skip_to_end();
                Some(BlockNode::Other(self.raw(range)))
            }
            Event::End(_) => None,
            _ => Some(BlockNode::Other(self.raw(range))),
        }
    }

    fn list(&mut self, start: Option<u64>) -> List {
        let mut items = Vec::new();
        let mut spread = false;

        while let Some((event, _)) = self.events.next() {
            match event {
                Event::Start(Tag::Item) => {
                    let (item, loose) = self.item();
                    spread |= loose;
                    items.push(item);
                }
                Event::End(_) => break,
                _ => {}
            }
        }

        List {
            ordered: start.is_some(),
            start,
            spread,
            items,
        }
    }

    /// Reads one list item; returns whether it carried explicit paragraphs
    fn item(&mut self) -> (ListItem, bool) {
        let mut children = Vec::new();
        let mut loose = false;

        loop {
            // Tight items carry their text without a paragraph tag.
            if self.events.peek().is_some_and(|(event, _)| is_inline(event)) {
                children.push(BlockNode::Paragraph(self.implicit_paragraph()));
                continue;
            }

            let Some((event, range)) = self.events.next() else {
                break;
            };

            match event {
                Event::End(_) => break,
                Event::Start(Tag::Paragraph) => {
                    loose = true;
                    children.push(BlockNode::Paragraph(self.inlines_until_end()));
                }
                event => {
                    if let Some(node) = self.block(event, range) {
                        children.push(node);
                    }
                }
            }
        }

        (ListItem { children }, loose)
    }

    fn implicit_paragraph(&mut self) -> Vec<Inline> {
        let mut inlines = Vec::new();
        while self.events.peek().is_some_and(|(event, _)| is_inline(event)) {
            if let Some((event, range)) = self.events.next() {
                self.inline(event, range, &mut inlines);
            }
        }
        inlines
    }

    /// Reads inline content up to (and including) the enclosing end tag
    fn inlines_until_end(&mut self) -> Vec<Inline> {
        let mut inlines = Vec::new();
        while let Some((event, range)) = self.events.next() {
            match event {
                Event::End(_) => break,
                event => self.inline(event, range, &mut inlines),
            }
        }
        inlines
    }

    fn inline(&mut self, event: Event<'a>, range: Range<usize>, out: &mut Vec<Inline>) {
        match event {
            Event::Text(text) => push_text(out, &text),
            Event::SoftBreak => push_text(out, "\n"),
            Event::Start(_) => {
                self.skip_to_end();
                out.push(Inline::Other(self.source[range].to_string()));
            }
            _ => out.push(Inline::Other(self.source[range].to_string())),
        }
    }

    /// Skips past the end tag matching an already consumed start tag
    fn skip_to_end(&mut self) {
        let mut depth = 1usize;
        for (event, _) in self.events.by_ref() {
            match event {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }
}

fn heading_depth(level: HeadingLevel) -> u8 {
    level as u8
}

fn is_inline(event: &Event<'_>) -> bool {
    match event {
        Event::Start(tag) => matches!(
            tag,
            Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. } | Tag::Image { .. }
        ),
        Event::End(_) | Event::Rule | Event::Html(_) => false,
        _ => true,
    }
}

/// Appends text, merging with a preceding text run
fn push_text(out: &mut Vec<Inline>, text: &str) {
    if let Some(Inline::Text(last)) = out.last_mut() {
        last.push_str(text);
    } else {
        out.push(Inline::text(text));
    }
}

/// Renders a document back to markdown text
pub fn render_markdown(doc: &Document) -> String {
    let mut out = render_blocks(&doc.children);
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Tracks whether a list directly follows another list
///
/// Two adjacent lists with the same marker would merge into one when the
/// text is parsed again, so every second one switches marker.
#[derive(Default)]
struct MarkerAlternation {
    previous_was_list: bool,
    alternate: bool,
}

impl MarkerAlternation {
    fn next(&mut self, block: &BlockNode) -> bool {
        let is_list = matches!(block, BlockNode::List(_));
        self.alternate = is_list && self.previous_was_list && !self.alternate;
        self.previous_was_list = is_list;
        self.alternate
    }
}

fn render_blocks(blocks: &[BlockNode]) -> String {
    let mut markers = MarkerAlternation::default();
    blocks
        .iter()
        // An empty list has no markdown form
        .filter(|block| !matches!(block, BlockNode::List(list) if list.items.is_empty()))
        .map(|block| render_block(block, markers.next(block)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_block(block: &BlockNode, alternate: bool) -> String {
    match block {
        BlockNode::Heading { depth, children } => {
            let hashes = "#".repeat((*depth).clamp(1, 6) as usize);
            let content = escape_closing_hashes(render_inlines(children).trim_end());
            format!("{} {}", hashes, content).trim_end().to_string()
        }
        BlockNode::Paragraph(children) => render_inlines(children),
        BlockNode::List(list) => render_list(list, alternate),
        BlockNode::Other(raw) => raw.clone(),
    }
}

fn render_list(list: &List, alternate: bool) -> String {
    let bullet = if alternate { "-" } else { "*" };
    let delimiter = if alternate { ")" } else { "." };
    let start = list.start.unwrap_or(1);
    let separator = if list.spread { "\n\n" } else { "\n" };

    list.items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let marker = if list.ordered {
                format!("{}{}", start + i as u64, delimiter)
            } else {
                bullet.to_string()
            };
            render_item(item, &marker, list.spread)
        })
        .collect::<Vec<_>>()
        .join(separator)
}

fn render_item(item: &ListItem, marker: &str, spread: bool) -> String {
    let indent = " ".repeat(marker.len() + 1);
    let mut markers = MarkerAlternation::default();
    let mut out = marker.to_string();

    for (i, child) in item.children.iter().enumerate() {
        let rendered = render_block(child, markers.next(child));

        if i == 0 {
            out.push(' ');
        } else {
            out.push('\n');
            if spread {
                out.push('\n');
            }
            out.push_str(&indent);
        }

        // Raw blocks already carry their original indentation after the first line.
        let verbatim = matches!(child, BlockNode::Other(_));
        for (j, line) in rendered.split('\n').enumerate() {
            if j > 0 {
                out.push('\n');
                if !verbatim && !line.is_empty() {
                    out.push_str(&indent);
                }
            }
            out.push_str(line);
        }
    }

    out
}

fn render_inlines(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(value) => {
                let line_start = out.is_empty() || out.ends_with('\n');
                out.push_str(&escape_text(value, line_start));
            }
            Inline::Other(raw) => out.push_str(raw),
        }
    }
    out
}

/// Escapes a trailing run of `#` so it is not read as a closing sequence
fn escape_closing_hashes(content: &str) -> String {
    let body = content.trim_end_matches('#');
    if body.len() == content.len() || body.ends_with('\\') {
        return content.to_string();
    }
    format!("{}\\{}", body, &content[body.len()..])
}

/// Backslash-escapes characters markdown would otherwise interpret
fn escape_text(value: &str, at_line_start: bool) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len());
    let mut line_start = at_line_start;
    let mut leading_digits = false;

    for (i, &c) in chars.iter().enumerate() {
        let escape = match c {
            '\\' | '`' | '*' | '[' | ']' | '<' | '~' | '&' => true,
            '_' => {
                let intraword = i > 0
                    && chars[i - 1].is_alphanumeric()
                    && chars.get(i + 1).is_some_and(|n| n.is_alphanumeric());
                !intraword
            }
            '#' | '>' | '+' | '-' | '=' => line_start,
            '.' | ')' => leading_digits,
            _ => false,
        };

        if escape {
            out.push('\\');
        }
        out.push(c);

        leading_digits = c.is_ascii_digit() && (line_start || leading_digits);
        line_start = c == '\n';
    }

    out
}
