//! Picker state and key handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::event::{Event, EventHandler};
use super::ui::Terminal;
use crate::domain::SectionTasks;

/// A line in the picker: a section separator or a selectable task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Section(String),
    Task { id: String, label: String },
}

impl Row {
    fn is_task(&self) -> bool {
        matches!(self, Row::Task { .. })
    }
}

/// How the picker ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Selected(String),
    Cancelled,
}

pub struct Picker {
    rows: Vec<Row>,
    /// Index into `rows`; always a task row when any exists
    selected: usize,
    outcome: Option<Outcome>,
}

impl Picker {
    pub fn new(sections: &[SectionTasks]) -> Self {
        let mut rows = Vec::new();
        for section in sections {
            rows.push(Row::Section(format!("## {}", section.title)));
            rows.extend(section.tasks.iter().map(|task| Row::Task {
                id: task.id.clone(),
                label: task.to_string(),
            }));
        }

        let selected = rows.iter().position(Row::is_task).unwrap_or(0);

        Self {
            rows,
            selected,
            outcome: None,
        }
    }

    pub fn has_tasks(&self) -> bool {
        self.rows.iter().any(Row::is_task)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Id of the highlighted task
    pub fn selected_id(&self) -> Option<&str> {
        match self.rows.get(self.selected) {
            Some(Row::Task { id, .. }) => Some(id),
            _ => None,
        }
    }

    /// Runs until a task is chosen or the picker is cancelled
    pub fn run(&mut self, terminal: &mut Terminal, events: EventHandler) -> Result<Option<String>> {
        while self.outcome.is_none() {
            terminal.draw(|frame| self.draw(frame))?;

            match events.next()? {
                Event::Key(key) => self.handle_key(key),
                Event::Resize | Event::Tick => {}
            }
        }

        Ok(match self.outcome.take() {
            Some(Outcome::Selected(id)) => Some(id),
            _ => None,
        })
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.outcome = Some(Outcome::Cancelled);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.outcome = Some(Outcome::Cancelled);
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(true),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(false),
            KeyCode::Home => {
                if let Some(first) = self.rows.iter().position(Row::is_task) {
                    self.selected = first;
                }
            }
            KeyCode::End => {
                if let Some(last) = self.rows.iter().rposition(Row::is_task) {
                    self.selected = last;
                }
            }
            KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    self.outcome = Some(Outcome::Selected(id.to_string()));
                }
            }
            _ => {}
        }
    }

    /// Moves to the next task row in the given direction, skipping separators
    fn move_selection(&mut self, forward: bool) {
        let next = if forward {
            self.rows
                .iter()
                .enumerate()
                .skip(self.selected + 1)
                .find(|(_, row)| row.is_task())
                .map(|(i, _)| i)
        } else {
            self.rows[..self.selected.min(self.rows.len())]
                .iter()
                .rposition(Row::is_task)
        };

        if let Some(next) = next {
            self.selected = next;
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Task list
                Constraint::Length(1), // Key help
            ])
            .split(frame.area());

        let items: Vec<ListItem> = self
            .rows
            .iter()
            .map(|row| match row {
                Row::Section(title) => ListItem::new(Line::from(Span::styled(
                    title.clone(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ))),
                Row::Task { label, .. } => ListItem::new(format!("  {}", label)),
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" Select task "))
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default();
        if self.has_tasks() {
            state.select(Some(self.selected));
        }
        frame.render_stateful_widget(list, chunks[0], &mut state);

        let help = Paragraph::new("j/k:move  enter:select  q/esc:cancel")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[1]);
    }
}
