//! Output formatting for CLI commands

use std::fmt::Write as _;

use serde::Serialize;

use crate::domain::{SectionInfo, SectionTasks};
use crate::storage;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl From<storage::OutputFormat> for OutputFormat {
    fn from(format: storage::OutputFormat) -> Self {
        match format {
            storage::OutputFormat::Text => OutputFormat::Text,
            storage::OutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
    verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Prints a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "message": message
                    })
                );
            }
        }
    }

    /// Prints structured data
    pub fn data<T: Serialize>(&self, data: &T) {
        match self.format {
            OutputFormat::Text => {
                // Text callers normally print their own layout; this is the
                // pretty JSON fallback.
                if let Ok(json) = serde_json::to_string_pretty(data) {
                    println!("{}", json);
                }
            }
            OutputFormat::Json => {
                if let Ok(json) = serde_json::to_string(data) {
                    println!("{}", json);
                }
            }
        }
    }

    /// Prints every section with its tasks
    pub fn task_groups(&self, groups: &[SectionTasks]) {
        if self.is_json() {
            self.data(&groups);
        } else {
            print!("{}", render_task_groups(groups));
        }
    }

    /// Prints the section summary table
    pub fn section_table(&self, sections: &[SectionInfo]) {
        if self.is_json() {
            self.data(&sections);
        } else {
            print!("{}", render_section_table(sections));
        }
    }

    /// Prints a table row (text only, ignored in JSON mode)
    pub fn row(&self, columns: &[&str]) {
        if self.format == OutputFormat::Text {
            println!("{}", columns.join("\t"));
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Prints a verbose debug message (only when --verbose is set)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", message);
        }
    }

    /// Prints a verbose debug message with context (only when --verbose is set)
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        if self.verbose {
            eprintln!("[verbose:{}] {}", context, message);
        }
    }
}

/// Text layout for `list`: a `## title` line per section, tasks indented below
pub fn render_task_groups(groups: &[SectionTasks]) -> String {
    let mut out = String::new();

    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "## {}", group.title);
        if group.tasks.is_empty() {
            out.push_str("  (no tasks)\n");
        }
        for task in &group.tasks {
            let _ = writeln!(out, "  {}", task);
        }
    }

    out
}

/// Text layout for `sections`
pub fn render_section_table(sections: &[SectionInfo]) -> String {
    if sections.is_empty() {
        return "No sections\n".to_string();
    }

    let mut out = format!("{:<8} {:<6} TITLE\n{}\n", "SECTION", "TASKS", "-".repeat(40));
    for section in sections {
        let _ = writeln!(
            out,
            "{:<8} {:<6} {}",
            section.ordinal, section.task_count, section.title
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Task;

    #[test]
    fn converts_config_format() {
        assert_eq!(OutputFormat::from(storage::OutputFormat::Json), OutputFormat::Json);
        assert_eq!(OutputFormat::from(storage::OutputFormat::Text), OutputFormat::Text);
    }

    #[test]
    fn json_mode_flag() {
        assert!(Output::new(OutputFormat::Json, false).is_json());
        assert!(!Output::new(OutputFormat::Text, true).is_json());
    }

    #[test]
    fn task_groups_layout() {
        let groups = vec![
            SectionTasks {
                ordinal: 0,
                title: "Todo".to_string(),
                tasks: vec![Task {
                    id: "1".to_string(),
                    text: "write docs".to_string(),
                    section: 0,
                }],
            },
            SectionTasks {
                ordinal: 1,
                title: "Done".to_string(),
                tasks: vec![],
            },
        ];

        assert_eq!(
            render_task_groups(&groups),
            "## Todo\n  1: write docs\n\n## Done\n  (no tasks)\n"
        );
        assert_eq!(render_task_groups(&[]), "");
    }

    #[test]
    fn section_table_layout() {
        let sections = vec![SectionInfo {
            ordinal: 0,
            title: "Todo".to_string(),
            task_count: 2,
        }];

        let table = render_section_table(&sections);
        assert!(table.starts_with("SECTION  TASKS  TITLE\n"));
        assert!(table.ends_with("0        2      Todo\n"));
        assert_eq!(render_section_table(&[]), "No sections\n");
    }
}
