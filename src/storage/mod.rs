//! # Storage Layer
//!
//! Reads and writes the markdown task file and the configuration around it.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Tasks | Markdown (`## section`, `* id: text`) | `tasks.md` (configurable) |
//! | Project config | TOML | `md-tasks.toml` |
//! | Global config | TOML | `~/.config/md-tasks/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`TaskFile`] locks with `fs2` and writes atomically (temp file + rename)
//! - A read-modify-write holds an exclusive lock on `.{file}.lock`
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point: project root, config and task file
//! - [`TaskFile`] - Read/write the task file as a [`crate::domain::Document`]
//! - [`Config`] - Project and global configuration

mod config;
mod markdown;
mod project;
mod task_file;

pub use config::{Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig, CONFIG_FILE};
pub use markdown::{parse_markdown, render_markdown};
pub use project::{InitOutcome, Project, ProjectError};
pub use task_file::TaskFile;
