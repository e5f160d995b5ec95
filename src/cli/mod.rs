//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project setup | `init` |
//! | Mutate | Change the task file | `add`, `shift`, `remove` |
//! | Query | Read the task file | `list`, `sections`, `locate`, `show`, `export` |
//!
//! `shift` and `remove` open an interactive picker when the task ID is
//! omitted and a terminal is attached.
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! md-tasks --verbose shift 1700000000000
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod picker;
mod task;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
