//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::task;
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "md-tasks")]
#[command(author, version, about = "Simple task management tool based on Markdown")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Task file to operate on (overrides md-tasks.toml)
    #[arg(long, short = 'F', global = true, env = "MD_TASKS_FILE")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create md-tasks.toml and a starter task file
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Add tasks to a section (prompts for text when none is given)
    Add {
        /// Task texts; each becomes its own task
        texts: Vec<String>,

        /// Section ordinal (0 = first section)
        #[arg(long, short)]
        section: Option<usize>,
    },

    /// Shift an existing task to another section
    Shift {
        /// Task ID (select interactively when omitted)
        id: Option<String>,

        /// Shift backward instead of forward
        #[arg(long, short, conflicts_with = "to")]
        backward: bool,

        /// Number of sections to shift by
        #[arg(long, short, default_value = "1", conflicts_with = "to")]
        step: usize,

        /// Move to this section ordinal instead of shifting by a step
        #[arg(long)]
        to: Option<usize>,
    },

    /// Remove a task
    Remove {
        /// Task ID (select interactively when omitted)
        id: Option<String>,
    },

    /// List tasks grouped by section
    List,

    /// List sections with their ordinals
    Sections,

    /// Show which section holds a task
    Locate {
        /// Task ID
        id: String,
    },

    /// Show the task at a position within a section
    Show {
        /// Section ordinal
        section: usize,

        /// Item index within the section (counted across its lists)
        index: usize,
    },

    /// Print the parsed document as JSON
    Export,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let format = match cli.format {
        Some(format) => format,
        None => Config::load_global()?.default_format.into(),
    };
    let output = Output::new(format, cli.verbose);

    output.verbose("md-tasks starting");

    if let Commands::Init { path } = &cli.command {
        output.verbose_ctx("init", &format!("Initializing project at: {}", path.display()));
        return task::init(&output, path, cli.file.as_deref());
    }

    let project = Project::open_current()?;
    let file = project.task_file(cli.file.as_deref());
    output.verbose_ctx(
        "project",
        &format!("root={}, file={}", project.root().display(), file.path().display()),
    );

    match cli.command {
        Commands::Init { .. } => {}

        Commands::Add { texts, section } => {
            let section = section.unwrap_or(project.config().project.default_section);
            task::add(&output, &project, &file, texts, section)?
        }

        Commands::Shift { id, backward, step, to } => {
            let target = match to {
                Some(ordinal) => task::ShiftTarget::Section(ordinal),
                None => {
                    let step = step as isize;
                    task::ShiftTarget::Step(if backward { -step } else { step })
                }
            };
            task::shift(&output, &file, id, target)?
        }

        Commands::Remove { id } => task::remove(&output, &file, id)?,
        Commands::List => task::list(&output, &file)?,
        Commands::Sections => task::sections(&output, &file)?,
        Commands::Locate { id } => task::locate(&output, &file, &id)?,
        Commands::Show { section, index } => task::show(&output, &file, section, index)?,
        Commands::Export => task::export(&output, &file)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}
