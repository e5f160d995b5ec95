//! Project management
//!
//! Handles project initialization and provides access to the task file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::config::CONFIG_FILE;
use super::{Config, TaskFile};
use crate::domain::{BlockNode, Document, Inline};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Project directory does not exist: {0}")]
    MissingRoot(PathBuf),

    #[error("Failed to determine the current directory")]
    NoCurrentDir,
}

/// What `init` created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitOutcome {
    pub created_config: bool,
    pub created_task_file: bool,
}

/// An md-tasks project: a root directory, its config and its task file
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens the project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.is_dir() {
            return Err(ProjectError::MissingRoot(root).into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project containing the current directory
    ///
    /// Without an `md-tasks.toml` anywhere above, the current directory is the
    /// root and defaults apply.
    pub fn open_current() -> Result<Self> {
        let root = match Config::find_project_root() {
            Some(root) => root,
            None => std::env::current_dir().map_err(|_| ProjectError::NoCurrentDir)?,
        };

        Self::open(root)
    }

    /// Initializes a project at the given path
    ///
    /// The starter task file goes to `task_file` when given, otherwise to the
    /// configured file. Existing files are left alone, so running it twice is
    /// harmless.
    pub fn init(
        root: impl Into<PathBuf>,
        task_file: Option<&Path>,
    ) -> Result<(Self, InitOutcome)> {
        let root = root.into();

        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create directory: {}", root.display()))?;

        let config_path = root.join(CONFIG_FILE);
        let created_config = !config_path.exists();
        if created_config {
            let default_config = r#"# md-tasks configuration

# Task file, relative to this directory
file = "tasks.md"

# Identifier style for new tasks: "timestamp" or "hash"
id_style = "timestamp"

# Section that 'md-tasks add' uses by default (0 = first)
default_section = 0

# Sections created by 'md-tasks init'
sections = ["Todo", "Doing", "Done"]
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let project = Self::open(root)?;
        let starter = starter_document(&project.config.project.sections);
        let created_task_file = project.task_file(task_file).create(&starter)?;

        Ok((
            project,
            InitOutcome {
                created_config,
                created_task_file,
            },
        ))
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the task file, optionally overridden by an explicit path
    pub fn task_file(&self, override_path: Option<&Path>) -> TaskFile {
        match override_path {
            Some(path) => TaskFile::new(path),
            None => TaskFile::new(self.root.join(&self.config.project.file)),
        }
    }
}

/// Builds the initial document: a title and one section per name
fn starter_document(sections: &[String]) -> Document {
    let mut children = vec![BlockNode::Heading {
        depth: 1,
        children: vec![Inline::text("Tasks")],
    }];

    children.extend(sections.iter().map(|name| BlockNode::Heading {
        depth: 2,
        children: vec![Inline::text(name.trim())],
    }));

    Document::new(children)
}
