//! Markdown task file storage
//!
//! The whole file is read before an operation and rewritten after it.
//! Reads take a shared lock; writes go to a temp file that is renamed over
//! the original. Read-modify-write cycles hold an exclusive lock on a
//! sidecar `.{name}.lock` file so two invocations never interleave.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use super::markdown::{parse_markdown, render_markdown};
use crate::domain::{Document, TaskList, TaskListError};

/// A markdown task file on disk
pub struct TaskFile {
    path: PathBuf,
}

impl TaskFile {
    /// Creates a handle for the file at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the task file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "tasks.md".to_string())
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_file_name(format!("{}.tmp", self.file_name()))
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_file_name(format!(".{}.lock", self.file_name()))
    }

    /// Reads and parses the task file
    pub fn read(&self) -> Result<Document> {
        if !self.exists() {
            anyhow::bail!(
                "Task file not found: {} (run 'md-tasks init' first)",
                self.path.display()
            );
        }

        let mut file = File::open(&self.path)
            .with_context(|| format!("Failed to open task file: {}", self.path.display()))?;

        file.lock_shared()
            .context("Failed to acquire read lock on task file")?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .with_context(|| format!("Failed to read task file: {}", self.path.display()))?;

        // Lock is released when file is dropped
        Ok(parse_markdown(&content))
    }

    /// Reads the task file into a task list
    pub fn read_task_list(&self) -> Result<TaskList> {
        Ok(TaskList::from(self.read()?))
    }

    /// Serializes and writes a document atomically (temp file + rename)
    pub fn write(&self, doc: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp_path = self.temp_path();
        let content = render_markdown(doc);

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on task file")?;

            let mut writer = &file;
            writer
                .write_all(content.as_bytes())
                .context("Failed to write task file")?;
            writer.flush().context("Failed to flush task file")?;
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }

    /// Creates the file with the given document, refusing to overwrite
    ///
    /// Returns false if the file already existed.
    pub fn create(&self, doc: &Document) -> Result<bool> {
        if self.exists() {
            return Ok(false);
        }
        self.write(doc)?;
        Ok(true)
    }

    /// Runs one operation against the task list and saves the result
    ///
    /// The file is only rewritten when the operation succeeds; on error the
    /// file on disk is left untouched.
    pub fn update<T>(
        &self,
        operation: impl FnOnce(&mut TaskList) -> Result<T, TaskListError>,
    ) -> Result<T> {
        let lock_path = self.lock_path();
        let lock = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file: {}", lock_path.display()))?;

        lock.lock_exclusive()
            .context("Failed to acquire update lock on task file")?;

        let mut list = self.read_task_list()?;
        let value = operation(&mut list)?;
        self.write(list.document())?;

        Ok(value)
    }
}
