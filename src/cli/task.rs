//! Task CLI commands

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

use anyhow::Result;
use chrono::Utc;

use super::output::Output;
use super::picker;
use crate::domain::{format_task_text, normalize_task_text, IdGenerator, TaskList};
use crate::storage::{Project, TaskFile};

/// Where `shift` moves a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftTarget {
    /// Relative to the task's current section
    Step(isize),
    /// An absolute section ordinal
    Section(usize),
}

pub fn init(output: &Output, path: &Path, file: Option<&Path>) -> Result<()> {
    let (project, outcome) = Project::init(path, file)?;
    let file = project.task_file(file);

    output.verbose_ctx(
        "init",
        &format!(
            "config created={}, task file created={}",
            outcome.created_config, outcome.created_task_file
        ),
    );

    if output.is_json() {
        output.data(&serde_json::json!({
            "root": project.root().display().to_string(),
            "file": file.path().display().to_string(),
            "created_config": outcome.created_config,
            "created_task_file": outcome.created_task_file,
        }));
    } else {
        output.success(&format!("Initialized md-tasks project at {}", project.root().display()));
        if !outcome.created_task_file {
            println!("Kept existing task file {}", file.path().display());
        }
    }

    Ok(())
}

/// Reads one line of task text from stdin
fn prompt_task_text() -> Result<String> {
    if io::stdin().is_terminal() {
        eprint!("Input Task Text: ");
        io::stderr().flush()?;
    }

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let text = line.trim();
    if text.is_empty() {
        anyhow::bail!("No task text");
    }
    Ok(text.to_string())
}

pub fn add(
    output: &Output,
    project: &Project,
    file: &TaskFile,
    texts: Vec<String>,
    section: usize,
) -> Result<()> {
    let texts = if texts.is_empty() {
        vec![prompt_task_text()?]
    } else {
        texts
    };

    let style = project.config().project.id_style;
    let generator = IdGenerator::new(style, Utc::now());
    let ids = generator.ids_for(texts.as_slice());
    output.verbose_ctx(
        "add",
        &format!(
            "Adding {} task(s) to section {} ({} ids)",
            texts.len(),
            section,
            style.as_str()
        ),
    );

    let added = file.update(|list| {
        ids.iter()
            .zip(&texts)
            .map(|(id, text)| list.add_item(id, text, section))
            .collect::<Result<Vec<_>, _>>()
    })?;

    if output.is_json() {
        let tasks: Vec<_> = added
            .iter()
            .zip(&texts)
            .map(|(id, text)| serde_json::json!({ "id": id, "text": normalize_task_text(text) }))
            .collect();
        output.data(&serde_json::json!({
            "section": section,
            "tasks": tasks,
        }));
    } else {
        for (id, text) in added.iter().zip(&texts) {
            output.success(&format!("Added: {}", format_task_text(id, text)));
        }
    }

    Ok(())
}

/// Uses the given id, or asks the user to pick one
fn resolve_id(output: &Output, file: &TaskFile, id: Option<String>) -> Result<String> {
    if let Some(id) = id {
        return Ok(id);
    }

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("Task ID is not specified");
    }

    let list = file.read_task_list()?;
    picker::pick_task(output, &list.tasks_by_section())
}

pub fn shift(output: &Output, file: &TaskFile, id: Option<String>, target: ShiftTarget) -> Result<()> {
    let id = resolve_id(output, file, id)?;
    output.verbose_ctx("shift", &format!("Shifting {} ({:?})", id, target));

    let shifted = file.update(|list| match target {
        ShiftTarget::Step(step) => list.shift_by(&id, step),
        ShiftTarget::Section(ordinal) => list.shift_item(&id, ordinal),
    })?;

    if output.is_json() {
        output.data(&shifted);
    } else {
        output.success(&format!(
            "Shifted: {} (section {} -> {})",
            format_task_text(&shifted.id, &shifted.text),
            shifted.from,
            shifted.to
        ));
    }

    Ok(())
}

pub fn remove(output: &Output, file: &TaskFile, id: Option<String>) -> Result<()> {
    let id = resolve_id(output, file, id)?;
    output.verbose_ctx("remove", &format!("Removing {}", id));

    let removed = file.update(|list| list.remove_item(&id))?;

    if output.is_json() {
        output.data(&removed);
    } else {
        output.success(&format!("Removed: {}", removed));
    }

    Ok(())
}

pub fn list(output: &Output, file: &TaskFile) -> Result<()> {
    let grouped = file.read_task_list()?.tasks_by_section();

    if grouped.is_empty() && !output.is_json() {
        println!("No sections (add a '## ' heading to {})", file.path().display());
        return Ok(());
    }

    output.task_groups(&grouped);
    Ok(())
}

pub fn sections(output: &Output, file: &TaskFile) -> Result<()> {
    let sections = file.read_task_list()?.sections();
    output.section_table(&sections);
    Ok(())
}

pub fn locate(output: &Output, file: &TaskFile, id: &str) -> Result<()> {
    let list = file.read_task_list()?;
    let ordinal = list.section_of_task(id)?;
    let title = section_title(&list, ordinal);

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id.trim(),
            "section": ordinal,
            "title": title,
        }));
    } else {
        let ordinal = ordinal.to_string();
        output.row(&[&ordinal, &title]);
    }

    Ok(())
}

pub fn show(output: &Output, file: &TaskFile, section: usize, index: usize) -> Result<()> {
    let list = file.read_task_list()?;
    let task = list.task_at(section, index)?;

    if output.is_json() {
        output.data(&task);
    } else {
        println!("{}", task);
    }

    Ok(())
}

pub fn export(output: &Output, file: &TaskFile) -> Result<()> {
    let list = file.read_task_list()?;
    output.data(list.document());
    Ok(())
}

fn section_title(list: &TaskList, ordinal: usize) -> String {
    list.sections()
        .into_iter()
        .find(|s| s.ordinal == ordinal)
        .map(|s| s.title)
        .unwrap_or_default()
}
