//! Interactive task picker
//!
//! Used by `shift` and `remove` when no task ID is given: lists every task
//! under its section heading and returns the chosen ID.

mod app;
mod event;
mod ui;

use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Result};

use super::Output;
use crate::domain::SectionTasks;
use app::Picker;
use event::EventHandler;

/// Lets the user choose a task; cancelling is an error
pub fn pick_task(output: &Output, sections: &[SectionTasks]) -> Result<String> {
    let mut picker = Picker::new(sections);
    if !picker.has_tasks() {
        anyhow::bail!("There are no tasks to select");
    }

    output.verbose_ctx("picker", &format!("{} rows", picker.rows().len()));

    let mut session = ui::Session::start()?;
    let event_handler = EventHandler::new(250);

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        picker.run(session.terminal(), event_handler)
    }));

    match result {
        Ok(inner_result) => {
            session.finish()?;
            inner_result?.ok_or_else(|| anyhow!("Task ID is not specified"))
        }
        Err(panic_payload) => {
            // Dropping the session restores the terminal before reporting
            drop(session);
            let message = if let Some(s) = panic_payload.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            Err(anyhow!("Picker panicked: {}", message))
        }
    }
}
