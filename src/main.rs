//! md-tasks - Simple task management based on Markdown

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = md_tasks::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
