//! Raw-mode terminal session for the picker

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

/// Terminal type alias
pub type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// The picker's alternate screen
///
/// The shell's screen and cooked mode come back when the session is finished
/// or dropped, whichever happens first.
pub struct Session {
    terminal: Terminal,
    active: bool,
}

impl Session {
    pub fn start() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;

        let mut stdout = io::stdout();
        let entered = execute!(stdout, EnterAlternateScreen)
            .context("Failed to enter alternate screen")
            .and_then(|_| {
                ratatui::Terminal::new(CrosstermBackend::new(stdout))
                    .context("Failed to set up terminal")
            });

        match entered {
            Ok(terminal) => Ok(Self {
                terminal,
                active: true,
            }),
            Err(e) => {
                let _ = leave();
                Err(e)
            }
        }
    }

    pub fn terminal(&mut self) -> &mut Terminal {
        &mut self.terminal
    }

    /// Leaves the alternate screen, reporting any failure
    pub fn finish(mut self) -> Result<()> {
        self.active = false;
        leave()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.active {
            let _ = leave();
        }
    }
}

fn leave() -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(io::stdout(), LeaveAlternateScreen).context("Failed to leave alternate screen")?;
    Ok(())
}
