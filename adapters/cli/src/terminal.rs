//! Crossterm-backed presentation of rendered frames.

use std::io::{self, Stdout, Write};

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    terminal::{Clear, ClearType},
};
use tower_defense_rendering::{RenderingBackend, TextFrame};

/// Redraws the whole terminal from the top-left corner on every frame.
#[derive(Debug)]
pub(crate) struct TerminalBackend {
    out: Stdout,
}

impl TerminalBackend {
    /// Takes over stdout and hides the cursor until dropped.
    pub(crate) fn new() -> Result<Self> {
        let mut out = io::stdout();
        queue!(out, Hide).context("failed to hide the cursor")?;
        out.flush().context("failed to flush the terminal")?;
        Ok(Self { out })
    }
}

impl RenderingBackend for TerminalBackend {
    fn present(&mut self, frame: &TextFrame) -> Result<()> {
        queue!(self.out, MoveTo(0, 0), Clear(ClearType::All))
            .context("failed to clear the terminal")?;
        for row in frame.rows() {
            writeln!(self.out, "{row}").context("failed to write a frame row")?;
        }
        self.out.flush().context("failed to flush the terminal")
    }
}

impl Drop for TerminalBackend {
    fn drop(&mut self) {
        let _ = queue!(self.out, Show);
        let _ = self.out.flush();
    }
}
