//! Progress bar on stderr.

use crossterm::{
    cursor::MoveToColumn,
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::io::Write;

const WIDTH: usize = 40;

/// Percent-based progress bar; a disabled bar draws nothing.
pub struct ProgressBar {
    title: String,
    percent: f64,
    enabled: bool,
}

impl ProgressBar {
    pub fn new(title: impl Into<String>, enabled: bool) -> Self {
        Self {
            title: title.into(),
            percent: 0.0,
            enabled,
        }
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    pub fn set(&mut self, percent: f64) {
        self.percent = percent.clamp(0.0, 100.0);
        self.draw();
    }

    pub fn inc(&mut self, percent: f64) {
        self.set(self.percent + percent);
    }

    /// Complete the bar and end its line.
    pub fn finish(&mut self) {
        self.set(100.0);
        if self.enabled {
            eprintln!();
        }
    }

    fn draw(&self) {
        if !self.enabled {
            return;
        }
        let filled = (self.percent / 100.0 * WIDTH as f64).round() as usize;
        let line = format!(
            "{}: {:>3}% |{}{}|",
            self.title,
            self.percent.round() as u32,
            "o".repeat(filled),
            " ".repeat(WIDTH - filled.min(WIDTH))
        );
        let mut stderr = std::io::stderr().lock();
        // Progress output is best effort.
        let _ = queue!(
            stderr,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(line)
        );
        let _ = stderr.flush();
    }
}
