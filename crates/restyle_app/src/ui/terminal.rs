use std::io::{self, Write};

use super::render::{Line, Severity};

/// Prints rendered lines, skipping the ones already on screen.
///
/// Progress lines go to stderr and are redrawn in place; everything else is
/// appended to stdout (errors to stderr).
#[derive(Debug, Default)]
pub struct Terminal {
    shown: Vec<Line>,
    progress_visible: bool,
}

impl Terminal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, lines: Vec<Line>) {
        let mut stdout = io::stdout().lock();
        let mut stderr = io::stderr().lock();

        for line in &lines {
            if line.severity == Severity::Progress {
                let _ = write!(stderr, "\r{}", line.text);
                let _ = stderr.flush();
                self.progress_visible = true;
                continue;
            }
            if self.shown.contains(line) {
                continue;
            }
            if self.progress_visible {
                let _ = writeln!(stderr);
                self.progress_visible = false;
            }
            let _ = match line.severity {
                Severity::Error => writeln!(stderr, "{}", line.text),
                _ => writeln!(stdout, "{}", line.text),
            };
        }

        if self.progress_visible && !lines.iter().any(|l| l.severity == Severity::Progress) {
            let _ = writeln!(stderr);
            self.progress_visible = false;
        }
        self.shown = lines
            .into_iter()
            .filter(|line| line.severity != Severity::Progress)
            .collect();
    }
}
