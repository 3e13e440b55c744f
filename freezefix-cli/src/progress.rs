// ============================================================================
// freezefix-cli/src/progress.rs
// ============================================================================
//
// PROGRESS REPORTING: spinner fed by the detector's line observer
//
// ffmpeg's analysis output gives no reliable total, so progress is shown as
// a spinner counting the protocol lines seen so far.

use indicatif::{ProgressBar, ProgressStyle};
use std::cell::Cell;
use std::time::Duration;

/// Line counter for one detection run, with a spinner unless disabled.
#[derive(Debug)]
pub struct DetectionProgress {
    spinner: Option<ProgressBar>,
    lines: Cell<u64>,
}

impl DetectionProgress {
    pub fn new(enabled: bool, message: &str) -> Self {
        if !enabled {
            return Self {
                spinner: None,
                lines: Cell::new(0),
            };
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("  {spinner} {msg} ({pos} lines, {elapsed})")
        {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));
        Self {
            spinner: Some(pb),
            lines: Cell::new(0),
        }
    }

    /// Records one protocol line. Lines are counted even when the spinner
    /// is hidden.
    pub fn on_line(&self, _line: &str) {
        self.lines.set(self.lines.get() + 1);
        if let Some(pb) = &self.spinner {
            pb.inc(1);
        }
    }

    pub fn lines_seen(&self) -> u64 {
        self.lines.get()
    }

    pub fn finish(self) {
        if let Some(pb) = self.spinner {
            pb.finish_and_clear();
        }
    }
}
