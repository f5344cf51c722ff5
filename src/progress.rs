//! Terminal progress reporting for the census passes.

use std::time::Duration;

use filecensus_scan::ProgressSink;
use indicatif::{ProgressBar, ProgressStyle};

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// indicatif-backed progress sink.
///
/// Starts as a spinner while the counting pass runs; switches to a bar
/// once the total is known.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars(TICK_CHARS),
        );
        bar.set_message("Counting files...");
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    /// A sink that draws nothing, for non-interactive output.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for BarProgress {
    fn set_total(&self, total: u64) {
        self.bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} Processing [{bar:30.cyan/dim}] {pos}/{len} files ({eta} remaining)",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("━╸─")
            .tick_chars(TICK_CHARS),
        );
        self.bar.set_message("");
        self.bar.set_position(0);
        self.bar.set_length(total);
    }

    fn increment(&self) {
        self.bar.inc(1);
    }
}

impl Drop for BarProgress {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
