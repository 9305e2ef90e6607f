use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const RECORD_TEMPLATE: &str =
    "{msg}\n{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] record {pos}/{len} ({eta})";

/// Per-record progress for a satellite extraction pass.
///
/// With `quiet` the bar is hidden but still counts, so callers never branch.
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new(records: u64, message: &str, quiet: bool) -> Self {
        if quiet {
            return Self::hidden_with_len(records);
        }

        let bar = ProgressBar::new(records);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(RECORD_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    pub fn hidden() -> Self {
        Self::hidden_with_len(0)
    }

    fn hidden_with_len(records: u64) -> Self {
        Self {
            bar: ProgressBar::with_draw_target(Some(records), ProgressDrawTarget::hidden()),
        }
    }

    pub fn increment(&self, records: u64) {
        self.bar.inc(records);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish_with_message(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish();
        }
    }
}
