//! Progress reporting for long-running pipeline steps
//!
//! Uses the indicatif crate. Bars are hidden unless the caller asks for
//! them, so library use and tests stay quiet.

use indicatif::{ProgressBar, ProgressStyle};

/// Default style for a step progress bar
pub const DEFAULT_STEP_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({per_sec}) {msg}";

/// Create a progress bar for one pipeline step
///
/// # Arguments
/// * `length` - Total number of units of work
/// * `description` - Message displayed next to the bar
/// * `visible` - When false a hidden bar is returned
#[must_use]
pub fn create_step_progress_bar(length: u64, description: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(length);
    if let Ok(style) = ProgressStyle::default_bar().template(DEFAULT_STEP_TEMPLATE) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(description.to_string());
    pb
}

/// Finish a progress bar and clear it from display
pub fn finish_and_clear(pb: &ProgressBar) {
    pb.finish_and_clear();
}
