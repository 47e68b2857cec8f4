//! Logging utilities
//!
//! This module provides standardized logging functions for pipeline steps.

/// Log an operation start with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `target` - Table or file being operated on
pub fn log_operation_start(operation: &str, target: &str) {
    log::info!("{operation} {target}");
}

/// Log an operation completion with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `target` - Table or file that was operated on
/// * `items` - Number of items processed
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(
    operation: &str,
    target: &str,
    items: usize,
    elapsed: Option<std::time::Duration>,
) {
    if let Some(duration) = elapsed {
        log::info!("Successfully {operation} {items} rows for {target} in {duration:?}");
    } else {
        log::info!("Successfully {operation} {items} rows for {target}");
    }
}

/// Log an operation warning with consistent format
///
/// # Arguments
/// * `message` - Warning message
/// * `target` - Optional table or file related to the warning
pub fn log_warning(message: &str, target: Option<&str>) {
    if let Some(target) = target {
        log::warn!("{message}: {target}");
    } else {
        log::warn!("{message}");
    }
}
