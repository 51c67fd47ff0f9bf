//! Global output configuration and diagnostics.
//!
//! Rendered documents are always written to the writer the caller hands in.
//! This module only controls the side channel:
//!
//! - Status messages and warnings go to stderr
//! - Quiet mode suppresses status messages, never warnings
//! - Colors can be disabled via the `NO_COLOR` environment variable

use std::io::{self, Write};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Whether colors are disabled, fixed the first time it is read.
static NO_COLOR: OnceLock<bool> = OnceLock::new();

/// Quiet mode, settable at any point before a status message is printed.
static QUIET: AtomicBool = AtomicBool::new(false);

/// Output configuration settings.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Suppress non-essential output.
    pub quiet: bool,
    /// Disable colored output.
    pub no_color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quiet: false,
            no_color: no_color_from_env(),
        }
    }
}

// https://no-color.org/
fn no_color_from_env() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty())
}

/// Initialize the global output configuration.
///
/// `quiet` always takes effect. `no_color` is ignored once anything has
/// been styled, so colors never change halfway through a document.
pub fn init(config: OutputConfig) {
    QUIET.store(config.quiet, Ordering::Relaxed);
    let _ = NO_COLOR.set(config.no_color);
}

/// Get the current output configuration.
pub fn config() -> OutputConfig {
    OutputConfig {
        quiet: is_quiet(),
        no_color: is_no_color(),
    }
}

/// Check if quiet mode is enabled.
pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Check if colors are disabled.
pub fn is_no_color() -> bool {
    *NO_COLOR.get_or_init(no_color_from_env)
}

/// Print a status message to stderr (respects quiet mode).
#[macro_export]
macro_rules! status {
    ($($arg:tt)*) => {
        if !$crate::output::is_quiet() {
            eprintln!($($arg)*);
        }
    };
}

/// Print a warning message to stderr (always shown, even in quiet mode).
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        eprintln!("{} {}", $crate::output::warning_label(), format_args!($($arg)*));
    };
}

/// The `Warning:` prefix, yellow unless colors are disabled.
pub fn warning_label() -> String {
    use owo_colors::OwoColorize;

    if is_no_color() {
        "Warning:".to_string()
    } else {
        "Warning:".yellow().to_string()
    }
}

/// Flush stderr.
pub fn flush_stderr() {
    let _ = io::stderr().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_config_default() {
        let config = OutputConfig::default();
        assert!(!config.quiet);
    }

    #[test]
    fn test_quiet_can_be_set_after_first_read() {
        let _ = is_no_color();
        init(OutputConfig {
            quiet: true,
            ..OutputConfig::default()
        });
        assert!(is_quiet());
        assert!(config().quiet);

        init(OutputConfig::default());
        assert!(!is_quiet());
    }

    #[test]
    fn test_warning_label_text() {
        assert!(warning_label().contains("Warning:"));
    }
}
