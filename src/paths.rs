//! XDG-style path utilities for configuration directories.
//!
//! Paths follow XDG Base Directory conventions on every platform instead of
//! OS-specific locations, so a theme file lives in the same place everywhere.

use anyhow::{Result, anyhow};
use std::path::PathBuf;

/// Returns the configuration directory for the application `app`.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/<app>` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/<app>` otherwise
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir(app: &str) -> Result<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Ok(PathBuf::from(xdg).join(app));
    }

    let home = dirs::home_dir().ok_or_else(|| anyhow!("Failed to determine home directory"))?;
    Ok(home.join(".config").join(app))
}
