use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "recam";

/// Snapshots land in this directory, created next to the executable.
pub const SCREENSHOT_DIR_NAME: &str = "reCamScreenshots";

pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .context("Unable to determine config directory")
}

pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn screenshots_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Unable to determine executable path")?;
    let dir = exe.parent().context("Executable has no parent directory")?;
    Ok(dir.join(SCREENSHOT_DIR_NAME))
}
