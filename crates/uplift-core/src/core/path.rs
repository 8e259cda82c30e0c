use crate::core::error::{UpliftError, UpliftResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the Uplift home directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\uplift
/// - Linux: ~/.config/uplift
/// - macOS: ~/Library/Application Support/uplift
pub fn uplift_home() -> UpliftResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| UpliftError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("uplift"))
}

/// Get the cache directory, used as the default download/extraction area
///
/// Platform-specific locations:
/// - Windows: %LOCALAPPDATA%\uplift
/// - Linux: ~/.cache/uplift
/// - macOS: ~/Library/Caches/uplift
pub fn cache_dir() -> UpliftResult<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .ok_or_else(|| UpliftError::Path("Could not determine cache directory".to_string()))?;
    Ok(cache_dir.join("uplift"))
}

/// Get the config file path
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\uplift\config.yaml
/// - Linux: ~/.config/uplift/config.yaml
/// - macOS: ~/Library/Application Support/uplift/config.yaml
pub fn config_file() -> UpliftResult<PathBuf> {
    Ok(uplift_home()?.join("config.yaml"))
}

/// Ensure a directory exists, creating it and its parents if needed
pub fn ensure_dir(path: &Path) -> UpliftResult<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Turn a release name into something safe to use as a file name.
///
/// Tag names may contain `/` (e.g. `release/1.0`), which would otherwise
/// point the archive into a subdirectory.
pub fn file_name_for_version(version: &str) -> String {
    version
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect()
}
