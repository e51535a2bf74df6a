use std::fs;
use std::path::Path;
use crate::errors::{I18nError, Result};

/// Read file content as UTF-8 string
pub fn read(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| I18nError::FileOperationError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Write a UTF-8 string to file, creating parent directories if needed
pub fn write(path: impl AsRef<Path>, data: &str) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            create_dir(parent)?;
        }
    }

    fs::write(path, data).map_err(|e| I18nError::FileOperationError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Create a directory and all of its parents
pub fn create_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::create_dir_all(path).map_err(|e| I18nError::FileOperationError {
        path: path.display().to_string(),
        source: e,
    })
}
