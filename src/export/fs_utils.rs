// src/export/fs_utils.rs

use crate::errors::{AppError, AppResult};
use std::fs;
use std::path::Path;

/// Create the export directory if needed; refuse a path that is a file.
pub fn ensure_export_dir(dir: &Path) -> AppResult<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(AppError::Export(format!(
            "export path '{}' is not a directory",
            dir.display()
        )));
    }
    fs::create_dir_all(dir)?;
    Ok(())
}
