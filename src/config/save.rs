use std::path::Path;

use anyhow::Result;

use super::types::SheetConfig;
use crate::error::SheetError;

/// Write `config` as pretty JSON, creating the parent directory if needed
pub fn save_config(config: &SheetConfig, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    let write_error = |source| SheetError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, content).map_err(write_error)?;

    Ok(())
}

/// `path` relative to `base` when it lies inside it, otherwise unchanged
pub fn make_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}
