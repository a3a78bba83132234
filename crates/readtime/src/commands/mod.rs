//! Command implementations.

use anyhow::Context;
use camino::Utf8Path;
use readtime_core::JsonFileStore;

pub mod estimate;
pub mod info;
pub mod render;
pub mod settings;

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = metadata.len() as usize;
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let content = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read {path}"))?;
    Ok(content)
}

/// Open the option store holding the reading time settings.
pub fn open_store(path: &Utf8Path) -> anyhow::Result<JsonFileStore> {
    JsonFileStore::open(path).with_context(|| format!("failed to open option store {path}"))
}
