//! Environment/runtime helpers
//!
//! Sanity checks to ensure the data directory exists before file-backed
//! storage is opened in it.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Ensure `data_dir` exists and is a directory; returns the path joined with `file`.
pub fn ensure_data_dir(data_dir: &str, file: &str) -> anyhow::Result<PathBuf> {
    let dir = Path::new(data_dir);
    if dir.is_relative() {
        warn!(%data_dir, "data directory is relative; resolved against the working directory");
    }
    std::fs::create_dir_all(dir).map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;
    if !dir.is_dir() {
        return Err(anyhow::anyhow!("{data_dir} exists but is not a directory"));
    }
    let path = dir.join(file);
    debug!(path = %path.display(), "data directory ready");
    Ok(path)
}
