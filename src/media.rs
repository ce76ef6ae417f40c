use anyhow::{Context, Result, anyhow};
use std::fmt::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_FILENAME_FORMAT: &str = "%Y-%m-%d-%H-%M-%S-%3f";
pub const PHOTO_EXTENSION: &str = ".jpg";
pub const VIDEO_EXTENSION: &str = ".mp4";

/// Output file named after the current local time, e.g. `2024-05-01-12-30-00-123.jpg`
///
/// Fails on a malformed strftime pattern instead of panicking inside chrono.
pub fn media_path(dir: &Path, format: &str, extension: &str) -> Result<PathBuf> {
    let mut name = String::new();
    write!(name, "{}{}", chrono::Local::now().format(format), extension)
        .map_err(|_| anyhow!("Invalid filename format: {:?}", format))?;
    Ok(dir.join(name))
}

/// Create the output directory if it doesn't exist
pub async fn ensure_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create output directory: {:?}", dir))
}
