use crate::messages::LensFacing;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Device-facing side of a capture session
///
/// Implementations own the actual camera. The session only ever asks for a
/// picture at a path, or for a recording to start at a path and later stop.
#[async_trait]
pub trait CaptureBackend: Send {
    /// Capture a still image into `path`
    async fn take_picture(&mut self, path: &Path, lens: LensFacing) -> Result<()>;

    /// Begin recording video destined for `path`
    async fn start_recording(&mut self, path: &Path, lens: LensFacing) -> Result<()>;

    /// Finish the current recording and return where it was written
    async fn stop_recording(&mut self) -> Result<PathBuf>;
}

struct PendingRecording {
    staging: NamedTempFile,
    target: PathBuf,
}

/// Backend without a camera: writes empty files where the media would go.
///
/// Recordings are staged in a temp file next to the target and only appear
/// under their final name once stopped.
#[derive(Default)]
pub struct PlaceholderBackend {
    recording: Option<PendingRecording>,
}

impl PlaceholderBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }
}

#[async_trait]
impl CaptureBackend for PlaceholderBackend {
    async fn take_picture(&mut self, path: &Path, lens: LensFacing) -> Result<()> {
        tracing::debug!("Placeholder picture from {:?} lens", lens);
        tokio::fs::File::create(path)
            .await
            .with_context(|| format!("Failed to create picture file: {:?}", path))?;
        Ok(())
    }

    async fn start_recording(&mut self, path: &Path, lens: LensFacing) -> Result<()> {
        if self.recording.is_some() {
            return Err(anyhow::anyhow!("Recording already in progress"));
        }

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let staging = tempfile::Builder::new()
            .prefix("camera-session-")
            .suffix(".part")
            .tempfile_in(dir)
            .with_context(|| format!("Failed to create staging file in {:?}", dir))?;

        tracing::debug!(
            "Placeholder recording from {:?} lens staged at {:?}",
            lens,
            staging.path()
        );

        self.recording = Some(PendingRecording {
            staging,
            target: path.to_path_buf(),
        });
        Ok(())
    }

    async fn stop_recording(&mut self) -> Result<PathBuf> {
        let pending = self
            .recording
            .take()
            .ok_or_else(|| anyhow::anyhow!("No recording in progress"))?;

        pending
            .staging
            .persist(&pending.target)
            .with_context(|| format!("Failed to persist recording to {:?}", pending.target))?;

        Ok(pending.target)
    }
}
