use super::backend::CaptureBackend;
use crate::config::Config;
use crate::media;
use crate::messages::{CaptureCommand, CaptureEvent, LensFacing, SessionEvent};
use anyhow::Result;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Where and how captured files are named
#[derive(Debug, Clone)]
pub struct MediaSettings {
    pub dir: PathBuf,
    pub filename_format: String,
    pub photo_extension: String,
    pub video_extension: String,
}

impl MediaSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            dir: config.output_dir.clone(),
            filename_format: config.filename_format.clone(),
            photo_extension: config.photo_extension.clone(),
            video_extension: config.video_extension.clone(),
        }
    }

    fn photo_path(&self) -> Result<PathBuf> {
        media::media_path(&self.dir, &self.filename_format, &self.photo_extension)
    }

    fn video_path(&self) -> Result<PathBuf> {
        media::media_path(&self.dir, &self.filename_format, &self.video_extension)
    }
}

/// Drives the capture backend on behalf of the session
///
/// This service:
/// - Allocates output paths for pictures and recordings
/// - Forwards start/stop/picture commands to the backend
/// - Reports saved files and failures back as session events
pub struct CaptureService {
    media: MediaSettings,
    lens: LensFacing,
    cmd_rx: mpsc::Receiver<CaptureCommand>,
    event_tx: mpsc::Sender<SessionEvent>,
    backend: Box<dyn CaptureBackend>,
}

impl CaptureService {
    pub fn new(
        media: MediaSettings,
        lens: LensFacing,
        cmd_rx: mpsc::Receiver<CaptureCommand>,
        event_tx: mpsc::Sender<SessionEvent>,
        backend: Box<dyn CaptureBackend>,
    ) -> Self {
        Self {
            media,
            lens,
            cmd_rx,
            event_tx,
            backend,
        }
    }

    pub async fn run(mut self) {
        while let Some(cmd) = self.cmd_rx.recv().await {
            if let Some(event) = self.handle_command(cmd).await {
                if self.event_tx.send(event.into()).await.is_err() {
                    break;
                }
            }
        }

        tracing::debug!("Capture service stopped");
    }

    async fn handle_command(&mut self, cmd: CaptureCommand) -> Option<CaptureEvent> {
        match cmd {
            CaptureCommand::TakePicture => match self.take_picture().await {
                Ok(path) => Some(CaptureEvent::PictureSaved(path)),
                Err(e) => {
                    tracing::error!("Failed to take picture: {:#}", e);
                    Some(CaptureEvent::PictureFailed(format!("{:#}", e)))
                }
            },

            CaptureCommand::StartRecording => match self.start_recording().await {
                Ok(path) => {
                    tracing::info!("Recording to {:?}", path);
                    None
                }
                Err(e) => {
                    tracing::error!("Failed to start recording: {:#}", e);
                    Some(CaptureEvent::VideoFailed(format!("{:#}", e)))
                }
            },

            CaptureCommand::StopRecording => match self.backend.stop_recording().await {
                Ok(path) => Some(CaptureEvent::VideoSaved(path)),
                Err(e) => {
                    tracing::error!("Failed to finish recording: {:#}", e);
                    Some(CaptureEvent::VideoFailed(format!("{:#}", e)))
                }
            },

            CaptureCommand::SwitchLens(lens) => {
                tracing::info!("Switched to {:?} camera", lens);
                self.lens = lens;
                None
            }
        }
    }

    async fn take_picture(&mut self) -> Result<PathBuf> {
        let path = self.media.photo_path()?;
        self.backend.take_picture(&path, self.lens).await?;
        Ok(path)
    }

    async fn start_recording(&mut self) -> Result<PathBuf> {
        let path = self.media.video_path()?;
        self.backend.start_recording(&path, self.lens).await?;
        Ok(path)
    }
}

/// Handle for communicating with the CaptureService
#[derive(Clone)]
pub struct CaptureHandle {
    tx: mpsc::Sender<CaptureCommand>,
}

impl CaptureHandle {
    pub fn new(tx: mpsc::Sender<CaptureCommand>) -> Self {
        Self { tx }
    }

    async fn send(&self, cmd: CaptureCommand) -> Result<()> {
        self.tx
            .send(cmd)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to send capture command: {}", e))
    }

    pub async fn take_picture(&self) -> Result<()> {
        self.send(CaptureCommand::TakePicture).await
    }

    pub async fn start_recording(&self) -> Result<()> {
        self.send(CaptureCommand::StartRecording).await
    }

    pub async fn stop_recording(&self) -> Result<()> {
        self.send(CaptureCommand::StopRecording).await
    }

    pub async fn switch_lens(&self, lens: LensFacing) -> Result<()> {
        self.send(CaptureCommand::SwitchLens(lens)).await
    }
}
