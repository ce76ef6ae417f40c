use crate::config::Config;
use crate::controls::ControlLayout;
use crate::hooks;
use crate::media;
use crate::messages::{ControlEvent, SessionAction, SessionEvent};
use crate::services::{CaptureBackend, CaptureHandle, CaptureService, MediaSettings};
use crate::session::CaptureSession;
use crate::state::CameraState;

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Observable snapshot published on every state change
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    pub state: CameraState,
    pub value: i32,
    pub controls: ControlLayout,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl SessionStatus {
    fn new(state: CameraState, output: Option<PathBuf>) -> Self {
        Self {
            state,
            value: state.value(),
            controls: ControlLayout::for_state(state),
            output,
        }
    }
}

/// How a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The user confirmed this picture or video
    Delivered(PathBuf),
    Exited,
}

pub struct App {
    session: CaptureSession,
    config: Config,
    capture: CaptureHandle,
    event_tx: mpsc::Sender<SessionEvent>,
    event_rx: mpsc::Receiver<SessionEvent>,
    status_tx: watch::Sender<SessionStatus>,
    long_press: Option<JoinHandle<()>>,
    progress: Option<JoinHandle<()>>,
}

impl App {
    pub async fn new(config: Config, backend: Box<dyn CaptureBackend>) -> Result<Self> {
        config.validate()?;
        media::ensure_dir(&config.output_dir).await?;

        let (event_tx, event_rx) = mpsc::channel(32);
        let capture = Self::setup_capture_service(&config, backend, event_tx.clone());
        let session = CaptureSession::new(config.allow_capture, config.allow_record, config.lens);
        let (status_tx, _status_rx) = watch::channel(SessionStatus::new(session.state(), None));

        tracing::info!(
            "Ready! Tap to take a picture, hold {}ms to record (max {}s)",
            config.long_press_ms,
            config.max_record_secs
        );

        Ok(Self {
            session,
            config,
            capture,
            event_tx,
            event_rx,
            status_tx,
            long_press: None,
            progress: None,
        })
    }

    /// Sender for feeding control events into the session
    pub fn events(&self) -> mpsc::Sender<SessionEvent> {
        self.event_tx.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status_tx.subscribe()
    }

    pub async fn run(mut self) -> Result<Outcome> {
        loop {
            tracing::debug!("Main loop: waiting for event");
            let Some(event) = self.event_rx.recv().await else {
                return Ok(Outcome::Exited);
            };

            match self.dispatch(event).await {
                Ok(Some(outcome)) => {
                    self.cancel_timers();
                    tracing::info!("Session finished: {:?}", outcome);
                    return Ok(outcome);
                }
                Ok(None) => {}
                Err(e) => tracing::error!("Error handling event: {:#}", e),
            }
        }
    }

    async fn dispatch(&mut self, event: SessionEvent) -> Result<Option<Outcome>> {
        let before = self.session.state();
        let actions = self.session.handle(event);

        let after = self.session.state();
        if after != before {
            self.on_state_changed(before, after);
        }

        for action in actions {
            if let Some(outcome) = self.perform(action).await? {
                return Ok(Some(outcome));
            }
        }

        Ok(None)
    }

    async fn perform(&mut self, action: SessionAction) -> Result<Option<Outcome>> {
        tracing::debug!("perform: {:?}", action);

        match action {
            SessionAction::ScheduleLongPress(press) => {
                let delay = self.config.long_press();
                let tx = self.event_tx.clone();
                Self::replace_timer(
                    &mut self.long_press,
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = tx.send(ControlEvent::LongPress(press).into()).await;
                    }),
                );
            }
            SessionAction::CancelLongPress => {
                if let Some(timer) = self.long_press.take() {
                    timer.abort();
                }
            }
            SessionAction::StartProgress(press) => {
                let max = self.config.max_record();
                let tx = self.event_tx.clone();
                Self::replace_timer(
                    &mut self.progress,
                    tokio::spawn(async move {
                        if tx.send(ControlEvent::ProgressStarted(press).into()).await.is_err() {
                            return;
                        }
                        tokio::time::sleep(max).await;
                        let _ = tx.send(ControlEvent::ProgressFinished(press).into()).await;
                    }),
                );
            }
            SessionAction::StopProgress => {
                if let Some(timer) = self.progress.take() {
                    timer.abort();
                }
            }
            SessionAction::Capture => self.capture.take_picture().await?,
            SessionAction::StartRecord => self.capture.start_recording().await?,
            SessionAction::StopRecord => self.capture.stop_recording().await?,
            SessionAction::SwitchCamera(lens) => self.capture.switch_lens(lens).await?,
            SessionAction::Discard(path) => {
                if self.config.delete_discarded {
                    match tokio::fs::remove_file(&path).await {
                        Ok(()) => tracing::info!("Discarded {:?}", path),
                        Err(e) => tracing::warn!("Failed to discard {:?}: {}", path, e),
                    }
                }
            }
            SessionAction::Deliver(path) => return Ok(Some(Outcome::Delivered(path))),
            SessionAction::Exit => return Ok(Some(Outcome::Exited)),
        }

        Ok(None)
    }

    fn on_state_changed(&self, from: CameraState, to: CameraState) {
        tracing::info!("State: {} -> {}", from, to);

        let output = self.session.output().map(PathBuf::from);
        self.status_tx.send_replace(SessionStatus::new(to, output));

        if let Some(command) = self.config.hook_for(to) {
            hooks::run_state_hook(to, command, self.session.output());
        }
    }

    fn replace_timer(slot: &mut Option<JoinHandle<()>>, timer: JoinHandle<()>) {
        if let Some(old) = slot.replace(timer) {
            old.abort();
        }
    }

    fn cancel_timers(&mut self) {
        for timer in [self.long_press.take(), self.progress.take()]
            .into_iter()
            .flatten()
        {
            timer.abort();
        }
    }

    fn setup_capture_service(
        config: &Config,
        backend: Box<dyn CaptureBackend>,
        event_tx: mpsc::Sender<SessionEvent>,
    ) -> CaptureHandle {
        let (capture_tx, capture_rx) = mpsc::channel(10);
        let service = CaptureService::new(
            MediaSettings::from_config(config),
            config.lens,
            capture_rx,
            event_tx,
            backend,
        );
        tokio::spawn(service.run());

        CaptureHandle::new(capture_tx)
    }
}
