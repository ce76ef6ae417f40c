use crate::state::CameraState;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which camera the session captures from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LensFacing {
    #[default]
    Back,
    Front,
}

impl LensFacing {
    pub fn toggle(self) -> Self {
        match self {
            LensFacing::Back => LensFacing::Front,
            LensFacing::Front => LensFacing::Back,
        }
    }
}

/// User gestures on the capture controls, plus the shutter's own timers.
///
/// Timer events carry the number of the press that scheduled them, so a
/// timer that fired for an earlier press is recognised as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    Press,
    Release,
    /// Shutter held past the long-press delay
    LongPress(u64),
    /// Recording ring started
    ProgressStarted(u64),
    /// Recording ring reached the maximum duration
    ProgressFinished(u64),
    Cancel,
    Confirm,
    Back,
    SwitchCamera,
}

/// Completions reported by the capture service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    PictureSaved(PathBuf),
    PictureFailed(String),
    VideoSaved(PathBuf),
    VideoFailed(String),
}

/// Everything the session reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Control(ControlEvent),
    Capture(CaptureEvent),
    /// External override of the current state. Releases the shutter and
    /// stops its timers, but does not touch the capture backend: overriding
    /// away from RECORDING leaves any recording running.
    SetState(CameraState),
    Shutdown,
}

impl From<ControlEvent> for SessionEvent {
    fn from(event: ControlEvent) -> Self {
        SessionEvent::Control(event)
    }
}

impl From<CaptureEvent> for SessionEvent {
    fn from(event: CaptureEvent) -> Self {
        SessionEvent::Capture(event)
    }
}

/// Side effects requested by the session, performed by the app
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    ScheduleLongPress(u64),
    CancelLongPress,
    StartProgress(u64),
    StopProgress,
    Capture,
    StartRecord,
    StopRecord,
    SwitchCamera(LensFacing),
    Discard(PathBuf),
    Deliver(PathBuf),
    Exit,
}

/// Commands for the capture service
#[derive(Debug)]
pub enum CaptureCommand {
    TakePicture,
    StartRecording,
    StopRecording,
    SwitchLens(LensFacing),
}
