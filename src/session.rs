use crate::messages::{CaptureEvent, ControlEvent, LensFacing, SessionAction, SessionEvent};
use crate::state::CameraState;
use std::path::{Path, PathBuf};

/// Shutter-driven capture session.
///
/// A tap takes a picture, holding past the long-press delay records video.
/// The session is synchronous and performs no I/O: each event yields the
/// actions the caller must carry out.
#[derive(Debug)]
pub struct CaptureSession {
    state: CameraState,
    pressed: bool,
    /// Number of the current (or last) press; timer events from older presses are stale
    press: u64,
    allow_capture: bool,
    allow_record: bool,
    lens: LensFacing,
    output: Option<PathBuf>,
}

impl CaptureSession {
    pub fn new(allow_capture: bool, allow_record: bool, lens: LensFacing) -> Self {
        Self {
            state: CameraState::Preview,
            pressed: false,
            press: 0,
            allow_capture,
            allow_record,
            lens,
            output: None,
        }
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn lens(&self) -> LensFacing {
        self.lens
    }

    /// Last saved picture or video, until confirmed or cancelled
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn press(&self) -> u64 {
        self.press
    }

    pub fn handle(&mut self, event: SessionEvent) -> Vec<SessionAction> {
        tracing::debug!("session: {:?} in {}", event, self.state);

        match event {
            SessionEvent::Control(control) => self.handle_control(control),
            SessionEvent::Capture(capture) => self.handle_capture(capture),
            SessionEvent::SetState(state) => {
                tracing::info!("State overridden: {} -> {}", self.state, state);
                self.state = state;
                self.pressed = false;
                self.press += 1;
                vec![SessionAction::CancelLongPress, SessionAction::StopProgress]
            }
            SessionEvent::Shutdown => vec![SessionAction::Exit],
        }
    }

    fn handle_control(&mut self, event: ControlEvent) -> Vec<SessionAction> {
        use CameraState::*;

        match (event, self.state) {
            (ControlEvent::Press, Preview) => {
                self.pressed = true;
                self.press += 1;
                vec![SessionAction::ScheduleLongPress(self.press)]
            }

            (ControlEvent::LongPress(press), Preview) if self.is_held(press) => {
                vec![SessionAction::StartProgress(press)]
            }

            (ControlEvent::ProgressStarted(press), Preview) if self.is_held(press) => {
                tracing::info!("Starting recording");
                self.state = Recording;
                vec![SessionAction::StartRecord]
            }

            (ControlEvent::Release, _) if self.pressed => {
                self.pressed = false;
                self.unpress()
            }

            (ControlEvent::ProgressFinished(press), Recording) if press == self.press => {
                tracing::info!("Maximum recording duration reached");
                self.pressed = false;
                self.unpress()
            }

            (ControlEvent::Cancel, PictureTaken | RecordProcess | RecordTaken) => {
                self.state = Preview;
                self.output
                    .take()
                    .map(SessionAction::Discard)
                    .into_iter()
                    .collect()
            }

            (ControlEvent::Confirm, PictureTaken | RecordTaken) => match &self.output {
                Some(path) => vec![SessionAction::Deliver(path.clone())],
                None => {
                    tracing::warn!("Confirm in {} without a saved output", self.state);
                    Vec::new()
                }
            },

            (ControlEvent::Back, Preview) => vec![SessionAction::Exit],

            (ControlEvent::SwitchCamera, _) => {
                self.lens = self.lens.toggle();
                vec![SessionAction::SwitchCamera(self.lens)]
            }

            (event, state) => {
                tracing::debug!("Ignoring {:?} in {}", event, state);
                Vec::new()
            }
        }
    }

    /// Shutter still down for `press`, and holding it may record
    fn is_held(&self, press: u64) -> bool {
        self.pressed && press == self.press && self.allow_record
    }

    /// Shutter let go, either by the user or by the recording ring running out
    fn unpress(&mut self) -> Vec<SessionAction> {
        let mut actions = vec![SessionAction::CancelLongPress, SessionAction::StopProgress];

        match self.state {
            CameraState::Preview => {
                if self.allow_capture {
                    actions.push(SessionAction::Capture);
                }
            }
            CameraState::Recording => {
                tracing::info!("Stopping recording");
                self.state = CameraState::RecordProcess;
                actions.push(SessionAction::StopRecord);
            }
            _ => {}
        }

        actions
    }

    fn handle_capture(&mut self, event: CaptureEvent) -> Vec<SessionAction> {
        match (event, self.state) {
            (CaptureEvent::PictureSaved(path), CameraState::Preview) => {
                tracing::info!("Picture saved to {:?}", path);
                self.state = CameraState::PictureTaken;
                self.output = Some(path);
            }

            (CaptureEvent::VideoSaved(path), CameraState::RecordProcess) => {
                tracing::info!("Video saved to {:?}", path);
                self.state = CameraState::RecordTaken;
                self.output = Some(path);
            }

            (CaptureEvent::PictureFailed(e), _) => {
                tracing::warn!("Picture capture failed: {}", e);
            }

            (CaptureEvent::VideoFailed(e), CameraState::Recording | CameraState::RecordProcess) => {
                tracing::warn!("Video capture failed: {}", e);
                self.state = CameraState::Preview;
                self.pressed = false;
                return vec![SessionAction::StopProgress];
            }

            // Saved after the user moved on (e.g. cancelled while processing)
            (CaptureEvent::PictureSaved(path) | CaptureEvent::VideoSaved(path), state) => {
                tracing::info!("Discarding {:?} saved late in {}", path, state);
                return vec![SessionAction::Discard(path)];
            }

            (event, state) => {
                tracing::debug!("Ignoring stale {:?} in {}", event, state);
            }
        }

        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> CaptureSession {
        CaptureSession::new(true, true, LensFacing::Back)
    }

    fn control(session: &mut CaptureSession, event: ControlEvent) -> Vec<SessionAction> {
        session.handle(SessionEvent::Control(event))
    }

    fn capture(session: &mut CaptureSession, event: CaptureEvent) -> Vec<SessionAction> {
        session.handle(SessionEvent::Capture(event))
    }

    fn record(session: &mut CaptureSession) {
        control(session, ControlEvent::Press);
        let press = session.press();
        control(session, ControlEvent::LongPress(press));
        control(session, ControlEvent::ProgressStarted(press));
    }

    #[test]
    fn test_starts_in_preview() {
        let session = session();
        assert_eq!(session.state(), CameraState::Preview);
        assert!(session.output().is_none());
        assert!(!session.is_pressed());
    }

    #[test]
    fn test_tap_takes_picture() {
        let mut session = session();

        assert_eq!(
            control(&mut session, ControlEvent::Press),
            vec![SessionAction::ScheduleLongPress(1)]
        );
        assert_eq!(
            control(&mut session, ControlEvent::Release),
            vec![
                SessionAction::CancelLongPress,
                SessionAction::StopProgress,
                SessionAction::Capture
            ]
        );
        assert_eq!(session.state(), CameraState::Preview);

        capture(&mut session, CaptureEvent::PictureSaved("a.jpg".into()));
        assert_eq!(session.state(), CameraState::PictureTaken);
        assert_eq!(session.output(), Some(Path::new("a.jpg")));
    }

    #[test]
    fn test_tap_without_capture_allowed() {
        let mut session = CaptureSession::new(false, true, LensFacing::Back);
        control(&mut session, ControlEvent::Press);
        let actions = control(&mut session, ControlEvent::Release);
        assert!(!actions.contains(&SessionAction::Capture));
    }

    #[test]
    fn test_hold_records_video() {
        let mut session = session();

        control(&mut session, ControlEvent::Press);
        assert_eq!(
            control(&mut session, ControlEvent::LongPress(1)),
            vec![SessionAction::StartProgress(1)]
        );
        assert_eq!(
            control(&mut session, ControlEvent::ProgressStarted(1)),
            vec![SessionAction::StartRecord]
        );
        assert_eq!(session.state(), CameraState::Recording);

        let actions = control(&mut session, ControlEvent::Release);
        assert_eq!(
            actions,
            vec![
                SessionAction::CancelLongPress,
                SessionAction::StopProgress,
                SessionAction::StopRecord
            ]
        );
        assert_eq!(session.state(), CameraState::RecordProcess);

        capture(&mut session, CaptureEvent::VideoSaved("b.mp4".into()));
        assert_eq!(session.state(), CameraState::RecordTaken);
        assert_eq!(session.output(), Some(Path::new("b.mp4")));
    }

    #[test]
    fn test_recording_disallowed() {
        let mut session = CaptureSession::new(true, false, LensFacing::Back);
        control(&mut session, ControlEvent::Press);
        assert!(control(&mut session, ControlEvent::LongPress(1)).is_empty());
        assert!(control(&mut session, ControlEvent::ProgressStarted(1)).is_empty());
        assert_eq!(session.state(), CameraState::Preview);

        // letting go still takes a picture
        let actions = control(&mut session, ControlEvent::Release);
        assert!(actions.contains(&SessionAction::Capture));
    }

    #[test]
    fn test_long_press_after_release_is_ignored() {
        let mut session = session();
        control(&mut session, ControlEvent::Press);
        control(&mut session, ControlEvent::Release);
        assert!(control(&mut session, ControlEvent::LongPress(1)).is_empty());
        assert!(control(&mut session, ControlEvent::ProgressStarted(1)).is_empty());
        assert_eq!(session.state(), CameraState::Preview);
    }

    #[test]
    fn test_timers_from_earlier_press_are_ignored() {
        let mut session = session();
        control(&mut session, ControlEvent::Press);
        let first = session.press();
        control(&mut session, ControlEvent::Release);
        control(&mut session, ControlEvent::Press);
        let second = session.press();
        assert_ne!(first, second);

        // the first press's timers were already queued when it was released
        assert!(control(&mut session, ControlEvent::LongPress(first)).is_empty());
        assert!(control(&mut session, ControlEvent::ProgressStarted(first)).is_empty());
        assert_eq!(session.state(), CameraState::Preview);

        assert_eq!(
            control(&mut session, ControlEvent::LongPress(second)),
            vec![SessionAction::StartProgress(second)]
        );
        control(&mut session, ControlEvent::ProgressStarted(second));
        assert_eq!(session.state(), CameraState::Recording);

        // a stale max-duration end does not cut the new recording short
        assert!(control(&mut session, ControlEvent::ProgressFinished(first)).is_empty());
        assert_eq!(session.state(), CameraState::Recording);
    }

    #[test]
    fn test_max_duration_stops_recording() {
        let mut session = session();
        record(&mut session);

        let press = session.press();
        let actions = control(&mut session, ControlEvent::ProgressFinished(press));
        assert!(actions.contains(&SessionAction::StopRecord));
        assert_eq!(session.state(), CameraState::RecordProcess);
        assert!(!session.is_pressed());

        // the user lifting their finger afterwards changes nothing
        assert!(control(&mut session, ControlEvent::Release).is_empty());
        assert_eq!(session.state(), CameraState::RecordProcess);
    }

    #[test]
    fn test_progress_finished_outside_recording_is_ignored() {
        let mut session = session();
        assert!(control(&mut session, ControlEvent::ProgressFinished(0)).is_empty());
        assert_eq!(session.state(), CameraState::Preview);
    }

    #[test]
    fn test_cancel_discards_output() {
        let mut session = session();
        control(&mut session, ControlEvent::Press);
        control(&mut session, ControlEvent::Release);
        capture(&mut session, CaptureEvent::PictureSaved("a.jpg".into()));

        assert_eq!(
            control(&mut session, ControlEvent::Cancel),
            vec![SessionAction::Discard("a.jpg".into())]
        );
        assert_eq!(session.state(), CameraState::Preview);
        assert!(session.output().is_none());
    }

    #[test]
    fn test_cancel_while_processing_drops_late_video() {
        let mut session = session();
        record(&mut session);
        control(&mut session, ControlEvent::Release);

        assert!(control(&mut session, ControlEvent::Cancel).is_empty());
        assert_eq!(session.state(), CameraState::Preview);

        assert_eq!(
            capture(&mut session, CaptureEvent::VideoSaved("late.mp4".into())),
            vec![SessionAction::Discard("late.mp4".into())]
        );
        assert_eq!(session.state(), CameraState::Preview);
        assert!(session.output().is_none());
    }

    #[test]
    fn test_late_picture_is_discarded() {
        let mut session = session();
        record(&mut session);

        assert_eq!(
            capture(&mut session, CaptureEvent::PictureSaved("late.jpg".into())),
            vec![SessionAction::Discard("late.jpg".into())]
        );
        assert_eq!(session.state(), CameraState::Recording);
        assert!(session.output().is_none());
    }

    #[test]
    fn test_confirm_delivers() {
        let mut session = session();
        record(&mut session);
        control(&mut session, ControlEvent::Release);

        // video not ready yet
        assert!(control(&mut session, ControlEvent::Confirm).is_empty());

        capture(&mut session, CaptureEvent::VideoSaved("b.mp4".into()));
        assert_eq!(
            control(&mut session, ControlEvent::Confirm),
            vec![SessionAction::Deliver("b.mp4".into())]
        );
    }

    #[test]
    fn test_back_only_in_preview() {
        let mut session = session();
        record(&mut session);
        assert!(control(&mut session, ControlEvent::Back).is_empty());

        let mut session = CaptureSession::new(true, true, LensFacing::Front);
        assert_eq!(
            control(&mut session, ControlEvent::Back),
            vec![SessionAction::Exit]
        );
    }

    #[test]
    fn test_switch_camera_toggles_lens() {
        let mut session = session();
        assert_eq!(
            control(&mut session, ControlEvent::SwitchCamera),
            vec![SessionAction::SwitchCamera(LensFacing::Front)]
        );
        assert_eq!(
            control(&mut session, ControlEvent::SwitchCamera),
            vec![SessionAction::SwitchCamera(LensFacing::Back)]
        );
        assert_eq!(session.lens(), LensFacing::Back);
    }

    #[test]
    fn test_video_failure_returns_to_preview() {
        let mut session = session();
        record(&mut session);

        assert_eq!(
            capture(&mut session, CaptureEvent::VideoFailed("no encoder".into())),
            vec![SessionAction::StopProgress]
        );
        assert_eq!(session.state(), CameraState::Preview);
        assert!(!session.is_pressed());
    }

    #[test]
    fn test_picture_failure_keeps_preview() {
        let mut session = session();
        control(&mut session, ControlEvent::Press);
        control(&mut session, ControlEvent::Release);
        assert!(capture(&mut session, CaptureEvent::PictureFailed("busy".into())).is_empty());
        assert_eq!(session.state(), CameraState::Preview);
    }

    #[test]
    fn test_set_state_and_shutdown() {
        let mut session = session();
        assert_eq!(
            session.handle(SessionEvent::SetState(CameraState::RecordTaken)),
            vec![SessionAction::CancelLongPress, SessionAction::StopProgress]
        );
        assert_eq!(session.state(), CameraState::RecordTaken);
        assert_eq!(session.handle(SessionEvent::Shutdown), vec![SessionAction::Exit]);
    }

    #[test]
    fn test_set_state_releases_shutter() {
        let mut session = session();
        record(&mut session);
        let press = session.press();

        session.handle(SessionEvent::SetState(CameraState::Preview));
        assert!(!session.is_pressed());

        // lifting the finger after the override takes no picture
        assert!(control(&mut session, ControlEvent::Release).is_empty());
        assert!(control(&mut session, ControlEvent::LongPress(press)).is_empty());
        assert!(control(&mut session, ControlEvent::ProgressStarted(press)).is_empty());
        assert_eq!(session.state(), CameraState::Preview);
    }
}
