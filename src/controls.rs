use crate::state::CameraState;
use serde::Serialize;

/// Visibility of the capture controls for a given state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControlLayout {
    /// "Hold to record" hint under the shutter
    pub record_tip: bool,
    pub record_button: bool,
    pub back_button: bool,
    /// Cancel / OK pair shown once something was captured
    pub confirm_bar: bool,
    /// Cancel / OK slide in when this state is entered
    pub animate_confirm: bool,
}

impl ControlLayout {
    pub fn for_state(state: CameraState) -> Self {
        use CameraState::*;

        Self {
            record_tip: state == Preview,
            record_button: matches!(state, Preview | Recording),
            back_button: state == Preview,
            confirm_bar: matches!(state, PictureTaken | RecordProcess | RecordTaken),
            animate_confirm: matches!(state, PictureTaken | RecordProcess),
        }
    }
}
