use crate::error::InvalidStateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle stage of a capture session.
///
/// The discriminants are part of the contract: external collaborators exchange
/// states as plain integers, and only `0..=4` are legal.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum CameraState {
    /// Live preview, nothing being captured
    #[default]
    Preview = 0,
    /// A still image has been captured
    PictureTaken = 1,
    /// Video capture in progress
    Recording = 2,
    /// Captured video is being finalized
    RecordProcess = 3,
    /// Finalized video is ready
    RecordTaken = 4,
}

impl CameraState {
    /// Every state, in ascending numeric order
    pub const ALL: [CameraState; 5] = [
        CameraState::Preview,
        CameraState::PictureTaken,
        CameraState::Recording,
        CameraState::RecordProcess,
        CameraState::RecordTaken,
    ];

    pub const fn value(self) -> i32 {
        self as i32
    }

    /// Canonical name, e.g. `"RECORD_TAKEN"`
    pub const fn name(self) -> &'static str {
        match self {
            CameraState::Preview => "PREVIEW",
            CameraState::PictureTaken => "PICTURE_TAKEN",
            CameraState::Recording => "RECORDING",
            CameraState::RecordProcess => "RECORD_PROCESS",
            CameraState::RecordTaken => "RECORD_TAKEN",
        }
    }

    pub fn from_value(value: i32) -> Result<Self, InvalidStateError> {
        match value {
            0 => Ok(CameraState::Preview),
            1 => Ok(CameraState::PictureTaken),
            2 => Ok(CameraState::Recording),
            3 => Ok(CameraState::RecordProcess),
            4 => Ok(CameraState::RecordTaken),
            other => Err(InvalidStateError::Value(other)),
        }
    }

    /// Reverse lookup by canonical name (exact match)
    pub fn from_name(name: &str) -> Result<Self, InvalidStateError> {
        Self::ALL
            .into_iter()
            .find(|state| state.name() == name)
            .ok_or_else(|| InvalidStateError::Name(name.to_string()))
    }
}

impl TryFrom<i32> for CameraState {
    type Error = InvalidStateError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<CameraState> for i32 {
    fn from(state: CameraState) -> Self {
        state.value()
    }
}

impl fmt::Display for CameraState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CameraState {
    type Err = InvalidStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Validation and labeling for integers that claim to be a [`CameraState`].
///
/// Holds no data; the legal domain is the enum itself.
pub struct CameraStateRegistry;

impl CameraStateRegistry {
    pub fn is_valid(value: i32) -> bool {
        CameraState::from_value(value).is_ok()
    }

    pub fn name(value: i32) -> Result<&'static str, InvalidStateError> {
        CameraState::from_value(value).map(CameraState::name)
    }

    pub fn values() -> impl ExactSizeIterator<Item = CameraState> + DoubleEndedIterator + Clone {
        CameraState::ALL.into_iter()
    }

    pub fn lookup(name: &str) -> Result<CameraState, InvalidStateError> {
        CameraState::from_name(name)
    }
}
