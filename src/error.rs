use thiserror::Error;

/// Raised when a raw value or name does not denote a [`CameraState`](crate::state::CameraState).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidStateError {
    #[error("{0} is not a valid camera state (expected 0..=4)")]
    Value(i32),

    #[error("unknown camera state name: {0:?}")]
    Name(String),
}
