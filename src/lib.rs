//! Capture-session states and the shutter controller built on them.
//!
//! [`state`] holds the closed [`CameraState`] enumeration and its registry;
//! everything else drives a session through those states.

pub mod app;
pub mod config;
pub mod controls;
pub mod error;
pub mod hooks;
pub mod input;
pub mod media;
pub mod messages;
pub mod services;
pub mod session;
pub mod state;

pub use error::InvalidStateError;
pub use state::{CameraState, CameraStateRegistry};
