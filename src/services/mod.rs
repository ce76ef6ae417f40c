pub mod backend;
pub mod capture;

pub use backend::{CaptureBackend, PlaceholderBackend};
pub use capture::{CaptureHandle, CaptureService, MediaSettings};
