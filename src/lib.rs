#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod camera;
pub mod editor;
pub mod error;
pub mod gesture;
pub mod library;
pub mod overlay;
pub mod panels;

pub use app::AzulApp;
pub use camera::{CameraController, CaptureOutcome, SessionState};
pub use editor::EditorScreen;
pub use error::AzulError;
pub use gesture::{GestureOutcome, GestureRecorder, Mode, Segment, StrokeStyle};
pub use overlay::Overlay;
