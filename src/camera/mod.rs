//! Camera session: a background worker owns the device and streams preview
//! frames; the UI talks to it through a command channel and a shared slot.
//! All device mutation happens on the worker, which serializes it.

pub mod controller;
mod worker;

pub use controller::CameraController;

use egui::ColorImage;
use futures::channel::oneshot;
use parking_lot::Mutex;
use uuid::Uuid;

/// Lifecycle of one camera session. `NotAuthorized` and
/// `ConfigurationFailed` are terminal; there is no retry path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unconfigured,
    Running {
        width: u32,
        height: u32,
    },
    Stopped,
    NotAuthorized,
    ConfigurationFailed(String),
}

/// Tagged result of one photo-capture request.
#[derive(Debug)]
pub enum CaptureOutcome {
    /// PNG-encoded photo bytes, ready for the editor.
    Success(Vec<u8>),
    Failure(String),
}

/// One in-flight capture request. The id ties the worker's log lines to
/// the request; the reply channel is consumed on delivery, so the outcome
/// arrives at most once.
pub struct CaptureRequest {
    pub id: Uuid,
    pub reply: oneshot::Sender<CaptureOutcome>,
}

pub(crate) enum CameraCommand {
    Capture(CaptureRequest),
    SetTorch(bool),
    StepExposure(i64),
    StepWhiteBalance(i64),
    Stop,
}

/// State the worker publishes for the UI thread. Hand-off is always
/// fire-and-forget; neither side ever blocks on the other.
#[derive(Default)]
pub struct SharedFeed {
    state: Mutex<SessionState>,
    preview: Mutex<Option<ColorImage>>,
}

impl SharedFeed {
    pub fn state(&self) -> SessionState {
        self.state.lock().clone()
    }

    pub(crate) fn set_state(&self, state: SessionState) {
        log::info!("camera session state: {state:?}");
        *self.state.lock() = state;
    }

    /// Takes the most recent preview frame, if a new one arrived.
    pub fn take_preview(&self) -> Option<ColorImage> {
        self.preview.lock().take()
    }

    pub(crate) fn publish_preview(&self, frame: ColorImage) {
        *self.preview.lock() = Some(frame);
    }
}
