//! UI-thread handle to the camera session. Spawns the worker, forwards
//! user-triggered commands, and polls the single in-flight capture request.

use std::sync::Arc;
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

use futures::channel::oneshot;
use uuid::Uuid;

use crate::camera::{CameraCommand, CaptureOutcome, CaptureRequest, SessionState, SharedFeed, worker};

pub struct CameraController {
    shared: Arc<SharedFeed>,
    commands: Sender<CameraCommand>,
    worker: Option<JoinHandle<()>>,
    in_flight: Option<InFlight>,
    torch_on: bool,
    preview_texture: Option<egui::TextureHandle>,
}

struct InFlight {
    id: Uuid,
    reply: oneshot::Receiver<CaptureOutcome>,
}

impl CameraController {
    /// Starts a fresh camera session on its own worker thread. The session
    /// configures itself asynchronously; watch `state()` for the result.
    pub fn spawn() -> Self {
        let shared = Arc::new(SharedFeed::default());
        let (commands, receiver) = mpsc::channel();
        let worker_shared = Arc::clone(&shared);
        let worker = std::thread::Builder::new()
            .name("camera-session".into())
            .spawn(move || worker::run(worker_shared, receiver))
            .expect("failed to spawn camera worker thread");
        Self {
            shared,
            commands,
            worker: Some(worker),
            in_flight: None,
            torch_on: false,
            preview_texture: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.shared.state()
    }

    pub fn capture_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Issues one photo-capture request. Ignored while a request is
    /// already in flight; one tap, one request.
    pub fn request_photo(&mut self) {
        if self.in_flight.is_some() {
            return;
        }
        let (reply, receiver) = oneshot::channel();
        let id = Uuid::new_v4();
        if self
            .commands
            .send(CameraCommand::Capture(CaptureRequest { id, reply }))
            .is_ok()
        {
            self.in_flight = Some(InFlight {
                id,
                reply: receiver,
            });
        }
    }

    /// Non-blocking check for the in-flight capture's outcome.
    pub fn poll_capture(&mut self) -> Option<CaptureOutcome> {
        let mut in_flight = self.in_flight.take()?;
        match in_flight.reply.try_recv() {
            Ok(Some(outcome)) => {
                log::info!("capture {} completed", in_flight.id);
                Some(outcome)
            }
            Ok(None) => {
                self.in_flight = Some(in_flight);
                None
            }
            Err(oneshot::Canceled) => {
                Some(CaptureOutcome::Failure("capture request dropped".into()))
            }
        }
    }

    pub fn torch_on(&self) -> bool {
        self.torch_on
    }

    pub fn toggle_torch(&mut self) {
        self.torch_on = !self.torch_on;
        let _ = self.commands.send(CameraCommand::SetTorch(self.torch_on));
    }

    pub fn step_exposure(&mut self, direction: i64) {
        let _ = self.commands.send(CameraCommand::StepExposure(direction));
    }

    pub fn step_white_balance(&mut self, direction: i64) {
        let _ = self.commands.send(CameraCommand::StepWhiteBalance(direction));
    }

    /// Texture of the latest preview frame, re-uploaded only when a new
    /// frame arrived since the previous call.
    pub fn preview_texture(
        &mut self,
        ctx: &egui::Context,
    ) -> Option<(egui::TextureId, egui::Vec2)> {
        if let Some(frame) = self.shared.take_preview() {
            match &mut self.preview_texture {
                Some(handle) => handle.set(frame, egui::TextureOptions::LINEAR),
                None => {
                    self.preview_texture =
                        Some(ctx.load_texture("camera_preview", frame, egui::TextureOptions::LINEAR));
                }
            }
        }
        self.preview_texture
            .as_ref()
            .map(|handle| (handle.id(), handle.size_vec2()))
    }
}

impl Drop for CameraController {
    fn drop(&mut self) {
        let _ = self.commands.send(CameraCommand::Stop);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("camera worker thread panicked");
            }
        }
    }
}
