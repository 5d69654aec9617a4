//! The camera worker thread. Owns the `nokhwa::Camera` exclusively; every
//! device mutation (capture, torch, exposure, white balance) runs here, in
//! command order.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

use egui::ColorImage;
use nokhwa::{
    Camera, NokhwaError,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, ControlValueDescription, ControlValueSetter, FrameFormat,
        KnownCameraControl, RequestedFormat, RequestedFormatType, Resolution,
    },
};

use crate::camera::{CameraCommand, CaptureOutcome, CaptureRequest, SessionState, SharedFeed};
use crate::error::AzulError;

/// Ordered pixel-format preference for photo capture; first supported wins.
const PREFERRED_FORMATS: [FrameFormat; 3] =
    [FrameFormat::YUYV, FrameFormat::NV12, FrameFormat::MJPEG];

pub(crate) fn run(shared: Arc<SharedFeed>, commands: Receiver<CameraCommand>) {
    let camera = match open_camera() {
        Ok(camera) => camera,
        Err(e) => {
            shared.set_state(terminal_state(e));
            return;
        }
    };

    let resolution = camera.resolution();
    shared.set_state(SessionState::Running {
        width: resolution.width(),
        height: resolution.height(),
    });

    let mut worker = CameraWorker { camera, shared };

    loop {
        loop {
            match commands.try_recv() {
                Ok(CameraCommand::Stop) | Err(TryRecvError::Disconnected) => {
                    worker.shutdown();
                    return;
                }
                Ok(CameraCommand::Capture(request)) => worker.capture(request),
                Ok(CameraCommand::SetTorch(on)) => worker.set_torch(on),
                Ok(CameraCommand::StepExposure(direction)) => {
                    worker.step_control(KnownCameraControl::Exposure, direction);
                }
                Ok(CameraCommand::StepWhiteBalance(direction)) => {
                    worker.step_control(KnownCameraControl::WhiteBalance, direction);
                }
                Err(TryRecvError::Empty) => break,
            }
        }
        if !matches!(worker.shared.state(), SessionState::Running { .. }) {
            // A fatal capture error moved the session to a terminal state.
            return;
        }
        worker.publish_preview();
    }
}

struct CameraWorker {
    camera: Camera,
    shared: Arc<SharedFeed>,
}

impl CameraWorker {
    fn shutdown(&mut self) {
        if let Err(e) = self.camera.stop_stream() {
            log::warn!("stopping camera stream: {e}");
        }
        self.shared.set_state(SessionState::Stopped);
    }

    fn publish_preview(&mut self) {
        match self
            .camera
            .frame()
            .and_then(|frame| frame.decode_image::<RgbFormat>())
        {
            Ok(rgb) => {
                let size = [rgb.width() as usize, rgb.height() as usize];
                self.shared
                    .publish_preview(ColorImage::from_rgb(size, rgb.as_raw()));
            }
            Err(e) => {
                log::warn!("preview frame dropped: {e}");
                std::thread::sleep(Duration::from_millis(30));
            }
        }
    }

    /// Runs one photo-capture request to completion and delivers its tagged
    /// outcome. Sending consumes the reply channel, so the outcome is
    /// delivered at most once, success or not.
    fn capture(&mut self, request: CaptureRequest) {
        let CaptureRequest { id, reply } = request;

        // Snapshot the preview geometry before touching the device.
        let resolution = self.camera.resolution();
        log::info!(
            "capture {id}: preview {}x{}",
            resolution.width(),
            resolution.height()
        );

        let outcome = match self.take_photo() {
            Ok(bytes) => CaptureOutcome::Success(bytes),
            Err(AzulError::UnsupportedPixelFormat) => {
                // Fail-fast: no preferred format is supported, the session
                // is over.
                self.shared.set_state(SessionState::ConfigurationFailed(
                    AzulError::UnsupportedPixelFormat.to_string(),
                ));
                CaptureOutcome::Failure(AzulError::UnsupportedPixelFormat.to_string())
            }
            Err(e) => CaptureOutcome::Failure(e.to_string()),
        };

        if reply.send(outcome).is_err() {
            log::warn!("capture {id} completed after the requester left");
        }
    }

    /// Takes the still at the device's highest compatible resolution, then
    /// returns the stream to the preview geometry on every exit path.
    fn take_photo(&mut self) -> Result<Vec<u8>, AzulError> {
        let format = self.select_frame_format()?;
        let resolution = self.capture_resolution(format)?;
        let preview = self.camera.camera_format();

        if format != preview.format() || resolution != preview.resolution() {
            self.with_device_configuration(|camera| {
                camera.set_frame_format(format)?;
                camera.set_resolution(resolution)
            })
            .map_err(|e| AzulError::CaptureFailed(e.to_string()))?;
        }

        let shot = self
            .camera
            .frame()
            .and_then(|frame| frame.decode_image::<RgbFormat>());

        if self.camera.camera_format() != preview {
            if let Err(e) = self.with_device_configuration(|camera| {
                camera.set_frame_format(preview.format())?;
                camera.set_resolution(preview.resolution())
            }) {
                log::warn!("restoring preview format: {e}");
            }
        }

        let rgb = shot.map_err(|e| AzulError::CaptureFailed(e.to_string()))?;
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(rgb)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }

    /// The largest resolution the device advertises for `format`. Stills
    /// use the full sensor size; only the preview runs at the smaller
    /// streaming size.
    fn capture_resolution(&mut self, format: FrameFormat) -> Result<Resolution, AzulError> {
        let by_resolution = self
            .camera
            .compatible_list_by_resolution(format)
            .map_err(|e| AzulError::CaptureFailed(e.to_string()))?;
        Ok(highest_resolution(by_resolution.keys().copied())
            .unwrap_or_else(|| self.camera.resolution()))
    }

    fn select_frame_format(&mut self) -> Result<FrameFormat, AzulError> {
        let supported = self
            .camera
            .compatible_fourcc()
            .map_err(|e| AzulError::CaptureFailed(e.to_string()))?;
        PREFERRED_FORMATS
            .iter()
            .copied()
            .find(|format| supported.contains(format))
            .ok_or(AzulError::UnsupportedPixelFormat)
    }

    /// Torch stand-in: webcams have no lamp, so "torch" drives the
    /// brightness control to its maximum and back to its default.
    fn set_torch(&mut self, on: bool) {
        let Some(range) = self.integer_range(KnownCameraControl::Brightness) else {
            log::warn!("no brightness control; torch unavailable");
            return;
        };
        let target = if on { range.max } else { range.default };
        if let Err(e) = self.with_device_configuration(|camera| {
            camera.set_camera_control(
                KnownCameraControl::Brightness,
                ControlValueSetter::Integer(target),
            )
        }) {
            log::warn!("torch toggle failed: {e}");
        }
    }

    /// Steps an integer device control by one unit in `direction`, only
    /// when the result stays inside the device's advertised range.
    fn step_control(&mut self, control: KnownCameraControl, direction: i64) {
        let Some(range) = self.integer_range(control) else {
            log::warn!("{control:?} control unavailable");
            return;
        };
        let target = range.value + range.step.max(1) * direction;
        if target < range.min || target > range.max {
            log::info!("{control:?} already at its limit");
            return;
        }
        if let Err(e) = self.with_device_configuration(|camera| {
            camera.set_camera_control(control, ControlValueSetter::Integer(target))
        }) {
            log::warn!("{control:?} adjustment failed: {e}");
        }
    }

    fn integer_range(&mut self, control: KnownCameraControl) -> Option<IntegerRange> {
        let ctrl = self.camera.camera_control(control).ok()?;
        match ctrl.description().clone() {
            ControlValueDescription::IntegerRange {
                min,
                max,
                value,
                step,
                default,
            } => Some(IntegerRange {
                min,
                max,
                value,
                step,
                default,
            }),
            ControlValueDescription::Integer {
                value,
                default,
                step,
            } => Some(IntegerRange {
                min: i64::MIN,
                max: i64::MAX,
                value,
                step,
                default,
            }),
            _ => None,
        }
    }

    /// Acquire/release bracket for device configuration: the stream is
    /// paused for the change and restarted on every exit path.
    fn with_device_configuration(
        &mut self,
        change: impl FnOnce(&mut Camera) -> Result<(), NokhwaError>,
    ) -> Result<(), NokhwaError> {
        self.camera.stop_stream()?;
        let result = change(&mut self.camera);
        let restarted = self.camera.open_stream();
        result.and(restarted)
    }
}

struct IntegerRange {
    min: i64,
    max: i64,
    value: i64,
    step: i64,
    default: i64,
}

/// Largest advertised resolution by pixel count.
fn highest_resolution(resolutions: impl Iterator<Item = Resolution>) -> Option<Resolution> {
    resolutions.max_by_key(|r| u64::from(r.width()) * u64::from(r.height()))
}

/// Maps a session-opening failure to its terminal state. Denied access is
/// its own state; everything else is a configuration failure.
fn terminal_state(err: AzulError) -> SessionState {
    match err {
        AzulError::NotAuthorized => SessionState::NotAuthorized,
        other => SessionState::ConfigurationFailed(other.to_string()),
    }
}

fn open_camera() -> Result<Camera, AzulError> {
    if !platform_authorized() {
        return Err(AzulError::NotAuthorized);
    }
    let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
        CameraFormat::new(Resolution::new(1280, 720), FrameFormat::YUYV, 30),
    ));
    let mut camera = Camera::new(CameraIndex::Index(0), requested)
        .map_err(|e| AzulError::ConfigurationFailed(format!("open device: {e}")))?;
    camera
        .open_stream()
        .map_err(|e| AzulError::ConfigurationFailed(format!("start stream: {e}")))?;
    Ok(camera)
}

#[cfg(target_os = "macos")]
fn platform_authorized() -> bool {
    nokhwa::nokhwa_initialize(|granted| {
        log::info!("camera permission callback: granted={granted}");
    });
    nokhwa::nokhwa_check()
}

#[cfg(not(target_os = "macos"))]
fn platform_authorized() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stills_use_the_largest_advertised_resolution() {
        let advertised = [
            Resolution::new(1280, 720),
            Resolution::new(1920, 1080),
            Resolution::new(640, 480),
        ];
        assert_eq!(
            highest_resolution(advertised.into_iter()),
            Some(Resolution::new(1920, 1080))
        );
        assert_eq!(highest_resolution(std::iter::empty()), None);
    }

    #[test]
    fn opening_failures_map_to_terminal_states() {
        assert_eq!(
            terminal_state(AzulError::NotAuthorized),
            SessionState::NotAuthorized
        );
        assert!(matches!(
            terminal_state(AzulError::ConfigurationFailed("no device".into())),
            SessionState::ConfigurationFailed(_)
        ));
    }
}
