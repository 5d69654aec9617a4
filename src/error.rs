use std::path::PathBuf;
use thiserror::Error;

/// Failure taxonomy for the capture and editing flows. Nothing here is
/// retried automatically; recovery, where it exists, is the user tapping
/// the button again.
#[derive(Debug, Error)]
pub enum AzulError {
    /// Camera access was denied. Terminal for the capture flow; the user
    /// is pointed at the system settings.
    #[error("camera access is not authorized")]
    NotAuthorized,

    /// No usable camera, or the session could not accept input/output.
    /// Terminal; alert only.
    #[error("camera configuration failed: {0}")]
    ConfigurationFailed(String),

    /// The hardware reported a focus/quality problem. The user may retry
    /// by tapping capture again.
    #[error("capture failed: {0}")]
    CaptureFailed(String),

    /// None of the preferred pixel formats is supported. Fail-fast by
    /// design; not expected in practice.
    #[error("no supported pixel format")]
    UnsupportedPixelFormat,

    /// The pictures library directory cannot be created or written.
    #[error("cannot write to photo library at {path}: {reason}")]
    LibraryDenied { path: PathBuf, reason: String },

    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
