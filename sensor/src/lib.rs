//! Frame acquisition for the winkpilot pipeline.
//!
//! Sources produce [`Frame`]s and hand them downstream through the
//! latest-wins [`bus::FrameBus`] so a slow consumer never builds a backlog
//! of stale imagery.

pub mod bus;
#[cfg(feature = "camera")]
pub mod camera;
pub mod file;
pub mod frame;
pub mod source;
pub mod synthetic;

pub use bus::{frame_bus, FramePublisher, FrameTap};
pub use frame::{Frame, PixelFormat};
pub use source::FrameSource;

/// Errors raised while acquiring frames.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    /// Pixel buffer length disagrees with the declared dimensions.
    #[error("frame data is {got} bytes but {width}x{height} {format:?} needs {want}")]
    BadDimensions {
        width: u32,
        height: u32,
        format: PixelFormat,
        got: usize,
        want: usize,
    },
    /// The device produced no frame this cycle; safe to retry.
    #[error("capture miss: {0}")]
    CaptureMiss(String),
    /// The device could not be opened at all.
    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
}
