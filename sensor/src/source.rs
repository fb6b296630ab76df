use async_trait::async_trait;

use crate::{Frame, SensorError};

/// Trait implemented by everything that can produce [`Frame`]s.
///
/// A source owns its device exclusively; the capture stage is the only
/// caller. A [`SensorError::CaptureMiss`] is transient and the caller should
/// retry; [`SensorError::DeviceUnavailable`] means the source is done for.
#[async_trait]
pub trait FrameSource: Send {
    /// Acquire the next frame, waiting for the device if necessary.
    async fn grab(&mut self) -> Result<Frame, SensorError>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}
