use async_trait::async_trait;
use nokhwa::{
    pixel_format::RgbFormat,
    utils::{CameraIndex, RequestedFormat, RequestedFormatType},
    Camera,
};
use tracing::info;

use crate::{Frame, FrameSource, PixelFormat, SensorError};

/// Webcam source backed by nokhwa.
///
/// Owns the device exclusively. `grab` blocks on the driver for one frame;
/// the capture stage runs it on its own task, so nothing else waits on the
/// hardware.
pub struct CameraSource {
    camera: Camera,
    seq: u64,
}

impl CameraSource {
    /// Open camera `index` at its highest native frame rate.
    pub fn new(index: u32) -> Result<Self, SensorError> {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera = Camera::new(CameraIndex::Index(index), requested)
            .map_err(|e| SensorError::DeviceUnavailable(e.to_string()))?;
        camera
            .open_stream()
            .map_err(|e| SensorError::DeviceUnavailable(e.to_string()))?;
        info!(
            name = %camera.info().human_name(),
            format = %camera.camera_format(),
            "opened camera"
        );
        Ok(Self { camera, seq: 0 })
    }
}

#[async_trait]
impl FrameSource for CameraSource {
    async fn grab(&mut self) -> Result<Frame, SensorError> {
        let raw = self
            .camera
            .frame()
            .map_err(|e| SensorError::CaptureMiss(e.to_string()))?;
        let rgb = raw
            .decode_image::<RgbFormat>()
            .map_err(|e| SensorError::CaptureMiss(e.to_string()))?;
        let (width, height) = rgb.dimensions();
        self.seq += 1;
        Frame::new(self.seq, width, height, PixelFormat::Rgb8, rgb.into_raw())
    }

    fn describe(&self) -> String {
        format!("camera {}", self.camera.info().human_name())
    }
}
