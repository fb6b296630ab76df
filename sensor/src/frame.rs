use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::SensorError;

/// Pixel layout of a [`Frame`] buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8-bit RGB, row-major, no padding.
    Rgb8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
        }
    }
}

/// One captured camera image.
///
/// Immutable after construction; cloning shares the pixel buffer, so fanning
/// a frame out to the network broadcaster and the detector costs nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Capture sequence number, monotonic per source.
    pub seq: u64,
    /// Wall-clock time of capture.
    pub taken_at: DateTime<Utc>,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    data: Arc<Vec<u8>>,
}

impl Frame {
    /// Build a frame, validating that the buffer matches the dimensions.
    pub fn new(
        seq: u64,
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, SensorError> {
        let want = width as usize * height as usize * format.bytes_per_pixel();
        if data.len() != want {
            return Err(SensorError::BadDimensions {
                width,
                height,
                format,
                got: data.len(),
                want,
            });
        }
        Ok(Self {
            seq,
            taken_at: Utc::now(),
            width,
            height,
            format,
            data: Arc::new(data),
        })
    }

    /// Rebuild a frame received off the wire, keeping its original timestamp.
    pub fn from_wire(
        seq: u64,
        taken_at: DateTime<Utc>,
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, SensorError> {
        let mut frame = Self::new(seq, width, height, format, data)?;
        frame.taken_at = taken_at;
        Ok(frame)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
