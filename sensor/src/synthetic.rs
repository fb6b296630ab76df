use async_trait::async_trait;
use tokio::time::{self, Duration, Interval};

use crate::{Frame, FrameSource, PixelFormat, SensorError};

/// Generates flat gray frames at a fixed interval.
///
/// Exists so the pipeline and the broadcast server can be exercised end to
/// end with no camera and no files on disk.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    seq: u64,
    ticker: Interval,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32, interval: Duration) -> Self {
        Self {
            width,
            height,
            seq: 0,
            ticker: time::interval(interval),
        }
    }
}

#[async_trait]
impl FrameSource for SyntheticSource {
    async fn grab(&mut self) -> Result<Frame, SensorError> {
        self.ticker.tick().await;
        self.seq += 1;
        // Shade tracks the sequence number so consumers can tell frames apart.
        let shade = (self.seq % 256) as u8;
        let data = vec![shade; self.width as usize * self.height as usize * 3];
        Frame::new(self.seq, self.width, self.height, PixelFormat::Rgb8, data)
    }

    fn describe(&self) -> String {
        format!("synthetic {}x{} source", self.width, self.height)
    }
}
