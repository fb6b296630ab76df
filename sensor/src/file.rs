use std::path::PathBuf;

use async_trait::async_trait;
use glob::glob;
use tokio::time::{self, Duration, Interval};
use tracing::info;

use crate::{Frame, FrameSource, PixelFormat, SensorError};

/// Replays JPEG files from disk as a simulated webcam.
///
/// Cycles every file matching the glob at a fixed interval. Handy for
/// development machines without a camera and for integration tests.
pub struct FileSource {
    paths: Vec<PathBuf>,
    index: usize,
    seq: u64,
    ticker: Interval,
}

impl FileSource {
    /// Create a source cycling files that match `pattern`.
    pub fn new(pattern: &str, interval: Duration) -> Result<Self, SensorError> {
        let paths: Vec<PathBuf> = glob(pattern)
            .map_err(|e| SensorError::DeviceUnavailable(e.msg.to_string()))?
            .filter_map(Result::ok)
            .collect();
        if paths.is_empty() {
            return Err(SensorError::DeviceUnavailable(format!(
                "no files match {pattern}"
            )));
        }
        info!(files = paths.len(), pattern, "file source ready");
        Ok(Self {
            paths,
            index: 0,
            seq: 0,
            ticker: time::interval(interval),
        })
    }
}

#[async_trait]
impl FrameSource for FileSource {
    async fn grab(&mut self) -> Result<Frame, SensorError> {
        self.ticker.tick().await;
        if self.index >= self.paths.len() {
            self.index = 0;
        }
        let path = self.paths[self.index].clone();
        self.index += 1;
        let bytes = tokio::fs::read(&path).await?;
        let rgb = image::load_from_memory(&bytes)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        self.seq += 1;
        Frame::new(self.seq, width, height, PixelFormat::Rgb8, rgb.into_raw())
    }

    fn describe(&self) -> String {
        format!("file source ({} frames on disk)", self.paths.len())
    }
}
