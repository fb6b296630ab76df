use std::io;

use sensor::Frame;
use tokio::net::TcpStream;

use crate::wire::{self, WireError};

/// Consuming end of the frame broadcast protocol.
///
/// Used by remote viewers and by the integration tests; the codec is shared
/// with the server, so the two halves cannot drift apart.
pub struct FrameSubscriber {
    stream: TcpStream,
}

impl FrameSubscriber {
    pub async fn connect(addr: &str) -> io::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self { stream })
    }

    /// Read the next frame. Any error means the stream is unusable and the
    /// subscriber should reconnect from scratch.
    pub async fn next(&mut self) -> Result<Frame, WireError> {
        wire::read_frame(&mut self.stream).await
    }
}
