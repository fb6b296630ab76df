use std::io;
use std::net::SocketAddr;

use sensor::Frame;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, watch};
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

use crate::wire;

/// Longest a single subscriber write may block the fan-out loop. A peer
/// whose receive buffer stays full this long is dropped like a dead one.
const WRITE_TIMEOUT: Duration = Duration::from_secs(1);

/// One connected frame consumer.
struct Subscriber {
    stream: TcpStream,
    addr: SocketAddr,
}

/// Republishes every captured frame to all connected TCP subscribers.
///
/// The server runs as a single task, so the subscriber set has exactly one
/// writer. Capture never waits on it: frames arrive through a broadcast
/// channel, and if this task falls behind, the lagged frames are simply
/// skipped.
pub struct FrameBroadcastServer {
    listener: TcpListener,
}

impl FrameBroadcastServer {
    /// Bind the listener; subscribers may connect as soon as this returns.
    pub async fn bind(addr: &str) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "frame broadcast server listening");
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until the frame channel closes or shutdown is signalled.
    pub async fn run(self, mut frames: broadcast::Receiver<Frame>, mut shutdown: watch::Receiver<bool>) {
        let mut subscribers: Vec<Subscriber> = Vec::new();
        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        info!(%addr, "subscriber connected");
                        subscribers.push(Subscriber { stream, addr });
                    }
                    // Transient; try again on the next iteration.
                    Err(e) => warn!("accept failed: {e}"),
                },
                received = frames.recv() => match received {
                    Ok(frame) => broadcast_one(&mut subscribers, &frame).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "broadcast task lagged; resuming at newest frame");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                changed = shutdown.changed() => {
                    // A dropped sender counts as shutdown too.
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        for mut sub in subscribers {
            let _ = sub.stream.shutdown().await;
        }
        info!("frame broadcast server stopped");
    }
}

/// Send one frame to every subscriber, dropping any whose socket fails or
/// stays blocked past [`WRITE_TIMEOUT`].
async fn broadcast_one(subscribers: &mut Vec<Subscriber>, frame: &Frame) {
    if subscribers.is_empty() {
        return;
    }
    // Serialize once, fan the same bytes out to everyone.
    let message = match wire::encode_frame(frame) {
        Ok(message) => message,
        Err(e) => {
            warn!(seq = frame.seq, "frame serialization failed, skipping: {e}");
            return;
        }
    };
    let mut alive = Vec::with_capacity(subscribers.len());
    for mut sub in subscribers.drain(..) {
        match timeout(WRITE_TIMEOUT, sub.stream.write_all(&message)).await {
            Ok(Ok(())) => alive.push(sub),
            Ok(Err(e)) => {
                info!(addr = %sub.addr, "subscriber dropped: {e}");
                // Socket closes on drop.
            }
            Err(_) => {
                info!(addr = %sub.addr, "subscriber not draining; dropped");
            }
        }
    }
    *subscribers = alive;
}
