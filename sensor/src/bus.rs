use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{error::Elapsed, timeout};

use crate::Frame;

/// Create a latest-wins hand-off between a capture stage and a consumer.
///
/// The bus holds exactly one slot: publishing while a frame is still unread
/// replaces it, so the consumer always sees the freshest capture and the
/// producer never blocks. Closing the bus (or dropping the publisher) wakes a
/// blocked consumer with `None`.
pub fn frame_bus() -> (FramePublisher, FrameTap) {
    let (tx, rx) = watch::channel(None);
    (FramePublisher { tx }, FrameTap { rx })
}

/// Producer half of the frame bus.
pub struct FramePublisher {
    tx: watch::Sender<Option<Frame>>,
}

impl FramePublisher {
    /// Replace whatever frame is buffered with `frame`. Never blocks.
    pub fn publish(&self, frame: Frame) {
        // Send only fails when every tap is gone; the capture loop notices
        // shutdown through its own signal, so the drop is harmless here.
        let _ = self.tx.send(Some(frame));
    }

    /// Push the end-of-stream sentinel so blocked consumers wake and exit.
    pub fn close(&self) {
        let _ = self.tx.send(None);
    }
}

/// Consumer half of the frame bus.
pub struct FrameTap {
    rx: watch::Receiver<Option<Frame>>,
}

impl FrameTap {
    /// Wait for a frame newer than the last one observed.
    ///
    /// Returns `None` once the bus is closed or the publisher is dropped.
    pub async fn next(&mut self) -> Option<Frame> {
        if self.rx.changed().await.is_err() {
            return None;
        }
        self.rx.borrow_and_update().clone()
    }

    /// Like [`FrameTap::next`] but bounded, so the caller can interleave
    /// shutdown checks instead of parking forever.
    pub async fn next_timeout(&mut self, wait: Duration) -> Result<Option<Frame>, Elapsed> {
        timeout(wait, self.next()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PixelFormat;

    fn frame(seq: u64) -> Frame {
        Frame::new(seq, 2, 1, PixelFormat::Rgb8, vec![0u8; 6]).unwrap()
    }

    #[tokio::test]
    async fn latest_wins() {
        let (publisher, mut tap) = frame_bus();
        publisher.publish(frame(1));
        publisher.publish(frame(2));
        publisher.publish(frame(3));
        let got = tap.next().await.unwrap();
        assert_eq!(got.seq, 3);
    }

    #[tokio::test]
    async fn close_wakes_consumer() {
        let (publisher, mut tap) = frame_bus();
        let waiter = tokio::spawn(async move { tap.next().await });
        tokio::task::yield_now().await;
        publisher.close();
        assert!(waiter.await.unwrap().is_none());
    }

    #[tokio::test]
    async fn dropped_publisher_ends_stream() {
        let (publisher, mut tap) = frame_bus();
        drop(publisher);
        assert!(tap.next().await.is_none());
    }

    #[tokio::test]
    async fn timeout_elapses_without_traffic() {
        let (_publisher, mut tap) = frame_bus();
        let res = tap.next_timeout(Duration::from_millis(10)).await;
        assert!(res.is_err());
    }
}
