use std::time::Duration;

use sensor::synthetic::SyntheticSource;
use sensor::{frame_bus, FrameSource, PixelFormat};

#[tokio::test]
async fn synthetic_frames_have_declared_shape() {
    let mut source = SyntheticSource::new(8, 4, Duration::from_millis(1));
    let first = source.grab().await.unwrap();
    let second = source.grab().await.unwrap();
    assert_eq!(first.seq, 1);
    assert_eq!(second.seq, 2);
    assert_eq!(first.width, 8);
    assert_eq!(first.height, 4);
    assert_eq!(first.format, PixelFormat::Rgb8);
    assert_eq!(first.len(), 8 * 4 * 3);
}

#[tokio::test]
async fn source_feeds_bus_latest_wins() {
    let mut source = SyntheticSource::new(2, 2, Duration::from_millis(1));
    let (publisher, mut tap) = frame_bus();
    for _ in 0..3 {
        publisher.publish(source.grab().await.unwrap());
    }
    let seen = tap.next().await.unwrap();
    assert_eq!(seen.seq, 3);
    publisher.close();
    assert!(tap.next().await.is_none());
}
