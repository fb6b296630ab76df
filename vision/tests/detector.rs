use sensor::{Frame, PixelFormat};
use vision::{
    eye_aspect_ratio, Detector, NullDetector, PoseAngles, SimulatedDetector, INVALID_EAR,
    LEFT_EYE, RIGHT_EYE,
};

fn frame() -> Frame {
    Frame::new(1, 2, 2, PixelFormat::Rgb8, vec![0u8; 12]).unwrap()
}

#[tokio::test]
async fn null_detector_reports_no_face() {
    let mut detector = NullDetector;
    let result = detector.detect(&frame()).await;
    assert!(result.is_empty());
}

#[tokio::test]
async fn simulated_detector_angles_roundtrip() {
    let mut detector = SimulatedDetector::new();
    let result = detector.detect(&frame()).await;
    let transform = result.transform.expect("simulated face always present");
    let angles = PoseAngles::from_rotation(&transform.rotation());
    assert!(angles.yaw.abs() <= 12.5);
    assert!(angles.pitch.abs() <= 8.5);
}

#[tokio::test]
async fn simulated_eyes_are_measurable() {
    let mut detector = SimulatedDetector::new();
    let result = detector.detect(&frame()).await;
    let landmarks = result.landmarks.unwrap();
    let left = eye_aspect_ratio(&landmarks, &LEFT_EYE);
    let right = eye_aspect_ratio(&landmarks, &RIGHT_EYE);
    assert_ne!(left, INVALID_EAR);
    assert_ne!(right, INVALID_EAR);
    // The first simulated frames hold a left wink.
    assert!(left < right);
}
