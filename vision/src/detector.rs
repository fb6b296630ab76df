use async_trait::async_trait;
use sensor::Frame;
use serde::{Deserialize, Serialize};

use crate::landmarks::{Landmark, LandmarkSet, TransformationMatrix, LEFT_EYE, RIGHT_EYE};

/// What a detector found in one frame. Both fields absent means "no face".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub landmarks: Option<LandmarkSet>,
    pub transform: Option<TransformationMatrix>,
}

impl DetectionResult {
    /// The "no face found" result.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_none() && self.transform.is_none()
    }
}

/// Seam for the face-landmark model.
///
/// Implementations must answer within roughly one frame interval and report
/// internal failures as [`DetectionResult::empty`], never by panicking; a
/// missed frame costs nothing, a dead pipeline costs everything.
#[async_trait]
pub trait Detector: Send {
    async fn detect(&mut self, frame: &Frame) -> DetectionResult;
}

/// Detector that never finds a face. Lets the pipeline run for plumbing work.
#[derive(Default)]
pub struct NullDetector;

#[async_trait]
impl Detector for NullDetector {
    async fn detect(&mut self, _frame: &Frame) -> DetectionResult {
        DetectionResult::empty()
    }
}

/// Synthetic detector for running the full pipeline without a model.
///
/// Sweeps the head slowly left-right and up-down and closes the left eye for
/// a few frames at a fixed cadence, enough to drive pointer motion and the
/// occasional click.
pub struct SimulatedDetector {
    tick: u64,
    mesh_len: usize,
}

impl SimulatedDetector {
    /// Period, in frames, between simulated left winks.
    const WINK_PERIOD: u64 = 90;
    /// How many consecutive frames each simulated wink lasts.
    const WINK_HOLD: u64 = 4;

    pub fn new() -> Self {
        // Full face-mesh size, so eye indices are always in range.
        Self {
            tick: 0,
            mesh_len: 478,
        }
    }

    fn rotation(yaw_deg: f64, pitch_deg: f64) -> TransformationMatrix {
        let (sy, cy) = yaw_deg.to_radians().sin_cos();
        let (sx, cx) = pitch_deg.to_radians().sin_cos();
        // Ry(yaw) * Rx(pitch); decomposes back to the same angles.
        TransformationMatrix([
            [cy, sy * sx, sy * cx, 0.0],
            [0.0, cx, -sx, 0.0],
            [-sy, cy * sx, cy * cx, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    fn eye_landmarks(points: &mut [Landmark], eye: &[usize; 6], cx: f32, closed: bool) {
        let half_open = if closed { 0.002 } else { 0.015 };
        let coords = [
            (cx - 0.05, 0.5),
            (cx - 0.02, 0.5 - half_open),
            (cx + 0.02, 0.5 - half_open),
            (cx + 0.05, 0.5),
            (cx + 0.02, 0.5 + half_open),
            (cx - 0.02, 0.5 + half_open),
        ];
        for (&index, &(x, y)) in eye.iter().zip(coords.iter()) {
            points[index] = Landmark { x, y, z: 0.0 };
        }
    }
}

impl Default for SimulatedDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Detector for SimulatedDetector {
    async fn detect(&mut self, _frame: &Frame) -> DetectionResult {
        self.tick += 1;
        let t = self.tick as f64 * 0.05;
        let yaw = t.cos() * 12.0;
        let pitch = t.sin() * 8.0;

        let left_closed = self.tick % Self::WINK_PERIOD < Self::WINK_HOLD;
        let mut points = vec![
            Landmark {
                x: 0.5,
                y: 0.5,
                z: 0.0
            };
            self.mesh_len
        ];
        Self::eye_landmarks(&mut points, &LEFT_EYE, 0.6, left_closed);
        Self::eye_landmarks(&mut points, &RIGHT_EYE, 0.4, false);

        DetectionResult {
            landmarks: Some(LandmarkSet(points)),
            transform: Some(Self::rotation(yaw, pitch)),
        }
    }
}
