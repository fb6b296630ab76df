//! Face geometry for the winkpilot pipeline.
//!
//! The landmark model itself is a black box behind the [`Detector`] trait;
//! this crate owns what happens to its output: eye-aspect ratios for wink
//! detection and head-pose angles for pointer control.

pub mod detector;
pub mod ear;
pub mod landmarks;
pub mod pose;

pub use detector::{DetectionResult, Detector, NullDetector, SimulatedDetector};
pub use ear::{eye_aspect_ratio, INVALID_EAR};
pub use landmarks::{Landmark, LandmarkSet, TransformationMatrix, LEFT_EYE, NOSE_TIP, RIGHT_EYE};
pub use pose::{wrap_degrees, PoseAngles};
