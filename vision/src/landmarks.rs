use serde::{Deserialize, Serialize};

/// MediaPipe face-mesh indices for the left eye, ordered
/// [outer corner, upper 1, upper 2, inner corner, lower 1, lower 2].
pub const LEFT_EYE: [usize; 6] = [362, 385, 387, 263, 373, 380];
/// MediaPipe face-mesh indices for the right eye, same ordering.
pub const RIGHT_EYE: [usize; 6] = [33, 160, 158, 133, 153, 144];
/// MediaPipe face-mesh index of the nose tip.
pub const NOSE_TIP: usize = 1;

/// A single detected point in normalized image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Ordered landmark collection following the detector's indexing scheme.
///
/// May be shorter than a full face mesh (or empty) when detection fails;
/// consumers index through [`LandmarkSet::get`] and treat a miss as an
/// invalid measurement, not an error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet(pub Vec<Landmark>);

impl LandmarkSet {
    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 4x4 rigid transform (rotation + translation) of the head relative to the
/// camera, as reported by the detector.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformationMatrix(pub [[f64; 4]; 4]);

impl TransformationMatrix {
    /// The upper-left 3x3 rotation block.
    pub fn rotation(&self) -> [[f64; 3]; 3] {
        let m = &self.0;
        [
            [m[0][0], m[0][1], m[0][2]],
            [m[1][0], m[1][1], m[1][2]],
            [m[2][0], m[2][1], m[2][2]],
        ]
    }
}
