use serde::{Deserialize, Serialize};

/// Head rotation about the vertical (yaw) and lateral (pitch) axes, degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseAngles {
    pub yaw: f64,
    pub pitch: f64,
}

impl PoseAngles {
    /// Decompose a 3x3 rotation matrix into physical yaw and pitch.
    ///
    /// `sy = sqrt(r00^2 + r10^2)` detects gimbal lock: below 1e-6 the pitch
    /// falls back to `atan2(-r12, r11)` so nothing divides by a vanishing
    /// cosine. The exact formulas matter less than their continuity, since
    /// the actuator works off frame-to-frame deltas.
    pub fn from_rotation(r: &[[f64; 3]; 3]) -> Self {
        let sy = (r[0][0] * r[0][0] + r[1][0] * r[1][0]).sqrt();
        let yaw = (-r[2][0]).atan2(sy);
        let pitch = if sy >= 1e-6 {
            r[2][1].atan2(r[2][2])
        } else {
            (-r[1][2]).atan2(r[1][1])
        };
        Self {
            yaw: yaw.to_degrees(),
            pitch: pitch.to_degrees(),
        }
    }
}

/// Fold an angle difference into [-180, 180].
///
/// Consecutive-frame deltas straddling the +/-180 boundary would otherwise
/// read as a near-full revolution and fling the pointer.
pub fn wrap_degrees(mut delta: f64) -> f64 {
    while delta > 180.0 {
        delta -= 360.0;
    }
    while delta < -180.0 {
        delta += 360.0;
    }
    delta
}
