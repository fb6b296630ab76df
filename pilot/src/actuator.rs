use vision::{wrap_degrees, PoseAngles};

use crate::config::Config;

/// Maps head-pose changes onto relative pointer motion.
///
/// Joystick velocity model: the wrapped frame-to-frame angle delta, less the
/// dead zone, is normalized by the max-tilt angle into a speed factor in
/// [-1, 1] and scaled by the per-axis sensitivity. Motion is emitted as an
/// instantaneous relative move, never an animated glide.
#[derive(Debug, Default)]
pub struct Actuator {
    previous: Option<PoseAngles>,
}

impl Actuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan this frame's pointer motion from a freshly resolved pose.
    ///
    /// The first pose after startup only seeds the previous-frame reference.
    /// Returns `None` when both axes land inside the dead zone.
    pub fn plan_motion(&mut self, current: PoseAngles, cfg: &Config) -> Option<(i32, i32)> {
        let Some(previous) = self.previous.replace(current) else {
            return None;
        };

        let delta_yaw = wrap_degrees(current.yaw - previous.yaw);
        let delta_pitch = wrap_degrees(current.pitch - previous.pitch);

        // Camera mirrors the user, so positive yaw maps to negative x.
        let mut dx = -axis_velocity(delta_yaw, cfg, cfg.sensitivity_yaw);
        let mut dy = axis_velocity(delta_pitch, cfg, cfg.sensitivity_pitch);
        if cfg.invert_horizontal {
            dx = -dx;
        }
        if cfg.invert_vertical {
            dy = -dy;
        }

        let dx = dx as i32;
        let dy = dy as i32;
        if dx == 0 && dy == 0 {
            return None;
        }
        Some((dx, dy))
    }
}

/// Dead-zone-reduced, clamped joystick velocity for one axis, in pixels.
fn axis_velocity(delta: f64, cfg: &Config, sensitivity: f64) -> f64 {
    if delta.abs() <= cfg.dead_zone_degrees {
        return 0.0;
    }
    let effective = delta - cfg.dead_zone_degrees * delta.signum();
    let speed = (effective / cfg.max_tilt_degrees).clamp(-1.0, 1.0);
    speed * sensitivity
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(yaw: f64, pitch: f64) -> PoseAngles {
        PoseAngles { yaw, pitch }
    }

    #[test]
    fn first_pose_only_seeds_reference() {
        let mut actuator = Actuator::new();
        assert_eq!(actuator.plan_motion(pose(15.0, -10.0), &Config::default()), None);
    }

    #[test]
    fn dead_zone_suppresses_small_deltas() {
        let cfg = Config::default();
        let mut actuator = Actuator::new();
        actuator.plan_motion(pose(0.0, 0.0), &cfg);
        assert_eq!(actuator.plan_motion(pose(5.0, -5.0), &cfg), None);
    }

    #[test]
    fn above_dead_zone_moves_against_yaw() {
        let cfg = Config::default();
        let mut actuator = Actuator::new();
        actuator.plan_motion(pose(0.0, 0.0), &cfg);
        // Delta 15, dead zone 5 -> effective 10; 10/20 * 45 = 22.5 pixels.
        let (dx, dy) = actuator.plan_motion(pose(15.0, 0.0), &cfg).unwrap();
        assert_eq!(dx, -22);
        assert_eq!(dy, 0);
    }

    #[test]
    fn speed_factor_is_clamped() {
        let cfg = Config::default();
        let mut actuator = Actuator::new();
        actuator.plan_motion(pose(0.0, 0.0), &cfg);
        // A 90 degree jerk saturates the joystick at full sensitivity.
        let (dx, _) = actuator.plan_motion(pose(90.0, 0.0), &cfg).unwrap();
        assert_eq!(dx, -45);
    }

    #[test]
    fn boundary_crossing_wraps() {
        let cfg = Config::default();
        let mut actuator = Actuator::new();
        actuator.plan_motion(pose(179.0, 0.0), &cfg);
        // 179 -> -179 is a 2 degree move, inside the dead zone, not 358.
        assert_eq!(actuator.plan_motion(pose(-179.0, 0.0), &cfg), None);
    }

    #[test]
    fn invert_flags_flip_axes() {
        let cfg = Config {
            invert_horizontal: true,
            invert_vertical: true,
            ..Config::default()
        };
        let mut actuator = Actuator::new();
        actuator.plan_motion(pose(0.0, 0.0), &cfg);
        let (dx, dy) = actuator.plan_motion(pose(15.0, 15.0), &cfg).unwrap();
        assert_eq!(dx, 22);
        assert_eq!(dy, -22);
    }
}
