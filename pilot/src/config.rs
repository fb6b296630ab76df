use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunable behavior, hot-reloadable at runtime through the command stream.
///
/// Defaults match the values the tracking was originally tuned with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pixels of pointer travel per frame at full joystick tilt, horizontal.
    pub sensitivity_yaw: f64,
    /// Pixels of pointer travel per frame at full joystick tilt, vertical.
    pub sensitivity_pitch: f64,
    /// Angle deltas at or below this move nothing (jitter suppression).
    pub dead_zone_degrees: f64,
    /// Delta that saturates the joystick speed factor.
    pub max_tilt_degrees: f64,
    pub invert_horizontal: bool,
    pub invert_vertical: bool,
    /// Smoothed EAR below this counts the left eye as closed.
    pub wink_threshold_left: f64,
    /// Smoothed EAR below this counts the right eye as closed.
    pub wink_threshold_right: f64,
    /// How far above its threshold the other eye must be for a wink to count
    /// as one-sided rather than a blink.
    pub wink_margin: f64,
    /// Consecutive qualifying frames required before a wink fires.
    pub required_wink_frames: u32,
    /// Minimum seconds between triggers of the same eye.
    pub wink_cooldown_secs: f64,
    /// EAR smoothing window length in frames.
    pub ear_window: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sensitivity_yaw: 45.0,
            sensitivity_pitch: 45.0,
            dead_zone_degrees: 5.0,
            max_tilt_degrees: 20.0,
            invert_horizontal: false,
            invert_vertical: false,
            wink_threshold_left: 0.23,
            wink_threshold_right: 0.24,
            wink_margin: 0.02,
            required_wink_frames: 2,
            wink_cooldown_secs: 0.5,
            ear_window: 3,
        }
    }
}

impl Config {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs_f64(self.wink_cooldown_secs)
    }
}

struct Versioned {
    config: Config,
    generation: u64,
}

/// Shared handle to the live configuration.
///
/// Writers mutate under the lock; every pipeline loop reads one whole
/// [`Config`] snapshot per iteration, so a reload can never change half the
/// parameters mid-frame.
#[derive(Clone)]
pub struct ConfigHandle {
    inner: Arc<Mutex<Versioned>>,
}

impl ConfigHandle {
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Versioned {
                config,
                generation: 0,
            })),
        }
    }

    /// Atomic copy of the current configuration.
    pub fn snapshot(&self) -> Config {
        self.inner.lock().expect("config lock poisoned").config.clone()
    }

    /// Bumps on every applied update; lets loops notice a reload cheaply.
    pub fn generation(&self) -> u64 {
        self.inner.lock().expect("config lock poisoned").generation
    }

    /// Apply a mutation under the lock.
    pub fn update(&self, apply: impl FnOnce(&mut Config)) {
        let mut guard = self.inner.lock().expect("config lock poisoned");
        apply(&mut guard.config);
        guard.generation += 1;
    }
}

impl Default for ConfigHandle {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
