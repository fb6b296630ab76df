use std::collections::VecDeque;
use std::time::Instant;

use crate::config::Config;

/// Fixed-length FIFO whose value is the mean of its contents.
///
/// Raw per-frame EAR measurements are noisy; averaging a few frames keeps a
/// single flickery reading from starting or breaking a wink.
#[derive(Debug)]
pub struct SmoothedSignal {
    window: VecDeque<f64>,
    capacity: usize,
}

impl SmoothedSignal {
    /// The window holds at least one sample; a capacity of zero means no
    /// smoothing and is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest once full.
    pub fn push(&mut self, value: f64) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(value);
    }

    pub fn is_full(&self) -> bool {
        self.window.len() == self.capacity
    }

    /// Mean of the window, or `None` until it has filled once.
    pub fn mean(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        Some(self.window.iter().sum::<f64>() / self.window.len() as f64)
    }
}

/// Which eye produced a gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eye {
    Left,
    Right,
}

/// A debounced, cooldown-gated wink.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WinkEvent {
    pub eye: Eye,
    pub at: Instant,
}

#[derive(Debug, Default)]
struct EyeState {
    consecutive: u32,
    in_progress: bool,
    last_trigger: Option<Instant>,
}

impl EyeState {
    fn observe(&mut self, candidate: bool, now: Instant, cfg: &Config) -> bool {
        if !candidate {
            self.consecutive = 0;
            self.in_progress = false;
            return false;
        }
        self.consecutive += 1;
        let cooled = self
            .last_trigger
            .map_or(true, |t| now.duration_since(t) > cfg.cooldown());
        if self.consecutive >= cfg.required_wink_frames && !self.in_progress && cooled {
            self.in_progress = true;
            self.last_trigger = Some(now);
            return true;
        }
        false
    }
}

/// Turns per-frame eye-aspect ratios into discrete wink events.
///
/// A wink on one eye only qualifies while the other eye is clearly open
/// (above its threshold plus a margin); a both-eyes blink therefore
/// satisfies neither candidate, resets both counters, and can never click.
/// Frames must arrive in capture order, since the debounce counts
/// temporally contiguous qualifying frames.
pub struct GestureEngine {
    left_ear: SmoothedSignal,
    right_ear: SmoothedSignal,
    left: EyeState,
    right: EyeState,
}

impl GestureEngine {
    pub fn new(ear_window: usize) -> Self {
        Self {
            left_ear: SmoothedSignal::new(ear_window),
            right_ear: SmoothedSignal::new(ear_window),
            left: EyeState::default(),
            right: EyeState::default(),
        }
    }

    /// Feed one frame's raw EAR pair. Returns at most one event; the margin
    /// guard makes the left and right candidate conditions mutually
    /// exclusive within a frame.
    pub fn update(
        &mut self,
        left_raw: f64,
        right_raw: f64,
        now: Instant,
        cfg: &Config,
    ) -> Option<WinkEvent> {
        self.left_ear.push(left_raw);
        self.right_ear.push(right_raw);
        // No decisions until both windows have filled once.
        let (Some(left), Some(right)) = (self.left_ear.mean(), self.right_ear.mean()) else {
            return None;
        };

        // The invalid-EAR sentinel (999.0) sits far above every threshold,
        // so an unmeasurable eye can never look closed here.
        let left_candidate = left < cfg.wink_threshold_left
            && right > cfg.wink_threshold_right + cfg.wink_margin;
        let right_candidate = right < cfg.wink_threshold_right
            && left > cfg.wink_threshold_left + cfg.wink_margin;

        let left_fired = self.left.observe(left_candidate, now, cfg);
        let right_fired = self.right.observe(right_candidate, now, cfg);

        if left_fired {
            Some(WinkEvent {
                eye: Eye::Left,
                at: now,
            })
        } else if right_fired {
            Some(WinkEvent {
                eye: Eye::Right,
                at: now,
            })
        } else {
            None
        }
    }
}
