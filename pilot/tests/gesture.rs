use std::time::{Duration, Instant};

use pilot::{Config, Eye, GestureEngine};
use vision::INVALID_EAR;

const OPEN: f64 = 0.40;
const CLOSED_LEFT: f64 = 0.15;

fn test_config(ear_window: usize) -> Config {
    Config {
        wink_threshold_left: 0.23,
        wink_threshold_right: 0.24,
        required_wink_frames: 2,
        ear_window,
        ..Config::default()
    }
}

#[test]
fn exactly_one_left_click_on_second_qualifying_frame() {
    let cfg = test_config(1);
    let mut engine = GestureEngine::new(cfg.ear_window);
    let now = Instant::now();

    let mut events = Vec::new();
    for (i, (left, right)) in [
        (CLOSED_LEFT, OPEN),
        (CLOSED_LEFT, OPEN),
        (CLOSED_LEFT, OPEN),
    ]
    .into_iter()
    .enumerate()
    {
        if let Some(event) = engine.update(left, right, now + Duration::from_millis(i as u64 * 33), &cfg) {
            events.push((i, event));
        }
    }

    assert_eq!(events.len(), 1);
    let (frame_index, event) = events[0];
    assert_eq!(frame_index, 1, "fires on the 2nd frame");
    assert_eq!(event.eye, Eye::Left);
}

#[test]
fn one_frame_short_does_not_fire() {
    let cfg = test_config(1);
    let mut engine = GestureEngine::new(cfg.ear_window);
    let now = Instant::now();

    // required_wink_frames - 1 qualifying frames, then the eye reopens.
    assert!(engine.update(CLOSED_LEFT, OPEN, now, &cfg).is_none());
    assert!(engine
        .update(OPEN, OPEN, now + Duration::from_millis(33), &cfg)
        .is_none());
    // A later single qualifying frame starts over from zero.
    assert!(engine
        .update(CLOSED_LEFT, OPEN, now + Duration::from_millis(66), &cfg)
        .is_none());
}

#[test]
fn cooldown_suppresses_rapid_retrigger() {
    let cfg = test_config(1);
    let mut engine = GestureEngine::new(cfg.ear_window);
    let t0 = Instant::now();

    engine.update(CLOSED_LEFT, OPEN, t0, &cfg);
    assert!(engine
        .update(CLOSED_LEFT, OPEN, t0 + Duration::from_millis(33), &cfg)
        .is_some());

    // Reopen, then close again well inside the 0.5s cooldown.
    engine.update(OPEN, OPEN, t0 + Duration::from_millis(66), &cfg);
    let t1 = t0 + Duration::from_millis(100);
    assert!(engine.update(CLOSED_LEFT, OPEN, t1, &cfg).is_none());
    assert!(engine
        .update(CLOSED_LEFT, OPEN, t1 + Duration::from_millis(33), &cfg)
        .is_none());

    // Past the cooldown the held wink finally fires again.
    let t2 = t0 + Duration::from_millis(700);
    assert!(engine.update(CLOSED_LEFT, OPEN, t2, &cfg).is_some());
}

#[test]
fn blink_never_reads_as_wink() {
    let cfg = test_config(1);
    let mut engine = GestureEngine::new(cfg.ear_window);
    let now = Instant::now();

    // Both eyes closed for far longer than the debounce requires.
    for i in 0..20u64 {
        let at = now + Duration::from_millis(i * 33);
        assert!(engine.update(0.10, 0.10, at, &cfg).is_none());
    }
}

#[test]
fn barely_open_other_eye_fails_the_margin_guard() {
    let cfg = test_config(1);
    let mut engine = GestureEngine::new(cfg.ear_window);
    let now = Instant::now();

    // Right eye above its threshold but inside the margin: ambiguous, so no
    // left wink may fire.
    for i in 0..5u64 {
        let at = now + Duration::from_millis(i * 33);
        assert!(engine.update(CLOSED_LEFT, 0.25, at, &cfg).is_none());
    }
}

#[test]
fn invalid_ear_sentinel_never_counts_as_closed() {
    let cfg = test_config(1);
    let mut engine = GestureEngine::new(cfg.ear_window);
    let now = Instant::now();

    for i in 0..5u64 {
        let at = now + Duration::from_millis(i * 33);
        assert!(engine.update(INVALID_EAR, INVALID_EAR, at, &cfg).is_none());
    }
}

#[test]
fn no_decisions_until_windows_fill() {
    let cfg = test_config(3);
    let mut engine = GestureEngine::new(cfg.ear_window);
    let now = Instant::now();

    // Window of 3: frames 1-2 are warm-up, frame 3 is the first evaluated
    // frame (counter 1), frame 4 reaches the required 2 and fires.
    let mut fired_at = None;
    for i in 0..6u64 {
        let at = now + Duration::from_millis(i * 33);
        if engine.update(CLOSED_LEFT, OPEN, at, &cfg).is_some() {
            fired_at = Some(i);
            break;
        }
    }
    assert_eq!(fired_at, Some(3));
}

#[test]
fn right_wink_maps_to_right_eye() {
    let cfg = test_config(1);
    let mut engine = GestureEngine::new(cfg.ear_window);
    let now = Instant::now();

    engine.update(OPEN, 0.12, now, &cfg);
    let event = engine
        .update(OPEN, 0.12, now + Duration::from_millis(33), &cfg)
        .expect("second qualifying frame fires");
    assert_eq!(event.eye, Eye::Right);
}
