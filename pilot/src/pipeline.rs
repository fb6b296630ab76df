use std::sync::Arc;
use std::time::{Duration, Instant};

use sensor::{frame_bus, Frame, FramePublisher, FrameSource, FrameTap, SensorError};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};
use vision::{eye_aspect_ratio, DetectionResult, Detector, PoseAngles, LEFT_EYE, RIGHT_EYE};

use crate::actuator::Actuator;
use crate::config::ConfigHandle;
use crate::gesture::{Eye, GestureEngine, WinkEvent};
use crate::pointer::{Button, Pointer, PointerAction};

/// Consecutive capture misses tolerated before the pipeline gives up on the
/// device and shuts everything down.
const MAX_GRAB_FAILURES: u32 = 8;

/// Bounded queue between the decision stage and the pointer task.
const POINTER_QUEUE: usize = 32;

/// Cooperative stop signal shared by every stage.
#[derive(Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown has been triggered.
    pub async fn triggered(&self) {
        let mut rx = self.rx.clone();
        let _ = rx.wait_for(|stopped| *stopped).await;
    }

    /// Receiver for stages that integrate the signal into their own select.
    pub fn watch(&self) -> watch::Receiver<bool> {
        self.rx.clone()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a display bridge needs to render one processed frame.
/// Purely consumptive; a lagging or absent subscriber costs the pipeline
/// nothing.
#[derive(Clone, Debug)]
pub struct DisplayPacket {
    pub frame: Frame,
    pub result: DetectionResult,
    pub angles: Option<PoseAngles>,
    pub gesture: Option<WinkEvent>,
}

/// Knobs for [`Pipeline::start`].
#[derive(Clone, Debug)]
pub struct PipelineOptions {
    /// Address for the frame broadcast server; `None` disables the network
    /// hop entirely.
    pub bind: Option<String>,
    /// Pause after a transient capture miss before retrying.
    pub grab_retry: Duration,
    /// Bound on each decision-stage wait, so it can observe shutdown.
    pub tap_timeout: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            bind: None,
            grab_retry: Duration::from_millis(50),
            tap_timeout: Duration::from_millis(250),
        }
    }
}

/// The running stage tasks plus their shared channels.
pub struct Pipeline {
    shutdown: Shutdown,
    handles: Vec<(&'static str, JoinHandle<()>)>,
    display: broadcast::Sender<DisplayPacket>,
    broadcast_addr: Option<std::net::SocketAddr>,
}

impl Pipeline {
    /// Wire the stages together and start them.
    pub async fn start(
        source: Box<dyn FrameSource>,
        detector: Box<dyn Detector>,
        pointer: Box<dyn Pointer>,
        config: ConfigHandle,
        opts: PipelineOptions,
    ) -> anyhow::Result<Self> {
        let shutdown = Shutdown::new();
        let (publisher, tap) = frame_bus();
        let (frames_tx, _) = broadcast::channel::<Frame>(8);
        let (display_tx, _) = broadcast::channel::<DisplayPacket>(8);
        let (actions_tx, actions_rx) = mpsc::channel::<PointerAction>(POINTER_QUEUE);

        let mut handles = Vec::new();

        let mut broadcast_addr = None;
        if let Some(addr) = &opts.bind {
            let server = net::FrameBroadcastServer::bind(addr).await?;
            broadcast_addr = Some(server.local_addr()?);
            let rx = frames_tx.subscribe();
            let stop = shutdown.watch();
            handles.push((
                "broadcast",
                tokio::spawn(async move { server.run(rx, stop).await }),
            ));
        }

        handles.push((
            "capture",
            tokio::spawn(capture_stage(
                source,
                publisher,
                frames_tx,
                shutdown.clone(),
                opts.grab_retry,
            )),
        ));

        handles.push((
            "decision",
            tokio::spawn(decision_stage(
                tap,
                detector,
                actions_tx,
                config,
                display_tx.clone(),
                shutdown.clone(),
                opts.tap_timeout,
            )),
        ));

        handles.push(("pointer", tokio::spawn(pointer_stage(actions_rx, pointer))));

        Ok(Self {
            shutdown,
            handles,
            display: display_tx,
            broadcast_addr,
        })
    }

    /// Address the broadcast server actually bound, when enabled.
    pub fn broadcast_addr(&self) -> Option<std::net::SocketAddr> {
        self.broadcast_addr
    }

    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    pub fn subscribe_display(&self) -> broadcast::Receiver<DisplayPacket> {
        self.display.subscribe()
    }

    /// Trigger the stop signal and join every stage, aborting any that
    /// outlive the grace period.
    pub async fn shutdown(self, grace: Duration) {
        self.shutdown.trigger();
        for (name, mut handle) in self.handles {
            match timeout(grace, &mut handle).await {
                Ok(_) => debug!(stage = name, "stage joined"),
                Err(_) => {
                    warn!(stage = name, "stage did not stop in time; aborting");
                    handle.abort();
                    let _ = handle.await;
                }
            }
        }
    }
}

/// Capture stage: pull frames from the source, fan them out to the bus and
/// the network broadcast channel.
async fn capture_stage(
    mut source: Box<dyn FrameSource>,
    publisher: FramePublisher,
    frames_tx: broadcast::Sender<Frame>,
    shutdown: Shutdown,
    grab_retry: Duration,
) {
    info!(source = %source.describe(), "capture stage running");
    let mut failures = 0u32;
    loop {
        if shutdown.is_triggered() {
            break;
        }
        let grabbed = tokio::select! {
            grabbed = source.grab() => grabbed,
            _ = shutdown.triggered() => break,
        };
        match grabbed {
            Ok(frame) => {
                failures = 0;
                publisher.publish(frame.clone());
                // No network subscribers is the normal headless case.
                let _ = frames_tx.send(frame);
            }
            Err(SensorError::CaptureMiss(reason)) => {
                failures += 1;
                warn!(failures, "capture miss: {reason}");
                if failures >= MAX_GRAB_FAILURES {
                    error!("camera stopped producing frames; shutting down");
                    shutdown.trigger();
                    break;
                }
                sleep(grab_retry).await;
            }
            Err(e) => {
                error!("capture stage failed: {e}");
                shutdown.trigger();
                break;
            }
        }
    }
    // Sentinel so a blocked decision stage wakes and exits.
    publisher.close();
    info!("capture stage finished");
}

/// Detection and decision stage: detector output becomes pointer motion and
/// click actions, plus display packets for any observer.
async fn decision_stage(
    mut tap: FrameTap,
    mut detector: Box<dyn Detector>,
    actions_tx: mpsc::Sender<PointerAction>,
    config: ConfigHandle,
    display_tx: broadcast::Sender<DisplayPacket>,
    shutdown: Shutdown,
    tap_timeout: Duration,
) {
    let mut engine = GestureEngine::new(config.snapshot().ear_window);
    let mut actuator = Actuator::new();
    loop {
        if shutdown.is_triggered() {
            break;
        }
        let frame = match tap.next_timeout(tap_timeout).await {
            Ok(Some(frame)) => frame,
            // Bus closed: capture is gone, nothing more to decide on.
            Ok(None) => break,
            // Quiet interval; loop to re-check the stop signal.
            Err(_) => continue,
        };

        // One config snapshot per frame keeps a mid-loop reload atomic.
        let cfg = config.snapshot();
        let result = detector.detect(&frame).await;

        let mut angles = None;
        if let Some(transform) = &result.transform {
            let pose = PoseAngles::from_rotation(&transform.rotation());
            if let Some((dx, dy)) = actuator.plan_motion(pose, &cfg) {
                // Motion regenerates every frame; dropping one is cheaper
                // than stalling detection behind a full queue.
                if actions_tx.try_send(PointerAction::Move { dx, dy }).is_err() {
                    debug!("pointer queue full; motion dropped");
                }
            }
            angles = Some(pose);
        }

        let mut gesture = None;
        if let Some(landmarks) = &result.landmarks {
            let left = eye_aspect_ratio(landmarks, &LEFT_EYE);
            let right = eye_aspect_ratio(landmarks, &RIGHT_EYE);
            if let Some(event) = engine.update(left, right, Instant::now(), &cfg) {
                info!(eye = ?event.eye, "wink detected");
                let button = match event.eye {
                    Eye::Left => Button::Left,
                    Eye::Right => Button::Right,
                };
                if actions_tx
                    .try_send(PointerAction::Click(button))
                    .is_err()
                {
                    warn!("pointer queue full; click dropped");
                }
                gesture = Some(event);
            }
        }

        let _ = display_tx.send(DisplayPacket {
            frame,
            result,
            angles,
            gesture,
        });
    }
    info!("decision stage finished");
}

/// Pointer stage: applies queued actions on its own task so a slow OS call
/// never blocks detection. Exits when the action queue closes.
async fn pointer_stage(mut actions_rx: mpsc::Receiver<PointerAction>, mut pointer: Box<dyn Pointer>) {
    let mut errors = 0u64;
    while let Some(action) = actions_rx.recv().await {
        let outcome = match action {
            PointerAction::Move { dx, dy } => pointer.move_rel(dx, dy),
            PointerAction::Click(button) => pointer.click(button),
        };
        if let Err(e) = outcome {
            errors += 1;
            warn!(errors, "pointer action failed: {e}");
        }
    }
    info!("pointer stage finished");
}
