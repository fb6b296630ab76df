use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{debug, info};

use crate::config::ConfigHandle;
use crate::pipeline::Shutdown;

/// Control messages from the supervising UI process, one JSON object per
/// line. Field names follow the original settings protocol so existing
/// front ends keep working.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Stop,
    UpdateSensitivities {
        yaw: f64,
        pitch: f64,
    },
    UpdateCalibration {
        l_wink_ratio: Option<f64>,
        r_wink_ratio: Option<f64>,
        wink_succ_frame: Option<u32>,
        wink_cooldown: Option<f64>,
    },
}

/// Apply one command to the live config. Returns true if it was a stop.
pub fn apply(command: Command, config: &ConfigHandle) -> bool {
    match command {
        Command::Stop => return true,
        Command::UpdateSensitivities { yaw, pitch } => {
            config.update(|c| {
                c.sensitivity_yaw = yaw;
                c.sensitivity_pitch = pitch;
            });
            info!(yaw, pitch, "sensitivities updated");
        }
        Command::UpdateCalibration {
            l_wink_ratio,
            r_wink_ratio,
            wink_succ_frame,
            wink_cooldown,
        } => {
            config.update(|c| {
                if let Some(v) = l_wink_ratio {
                    c.wink_threshold_left = v;
                }
                if let Some(v) = r_wink_ratio {
                    c.wink_threshold_right = v;
                }
                if let Some(v) = wink_succ_frame {
                    c.required_wink_frames = v;
                }
                if let Some(v) = wink_cooldown {
                    c.wink_cooldown_secs = v;
                }
            });
            info!("calibration updated");
        }
    }
    false
}

/// Consume a line-oriented command stream until stop, EOF or shutdown.
///
/// EOF triggers shutdown too: the stream is our tether to the supervising
/// process, and a closed pipe means it has gone away.
pub async fn listen<R>(reader: R, config: ConfigHandle, shutdown: Shutdown)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines: Lines<R> = reader.lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = shutdown.triggered() => break,
        };
        match line {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match serde_json::from_str::<Command>(line) {
                    Ok(command) => {
                        if apply(command, &config) {
                            info!("stop command received");
                            shutdown.trigger();
                            break;
                        }
                    }
                    Err(e) => debug!("ignoring malformed command line: {e}"),
                }
            }
            Ok(None) => {
                info!("command stream closed");
                shutdown.trigger();
                break;
            }
            Err(e) => {
                debug!("command stream read error: {e}");
                shutdown.trigger();
                break;
            }
        }
    }
}

/// [`listen`] over this process's stdin.
pub async fn listen_stdin(config: ConfigHandle, shutdown: Shutdown) {
    listen(BufReader::new(tokio::io::stdin()), config, shutdown).await;
}
