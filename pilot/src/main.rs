use std::time::Duration;

use clap::Parser;
use pilot::{command, logging, Config, ConfigHandle, Pipeline, PipelineOptions, Pointer};
use sensor::{file::FileSource, synthetic::SyntheticSource, FrameSource};
use tracing::info;
use vision::{Detector, NullDetector, SimulatedDetector};

#[derive(Parser)]
#[command(author, version, about = "Hands-free mouse control from head pose and winks")]
struct Cli {
    /// Camera device index.
    #[cfg(feature = "camera")]
    #[arg(long)]
    camera: Option<u32>,

    /// Replay JPEG files matching this glob instead of a camera.
    #[arg(long)]
    frames: Option<String>,

    /// Generate synthetic frames (no camera, no files).
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Capture interval for file/synthetic sources, in milliseconds.
    #[arg(long, default_value_t = 33)]
    interval_ms: u64,

    /// Bind address for the frame broadcast server, e.g. 127.0.0.1:5555.
    #[arg(long, env = "PILOT_BIND")]
    bind: Option<String>,

    /// Use the built-in simulated face instead of a real detector.
    #[arg(long, default_value_t = false)]
    simulate_detector: bool,

    /// Log pointer actions instead of moving the real mouse.
    #[arg(long, default_value_t = false)]
    no_pointer: bool,
}

impl Cli {
    fn source(&self) -> anyhow::Result<Box<dyn FrameSource>> {
        let interval = Duration::from_millis(self.interval_ms);
        #[cfg(feature = "camera")]
        if let Some(index) = self.camera {
            return Ok(Box::new(sensor::camera::CameraSource::new(index)?));
        }
        if let Some(pattern) = &self.frames {
            return Ok(Box::new(FileSource::new(pattern, interval)?));
        }
        if self.synthetic {
            return Ok(Box::new(SyntheticSource::new(640, 480, interval)));
        }
        anyhow::bail!("no frame source selected; pass --synthetic, --frames or --camera");
    }

    fn detector(&self) -> Box<dyn Detector> {
        if self.simulate_detector {
            Box::new(SimulatedDetector::new())
        } else {
            // Real landmark models plug in behind the Detector trait; until
            // one is wired up, run the plumbing with no face.
            Box::new(NullDetector)
        }
    }

    fn pointer(&self) -> anyhow::Result<Box<dyn Pointer>> {
        if self.no_pointer {
            return Ok(Box::new(pilot::TracingPointer));
        }
        #[cfg(feature = "pointer")]
        {
            Ok(Box::new(pilot::pointer::EnigoPointer::new()?))
        }
        #[cfg(not(feature = "pointer"))]
        {
            Ok(Box::new(pilot::TracingPointer))
        }
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();
    let cli = Cli::parse();

    let config = ConfigHandle::new(Config::default());
    let opts = PipelineOptions {
        bind: cli.bind.clone(),
        ..PipelineOptions::default()
    };

    let pipeline = Pipeline::start(
        cli.source()?,
        cli.detector(),
        cli.pointer()?,
        config.clone(),
        opts,
    )
    .await?;

    let shutdown = pipeline.shutdown_handle();
    tokio::spawn(command::listen_stdin(config, shutdown.clone()));

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received");
            shutdown.trigger();
        }
        _ = shutdown.triggered() => {}
    }

    pipeline.shutdown(Duration::from_secs(2)).await;
    Ok(())
}
