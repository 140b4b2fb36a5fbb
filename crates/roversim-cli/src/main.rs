//! roversim - simulation driver binary
//!
//! Loads a scanned environment and a robot description, binds the viewport
//! link, and runs the frame loop: advance the simulation, stream the pose.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use roversim::{Action, DepthImage, SimConfig, SimDriver, DEFAULT_BIND_ADDR};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roversim")]
#[command(about = "Wheeled-rover simulation driver streaming poses to a viewport", long_about = None)]
struct Cli {
    /// Dataset path
    #[arg(long)]
    datapath: PathBuf,

    /// Model identifier under the dataset path
    #[arg(long, default_value = "")]
    model: String,

    /// Enable the debug camera view
    #[arg(long)]
    debug: bool,

    /// Rendered frames per second
    #[arg(long, default_value_t = 13)]
    fps: u32,

    /// Address to bind the viewport link on
    #[arg(long, default_value = DEFAULT_BIND_ADDR)]
    bind: String,

    /// Stop after this many frames instead of running indefinitely
    #[arg(long)]
    frames: Option<u64>,

    /// Write the latest debug depth image to this PNG after each frame
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = SimConfig::for_model(&cli.datapath, &cli.model);
    config.debug = cli.debug;
    config.frames_per_sec = cli.fps;
    config.bind_addr = cli.bind;

    let mut driver = SimDriver::initialize(config).context("initializing simulation")?;
    info!(substeps = driver.substeps(), "simulation ready");

    let pose = driver
        .request_initial_pose()
        .context("requesting initial pose from viewport")?;
    driver.set_initial_pose(&pose)?;

    let mut frame: u64 = 0;
    loop {
        if let Some(limit) = cli.frames {
            if frame >= limit {
                break;
            }
        }

        let (pose, state) = if cli.debug {
            driver.advance_interactive(Action::Idle)?
        } else {
            driver.advance(Action::Idle)?
        };
        driver.send_pose(&pose)?;
        debug!(
            frame,
            distance_to_target = state.distance_to_target,
            "frame advanced"
        );

        if let Some(path) = &cli.snapshot {
            if let Some(image) = driver.last_frame() {
                save_snapshot(image, path)?;
            }
        }

        frame += 1;
    }

    info!(frames = frame, "simulation finished");
    Ok(())
}

fn save_snapshot(image: &DepthImage, path: &Path) -> Result<()> {
    let buffer = image::GrayImage::from_raw(image.width, image.height, image.to_luma8())
        .context("building snapshot image")?;
    buffer
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
