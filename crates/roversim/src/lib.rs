#![warn(missing_docs)]

//! Simulation driver for a wheeled rover in a static mesh environment.
//!
//! The driver owns the physics world, the static environment body, the
//! dynamic actor, and the viewport link. It advances simulation time a
//! fixed number of sub-steps per rendered frame and reports the actor
//! pose with a squared-distance-to-target diagnostic.
//!
//! # Lifecycle
//!
//! ```ignore
//! use roversim::{Action, SimConfig, SimDriver};
//!
//! let config = SimConfig::for_model(datapath, model_id);
//! let mut driver = SimDriver::initialize(config)?;
//!
//! let pose = driver.request_initial_pose()?;
//! driver.set_initial_pose(&pose)?;
//!
//! loop {
//!     let (pose, state) = driver.advance(Action::Idle)?;
//!     driver.send_pose(&pose)?;
//! }
//! ```

mod config;
mod driver;

pub use config::{
    model_paths, SimConfig, DEFAULT_ACTOR_SCALE, DEFAULT_FRAMES_PER_SEC, DEFAULT_STEPS_PER_SEC,
    MAX_ANGULAR_SPEED, MAX_LINEAR_SPEED, TARGET_POSITION,
};
pub use driver::{substeps_per_frame, DriverError, FrameState, SimDriver};

pub use roversim_physics::{Action, DepthImage};
pub use roversim_viewport::{Pose, DEFAULT_BIND_ADDR};
