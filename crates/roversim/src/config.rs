//! Driver configuration and asset path resolution.

use std::path::{Path, PathBuf};

/// Default simulation step rate, steps per second.
pub const DEFAULT_STEPS_PER_SEC: u32 = 240;

/// Default rendered frame rate, frames per second.
pub const DEFAULT_FRAMES_PER_SEC: u32 = 13;

/// Uniform scale applied to the robot description at load time.
pub const DEFAULT_ACTOR_SCALE: f32 = 0.8;

/// Maximum commanded linear speed, m/s.
pub const MAX_LINEAR_SPEED: f32 = 1.0;

/// Maximum commanded angular speed, rad/s (36 degrees per second).
pub const MAX_ANGULAR_SPEED: f32 = std::f32::consts::PI / 5.0;

/// Fixed target point for the distance diagnostic.
pub const TARGET_POSITION: [f64; 3] = [-4.35, -1.71, 0.8];

/// Driver configuration, fixed for the process lifetime.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Path to the environment OBJ mesh.
    pub environment_obj: PathBuf,
    /// Path to the robot description.
    pub robot_urdf: PathBuf,
    /// Whether the debug view is active.
    pub debug: bool,
    /// Rendered frames per second.
    pub frames_per_sec: u32,
    /// Simulation steps per second.
    pub steps_per_sec: u32,
    /// Address the viewport link binds.
    pub bind_addr: String,
    /// Gravity vector.
    pub gravity: [f32; 3],
    /// Uniform robot scale factor.
    pub actor_scale: f32,
    /// Maximum commanded linear speed, m/s.
    pub max_linear_speed: f32,
    /// Maximum commanded angular speed, rad/s.
    pub max_angular_speed: f32,
    /// Target point for the per-frame distance diagnostic.
    pub target: [f64; 3],
}

impl SimConfig {
    /// Configuration with the standard constants for the given asset pair.
    pub fn new(environment_obj: PathBuf, robot_urdf: PathBuf) -> Self {
        Self {
            environment_obj,
            robot_urdf,
            debug: false,
            frames_per_sec: DEFAULT_FRAMES_PER_SEC,
            steps_per_sec: DEFAULT_STEPS_PER_SEC,
            bind_addr: roversim_viewport::DEFAULT_BIND_ADDR.to_string(),
            gravity: [0.0, 0.0, -10.0],
            actor_scale: DEFAULT_ACTOR_SCALE,
            max_linear_speed: MAX_LINEAR_SPEED,
            max_angular_speed: MAX_ANGULAR_SPEED,
            target: TARGET_POSITION,
        }
    }

    /// Build a configuration from a dataset directory and model identifier.
    pub fn for_model(datapath: &Path, model_id: &str) -> Self {
        let (obj, urdf) = model_paths(datapath, model_id);
        Self::new(obj, urdf)
    }
}

/// Resolve the environment mesh and robot description paths for a model:
/// `<datapath>/<model_id>/modeldata/out_z_up.{obj,urdf}`.
pub fn model_paths(datapath: &Path, model_id: &str) -> (PathBuf, PathBuf) {
    let modeldata = datapath.join(model_id).join("modeldata");
    (
        modeldata.join("out_z_up.obj"),
        modeldata.join("out_z_up.urdf"),
    )
}
