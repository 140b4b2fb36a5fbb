//! The simulation driver: initialization and the per-frame advance loop.

use std::path::Path;

use nalgebra::{Isometry3, Vector3};
use roversim_mesh::load_obj;
use roversim_physics::{
    render_depth, Action, Actor, BodyHandle, DebugView, DepthImage, PhysicsError, SimWorld,
    DEBUG_IMAGE_SIZE,
};
use roversim_urdf::load_urdf;
use roversim_viewport::{Pose, ViewportError, ViewportLink};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::SimConfig;

/// Errors from driver initialization and the advance loop.
#[derive(Error, Debug)]
pub enum DriverError {
    /// Environment mesh failed to load.
    #[error("environment mesh: {0}")]
    Mesh(#[from] roversim_mesh::MeshError),

    /// Robot description failed to load.
    #[error("robot description: {0}")]
    Urdf(#[from] roversim_urdf::UrdfError),

    /// Physics world error.
    #[error(transparent)]
    Physics(#[from] PhysicsError),

    /// Viewport link error.
    #[error(transparent)]
    Viewport(#[from] ViewportError),

    /// `advance` was called before `set_initial_pose`.
    #[error("actor pose not initialized")]
    NotPosed,

    /// A cadence parameter was zero.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Per-frame diagnostics reported alongside the pose.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FrameState {
    /// Squared Euclidean distance from the actor to the target point.
    pub distance_to_target: f64,
}

/// Number of simulation sub-steps per rendered frame.
pub fn substeps_per_frame(steps_per_sec: u32, frames_per_sec: u32) -> u32 {
    steps_per_sec / frames_per_sec
}

/// The simulation driver.
///
/// Owns the physics world, the static environment, the actor, and the
/// viewport link. Lifecycle: [`initialize`](Self::initialize) →
/// [`set_initial_pose`](Self::set_initial_pose) → [`advance`](Self::advance)
/// once per rendered frame, indefinitely.
pub struct SimDriver {
    config: SimConfig,
    world: SimWorld,
    link: ViewportLink,
    actor_body: BodyHandle,
    actor: Option<Actor>,
    debug_view: Option<DebugView>,
    step_dt: f32,
    substeps: u32,
    last_frame: Option<DepthImage>,
}

impl SimDriver {
    /// Build the world: bind the viewport link, load the environment mesh
    /// as a fixed concave collider, load the robot description, create the
    /// actor body, and (debug mode) set up the debug view with an initial
    /// render.
    pub fn initialize(config: SimConfig) -> Result<Self, DriverError> {
        if config.steps_per_sec == 0 || config.frames_per_sec == 0 {
            return Err(DriverError::InvalidConfig(
                "steps_per_sec and frames_per_sec must be positive".to_string(),
            ));
        }

        let link = ViewportLink::bind(&config.bind_addr)?;

        let mut world = SimWorld::new(Vector3::new(
            config.gravity[0],
            config.gravity[1],
            config.gravity[2],
        ));

        info!(path = %config.environment_obj.display(), "loading environment mesh");
        let mesh = load_obj(&config.environment_obj)?;
        world.add_environment(&mesh)?;

        info!(path = %config.robot_urdf.display(), "loading robot description");
        let mut model = load_urdf(&config.robot_urdf)?;
        model.apply_scale(config.actor_scale);
        let asset_dir = config
            .robot_urdf
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        let actor_body = world.add_actor(&model, &asset_dir, Isometry3::identity())?;

        let debug_view = config.debug.then(DebugView::new);
        let last_frame = debug_view
            .as_ref()
            .map(|view| render_depth(&world, view, DEBUG_IMAGE_SIZE, DEBUG_IMAGE_SIZE));

        let step_dt = 1.0 / config.steps_per_sec as f32;
        let substeps = substeps_per_frame(config.steps_per_sec, config.frames_per_sec);
        debug!(step_dt, substeps, "simulation cadence fixed");

        Ok(Self {
            config,
            world,
            link,
            actor_body,
            actor: None,
            debug_view,
            step_dt,
            substeps,
            last_frame,
        })
    }

    /// Ask the viewport peer for the initial `[position, quaternion]` pose.
    pub fn request_initial_pose(&mut self) -> Result<Pose, DriverError> {
        Ok(self.link.request_initial_pose()?)
    }

    /// Place the actor and wrap it with its motion bounds.
    pub fn set_initial_pose(&mut self, pose: &Pose) -> Result<(), DriverError> {
        self.world.set_body_pose(
            self.actor_body,
            [
                pose.position[0] as f32,
                pose.position[1] as f32,
                pose.position[2] as f32,
            ],
            [
                pose.orientation[0] as f32,
                pose.orientation[1] as f32,
                pose.orientation[2] as f32,
                pose.orientation[3] as f32,
            ],
        )?;
        self.actor = Some(Actor::new(
            self.actor_body,
            self.config.max_linear_speed,
            self.config.max_angular_speed,
        ));
        info!("actor posed");
        Ok(())
    }

    /// Advance one rendered frame headlessly.
    ///
    /// Applies `action`, steps the world a fixed number of sub-steps, and
    /// reports the actor pose with the distance diagnostic.
    pub fn advance(&mut self, action: Action) -> Result<(Pose, FrameState), DriverError> {
        self.advance_frame(action, false)
    }

    /// Advance one rendered frame and refresh the debug view: reads the
    /// live sliders, repositions the camera at the actor, and re-renders
    /// the depth image.
    pub fn advance_interactive(&mut self, action: Action) -> Result<(Pose, FrameState), DriverError> {
        self.advance_frame(action, true)
    }

    fn advance_frame(
        &mut self,
        action: Action,
        render: bool,
    ) -> Result<(Pose, FrameState), DriverError> {
        let actor = self.actor.as_mut().ok_or(DriverError::NotPosed)?;
        actor.apply_action(action, &mut self.world)?;

        for _ in 0..self.substeps {
            self.world.step(self.step_dt);
            actor.update(&mut self.world)?;
        }

        let (position, orientation) = actor.pose(&self.world)?;
        let pose = Pose::new(
            [
                position[0] as f64,
                position[1] as f64,
                position[2] as f64,
            ],
            [
                orientation[0] as f64,
                orientation[1] as f64,
                orientation[2] as f64,
                orientation[3] as f64,
            ],
        );
        let state = FrameState {
            distance_to_target: pose.distance_squared_to(self.config.target),
        };

        if render {
            if let Some(view) = &mut self.debug_view {
                view.reposition(position);
                self.last_frame = Some(render_depth(
                    &self.world,
                    view,
                    DEBUG_IMAGE_SIZE,
                    DEBUG_IMAGE_SIZE,
                ));
            }
        }

        Ok((pose, state))
    }

    /// Stream a pose frame to the viewport peer.
    pub fn send_pose(&mut self, pose: &Pose) -> Result<(), DriverError> {
        Ok(self.link.send_pose(pose)?)
    }

    /// Sub-steps taken per rendered frame.
    pub fn substeps(&self) -> u32 {
        self.substeps
    }

    /// Fixed sub-step duration in seconds.
    pub fn step_dt(&self) -> f32 {
        self.step_dt
    }

    /// The debug view, when running in debug mode.
    pub fn debug_view_mut(&mut self) -> Option<&mut DebugView> {
        self.debug_view.as_mut()
    }

    /// The most recent debug depth image, when running in debug mode.
    pub fn last_frame(&self) -> Option<&DepthImage> {
        self.last_frame.as_ref()
    }

    /// The driver configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    const FLOOR_OBJ: &str = "\
v -10 -10 0
v 10 -10 0
v 10 10 0
v -10 10 0
f 1 2 3 4
";

    const CART_URDF: &str = r#"
<robot name="cart">
  <link name="base_link">
    <inertial><mass value="10.0"/></inertial>
    <collision>
      <geometry><box size="0.4 0.3 0.2"/></geometry>
    </collision>
  </link>
</robot>
"#;

    /// Write the test assets under a unique temp directory.
    fn test_assets(tag: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!("roversim-driver-{}-{}", tag, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let obj = dir.join("out_z_up.obj");
        let urdf = dir.join("out_z_up.urdf");
        fs::write(&obj, FLOOR_OBJ).unwrap();
        fs::write(&urdf, CART_URDF).unwrap();
        (obj, urdf)
    }

    fn test_driver(tag: &str) -> SimDriver {
        let (obj, urdf) = test_assets(tag);
        let mut config = SimConfig::new(obj, urdf);
        config.bind_addr = "127.0.0.1:0".to_string();
        // Gravity-free so poses hold still between frames.
        config.gravity = [0.0, 0.0, 0.0];
        SimDriver::initialize(config).unwrap()
    }

    #[test]
    fn test_substeps_per_frame_floor() {
        assert_eq!(substeps_per_frame(240, 13), 18);
        assert_eq!(substeps_per_frame(100, 25), 4);
        assert_eq!(substeps_per_frame(60, 60), 1);
        assert_eq!(substeps_per_frame(7, 2), 3);
        assert_eq!(substeps_per_frame(5, 60), 0);
    }

    #[test]
    fn test_zero_cadence_rejected() {
        let (obj, urdf) = test_assets("cadence");
        let mut config = SimConfig::new(obj, urdf);
        config.bind_addr = "127.0.0.1:0".to_string();
        config.frames_per_sec = 0;
        assert!(matches!(
            SimDriver::initialize(config),
            Err(DriverError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_advance_before_pose_is_an_error() {
        let mut driver = test_driver("unposed");
        assert!(matches!(
            driver.advance(Action::Idle),
            Err(DriverError::NotPosed)
        ));
    }

    #[test]
    fn test_diagnostic_is_exact_squared_distance() {
        let mut driver = test_driver("diag");
        let start = Pose::new([2.0, -3.0, 1.5], [1.0, 0.0, 0.0, 0.0]);
        driver.set_initial_pose(&start).unwrap();

        let (pose, state) = driver.advance(Action::Idle).unwrap();
        let target = driver.config().target;
        assert_eq!(state.distance_to_target, pose.distance_squared_to(target));
        // Idle in a gravity-free world: the actor has not drifted.
        assert!((pose.position[0] - 2.0).abs() < 1e-4);
        assert!((pose.position[2] - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_frame_state_serializes() {
        let state = FrameState {
            distance_to_target: 2.25,
        };
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"distance_to_target":2.25}"#);
    }

    #[test]
    fn test_cadence_fixed_at_initialize() {
        let driver = test_driver("dt");
        assert_eq!(driver.substeps(), 18);
        assert!((driver.step_dt() - 1.0 / 240.0).abs() < 1e-9);
    }

    #[test]
    fn test_interactive_advance_renders() {
        let (obj, urdf) = test_assets("render");
        let mut config = SimConfig::new(obj, urdf);
        config.bind_addr = "127.0.0.1:0".to_string();
        config.debug = true;
        let mut driver = SimDriver::initialize(config).unwrap();
        driver.set_initial_pose(&Pose::identity()).unwrap();

        let _ = driver.advance_interactive(Action::Idle).unwrap();
        let frame = driver.last_frame().expect("debug frame rendered");
        assert_eq!(frame.width, DEBUG_IMAGE_SIZE);
        assert_eq!(frame.depth.len(), (DEBUG_IMAGE_SIZE * DEBUG_IMAGE_SIZE) as usize);
    }
}
