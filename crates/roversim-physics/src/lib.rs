#![warn(missing_docs)]

//! Rigid-body simulation for roversim using Rapier3d.
//!
//! This crate owns the physics world: the static environment mesh, the
//! dynamic actor and its action-to-motion policy, and the optional debug
//! camera with its ray-cast depth render. Stepping is always explicit —
//! the driver decides when simulation time advances.
//!
//! # Example
//!
//! ```ignore
//! use nalgebra::{Isometry3, Vector3};
//! use roversim_physics::{Action, Actor, SimWorld};
//!
//! let mut world = SimWorld::new(Vector3::new(0.0, 0.0, -10.0));
//! world.add_environment(&mesh)?;
//! let body = world.add_actor(&model, asset_dir, Isometry3::identity())?;
//!
//! let mut actor = Actor::new(body, 1.0, std::f32::consts::PI / 5.0);
//! actor.apply_action(Action::Forward, &mut world)?;
//! world.step(1.0 / 240.0);
//! ```

mod actor;
mod camera;
mod colliders;
mod error;
mod render;
mod world;

pub use actor::{Action, Actor};
pub use rapier3d::dynamics::RigidBodyHandle as BodyHandle;
pub use camera::{frustum, DebugView, OrbitCamera, ProjectionBounds, Slider, DEBUG_PROJECTION};
pub use colliders::{geometry_to_collider, mesh_to_collider, ColliderStrategy};
pub use error::PhysicsError;
pub use render::{render_depth, DepthImage, DEBUG_IMAGE_SIZE};
pub use world::{SimWorld, ENVIRONMENT_COLOR};
