//! Physics world management using Rapier3d.
//!
//! Real-time auto-stepping does not exist here; the driver advances the
//! world explicitly one fixed-duration sub-step at a time.

use std::path::Path;

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use parry3d::query::Ray;
use rapier3d::dynamics::{
    CCDSolver, ImpulseJointSet, IntegrationParameters, IslandManager, MultibodyJointSet,
    RigidBody, RigidBodyBuilder, RigidBodyHandle, RigidBodySet, RigidBodyType,
};
use rapier3d::geometry::{BroadPhaseMultiSap, ColliderBuilder, ColliderSet, NarrowPhase};
use rapier3d::pipeline::{PhysicsPipeline, QueryFilter, QueryPipeline};
use roversim_mesh::TriangleMesh;
use roversim_urdf::RobotModel;
use tracing::{debug, info};

use crate::colliders::{geometry_to_collider, mesh_to_collider, ColliderStrategy};
use crate::error::PhysicsError;

/// RGBA color of the environment's visual material.
///
/// Headless runs have nothing to show it on; it is kept with the body so a
/// debug viewer can pick it up.
pub const ENVIRONMENT_COLOR: [f32; 4] = [1.0, 0.2, 0.2, 0.3];

/// Physics simulation world.
pub struct SimWorld {
    pipeline: PhysicsPipeline,
    gravity: Vector3<f32>,
    integration_params: IntegrationParameters,
    islands: IslandManager,
    broad_phase: BroadPhaseMultiSap,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,

    environment: Option<RigidBodyHandle>,
}

impl SimWorld {
    /// Create an empty world with the given gravity vector.
    pub fn new(gravity: Vector3<f32>) -> Self {
        Self {
            pipeline: PhysicsPipeline::new(),
            gravity,
            integration_params: IntegrationParameters::default(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseMultiSap::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            environment: None,
        }
    }

    /// Set gravity vector.
    pub fn set_gravity(&mut self, x: f32, y: f32, z: f32) {
        self.gravity = Vector3::new(x, y, z);
    }

    /// Add the static environment as a fixed concave trimesh body.
    ///
    /// Loaded once and never mutated.
    pub fn add_environment(&mut self, mesh: &TriangleMesh) -> Result<RigidBodyHandle, PhysicsError> {
        let shape = mesh_to_collider(mesh, ColliderStrategy::TriMesh, "environment")?;

        let body = RigidBodyBuilder::fixed().build();
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::new(shape).friction(0.8).build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        self.environment = Some(handle);
        info!(
            triangles = mesh.num_triangles(),
            "environment boundary created"
        );
        Ok(handle)
    }

    /// Add the dynamic actor body from a robot description.
    ///
    /// The base link supplies the collision shape, the summed link masses
    /// the inertia; mesh references resolve relative to `asset_dir`.
    pub fn add_actor(
        &mut self,
        model: &RobotModel,
        asset_dir: &Path,
        pose: Isometry3<f32>,
    ) -> Result<RigidBodyHandle, PhysicsError> {
        let base = model.base_link();
        let collision = base
            .collision
            .as_ref()
            .ok_or_else(|| PhysicsError::NoCollisionGeometry(base.name.clone()))?;

        let shape = geometry_to_collider(&collision.geometry, asset_dir, &base.name)?;
        let offset = Vector3::new(
            collision.origin[0],
            collision.origin[1],
            collision.origin[2],
        );

        let body = RigidBodyBuilder::new(RigidBodyType::Dynamic)
            .position(pose)
            .additional_mass(model.total_mass())
            .can_sleep(false)
            .build();
        let handle = self.bodies.insert(body);

        let collider = ColliderBuilder::new(shape)
            .position(Translation3::from(offset).into())
            .friction(0.5)
            .restitution(0.1)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        debug!(robot = %model.name, mass = model.total_mass(), "actor body created");
        Ok(handle)
    }

    /// Step the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.integration_params.dt = dt;

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Get a body's pose as `(position, [w, x, y, z] quaternion)`.
    pub fn body_pose(&self, handle: RigidBodyHandle) -> Result<([f32; 3], [f32; 4]), PhysicsError> {
        let body = self.bodies.get(handle).ok_or(PhysicsError::UnknownBody)?;
        let pos = body.position();
        Ok((
            [pos.translation.x, pos.translation.y, pos.translation.z],
            [
                pos.rotation.w,
                pos.rotation.i,
                pos.rotation.j,
                pos.rotation.k,
            ],
        ))
    }

    /// Teleport a body to `(position, [w, x, y, z] quaternion)`.
    pub fn set_body_pose(
        &mut self,
        handle: RigidBodyHandle,
        position: [f32; 3],
        orientation: [f32; 4],
    ) -> Result<(), PhysicsError> {
        let body = self
            .bodies
            .get_mut(handle)
            .ok_or(PhysicsError::UnknownBody)?;
        let rotation = UnitQuaternion::from_quaternion(nalgebra::Quaternion::new(
            orientation[0],
            orientation[1],
            orientation[2],
            orientation[3],
        ));
        let translation = Vector3::new(position[0], position[1], position[2]);
        body.set_position(Isometry3::from_parts(translation.into(), rotation), true);
        Ok(())
    }

    /// Mutable access to a body (velocity commands).
    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Result<&mut RigidBody, PhysicsError> {
        self.bodies.get_mut(handle).ok_or(PhysicsError::UnknownBody)
    }

    /// Shared access to a body.
    pub fn body(&self, handle: RigidBodyHandle) -> Result<&RigidBody, PhysicsError> {
        self.bodies.get(handle).ok_or(PhysicsError::UnknownBody)
    }

    /// The environment body, once loaded.
    pub fn environment(&self) -> Option<RigidBodyHandle> {
        self.environment
    }

    /// Cast a ray and return the hit distance, if any.
    ///
    /// Only valid after at least one [`step`](Self::step), which refreshes
    /// the query pipeline.
    pub fn cast_ray(&self, origin: Point3<f32>, dir: Vector3<f32>, max_dist: f32) -> Option<f32> {
        let ray = Ray::new(origin, dir);
        self.query_pipeline
            .cast_ray(
                &self.bodies,
                &self.colliders,
                &ray,
                max_dist,
                true,
                QueryFilter::default(),
            )
            .map(|(_, toi)| toi)
    }
}
