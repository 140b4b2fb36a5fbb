//! The dynamic actor and its action-to-motion policy.

use nalgebra::Vector3;
use rapier3d::dynamics::RigidBodyHandle;
use serde::{Deserialize, Serialize};

use crate::error::PhysicsError;
use crate::world::SimWorld;

/// A discrete control action for the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Action {
    /// No commanded motion.
    #[default]
    Idle,
    /// Drive along the heading at full linear speed.
    Forward,
    /// Drive against the heading at full linear speed.
    Backward,
    /// Rotate counterclockwise at full angular speed.
    TurnLeft,
    /// Rotate clockwise at full angular speed.
    TurnRight,
}

/// Wrapper around the actor body holding its motion bounds and the most
/// recently commanded action.
///
/// The commanded velocities are re-asserted on every sub-step; the solver
/// would otherwise bleed them off through contact friction. The vertical
/// velocity component is never touched, so gravity settles the actor onto
/// the environment mesh.
pub struct Actor {
    body: RigidBodyHandle,
    max_linear_speed: f32,
    max_angular_speed: f32,
    command: Action,
}

impl Actor {
    /// Wrap an actor body with its motion bounds.
    pub fn new(body: RigidBodyHandle, max_linear_speed: f32, max_angular_speed: f32) -> Self {
        Self {
            body,
            max_linear_speed,
            max_angular_speed,
            command: Action::Idle,
        }
    }

    /// The underlying body handle.
    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    /// The most recently commanded action.
    pub fn command(&self) -> Action {
        self.command
    }

    /// Record `action` and assert its velocities on the body.
    pub fn apply_action(&mut self, action: Action, world: &mut SimWorld) -> Result<(), PhysicsError> {
        self.command = action;
        self.update(world)
    }

    /// Re-assert the held command's velocities, called once per sub-step.
    pub fn update(&self, world: &mut SimWorld) -> Result<(), PhysicsError> {
        let body = world.body_mut(self.body)?;

        // Heading is the body-frame +X axis.
        let heading = body.position().rotation * Vector3::x();

        let planar = match self.command {
            Action::Forward => heading * self.max_linear_speed,
            Action::Backward => -heading * self.max_linear_speed,
            _ => Vector3::zeros(),
        };
        let vz = body.linvel().z;
        body.set_linvel(Vector3::new(planar.x, planar.y, vz), true);

        let yaw_rate = match self.command {
            Action::TurnLeft => self.max_angular_speed,
            Action::TurnRight => -self.max_angular_speed,
            _ => 0.0,
        };
        body.set_angvel(Vector3::new(0.0, 0.0, yaw_rate), true);

        Ok(())
    }

    /// Current pose as `(position, [w, x, y, z] quaternion)`.
    pub fn pose(&self, world: &SimWorld) -> Result<([f32; 3], [f32; 4]), PhysicsError> {
        world.body_pose(self.body)
    }

    /// Teleport the actor to `(position, [w, x, y, z] quaternion)`.
    pub fn set_pose(
        &self,
        world: &mut SimWorld,
        position: [f32; 3],
        orientation: [f32; 4],
    ) -> Result<(), PhysicsError> {
        world.set_body_pose(self.body, position, orientation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Isometry3;
    use roversim_urdf::parse_urdf;
    use std::f32::consts::PI;
    use std::path::Path;

    fn test_world_and_actor() -> (SimWorld, Actor) {
        let model = parse_urdf(
            r#"
<robot name="cart">
  <link name="base_link">
    <inertial><mass value="10.0"/></inertial>
    <collision>
      <geometry><box size="0.4 0.3 0.2"/></geometry>
    </collision>
  </link>
</robot>
"#,
        )
        .unwrap();
        // Gravity-free so velocity commands are observable in isolation.
        let mut world = SimWorld::new(Vector3::zeros());
        let handle = world
            .add_actor(&model, Path::new("."), Isometry3::identity())
            .unwrap();
        let actor = Actor::new(handle, 1.0, PI / 5.0);
        (world, actor)
    }

    #[test]
    fn test_forward_command_sets_bounded_velocity() {
        let (mut world, mut actor) = test_world_and_actor();
        actor.apply_action(Action::Forward, &mut world).unwrap();

        let body = world.body(actor.body()).unwrap();
        let v = body.linvel();
        assert!((v.norm() - 1.0).abs() < 1e-5);
        assert!((v.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_turn_command_sets_bounded_yaw_rate() {
        let (mut world, mut actor) = test_world_and_actor();
        actor.apply_action(Action::TurnLeft, &mut world).unwrap();
        let w = *world.body(actor.body()).unwrap().angvel();
        assert!((w.z - PI / 5.0).abs() < 1e-5);

        actor.apply_action(Action::TurnRight, &mut world).unwrap();
        let w = *world.body(actor.body()).unwrap().angvel();
        assert!((w.z + PI / 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_idle_zeros_planar_velocity() {
        let (mut world, mut actor) = test_world_and_actor();
        actor.apply_action(Action::Forward, &mut world).unwrap();
        actor.apply_action(Action::Idle, &mut world).unwrap();

        let body = world.body(actor.body()).unwrap();
        assert_eq!(body.linvel().x, 0.0);
        assert_eq!(body.linvel().y, 0.0);
        assert_eq!(body.angvel().z, 0.0);
    }

    #[test]
    fn test_forward_moves_along_heading() {
        let (mut world, mut actor) = test_world_and_actor();
        actor.apply_action(Action::Forward, &mut world).unwrap();

        for _ in 0..240 {
            world.step(1.0 / 240.0);
            actor.update(&mut world).unwrap();
        }

        let (pos, _) = actor.pose(&world).unwrap();
        // ~1 second at 1 m/s along +X.
        assert!(pos[0] > 0.5, "actor barely moved: {:?}", pos);
        assert!(pos[1].abs() < 0.1);
    }
}
