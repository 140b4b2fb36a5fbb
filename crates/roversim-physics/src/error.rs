//! Error types for the simulation world.

use thiserror::Error;

/// Errors that can occur while building or driving the world.
#[derive(Error, Debug)]
pub enum PhysicsError {
    /// Failed to create a collision shape.
    #[error("failed to create collision shape for {name}: {reason}")]
    CollisionShape {
        /// Body name.
        name: String,
        /// Reason for failure.
        reason: String,
    },

    /// A robot link declared no collision geometry.
    #[error("link {0} has no collision geometry")]
    NoCollisionGeometry(String),

    /// Failed to load a mesh referenced by a robot description.
    #[error("mesh load failed: {0}")]
    Mesh(#[from] roversim_mesh::MeshError),

    /// A body handle did not resolve.
    #[error("unknown body handle")]
    UnknownBody,
}
