#![warn(missing_docs)]

//! Request/reply pose link between the simulation and a viewport process.
//!
//! The protocol has exactly two message shapes:
//!
//! - the [`INITIAL_POSE_REQUEST`] sentinel, answered with a
//!   `[position, quaternion]` pose;
//! - a pose frame, answered with an opaque acknowledgment.
//!
//! Quaternions are scalar-first `[w, x, y, z]` in both directions.

mod error;
mod link;
mod pose;

pub use error::{Result, ViewportError};
pub use link::{ViewportLink, DEFAULT_BIND_ADDR, INITIAL_POSE_REQUEST};
pub use pose::Pose;
