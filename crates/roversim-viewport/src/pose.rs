//! Pose type shared with the viewport peer.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A rigid-body pose: position plus orientation quaternion.
///
/// The quaternion is **scalar-first** `[w, x, y, z]`, on the wire and in
/// memory. The JSON encoding is the two-element array
/// `[[x, y, z], [w, x, y, z]]` the viewport peer speaks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Position in meters.
    pub position: [f64; 3],
    /// Unit quaternion, `[w, x, y, z]`.
    pub orientation: [f64; 4],
}

impl Pose {
    /// Create a pose from position and scalar-first quaternion parts.
    pub fn new(position: [f64; 3], orientation: [f64; 4]) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// The identity pose at the origin.
    pub fn identity() -> Self {
        Self {
            position: [0.0; 3],
            orientation: [1.0, 0.0, 0.0, 0.0],
        }
    }

    /// Squared Euclidean distance from this pose's position to `point`.
    pub fn distance_squared_to(&self, point: [f64; 3]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        let dz = self.position[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

impl Serialize for Pose {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.position, self.orientation).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Pose {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (position, orientation) = <([f64; 3], [f64; 4])>::deserialize(deserializer)?;
        Ok(Self {
            position,
            orientation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let pose = Pose::new([1.0, 2.0, 3.0], [1.0, 0.0, 0.0, 0.0]);
        let json = serde_json::to_string(&pose).unwrap();
        assert_eq!(json, "[[1.0,2.0,3.0],[1.0,0.0,0.0,0.0]]");
    }

    #[test]
    fn test_round_trip_unchanged() {
        let pose = Pose::new([-4.35, -1.71, 0.8], [0.5, 0.5, -0.5, 0.5]);
        let json = serde_json::to_string(&pose).unwrap();
        let back: Pose = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pose);
    }

    #[test]
    fn test_scalar_first_both_directions() {
        // The w component leads in both the encoded and decoded forms.
        let pose = Pose::new([0.0; 3], [0.9, 0.1, 0.2, 0.3]);
        let json = serde_json::to_string(&pose).unwrap();
        assert!(json.contains("[0.9,0.1,0.2,0.3]"));

        let decoded: Pose = serde_json::from_str("[[0,0,0],[0.9,0.1,0.2,0.3]]").unwrap();
        assert_eq!(decoded.orientation[0], 0.9);
    }

    #[test]
    fn test_distance_squared() {
        let pose = Pose::new([1.0, 2.0, 2.0], [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(pose.distance_squared_to([0.0, 0.0, 0.0]), 9.0);
        assert_eq!(pose.distance_squared_to([1.0, 2.0, 2.0]), 0.0);
    }
}
