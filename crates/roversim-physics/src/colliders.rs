//! Collision shape generation from meshes and robot descriptions.

use std::f32::consts::FRAC_PI_2;
use std::path::Path;

use nalgebra::{Isometry3, Point3, Vector3};
use parry3d::shape::{ConvexPolyhedron, SharedShape, TriMesh};
use roversim_mesh::{load_obj, TriangleMesh};
use roversim_urdf::Geometry;

use crate::error::PhysicsError;

/// Strategy for generating collision shapes from a mesh.
#[derive(Debug, Clone, Copy, Default)]
pub enum ColliderStrategy {
    /// Use the full triangle mesh (accurate, required for concave scans).
    #[default]
    TriMesh,
    /// Use the convex hull (fast, approximate).
    ConvexHull,
    /// Use the axis-aligned bounding box (fastest, rough).
    Aabb,
}

/// Generate a collision shape from a triangle mesh.
pub fn mesh_to_collider(
    mesh: &TriangleMesh,
    strategy: ColliderStrategy,
    name: &str,
) -> Result<SharedShape, PhysicsError> {
    if mesh.vertices.is_empty() || mesh.indices.is_empty() {
        return Err(PhysicsError::CollisionShape {
            name: name.to_string(),
            reason: "empty mesh".to_string(),
        });
    }

    match strategy {
        ColliderStrategy::TriMesh => create_trimesh(mesh, name),
        ColliderStrategy::ConvexHull => create_convex_hull(mesh, name),
        ColliderStrategy::Aabb => Ok(create_aabb(mesh)),
    }
}

/// Generate a collision shape from a robot link's collision geometry.
///
/// Mesh references are resolved relative to `asset_dir` and reduced to
/// their convex hull; a dynamic actor does not need a concave shape.
pub fn geometry_to_collider(
    geometry: &Geometry,
    asset_dir: &Path,
    name: &str,
) -> Result<SharedShape, PhysicsError> {
    match geometry {
        Geometry::Box { size } => Ok(SharedShape::cuboid(
            size[0] / 2.0,
            size[1] / 2.0,
            size[2] / 2.0,
        )),
        // Parry cylinders run along +Y; robot descriptions use +Z.
        Geometry::Cylinder { radius, length } => {
            let upright = Isometry3::rotation(Vector3::x() * FRAC_PI_2);
            Ok(SharedShape::compound(vec![(
                upright,
                SharedShape::cylinder(length / 2.0, *radius),
            )]))
        }
        Geometry::Sphere { radius } => Ok(SharedShape::ball(*radius)),
        Geometry::Mesh { filename, scale } => {
            let mut mesh = load_obj(asset_dir.join(filename))?;
            // Per-axis scales are uniform in practice; apply the X factor.
            mesh.scale(scale[0]);
            create_convex_hull(&mesh, name)
        }
    }
}

fn mesh_points(mesh: &TriangleMesh) -> Vec<Point3<f32>> {
    mesh.vertices
        .chunks(3)
        .map(|v| Point3::new(v[0], v[1], v[2]))
        .collect()
}

fn create_trimesh(mesh: &TriangleMesh, name: &str) -> Result<SharedShape, PhysicsError> {
    let vertices = mesh_points(mesh);
    let indices: Vec<[u32; 3]> = mesh.indices.chunks(3).map(|i| [i[0], i[1], i[2]]).collect();

    match TriMesh::new(vertices, indices) {
        Ok(trimesh) => Ok(SharedShape::new(trimesh)),
        Err(e) => Err(PhysicsError::CollisionShape {
            name: name.to_string(),
            reason: format!("failed to create trimesh: {:?}", e),
        }),
    }
}

fn create_convex_hull(mesh: &TriangleMesh, name: &str) -> Result<SharedShape, PhysicsError> {
    let points = mesh_points(mesh);
    if points.len() < 4 {
        return Err(PhysicsError::CollisionShape {
            name: name.to_string(),
            reason: "need at least 4 points for convex hull".to_string(),
        });
    }

    match ConvexPolyhedron::from_convex_hull(&points) {
        Some(hull) => Ok(SharedShape::new(hull)),
        // Degenerate geometry falls back to the bounding box.
        None => Ok(create_aabb(mesh)),
    }
}

fn create_aabb(mesh: &TriangleMesh) -> SharedShape {
    let (min, max) = mesh
        .bounds()
        .unwrap_or(([0.0; 3], [0.0; 3]));
    SharedShape::cuboid(
        (max[0] - min[0]) / 2.0,
        (max[1] - min[1]) / 2.0,
        (max[2] - min[2]) / 2.0,
    )
}
