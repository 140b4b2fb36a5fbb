//! Debug depth rendering through the engine's query pipeline.
//!
//! One engine ray per pixel against the world's collision structures; no
//! rasterizer. This is the headful counterpart of the camera-image request
//! a windowed physics backend would serve.

use crate::camera::DebugView;
use crate::world::SimWorld;

/// Default debug image edge length in pixels.
pub const DEBUG_IMAGE_SIZE: u32 = 256;

/// A rendered depth image, row-major with row 0 at the top.
#[derive(Debug, Clone)]
pub struct DepthImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Hit distance per pixel; misses hold the far-plane distance.
    pub depth: Vec<f32>,
}

impl DepthImage {
    /// Normalize to 8-bit grayscale, near = bright, for snapshot dumps.
    pub fn to_luma8(&self) -> Vec<u8> {
        let far = self
            .depth
            .iter()
            .cloned()
            .fold(f32::EPSILON, f32::max);
        self.depth
            .iter()
            .map(|&d| (255.0 * (1.0 - d / far)) as u8)
            .collect()
    }
}

/// Render a depth image of the world from the debug view's camera.
pub fn render_depth(world: &SimWorld, view: &DebugView, width: u32, height: u32) -> DepthImage {
    let camera = view.camera();
    let bounds = view.projection_bounds();
    let mut depth = Vec::with_capacity((width * height) as usize);

    for row in 0..height {
        // Row 0 maps to the top clip plane.
        let v = bounds.top
            - (bounds.top - bounds.bottom) * ((row as f32 + 0.5) / height as f32);
        for col in 0..width {
            let u = bounds.left
                + (bounds.right - bounds.left) * ((col as f32 + 0.5) / width as f32);

            let dir = (camera.forward * bounds.near + camera.right * u + camera.up * v)
                .normalize();
            let d = world
                .cast_ray(camera.eye, dir, bounds.far)
                .unwrap_or(bounds.far);
            depth.push(d);
        }
    }

    DepthImage {
        width,
        height,
        depth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use roversim_mesh::TriangleMesh;

    fn wall_world() -> SimWorld {
        // A vertical 20x20 m wall in the YZ plane at x = 5.
        let s = 10.0;
        let mesh = TriangleMesh {
            vertices: vec![
                5.0, -s, -s, 5.0, s, -s, 5.0, s, s, 5.0, -s, s,
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
        };
        let mut world = SimWorld::new(Vector3::zeros());
        world.add_environment(&mesh).unwrap();
        world.step(1.0 / 240.0);
        world
    }

    #[test]
    fn test_center_pixel_hits_wall() {
        let world = wall_world();
        let mut view = DebugView::new();
        // Look straight down +X from the origin at the wall.
        view.reposition([0.0, 0.0, 0.0]);
        view.distance.set(1.0);
        view.yaw.set(0.0);
        view.pitch.set(0.0);

        let image = render_depth(&world, &view, 9, 9);
        assert_eq!(image.depth.len(), 81);

        // Camera sits 1 m behind the focus, so the wall is 6 m away.
        let center = image.depth[(9 * 4 + 4) as usize];
        assert!((center - 6.0).abs() < 0.1, "center depth = {}", center);
    }

    #[test]
    fn test_miss_is_far_plane() {
        let world = wall_world();
        let mut view = DebugView::new();
        // Look away from the wall.
        view.reposition([0.0, 0.0, 0.0]);
        view.distance.set(1.0);
        view.yaw.set(180.0);
        view.pitch.set(0.0);

        let image = render_depth(&world, &view, 3, 3);
        let center = image.depth[4];
        assert_eq!(center, view.projection_bounds().far);
    }

    #[test]
    fn test_luma_inverts_depth() {
        let image = DepthImage {
            width: 2,
            height: 1,
            depth: vec![1.0, 128.0],
        };
        let luma = image.to_luma8();
        assert!(luma[0] > luma[1]);
        assert_eq!(luma[1], 0);
    }
}
