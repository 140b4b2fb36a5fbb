//! Debug camera: slider parameters and view/projection matrices.

use nalgebra::{Isometry3, Matrix4, Point3, Vector3};

/// A numeric debug parameter with a clamped range.
#[derive(Debug, Clone)]
pub struct Slider {
    /// Display label.
    pub label: &'static str,
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
    value: f32,
}

impl Slider {
    /// Create a slider with its range and initial value.
    pub fn new(label: &'static str, min: f32, max: f32, initial: f32) -> Self {
        Self {
            label,
            min,
            max,
            value: initial.clamp(min, max),
        }
    }

    /// Read the current value.
    pub fn read(&self) -> f32 {
        self.value
    }

    /// Set the value, clamped to the slider's range.
    pub fn set(&mut self, value: f32) {
        self.value = value.clamp(self.min, self.max);
    }
}

/// An orbit camera: eye position and orthonormal basis derived from
/// distance/yaw/pitch around a focus point, Z up.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    /// Eye position.
    pub eye: Point3<f32>,
    /// Unit vector from the eye toward the focus.
    pub forward: Vector3<f32>,
    /// Unit vector to the right of the view.
    pub right: Vector3<f32>,
    /// Unit up vector of the view.
    pub up: Vector3<f32>,
}

impl OrbitCamera {
    /// Place the camera `distance` meters from `focus` at the given yaw and
    /// pitch (degrees). Negative pitch raises the eye above the focus.
    pub fn around(focus: Point3<f32>, distance: f32, yaw_deg: f32, pitch_deg: f32) -> Self {
        let yaw = yaw_deg.to_radians();
        let pitch = pitch_deg.to_radians();

        let offset = Vector3::new(
            pitch.cos() * yaw.cos(),
            pitch.cos() * yaw.sin(),
            pitch.sin(),
        ) * distance;
        let eye = focus - offset;

        let forward = (focus - eye).normalize();
        let world_up = Vector3::z();
        let right = forward.cross(&world_up).normalize();
        let up = right.cross(&forward);

        Self {
            eye,
            forward,
            right,
            up,
        }
    }

    /// Right-handed look-at view matrix for this camera.
    pub fn view_matrix(&self, focus: Point3<f32>) -> Matrix4<f32> {
        Isometry3::look_at_rh(&self.eye, &focus, &Vector3::z()).to_homogeneous()
    }
}

/// Perspective frustum projection from clip-plane bounds.
pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Matrix4<f32> {
    let mut m = Matrix4::zeros();
    m[(0, 0)] = 2.0 * near / (right - left);
    m[(0, 2)] = (right + left) / (right - left);
    m[(1, 1)] = 2.0 * near / (top - bottom);
    m[(1, 2)] = (top + bottom) / (top - bottom);
    m[(2, 2)] = -(far + near) / (far - near);
    m[(2, 3)] = -2.0 * far * near / (far - near);
    m[(3, 2)] = -1.0;
    m
}

/// The debug view: three live sliders, a focus point, and the fixed
/// projection used for every debug render.
pub struct DebugView {
    /// Camera distance slider.
    pub distance: Slider,
    /// Camera yaw slider (degrees).
    pub yaw: Slider,
    /// Camera pitch slider (degrees).
    pub pitch: Slider,
    focus: Point3<f32>,
    projection: ProjectionBounds,
}

/// Clip-plane bounds of a projection frustum.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionBounds {
    /// Left clip plane at the near distance.
    pub left: f32,
    /// Right clip plane at the near distance.
    pub right: f32,
    /// Bottom clip plane at the near distance.
    pub bottom: f32,
    /// Top clip plane at the near distance.
    pub top: f32,
    /// Near plane distance.
    pub near: f32,
    /// Far plane distance.
    pub far: f32,
}

/// Fixed projection used by the debug view.
pub const DEBUG_PROJECTION: ProjectionBounds = ProjectionBounds {
    left: -0.01,
    right: 0.01,
    bottom: -0.01,
    top: 0.01,
    near: 0.01,
    far: 128.0,
};

impl DebugView {
    /// Create the debug view with its slider ranges and defaults.
    pub fn new() -> Self {
        Self {
            distance: Slider::new("Distance", 0.0, 15.0, 4.0),
            yaw: Slider::new("Camera Yaw", -180.0, 180.0, -45.0),
            pitch: Slider::new("Camera Pitch", -90.0, 90.0, -30.0),
            focus: Point3::origin(),
            projection: DEBUG_PROJECTION,
        }
    }

    /// Move the camera focus (typically to the actor position).
    pub fn reposition(&mut self, focus: [f32; 3]) {
        self.focus = Point3::new(focus[0], focus[1], focus[2]);
    }

    /// The current focus point.
    pub fn focus(&self) -> Point3<f32> {
        self.focus
    }

    /// The camera placement from the current slider values.
    pub fn camera(&self) -> OrbitCamera {
        OrbitCamera::around(
            self.focus,
            self.distance.read(),
            self.yaw.read(),
            self.pitch.read(),
        )
    }

    /// View matrix from the current slider values.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.camera().view_matrix(self.focus)
    }

    /// Projection matrix for the fixed frustum.
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let b = self.projection;
        frustum(b.left, b.right, b.bottom, b.top, b.near, b.far)
    }

    /// The fixed frustum bounds.
    pub fn projection_bounds(&self) -> ProjectionBounds {
        self.projection
    }
}

impl Default for DebugView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_slider_clamps() {
        let mut slider = Slider::new("Distance", 0.0, 15.0, 4.0);
        assert_eq!(slider.read(), 4.0);
        slider.set(20.0);
        assert_eq!(slider.read(), 15.0);
        slider.set(-3.0);
        assert_eq!(slider.read(), 0.0);
    }

    #[test]
    fn test_orbit_distance_preserved() {
        let focus = Point3::new(1.0, 2.0, 3.0);
        let cam = OrbitCamera::around(focus, 4.0, -45.0, -30.0);
        assert_relative_eq!((cam.eye - focus).norm(), 4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_negative_pitch_raises_eye() {
        let focus = Point3::origin();
        let cam = OrbitCamera::around(focus, 4.0, 0.0, -30.0);
        assert!(cam.eye.z > 0.0);
        // Looking down toward the focus.
        assert!(cam.forward.z < 0.0);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let cam = OrbitCamera::around(Point3::origin(), 4.0, -45.0, -30.0);
        assert_relative_eq!(cam.forward.norm(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(cam.right.norm(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(cam.up.norm(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(cam.forward.dot(&cam.right), 0.0, epsilon = 1e-5);
        assert_relative_eq!(cam.forward.dot(&cam.up), 0.0, epsilon = 1e-5);
        assert_relative_eq!(cam.right.dot(&cam.up), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_frustum_shape() {
        let m = frustum(-0.01, 0.01, -0.01, 0.01, 0.01, 128.0);
        // Symmetric frustum has no off-axis skew terms.
        assert_eq!(m[(0, 2)], 0.0);
        assert_eq!(m[(1, 2)], 0.0);
        assert_eq!(m[(3, 2)], -1.0);
        assert_relative_eq!(m[(0, 0)], 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_debug_view_defaults() {
        let view = DebugView::new();
        assert_eq!(view.distance.read(), 4.0);
        assert_eq!(view.yaw.read(), -45.0);
        assert_eq!(view.pitch.read(), -30.0);
        assert_eq!(view.projection_bounds().far, 128.0);
    }
}
