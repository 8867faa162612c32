/// Model orientation and the fixed yaw-then-pitch rotation
use nalgebra::{Point3, Rotation3, Vector3};

/// Rotation state around two axes (in radians)
///
/// `x` is the pitch about the X axis and `y` the yaw about the Y axis. Angles
/// are unbounded; only their sine and cosine are ever used.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }
}

/// Rotation helpers for the viewer's camera model
pub struct Transform;

impl Transform {
    /// Apply yaw in the XZ plane, then pitch in the YZ plane
    pub fn rotate_point(rotation: &RotationState, point: &Point3<f32>) -> Point3<f32> {
        let (sin_y, cos_y) = rotation.y.sin_cos();
        let (sin_x, cos_x) = rotation.x.sin_cos();

        let x = point.x * cos_y - point.z * sin_y;
        let z = point.x * sin_y + point.z * cos_y;

        let y = point.y * cos_x - z * sin_x;
        let z = point.y * sin_x + z * cos_x;

        Point3::new(x, y, z)
    }

    /// The same rotation as [`Transform::rotate_point`], as a matrix
    pub fn rotation_matrix(rotation: &RotationState) -> Rotation3<f32> {
        // Yaw in this model turns x toward -z, which is a negative right-handed
        // rotation about +Y.
        let yaw = Rotation3::from_axis_angle(&Vector3::y_axis(), -rotation.y);
        let pitch = Rotation3::from_axis_angle(&Vector3::x_axis(), rotation.x);
        pitch * yaw
    }
}
