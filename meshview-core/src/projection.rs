/// Camera model and perspective projection onto the viewport
use nalgebra::{Point2, Point3};

use crate::transform::{RotationState, Transform};

/// Perspective numerator: at the default distance of 5 a unit coordinate
/// spans 40 pixels
pub const FOCAL_LENGTH: f32 = 200.0;

/// Depth substituted for points at or behind the camera plane
pub const NEAR_EPSILON: f32 = 0.001;

pub const DEFAULT_CAMERA_DISTANCE: f32 = 5.0;

/// Size of the drawing area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Integer center, as used for screen placement
    pub fn center(&self) -> (i32, i32) {
        ((self.width / 2) as i32, (self.height / 2) as i32)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// A vertex after projection: pixel position plus camera-space depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub x: i32,
    pub y: i32,
    pub depth: f32,
}

impl ProjectedPoint {
    pub fn screen(&self) -> Point2<i32> {
        Point2::new(self.x, self.y)
    }
}

/// Project a point through the viewer's camera model.
///
/// Yaw is applied first, then pitch; the result is pushed `camera_distance`
/// along +Z and divided by depth. Screen y grows downward. The returned depth
/// is the unclamped z, so points behind the camera still sort correctly.
#[allow(clippy::too_many_arguments)]
pub fn project(
    point: &Point3<f32>,
    angle_x: f32,
    angle_y: f32,
    pan_x: i32,
    pan_y: i32,
    scale: f32,
    camera_distance: f32,
    viewport: Viewport,
) -> ProjectedPoint {
    let rotated = Transform::rotate_point(&RotationState::new(angle_x, angle_y), point);
    let depth = rotated.z + camera_distance;
    let z = if depth <= 0.0 { NEAR_EPSILON } else { depth };

    let factor = FOCAL_LENGTH / z * scale;
    let (cx, cy) = viewport.center();
    ProjectedPoint {
        x: to_pixel(cx as f32 + rotated.x * factor + pan_x as f32),
        y: to_pixel(cy as f32 + rotated.y * factor + pan_y as f32),
        depth,
    }
}

/// Round to the nearest pixel, saturating at the `i32` range
fn to_pixel(value: f32) -> i32 {
    value.round().clamp(i32::MIN as f32, i32::MAX as f32) as i32
}

/// Camera configuration for the viewer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub rotation: RotationState,
    /// Screen-space offset in pixels
    pub pan: (i32, i32),
    /// Uniform model scale
    pub scale: f32,
    pub distance: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            rotation: RotationState::zero(),
            pan: (0, 0),
            scale: 1.0,
            distance: DEFAULT_CAMERA_DISTANCE,
        }
    }

    /// Project a 3D point to 2D screen space
    pub fn project(&self, point: &Point3<f32>, viewport: Viewport) -> ProjectedPoint {
        project(
            point,
            self.rotation.x,
            self.rotation.y,
            self.pan.0,
            self.pan.1,
            self.scale,
            self.distance,
            viewport,
        )
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_origin_projects_to_center() {
        let viewport = Viewport::new(800, 600);
        let p = project(&Point3::origin(), 0.0, 0.0, 0, 0, 1.0, 5.0, viewport);
        assert_eq!((p.x, p.y), (400, 300));
        assert_relative_eq!(p.depth, 5.0);
    }

    #[test]
    fn test_perspective_and_pan() {
        let camera = Camera {
            pan: (10, -20),
            scale: 2.0,
            ..Camera::new()
        };
        let p = camera.project(&Point3::new(1.0, 1.0, 0.0), Viewport::new(800, 600));
        // 200 / 5 * 2 = 80 pixels per unit
        assert_eq!((p.x, p.y), (400 + 80 + 10, 300 + 80 - 20));
    }

    #[test]
    fn test_behind_camera_clamped_but_depth_kept() {
        let p = project(
            &Point3::new(0.0, 0.0, -6.0),
            0.0,
            0.0,
            0,
            0,
            1.0,
            5.0,
            Viewport::default(),
        );
        assert_relative_eq!(p.depth, -1.0);
        assert_eq!((p.x, p.y), (400, 300));

        let p = project(
            &Point3::new(0.001, 0.0, -5.0),
            0.0,
            0.0,
            0,
            0,
            1.0,
            5.0,
            Viewport::default(),
        );
        // 0.001 * 200 / 0.001
        assert_eq!(p.x, 600);
    }

    #[test]
    fn test_extreme_points_saturate() {
        // depth of a few ulps in front of the camera
        let p = project(
            &Point3::new(1.0, 0.0, -0.99999994),
            0.0,
            0.0,
            0,
            0,
            1.0,
            1.0,
            Viewport::default(),
        );
        assert_eq!(p.x, i32::MAX);
        assert_eq!(p.y, 300);

        let p = project(
            &Point3::new(-2.0, 2.0, -5.0),
            0.0,
            0.0,
            -10,
            10,
            1.1f32.powi(100),
            5.0,
            Viewport::default(),
        );
        assert_eq!((p.x, p.y), (i32::MIN, i32::MAX));

        let camera = Camera {
            pan: (i32::MAX, 0),
            ..Camera::new()
        };
        let p = camera.project(&Point3::new(1.0, 0.0, 0.0), Viewport::default());
        assert_eq!(p.x, i32::MAX);
    }

    #[test]
    fn test_farther_points_have_greater_depth() {
        let camera = Camera::new();
        let near = camera.project(&Point3::new(0.0, 0.0, -1.0), Viewport::default());
        let far = camera.project(&Point3::new(0.0, 0.0, 1.0), Viewport::default());
        assert!(far.depth > near.depth);
    }
}
