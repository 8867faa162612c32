/// Live camera and rendering configuration
use crate::color::{Color, BG_COLORS, COLORS};
use crate::projection::Camera;

pub const DEFAULT_ROTATION_SPEED: f32 = 0.05;
pub const MIN_ROTATION_SPEED: f32 = 0.01;
pub const MAX_ROTATION_SPEED: f32 = 0.2;
pub const MIN_SCALE: f32 = 0.1;
pub const MIN_CAMERA_DISTANCE: f32 = 0.1;

/// Continuous motion that overrides manual rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoMode {
    #[default]
    Off,
    Rotate,
    Orbit,
}

impl AutoMode {
    /// Off -> Rotate -> Orbit -> Off
    pub fn next(self) -> Self {
        match self {
            AutoMode::Off => AutoMode::Rotate,
            AutoMode::Rotate => AutoMode::Orbit,
            AutoMode::Orbit => AutoMode::Off,
        }
    }

    pub fn is_active(self) -> bool {
        self != AutoMode::Off
    }

    pub fn label(self) -> &'static str {
        match self {
            AutoMode::Off => "Off",
            AutoMode::Rotate => "rotate",
            AutoMode::Orbit => "orbit",
        }
    }
}

/// Edge, vertex and background colors with their palette positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScheme {
    pub edge: Color,
    pub vertex: Color,
    pub color_index: usize,
    pub background_index: usize,
}

impl ColorScheme {
    pub fn background(&self) -> Color {
        BG_COLORS[self.background_index % BG_COLORS.len()]
    }

    /// Advance the edge/vertex pair to the next palette entry
    pub fn cycle_colors(&mut self) {
        self.color_index = (self.color_index + 1) % COLORS.len();
        self.edge = COLORS[self.color_index];
        self.vertex = COLORS[(self.color_index + 1) % COLORS.len()];
    }

    pub fn cycle_background(&mut self) {
        self.background_index = (self.background_index + 1) % BG_COLORS.len();
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            edge: Color::WHITE,
            vertex: Color::RED,
            color_index: 0,
            background_index: 0,
        }
    }
}

/// Everything the controller mutates and the renderer reads each frame
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub camera: Camera,
    pub rotation_speed: f32,
    pub auto_mode: AutoMode,
    pub wireframe: bool,
    pub show_vertices: bool,
    pub show_normals: bool,
    pub lighting: bool,
    pub colors: ColorScheme,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            camera: Camera::new(),
            rotation_speed: DEFAULT_ROTATION_SPEED,
            auto_mode: AutoMode::Off,
            wireframe: true,
            show_vertices: true,
            show_normals: false,
            lighting: false,
            colors: ColorScheme::default(),
        }
    }

    /// Restore camera, speed and auto-mode; display toggles and colors stay
    pub fn reset_camera(&mut self) {
        self.camera = Camera::new();
        self.rotation_speed = DEFAULT_ROTATION_SPEED;
        self.auto_mode = AutoMode::Off;
    }

    pub fn adjust_rotation_speed(&mut self, delta: f32) {
        self.rotation_speed =
            (self.rotation_speed + delta).clamp(MIN_ROTATION_SPEED, MAX_ROTATION_SPEED);
    }

    /// Move the camera toward (negative) or away from (positive) the model
    pub fn adjust_distance(&mut self, delta: f32) {
        self.camera.distance = (self.camera.distance + delta).max(MIN_CAMERA_DISTANCE);
    }

    pub fn multiply_scale(&mut self, factor: f32) {
        self.camera.scale = (self.camera.scale * factor).max(MIN_SCALE);
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_mode_cycle() {
        let mode = AutoMode::default();
        assert_eq!(mode.next(), AutoMode::Rotate);
        assert_eq!(mode.next().next(), AutoMode::Orbit);
        assert_eq!(mode.next().next().next(), AutoMode::Off);
    }

    #[test]
    fn test_color_cycle_wraps() {
        let mut colors = ColorScheme::default();
        colors.cycle_colors();
        assert_eq!((colors.edge, colors.vertex), (Color::GREEN, Color::BLUE));
        for _ in 0..5 {
            colors.cycle_colors();
        }
        assert_eq!((colors.edge, colors.vertex), (Color::MAGENTA, Color::RED));
        colors.cycle_colors();
        assert_eq!(colors.color_index, 0);
    }

    #[test]
    fn test_clamps() {
        let mut view = ViewState::new();
        for _ in 0..50 {
            view.adjust_rotation_speed(0.01);
            view.adjust_distance(-0.5);
            view.multiply_scale(1.0 / 1.1);
        }
        assert_eq!(view.rotation_speed, MAX_ROTATION_SPEED);
        assert_eq!(view.camera.distance, MIN_CAMERA_DISTANCE);
        assert_eq!(view.camera.scale, MIN_SCALE);
    }

    #[test]
    fn test_reset_keeps_toggles() {
        let mut view = ViewState::new();
        view.wireframe = false;
        view.camera.pan = (4, 5);
        view.auto_mode = AutoMode::Orbit;
        view.reset_camera();
        assert_eq!(view.camera, Camera::new());
        assert_eq!(view.auto_mode, AutoMode::Off);
        assert!(!view.wireframe);
    }
}
