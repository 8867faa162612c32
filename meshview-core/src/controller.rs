/// Maps user input onto the view state
use crate::library::ModelSlots;
use crate::view::{AutoMode, ViewState};

pub const ROTATION_SPEED_STEP: f32 = 0.01;
pub const COARSE_ZOOM_STEP: f32 = 0.5;
pub const FINE_ZOOM_STEP: f32 = 0.2;
pub const SCALE_FACTOR: f32 = 1.1;
/// Pixels per frame while a pan key is held
pub const PAN_STEP: i32 = 5;
pub const AUTO_ROTATE_YAW: f32 = 0.02;
pub const AUTO_ORBIT_YAW: f32 = 0.02;
pub const AUTO_ORBIT_PITCH: f32 = 0.01;

/// Size of a zoom step: paging keys move coarsely, the wheel finely
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomStep {
    Coarse,
    Fine,
}

impl ZoomStep {
    fn amount(self) -> f32 {
        match self {
            ZoomStep::Coarse => COARSE_ZOOM_STEP,
            ZoomStep::Fine => FINE_ZOOM_STEP,
        }
    }
}

/// A discrete input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Quit,
    ToggleWireframe,
    ToggleVertices,
    ToggleNormals,
    ToggleLighting,
    CycleColors,
    CycleBackground,
    Snapshot,
    Reset,
    CycleAutoMode,
    SpeedUp,
    SpeedDown,
    ZoomIn(ZoomStep),
    ZoomOut(ZoomStep),
    ScaleUp,
    ScaleDown,
    SelectModel(usize),
    /// Primary button pressed at a pixel position
    DragStart { x: i32, y: i32 },
    /// Pointer moved to a pixel position
    DragMove { x: i32, y: i32 },
    DragEnd,
}

/// What the frame loop has to do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Continue,
    Quit,
    Snapshot,
    ModelSwitched(usize),
}

/// Direction keys currently held down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeldKeys {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub rotate_up: bool,
    pub rotate_down: bool,
    pub pan_left: bool,
    pub pan_right: bool,
    pub pan_up: bool,
    pub pan_down: bool,
}

/// Interaction state that lives between events (the drag anchor)
#[derive(Debug, Default)]
pub struct Controller {
    drag_origin: Option<(i32, i32)>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_origin.is_some()
    }

    /// Apply one discrete command
    pub fn apply(
        &mut self,
        command: Command,
        view: &mut ViewState,
        models: &mut ModelSlots,
    ) -> Response {
        match command {
            Command::Quit => return Response::Quit,
            Command::ToggleWireframe => view.wireframe = !view.wireframe,
            Command::ToggleVertices => view.show_vertices = !view.show_vertices,
            Command::ToggleNormals => view.show_normals = !view.show_normals,
            Command::ToggleLighting => view.lighting = !view.lighting,
            Command::CycleColors => {
                view.colors.cycle_colors();
                log::info!("Color changed to {:?}", view.colors.edge);
            }
            Command::CycleBackground => {
                view.colors.cycle_background();
                log::info!("Background color changed to {:?}", view.colors.background());
            }
            Command::Snapshot => return Response::Snapshot,
            Command::Reset => view.reset_camera(),
            Command::CycleAutoMode => {
                view.auto_mode = view.auto_mode.next();
                log::info!("Auto mode: {}", view.auto_mode.label());
            }
            Command::SpeedUp => {
                view.adjust_rotation_speed(ROTATION_SPEED_STEP);
                log::info!("Rotation speed: {:.2}", view.rotation_speed);
            }
            Command::SpeedDown => {
                view.adjust_rotation_speed(-ROTATION_SPEED_STEP);
                log::info!("Rotation speed: {:.2}", view.rotation_speed);
            }
            Command::ZoomIn(step) => view.adjust_distance(-step.amount()),
            Command::ZoomOut(step) => view.adjust_distance(step.amount()),
            Command::ScaleUp => {
                view.multiply_scale(SCALE_FACTOR);
                log::info!("Model scale: {:.2}", view.camera.scale);
            }
            Command::ScaleDown => {
                view.multiply_scale(1.0 / SCALE_FACTOR);
                log::info!("Model scale: {:.2}", view.camera.scale);
            }
            Command::SelectModel(index) => {
                if models.select(index) {
                    log::info!("Switched to model '{}'", models.active().name);
                    return Response::ModelSwitched(index);
                }
            }
            Command::DragStart { x, y } => self.drag_origin = Some((x, y)),
            Command::DragMove { x, y } => {
                if let Some((last_x, last_y)) = self.drag_origin {
                    view.camera.pan.0 = view.camera.pan.0.saturating_add(x - last_x);
                    view.camera.pan.1 = view.camera.pan.1.saturating_add(y - last_y);
                    self.drag_origin = Some((x, y));
                }
            }
            Command::DragEnd => self.drag_origin = None,
        }
        Response::Continue
    }

    /// Advance continuous motion by one frame
    pub fn tick(&self, held: &HeldKeys, view: &mut ViewState) {
        let speed = view.rotation_speed;
        let rotation = &mut view.camera.rotation;
        match view.auto_mode {
            AutoMode::Off => {
                let yaw = axis(held.rotate_left, held.rotate_right) as f32 * speed;
                let pitch = axis(held.rotate_up, held.rotate_down) as f32 * speed;
                rotation.rotate(pitch, yaw);
            }
            AutoMode::Rotate => rotation.rotate(0.0, AUTO_ROTATE_YAW),
            AutoMode::Orbit => rotation.rotate(AUTO_ORBIT_PITCH, AUTO_ORBIT_YAW),
        }

        let pan_x = axis(held.pan_left, held.pan_right) * PAN_STEP;
        let pan_y = axis(held.pan_up, held.pan_down) * PAN_STEP;
        view.camera.pan.0 = view.camera.pan.0.saturating_add(pan_x);
        view.camera.pan.1 = view.camera.pan.1.saturating_add(pan_y);
    }
}

/// -1, 0 or +1 from a pair of opposing keys
fn axis(negative: bool, positive: bool) -> i32 {
    positive as i32 - negative as i32
}
