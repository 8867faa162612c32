/// Terminal event translation: keys and mouse into viewer commands
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use meshview_core::{Command, HeldKeys, ZoomStep};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Without release events, a key counts as held this long after its last
/// press or auto-repeat
pub const HOLD_WINDOW: Duration = Duration::from_millis(150);

/// Key bindings shown on startup
pub const CONTROLS: &[(&str, &str)] = &[
    ("1-9", "switch model slot"),
    ("arrows", "rotate"),
    ("w a s d", "pan"),
    ("mouse drag", "pan"),
    ("mouse wheel", "zoom (fine)"),
    ("PgUp / PgDn", "zoom (coarse)"),
    ("q / e", "scale model up / down"),
    ("shift+a", "cycle auto rotate / orbit"),
    ("space", "toggle wireframe"),
    ("v", "toggle vertices"),
    ("n", "toggle normals"),
    ("l", "toggle lighting"),
    ("c", "cycle colors"),
    ("b", "cycle background"),
    ("shift+s", "save screenshot"),
    ("r", "reset view"),
    ("+ / -", "rotation speed"),
    ("esc", "quit"),
];

/// Keys that act every frame while held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionKey {
    RotateLeft,
    RotateRight,
    RotateUp,
    RotateDown,
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
}

impl MotionKey {
    fn from_key(event: &KeyEvent) -> Option<Self> {
        match event.code {
            KeyCode::Left => Some(Self::RotateLeft),
            KeyCode::Right => Some(Self::RotateRight),
            KeyCode::Up => Some(Self::RotateUp),
            KeyCode::Down => Some(Self::RotateDown),
            // Shifted letters are commands, not motion
            KeyCode::Char('a') if !shifted(event) => Some(Self::PanLeft),
            KeyCode::Char('d') if !shifted(event) => Some(Self::PanRight),
            KeyCode::Char('w') if !shifted(event) => Some(Self::PanUp),
            KeyCode::Char('s') if !shifted(event) => Some(Self::PanDown),
            _ => None,
        }
    }
}

fn shifted(event: &KeyEvent) -> bool {
    event.modifiers.contains(KeyModifiers::SHIFT)
}

/// The same key with shift taken off
fn unshifted(event: &KeyEvent) -> KeyEvent {
    let code = match event.code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        code => code,
    };
    KeyEvent {
        code,
        modifiers: event.modifiers.difference(KeyModifiers::SHIFT),
        ..*event
    }
}

/// Map a key press to a discrete command
pub fn command_for_key(event: &KeyEvent) -> Option<Command> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    // Depending on the terminal, shift+a arrives as 'A' or as 'a' with SHIFT
    let code = match event.code {
        KeyCode::Char(c) if shifted(event) => KeyCode::Char(c.to_ascii_uppercase()),
        code => code,
    };

    let command = match code {
        KeyCode::Esc => Command::Quit,
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,
        KeyCode::Char(' ') => Command::ToggleWireframe,
        KeyCode::Char('v') => Command::ToggleVertices,
        KeyCode::Char('n') => Command::ToggleNormals,
        KeyCode::Char('l') => Command::ToggleLighting,
        KeyCode::Char('c') => Command::CycleColors,
        KeyCode::Char('b') => Command::CycleBackground,
        KeyCode::Char('S') => Command::Snapshot,
        KeyCode::Char('A') => Command::CycleAutoMode,
        KeyCode::Char('r') => Command::Reset,
        KeyCode::Char('+') | KeyCode::Char('=') => Command::SpeedUp,
        KeyCode::Char('-') => Command::SpeedDown,
        KeyCode::Char('q') => Command::ScaleUp,
        KeyCode::Char('e') => Command::ScaleDown,
        KeyCode::PageUp => Command::ZoomIn(ZoomStep::Coarse),
        KeyCode::PageDown => Command::ZoomOut(ZoomStep::Coarse),
        KeyCode::Char(digit @ '1'..='9') => Command::SelectModel(digit as usize - '1' as usize),
        _ => return None,
    };
    Some(command)
}

/// Map a mouse event to a command. Cell positions are scaled to framebuffer
/// pixels so drag deltas are in the same units as the pan offset.
pub fn command_for_mouse(event: &MouseEvent, cell_size: (f32, f32)) -> Option<Command> {
    let x = (event.column as f32 * cell_size.0) as i32;
    let y = (event.row as f32 * cell_size.1) as i32;
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Command::DragStart { x, y }),
        MouseEventKind::Drag(MouseButton::Left) => Some(Command::DragMove { x, y }),
        MouseEventKind::Up(MouseButton::Left) => Some(Command::DragEnd),
        MouseEventKind::ScrollUp => Some(Command::ZoomIn(ZoomStep::Fine)),
        MouseEventKind::ScrollDown => Some(Command::ZoomOut(ZoomStep::Fine)),
        _ => None,
    }
}

/// Tracks which motion keys are down.
///
/// Terminals that report key releases give exact state; others only send
/// presses and auto-repeats, so a key stays held for [`HOLD_WINDOW`] after
/// the last one.
#[derive(Debug)]
pub struct KeyTracker {
    release_events: bool,
    last_seen: HashMap<MotionKey, Instant>,
}

impl KeyTracker {
    pub fn new(release_events: bool) -> Self {
        Self {
            release_events,
            last_seen: HashMap::new(),
        }
    }

    pub fn record(&mut self, event: &KeyEvent, now: Instant) {
        match event.kind {
            KeyEventKind::Release => {
                // Shift may have gone down while the key was held, so the
                // release can arrive as 'S' for a press of 's'
                if let Some(key) = MotionKey::from_key(&unshifted(event)) {
                    self.last_seen.remove(&key);
                }
            }
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if let Some(key) = MotionKey::from_key(event) {
                    self.last_seen.insert(key, now);
                }
            }
        }
    }

    /// Forget everything, e.g. when the terminal loses focus
    pub fn clear(&mut self) {
        self.last_seen.clear();
    }

    pub fn is_held(&self, key: MotionKey, now: Instant) -> bool {
        match self.last_seen.get(&key) {
            Some(_) if self.release_events => true,
            Some(seen) => now.saturating_duration_since(*seen) < HOLD_WINDOW,
            None => false,
        }
    }

    pub fn held(&self, now: Instant) -> HeldKeys {
        HeldKeys {
            rotate_left: self.is_held(MotionKey::RotateLeft, now),
            rotate_right: self.is_held(MotionKey::RotateRight, now),
            rotate_up: self.is_held(MotionKey::RotateUp, now),
            rotate_down: self.is_held(MotionKey::RotateDown, now),
            pan_left: self.is_held(MotionKey::PanLeft, now),
            pan_right: self.is_held(MotionKey::PanRight, now),
            pan_up: self.is_held(MotionKey::PanUp, now),
            pan_down: self.is_held(MotionKey::PanDown, now),
        }
    }
}
