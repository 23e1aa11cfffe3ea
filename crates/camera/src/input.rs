use glam::Vec2;
use tracing::trace;

use crate::controller::CameraController;

/// Pointer button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other(u16),
}

/// Keys the controller understands. Anything else arrives as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    Q,
    E,
    Z,
    X,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Other,
}

/// Navigation directions driven by held keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
    ZoomIn,
    ZoomOut,
}

impl NavKey {
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::W | KeyCode::ArrowUp => Some(NavKey::Forward),
            KeyCode::S | KeyCode::ArrowDown => Some(NavKey::Backward),
            KeyCode::A | KeyCode::ArrowLeft => Some(NavKey::Left),
            KeyCode::D | KeyCode::ArrowRight => Some(NavKey::Right),
            KeyCode::Q => Some(NavKey::Up),
            KeyCode::E => Some(NavKey::Down),
            KeyCode::Z => Some(NavKey::ZoomIn),
            KeyCode::X => Some(NavKey::ZoomOut),
            KeyCode::Other => None,
        }
    }
}

/// Raw input delivered by the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { button: PointerButton, position: Vec2 },
    PointerUp { button: PointerButton },
    PointerMove { position: Vec2 },
    /// Positive values zoom out.
    Wheel { delta_y: f32 },
    KeyDown(KeyCode),
    KeyUp(KeyCode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Orbit,
    Pan,
}

/// Cursor affordance for the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    Grabbing,
    Move,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub zoom_in: bool,
    pub zoom_out: bool,
}

impl HeldKeys {
    pub fn is_held(&self, key: NavKey) -> bool {
        match key {
            NavKey::Forward => self.forward,
            NavKey::Backward => self.backward,
            NavKey::Left => self.left,
            NavKey::Right => self.right,
            NavKey::Up => self.up,
            NavKey::Down => self.down,
            NavKey::ZoomIn => self.zoom_in,
            NavKey::ZoomOut => self.zoom_out,
        }
    }

    pub fn set(&mut self, key: NavKey, held: bool) {
        let slot = match key {
            NavKey::Forward => &mut self.forward,
            NavKey::Backward => &mut self.backward,
            NavKey::Left => &mut self.left,
            NavKey::Right => &mut self.right,
            NavKey::Up => &mut self.up,
            NavKey::Down => &mut self.down,
            NavKey::ZoomIn => &mut self.zoom_in,
            NavKey::ZoomOut => &mut self.zoom_out,
        };
        *slot = held;
    }

    pub fn any(&self) -> bool {
        *self != Self::default()
    }
}

/// Motion accumulated by the handlers since the last frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct PendingMotion {
    pub orbit: Vec2,
    pub pan: Vec2,
    pub wheel: f32,
}

/// Button, cursor and key state between frames.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    primary_down: bool,
    secondary_down: bool,
    last_cursor: Option<Vec2>,
    keys: HeldKeys,
    pending: PendingMotion,
}

impl InputState {
    /// Primary wins when both buttons are down.
    pub fn drag_mode(&self) -> Option<DragMode> {
        if self.primary_down {
            Some(DragMode::Orbit)
        } else if self.secondary_down {
            Some(DragMode::Pan)
        } else {
            None
        }
    }

    pub fn keys(&self) -> &HeldKeys {
        &self.keys
    }

    pub fn last_cursor(&self) -> Option<Vec2> {
        self.last_cursor
    }

    pub(crate) fn take_pending(&mut self) -> PendingMotion {
        std::mem::take(&mut self.pending)
    }

    /// Forget every press, drag and pending delta.
    pub(crate) fn release_all(&mut self) {
        *self = Self::default();
    }

    fn press(&mut self, button: PointerButton, position: Vec2) -> bool {
        match button {
            PointerButton::Primary => self.primary_down = true,
            PointerButton::Secondary => self.secondary_down = true,
            _ => return false,
        }
        self.last_cursor = Some(position);
        true
    }

    fn release(&mut self, button: PointerButton) -> bool {
        match button {
            PointerButton::Primary => self.primary_down = false,
            PointerButton::Secondary => self.secondary_down = false,
            _ => return false,
        }
        if self.drag_mode().is_none() {
            self.last_cursor = None;
        }
        true
    }

    fn drag_to(&mut self, position: Vec2) -> bool {
        let Some(mode) = self.drag_mode() else {
            return false;
        };
        let last = self.last_cursor.replace(position).unwrap_or(position);
        let delta = position - last;
        match mode {
            DragMode::Orbit => self.pending.orbit += delta,
            DragMode::Pan => self.pending.pan += delta,
        }
        true
    }
}

impl CameraController {
    /// Route a raw input event. Returns true when the controller consumed it.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::PointerDown { button, position } => self.pointer_down(button, position),
            InputEvent::PointerUp { button } => self.pointer_up(button),
            InputEvent::PointerMove { position } => self.pointer_move(position),
            InputEvent::Wheel { delta_y } => self.wheel(delta_y),
            InputEvent::KeyDown(key) => self.key_down(key),
            InputEvent::KeyUp(key) => self.key_up(key),
        }
    }

    pub fn pointer_down(&mut self, button: PointerButton, position: Vec2) -> bool {
        if self.input_locked() || !position.is_finite() {
            return false;
        }
        self.input.press(button, position)
    }

    /// Releases are honoured even while locked so nothing stays stuck.
    pub fn pointer_up(&mut self, button: PointerButton) -> bool {
        self.input.release(button)
    }

    pub fn pointer_move(&mut self, position: Vec2) -> bool {
        if self.input_locked() || !position.is_finite() {
            return false;
        }
        self.input.drag_to(position)
    }

    pub fn wheel(&mut self, delta_y: f32) -> bool {
        if self.input_locked() || !delta_y.is_finite() {
            return false;
        }
        self.input.pending.wheel += delta_y;
        true
    }

    pub fn key_down(&mut self, key: KeyCode) -> bool {
        if self.input_locked() {
            return false;
        }
        let Some(nav) = NavKey::from_key(key) else {
            return false;
        };
        trace!(?nav, "nav key down");
        self.input.keys.set(nav, true);
        true
    }

    pub fn key_up(&mut self, key: KeyCode) -> bool {
        let Some(nav) = NavKey::from_key(key) else {
            return false;
        };
        self.input.keys.set(nav, false);
        true
    }

    pub fn cursor_hint(&self) -> CursorHint {
        if self.input_locked() {
            return CursorHint::Default;
        }
        match self.input.drag_mode() {
            Some(DragMode::Orbit) => CursorHint::Grabbing,
            Some(DragMode::Pan) => CursorHint::Move,
            None => CursorHint::Default,
        }
    }
}
