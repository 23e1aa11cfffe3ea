//! Translation from winit window events to the camera's input vocabulary.

use camera::{CursorHint, InputEvent, KeyCode, PointerButton};
use glam::Vec2;
use winit::{
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode as WinitKey, PhysicalKey},
    window::CursorIcon,
};

/// Wheel pixels reported for one line of a notched wheel.
const PIXELS_PER_LINE: f32 = 100.0;

/// Shell-level commands bound to keys the camera does not use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    /// Focus the n-th catalog body (zero based).
    FocusBody(usize),
    ExitFocus,
}

pub fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        MouseButton::Other(n) => Some(PointerButton::Other(n)),
        _ => None,
    }
}

pub fn key_code(key: WinitKey) -> KeyCode {
    match key {
        WinitKey::KeyW => KeyCode::W,
        WinitKey::KeyA => KeyCode::A,
        WinitKey::KeyS => KeyCode::S,
        WinitKey::KeyD => KeyCode::D,
        WinitKey::KeyQ => KeyCode::Q,
        WinitKey::KeyE => KeyCode::E,
        WinitKey::KeyZ => KeyCode::Z,
        WinitKey::KeyX => KeyCode::X,
        WinitKey::ArrowUp => KeyCode::ArrowUp,
        WinitKey::ArrowDown => KeyCode::ArrowDown,
        WinitKey::ArrowLeft => KeyCode::ArrowLeft,
        WinitKey::ArrowRight => KeyCode::ArrowRight,
        _ => KeyCode::Other,
    }
}

pub fn shell_command(key: WinitKey) -> Option<ShellCommand> {
    let index = match key {
        WinitKey::Escape => return Some(ShellCommand::ExitFocus),
        WinitKey::Digit1 => 0,
        WinitKey::Digit2 => 1,
        WinitKey::Digit3 => 2,
        WinitKey::Digit4 => 3,
        WinitKey::Digit5 => 4,
        WinitKey::Digit6 => 5,
        WinitKey::Digit7 => 6,
        WinitKey::Digit8 => 7,
        WinitKey::Digit9 => 8,
        _ => return None,
    };
    Some(ShellCommand::FocusBody(index))
}

/// Positive result zooms out, matching the browser convention.
pub fn wheel_delta(delta: &MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -*y * PIXELS_PER_LINE,
        MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
    }
}

pub fn cursor_icon(hint: CursorHint) -> CursorIcon {
    match hint {
        CursorHint::Default => CursorIcon::Default,
        CursorHint::Grabbing => CursorIcon::Grabbing,
        CursorHint::Move => CursorIcon::Move,
    }
}

/// Camera input carried by a window event, if any. Button presses are
/// placed at `cursor`, the last known pointer position.
pub fn camera_event(event: &WindowEvent, cursor: Vec2) -> Option<InputEvent> {
    match event {
        WindowEvent::MouseInput { state, button, .. } => {
            let button = pointer_button(*button)?;
            match state {
                ElementState::Pressed => Some(InputEvent::PointerDown {
                    button,
                    position: cursor,
                }),
                ElementState::Released => Some(InputEvent::PointerUp { button }),
            }
        }
        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::PointerMove {
            position: Vec2::new(position.x as f32, position.y as f32),
        }),
        WindowEvent::MouseWheel { delta, .. } => Some(InputEvent::Wheel {
            delta_y: wheel_delta(delta),
        }),
        WindowEvent::KeyboardInput { event, .. } => {
            let PhysicalKey::Code(code) = event.physical_key else {
                return None;
            };
            let key = key_code(code);
            match event.state {
                ElementState::Pressed => Some(InputEvent::KeyDown(key)),
                ElementState::Released => Some(InputEvent::KeyUp(key)),
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn navigation_keys_map_to_camera_keys() {
        assert_eq!(key_code(WinitKey::KeyW), KeyCode::W);
        assert_eq!(key_code(WinitKey::ArrowRight), KeyCode::ArrowRight);
        assert_eq!(key_code(WinitKey::KeyF), KeyCode::Other);
    }

    #[test]
    fn digits_and_escape_are_shell_commands() {
        assert_eq!(
            shell_command(WinitKey::Digit1),
            Some(ShellCommand::FocusBody(0))
        );
        assert_eq!(
            shell_command(WinitKey::Digit7),
            Some(ShellCommand::FocusBody(6))
        );
        assert_eq!(
            shell_command(WinitKey::Escape),
            Some(ShellCommand::ExitFocus)
        );
        assert_eq!(shell_command(WinitKey::KeyW), None);
    }

    #[test]
    fn scrolling_up_zooms_in() {
        assert_eq!(wheel_delta(&MouseScrollDelta::LineDelta(0.0, 1.0)), -100.0);
        let pixels = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -42.0));
        assert_eq!(wheel_delta(&pixels), 42.0);
    }

    #[test]
    fn mouse_buttons_follow_primary_secondary() {
        assert_eq!(
            pointer_button(MouseButton::Left),
            Some(PointerButton::Primary)
        );
        assert_eq!(
            pointer_button(MouseButton::Right),
            Some(PointerButton::Secondary)
        );
        assert_eq!(pointer_button(MouseButton::Back), None);
    }
}
