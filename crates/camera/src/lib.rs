//! Interactive camera rig: mouse orbit/pan/zoom around a pivot, key-driven
//! free flight, and an animated flight to an externally chosen focus target.
//!
//! Feed raw input through [`CameraController::handle_input`] (or the per-event
//! methods) and call [`CameraController::tick`] once per rendered frame.

mod controller;
mod error;
mod focus;
mod free_fly;
mod input;
mod orbit;
mod pose;

pub use controller::{CameraController, CameraEvent, FrameUpdate};
pub use error::{CameraError, CameraResult};
pub use focus::FocusState;
pub use input::{
    CursorHint, DragMode, HeldKeys, InputEvent, InputState, KeyCode, NavKey, PointerButton,
};
pub use orbit::{CameraAxes, OrbitState};
pub use pose::{CameraPose, Ray, MIN_SEPARATION};
