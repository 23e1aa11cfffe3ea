use glam::Vec3;

use crate::input::HeldKeys;
use crate::orbit::CameraAxes;
use crate::pose::WORLD_UP;

/// Zoom keys fly at this multiple of the base speed.
const ZOOM_KEY_FACTOR: f32 = 2.0;

/// Movement produced by held keys over one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct FlyStep {
    /// Applied to both the eye and the pivot.
    pub translation: Vec3,
    /// Change of orbit distance; negative moves the eye forward.
    pub zoom: f32,
}

fn axis(positive: bool, negative: bool) -> f32 {
    match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}

/// Scale is `speed * dt`, so the distance covered depends on elapsed time only.
pub(crate) fn fly_step(keys: &HeldKeys, axes: &CameraAxes, speed: f32, dt_secs: f32) -> FlyStep {
    let step = speed * dt_secs;
    if step == 0.0 || !keys.any() {
        return FlyStep::default();
    }

    let translation = axes.forward * axis(keys.forward, keys.backward)
        + axes.right * axis(keys.right, keys.left)
        + WORLD_UP * axis(keys.up, keys.down);

    FlyStep {
        translation: translation * step,
        zoom: axis(keys.zoom_out, keys.zoom_in) * step * ZOOM_KEY_FACTOR,
    }
}
