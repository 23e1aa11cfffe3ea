use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Vec2, Vec3};

use crate::pose::{right_from_forward, CameraPose, WORLD_UP};

pub(crate) const MAX_PITCH_RAD: f32 = FRAC_PI_2;

/// Wrap into `[0, TAU)`. `rem_euclid` alone can round up to `TAU`.
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Camera-relative axes of an orbit placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraAxes {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

/// Spherical placement of the camera around a pivot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    pivot: Vec3,
    distance: f32,
    yaw: f32,   // around WORLD_UP, kept in [0, TAU)
    pitch: f32, // elevation, kept in [-PI/2, PI/2]
    min_distance: f32,
    max_distance: f32,
}

impl OrbitState {
    /// Caller guarantees `0 < min_distance <= max_distance`.
    pub(crate) fn new(pivot: Vec3, distance: f32, min_distance: f32, max_distance: f32) -> Self {
        Self {
            pivot,
            distance: distance.clamp(min_distance, max_distance),
            yaw: 0.0,
            pitch: 0.0,
            min_distance,
            max_distance,
        }
    }

    pub fn pivot(&self) -> Vec3 {
        self.pivot
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn distance_limits(&self) -> (f32, f32) {
        (self.min_distance, self.max_distance)
    }

    pub(crate) fn set_distance_limits(&mut self, min_distance: f32, max_distance: f32) {
        self.min_distance = min_distance;
        self.max_distance = max_distance;
        self.distance = self.distance.clamp(min_distance, max_distance);
    }

    pub(crate) fn set_pivot(&mut self, pivot: Vec3) {
        self.pivot = pivot;
    }

    pub(crate) fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(self.min_distance, self.max_distance);
    }

    /// Offset of the eye from the pivot.
    fn offset(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch) * self.distance
    }

    pub fn position(&self) -> Vec3 {
        self.pivot + self.offset()
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose::look_at(self.position(), self.pivot)
    }

    pub fn axes(&self) -> CameraAxes {
        let forward = (-self.offset()).normalize_or(Vec3::NEG_Z);
        // Right axis of the current yaw; exact limit at the poles.
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let right = right_from_forward(forward, Vec3::new(cos_yaw, 0.0, -sin_yaw));
        let up = right.cross(forward).normalize_or(WORLD_UP);
        CameraAxes { forward, right, up }
    }

    /// Horizontal drag turns yaw, vertical drag tilts pitch (clamped at the poles).
    pub(crate) fn orbit(&mut self, delta: Vec2, sensitivity: f32) {
        self.yaw = wrap_angle(self.yaw - delta.x * sensitivity);
        self.pitch = (self.pitch + delta.y * sensitivity).clamp(-MAX_PITCH_RAD, MAX_PITCH_RAD);
    }

    /// Slide the pivot in the view plane. Distance, yaw and pitch are kept.
    pub(crate) fn pan(&mut self, delta: Vec2, speed: f32) {
        let axes = self.axes();
        let offset = axes.right * (-delta.x * speed) + axes.up * (delta.y * speed);
        self.pivot += offset;
    }

    pub(crate) fn zoom(&mut self, amount: f32) {
        self.distance = (self.distance + amount).clamp(self.min_distance, self.max_distance);
    }

    pub(crate) fn translate(&mut self, offset: Vec3) {
        self.pivot += offset;
    }

    /// Re-derive yaw/pitch/distance so that the orbit around `pivot` puts
    /// the eye at `position` (up to the distance clamp).
    pub(crate) fn rebase(&mut self, pivot: Vec3, position: Vec3) {
        self.pivot = pivot;
        let offset = position - pivot;
        let len = offset.length();
        if len <= f32::EPSILON {
            self.distance = self.min_distance;
            return;
        }

        let horiz_len = Vec3::new(offset.x, 0.0, offset.z).length();
        if horiz_len > 1e-5 {
            self.yaw = wrap_angle(offset.x.atan2(offset.z));
        }
        self.pitch = (offset.y / len)
            .clamp(-1.0, 1.0)
            .asin()
            .clamp(-MAX_PITCH_RAD, MAX_PITCH_RAD);
        self.distance = len.clamp(self.min_distance, self.max_distance);
    }

    /// Orbit around a point on the ray from `eye` toward `look_at`, keeping
    /// the eye fixed. The pivot is `look_at` itself when that distance is in
    /// range, otherwise the point at the clamped distance along the ray.
    pub(crate) fn rebase_along_view(&mut self, eye: Vec3, look_at: Vec3) {
        let to_target = look_at - eye;
        let len = to_target.length();
        if len <= f32::EPSILON {
            self.rebase(look_at, eye);
            return;
        }
        let clamped = len.clamp(self.min_distance, self.max_distance);
        let pivot = if clamped == len {
            look_at
        } else {
            eye + to_target / len * clamped
        };
        self.rebase(pivot, eye);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orbit_at_origin(distance: f32) -> OrbitState {
        OrbitState::new(Vec3::ZERO, distance, 1.0, 30.0)
    }

    #[test]
    fn zero_angles_sit_on_positive_z() {
        let orbit = orbit_at_origin(8.0);
        assert!(orbit.position().abs_diff_eq(Vec3::new(0.0, 0.0, 8.0), 1e-6));
        assert_eq!(orbit.pose().target(), Vec3::ZERO);
    }

    #[test]
    fn position_is_offset_by_pivot() {
        let mut orbit = OrbitState::new(Vec3::new(4.0, 0.0, 0.0), 3.0, 1.0, 30.0);
        orbit.orbit(Vec2::new(-FRAC_PI_2 * 100.0, 0.0), 0.01);
        assert!(orbit.position().abs_diff_eq(Vec3::new(7.0, 0.0, 0.0), 1e-4));
    }

    #[test]
    fn pitch_is_clamped_and_yaw_wraps() {
        let mut orbit = orbit_at_origin(5.0);
        for _ in 0..1_000 {
            orbit.orbit(Vec2::new(137.0, 91.0), 0.01);
            assert!(orbit.pitch() <= MAX_PITCH_RAD && orbit.pitch() >= -MAX_PITCH_RAD);
            assert!((0.0..TAU).contains(&orbit.yaw()));
        }
        assert_eq!(orbit.pitch(), MAX_PITCH_RAD);
        assert!(orbit.axes().right.is_finite());
        assert!(orbit.pose().view_matrix().is_finite());
    }

    #[test]
    fn pan_moves_pivot_only() {
        let mut orbit = orbit_at_origin(5.0);
        orbit.orbit(Vec2::new(30.0, -20.0), 0.01);
        let (yaw, pitch, distance) = (orbit.yaw(), orbit.pitch(), orbit.distance());
        orbit.pan(Vec2::new(-100.0, 0.0), 0.01);
        assert_eq!((orbit.yaw(), orbit.pitch(), orbit.distance()), (yaw, pitch, distance));
        let moved = orbit.pivot();
        assert!((moved.length() - 1.0).abs() < 1e-5);
        assert!(moved.dot(orbit.axes().right) > 0.99);
    }

    #[test]
    fn pan_at_zero_angles_uses_screen_axes() {
        let mut orbit = orbit_at_origin(5.0);
        orbit.pan(Vec2::new(10.0, 10.0), 0.1);
        // Looking down -Z the right axis is +X; dragging right pulls the pivot left.
        assert!(orbit.pivot().abs_diff_eq(Vec3::new(-1.0, 1.0, 0.0), 1e-5));
    }

    #[test]
    fn tiny_negative_yaw_wraps_below_tau() {
        assert_eq!(wrap_angle(-1e-9), 0.0);
        assert!((wrap_angle(-FRAC_PI_2) - 3.0 * FRAC_PI_2).abs() < 1e-6);
        assert!((wrap_angle(TAU + 1.0) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut orbit = orbit_at_origin(5.0);
        orbit.zoom(-100.0);
        assert_eq!(orbit.distance(), 1.0);
        orbit.zoom(100.0);
        assert_eq!(orbit.distance(), 30.0);
    }

    #[test]
    fn rebase_reproduces_position() {
        let mut orbit = orbit_at_origin(5.0);
        let pivot = Vec3::new(4.0, 0.0, 0.0);
        let eye = Vec3::new(6.0, 2.0, 3.0);
        orbit.rebase(pivot, eye);
        assert_eq!(orbit.pivot(), pivot);
        assert!(orbit.position().abs_diff_eq(eye, 1e-4));
    }

    #[test]
    fn rebase_along_view_keeps_a_far_eye_in_place() {
        let mut orbit = orbit_at_origin(5.0);
        let eye = Vec3::new(0.0, 0.0, 29.8);
        orbit.rebase_along_view(eye, Vec3::new(0.0, 0.0, -30.0));
        assert!(orbit.position().abs_diff_eq(eye, 1e-4));
        assert_eq!(orbit.distance(), 30.0);
        assert!(orbit.pivot().abs_diff_eq(Vec3::new(0.0, 0.0, -0.2), 1e-4));
    }

    #[test]
    fn rebase_along_view_keeps_a_near_eye_in_place() {
        let mut orbit = orbit_at_origin(5.0);
        let eye = Vec3::new(3.0, 0.0, 0.0);
        orbit.rebase_along_view(eye, Vec3::new(3.5, 0.0, 0.0));
        assert!(orbit.position().abs_diff_eq(eye, 1e-4));
        assert_eq!(orbit.distance(), 1.0);
        assert!(orbit.pivot().abs_diff_eq(Vec3::new(4.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn rebase_straight_above_keeps_yaw() {
        let mut orbit = orbit_at_origin(5.0);
        orbit.orbit(Vec2::new(-50.0, 0.0), 0.01);
        let yaw = orbit.yaw();
        orbit.rebase(Vec3::ZERO, Vec3::new(0.0, 4.0, 0.0));
        assert_eq!(orbit.yaw(), yaw);
        assert!((orbit.pitch() - MAX_PITCH_RAD).abs() < 1e-6);
        assert_eq!(orbit.distance(), 4.0);
    }
}
