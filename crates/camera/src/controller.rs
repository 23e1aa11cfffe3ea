use glam::{Vec2, Vec3};
use settings::CameraSettings;
use tracing::{debug, trace, warn};

use crate::error::{
    ensure_distance_range, ensure_finite, ensure_finite_vec, ensure_positive, CameraError,
    CameraResult,
};
use crate::focus::{FocusParams, FocusStart, FocusState, FocusStep, FocusTransition};
use crate::free_fly::fly_step;
use crate::input::InputState;
use crate::orbit::OrbitState;
use crate::pose::CameraPose;

/// Notifications for collaborators, drained by [`CameraController::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraEvent {
    /// The camera reached its focus target. Fired once per arrival.
    FocusArrived { target: Vec3 },
}

/// Output of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameUpdate {
    pub pose: CameraPose,
    pub events: Vec<CameraEvent>,
}

impl FrameUpdate {
    pub fn focus_arrived(&self) -> Option<Vec3> {
        self.events.iter().find_map(|event| match *event {
            CameraEvent::FocusArrived { target } => Some(target),
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Tuning {
    orbit_sensitivity: f32,
    pan_speed: f32,
    zoom_speed: f32,
    fly_speed: f32,
}

impl Tuning {
    fn from_settings(settings: &CameraSettings) -> CameraResult<Self> {
        Ok(Self {
            orbit_sensitivity: ensure_finite(settings.orbit_sensitivity, "orbit sensitivity")?,
            pan_speed: ensure_finite(settings.pan_speed, "pan speed")?,
            zoom_speed: ensure_finite(settings.zoom_speed, "zoom speed")?,
            fly_speed: ensure_finite(settings.fly_speed, "fly speed")?,
        })
    }
}

/// The standoff must be a legal orbit distance, otherwise leaving an arrived
/// view would clamp the camera to a different spot.
fn focus_params(
    settings: &CameraSettings,
    min_distance: f32,
    max_distance: f32,
) -> CameraResult<FocusParams> {
    let focus = &settings.focus;
    ensure_positive(focus.arrival_epsilon, "arrival epsilon")?;
    ensure_positive(focus.closing_factor, "closing factor")?;
    ensure_positive(focus.max_step, "maximum focus step")?;
    let standoff = ensure_finite_vec(Vec3::from_array(focus.standoff), "focus standoff")?;
    let length = standoff.length();
    if !(min_distance..=max_distance).contains(&length) {
        return Err(CameraError::StandoffOutOfRange {
            length,
            min: min_distance,
            max: max_distance,
        });
    }
    Ok(FocusParams::from(focus))
}

/// Orbit / pan / free-fly camera with an animated focus mode.
///
/// Input handlers only record state; [`tick`](Self::tick) consumes it once
/// per frame and resolves the pose. Single-threaded: events and ticks must be
/// delivered from the same thread.
#[derive(Debug)]
pub struct CameraController {
    pub(crate) orbit: OrbitState,
    pub(crate) input: InputState,
    pub(crate) focus: FocusTransition,
    pose: CameraPose,
    tuning: Tuning,
    events: Vec<CameraEvent>,
}

impl CameraController {
    pub fn new(settings: &CameraSettings) -> CameraResult<Self> {
        let (min_distance, max_distance) =
            ensure_distance_range(settings.min_distance, settings.max_distance)?;
        let pivot = ensure_finite_vec(Vec3::from_array(settings.pivot), "pivot")?;
        let distance = ensure_finite(settings.distance, "distance")?;
        let tuning = Tuning::from_settings(settings)?;
        let focus = FocusTransition::new(focus_params(settings, min_distance, max_distance)?);

        let orbit = OrbitState::new(pivot, distance, min_distance, max_distance);
        debug!(?pivot, distance = orbit.distance(), "camera controller created");

        Ok(Self {
            pose: orbit.pose(),
            orbit,
            input: InputState::default(),
            focus,
            tuning,
            events: Vec::new(),
        })
    }

    /// Re-read tuning and limits after the user edited settings. The current
    /// view is kept; only the distance is re-clamped.
    pub fn sync_with_settings(&mut self, settings: &CameraSettings) -> CameraResult<()> {
        let (min_distance, max_distance) =
            ensure_distance_range(settings.min_distance, settings.max_distance)?;
        let tuning = Tuning::from_settings(settings)?;
        let params = focus_params(settings, min_distance, max_distance)?;

        self.tuning = tuning;
        self.focus.set_params(params);
        self.orbit.set_distance_limits(min_distance, max_distance);
        self.input.release_all();
        if self.focus.state().is_idle() {
            self.pose = self.orbit.pose();
        }
        Ok(())
    }

    /// Place the orbit around `pivot` at `distance`, keeping yaw and pitch.
    /// Ignored (but still validated) while a focus is active.
    pub fn reset_to(&mut self, pivot: Vec3, distance: f32) -> CameraResult<()> {
        let pivot = ensure_finite_vec(pivot, "pivot")?;
        let distance = ensure_finite(distance, "distance")?;
        if self.input_locked() {
            warn!("camera reset ignored while focusing");
            return Ok(());
        }
        self.orbit.set_pivot(pivot);
        self.orbit.set_distance(distance);
        self.pose = self.orbit.pose();
        Ok(())
    }

    /// Orbit, pan, zoom and free-fly input is inert while a focus is active.
    pub fn input_locked(&self) -> bool {
        !self.focus.state().is_idle()
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn orbit(&self) -> &OrbitState {
        &self.orbit
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn focus_state(&self) -> FocusState {
        self.focus.state()
    }

    /// Fly toward `target`. A request while already approaching replaces the
    /// previous target.
    pub fn request_focus(&mut self, target: Vec3) -> CameraResult<()> {
        if let Err(err) = ensure_finite_vec(target, "focus target") {
            warn!(?target, "rejected focus request: {err}");
            return Err(err);
        }

        let was_idle = self.focus.state().is_idle();
        match self.focus.request(target, self.pose.position()) {
            FocusStart::Approaching => {}
            FocusStart::Arrived(pose) => self.arrive(pose, target),
            FocusStart::Unchanged => return Ok(()),
        }
        if was_idle {
            self.input.release_all();
        }
        Ok(())
    }

    /// Abort an approach or leave an arrived view. Orbiting resumes from the
    /// current camera placement. Returns false when no focus was active.
    pub fn cancel_focus(&mut self) -> bool {
        match self.focus.cancel() {
            FocusState::Idle => false,
            FocusState::Approaching(target) => {
                let eye = self.pose.position();
                self.orbit.rebase_along_view(eye, target);
                self.pose = self.orbit.pose();
                true
            }
            // Orbit was rebased on arrival.
            FocusState::Arrived(_) => true,
        }
    }

    fn arrive(&mut self, pose: CameraPose, target: Vec3) {
        self.pose = pose;
        self.orbit.rebase(target, pose.position());
        self.events.push(CameraEvent::FocusArrived { target });
    }

    /// Advance one frame. `dt_secs` is the time since the previous frame;
    /// negative or non-finite values count as zero.
    pub fn tick(&mut self, dt_secs: f32) -> FrameUpdate {
        let dt_secs = if dt_secs.is_finite() { dt_secs.max(0.0) } else { 0.0 };

        if self.input_locked() {
            self.advance_focus();
        } else {
            self.advance_free(dt_secs);
        }

        trace!(position = ?self.pose.position(), target = ?self.pose.target(), "camera pose");
        FrameUpdate {
            pose: self.pose,
            events: std::mem::take(&mut self.events),
        }
    }

    fn advance_focus(&mut self) {
        match self.focus.advance(self.pose.position()) {
            FocusStep::Idle => {}
            FocusStep::Moved(pose) | FocusStep::Holding(pose) => self.pose = pose,
            FocusStep::Arrived { pose, target } => self.arrive(pose, target),
        }
    }

    fn advance_free(&mut self, dt_secs: f32) {
        let pending = self.input.take_pending();
        let tuning = self.tuning;

        if pending.orbit != Vec2::ZERO {
            self.orbit.orbit(pending.orbit, tuning.orbit_sensitivity);
        }
        if pending.pan != Vec2::ZERO {
            self.orbit.pan(pending.pan, tuning.pan_speed);
        }
        if pending.wheel != 0.0 {
            self.orbit.zoom(pending.wheel * tuning.zoom_speed);
        }

        let step = fly_step(
            self.input.keys(),
            &self.orbit.axes(),
            tuning.fly_speed,
            dt_secs,
        );
        self.orbit.translate(step.translation);
        self.orbit.zoom(step.zoom);

        self.pose = self.orbit.pose();
    }
}
