use glam::Vec3;
use settings::FocusSettings;
use tracing::debug;

use crate::pose::CameraPose;

/// Below this squared length a direction counts as zero.
const ZERO_LENGTH_SQ: f32 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusState {
    Idle,
    Approaching(Vec3),
    Arrived(Vec3),
}

impl FocusState {
    pub fn is_idle(&self) -> bool {
        matches!(self, FocusState::Idle)
    }

    pub fn target(&self) -> Option<Vec3> {
        match *self {
            FocusState::Idle => None,
            FocusState::Approaching(target) | FocusState::Arrived(target) => Some(target),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FocusParams {
    pub arrival_epsilon: f32,
    pub closing_factor: f32,
    pub max_step: f32,
    pub standoff: Vec3,
}

impl From<&FocusSettings> for FocusParams {
    fn from(settings: &FocusSettings) -> Self {
        Self {
            arrival_epsilon: settings.arrival_epsilon.max(0.0),
            closing_factor: settings.closing_factor.clamp(0.0, 1.0),
            max_step: settings.max_step.max(0.0),
            standoff: Vec3::from_array(settings.standoff),
        }
    }
}

/// What a focus request did to the transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum FocusStart {
    Approaching,
    /// The camera already sits on the target; it snapped straight to the
    /// standoff pose.
    Arrived(CameraPose),
    /// Already resting on this target.
    Unchanged,
}

/// Result of advancing the transition by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum FocusStep {
    Idle,
    Moved(CameraPose),
    /// Emitted once, on the frame the camera arrives.
    Arrived { pose: CameraPose, target: Vec3 },
    Holding(CameraPose),
}

#[derive(Debug, Clone)]
pub(crate) struct FocusTransition {
    state: FocusState,
    params: FocusParams,
}

impl FocusTransition {
    pub fn new(params: FocusParams) -> Self {
        Self {
            state: FocusState::Idle,
            params,
        }
    }

    pub fn state(&self) -> FocusState {
        self.state
    }

    pub fn set_params(&mut self, params: FocusParams) {
        self.params = params;
    }

    fn standoff_pose(&self, target: Vec3) -> CameraPose {
        CameraPose::look_at(target + self.params.standoff, target)
    }

    /// Start (or retarget) a flight toward `target`. The caller has already
    /// checked that `target` is finite.
    pub fn request(&mut self, target: Vec3, camera_position: Vec3) -> FocusStart {
        if let FocusState::Arrived(current) = self.state {
            if current == target {
                return FocusStart::Unchanged;
            }
        }

        if (target - camera_position).length_squared() <= ZERO_LENGTH_SQ {
            debug!(?target, "focus target at camera position, arriving immediately");
            self.state = FocusState::Arrived(target);
            return FocusStart::Arrived(self.standoff_pose(target));
        }

        match self.state {
            FocusState::Approaching(previous) => {
                debug!(?previous, ?target, "focus retargeted");
            }
            _ => debug!(?target, "focus approach started"),
        }
        self.state = FocusState::Approaching(target);
        FocusStart::Approaching
    }

    /// Drop back to idle, returning the state that was left.
    pub fn cancel(&mut self) -> FocusState {
        let previous = std::mem::replace(&mut self.state, FocusState::Idle);
        if !previous.is_idle() {
            debug!(?previous, "focus cancelled");
        }
        previous
    }

    /// Move one frame closer. The approach covers a fixed fraction of the
    /// remaining distance, capped per frame, so it decelerates near the target.
    pub fn advance(&mut self, camera_position: Vec3) -> FocusStep {
        match self.state {
            FocusState::Idle => FocusStep::Idle,
            FocusState::Approaching(target) => {
                let direction = target - camera_position;
                let remaining = direction.length();
                if remaining > self.params.arrival_epsilon && remaining > 0.0 {
                    let step = (remaining * self.params.closing_factor).min(self.params.max_step);
                    let position = camera_position + direction / remaining * step;
                    FocusStep::Moved(CameraPose::look_at(position, target))
                } else {
                    debug!(?target, "focus arrived");
                    self.state = FocusState::Arrived(target);
                    FocusStep::Arrived {
                        pose: self.standoff_pose(target),
                        target,
                    }
                }
            }
            FocusState::Arrived(target) => FocusStep::Holding(self.standoff_pose(target)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition() -> FocusTransition {
        FocusTransition::new(FocusParams::from(&FocusSettings::default()))
    }

    #[test]
    fn idle_does_nothing() {
        let mut focus = transition();
        assert_eq!(focus.advance(Vec3::ZERO), FocusStep::Idle);
        assert!(focus.state().is_idle());
    }

    #[test]
    fn approach_is_capped_then_decays() {
        let mut focus = transition();
        let target = Vec3::new(10.0, 0.0, 0.0);
        assert_eq!(focus.request(target, Vec3::ZERO), FocusStart::Approaching);

        let FocusStep::Moved(pose) = focus.advance(Vec3::ZERO) else {
            panic!("expected movement");
        };
        assert!(pose.position().abs_diff_eq(Vec3::new(0.2, 0.0, 0.0), 1e-6));
        assert_eq!(pose.target(), target);

        let near = Vec3::new(8.0, 0.0, 0.0);
        let FocusStep::Moved(pose) = focus.advance(near) else {
            panic!("expected movement");
        };
        assert!(pose.position().abs_diff_eq(Vec3::new(8.1, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn arrival_snaps_to_standoff_once() {
        let mut focus = transition();
        let target = Vec3::new(4.0, 0.0, 0.0);
        focus.request(target, Vec3::new(4.0, 0.0, 0.4));
        let step = focus.advance(Vec3::new(4.0, 0.0, 0.4));
        let FocusStep::Arrived { pose, target: arrived } = step else {
            panic!("expected arrival, got {step:?}");
        };
        assert_eq!(arrived, target);
        assert!(pose.position().abs_diff_eq(Vec3::new(4.0, 0.0, 0.8), 1e-6));
        assert_eq!(focus.state(), FocusState::Arrived(target));
        assert!(matches!(focus.advance(pose.position()), FocusStep::Holding(_)));
    }

    #[test]
    fn target_on_camera_arrives_immediately() {
        let mut focus = transition();
        let here = Vec3::new(1.0, 2.0, 3.0);
        let FocusStart::Arrived(pose) = focus.request(here, here) else {
            panic!("expected immediate arrival");
        };
        assert!(pose.position().is_finite());
        assert!(pose.position().abs_diff_eq(here + Vec3::new(0.0, 0.0, 0.8), 1e-6));
        assert_eq!(focus.state(), FocusState::Arrived(here));
    }

    #[test]
    fn request_while_approaching_retargets() {
        let mut focus = transition();
        focus.request(Vec3::new(5.0, 0.0, 0.0), Vec3::ZERO);
        focus.request(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO);
        assert_eq!(focus.state(), FocusState::Approaching(Vec3::new(0.0, 5.0, 0.0)));
    }

    #[test]
    fn same_target_while_arrived_is_ignored() {
        let mut focus = transition();
        let target = Vec3::new(2.0, 0.0, 0.0);
        focus.request(target, target);
        assert_eq!(focus.request(target, Vec3::ZERO), FocusStart::Unchanged);
        assert_eq!(focus.state(), FocusState::Arrived(target));
        assert_eq!(
            focus.request(Vec3::new(3.0, 0.0, 0.0), target),
            FocusStart::Approaching
        );
    }

    #[test]
    fn cancel_returns_previous_state() {
        let mut focus = transition();
        let target = Vec3::new(5.0, 0.0, 0.0);
        focus.request(target, Vec3::ZERO);
        assert_eq!(focus.cancel(), FocusState::Approaching(target));
        assert!(focus.state().is_idle());
        assert_eq!(focus.cancel(), FocusState::Idle);
    }
}
