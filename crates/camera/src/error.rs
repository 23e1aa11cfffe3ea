use glam::Vec3;
use thiserror::Error;

/// Convenience alias for fallible controller operations.
pub type CameraResult<T> = Result<T, CameraError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CameraError {
    #[error("{what} must be finite")]
    NonFinite { what: &'static str },
    #[error("invalid distance range: need 0 < min ({min}) <= max ({max})")]
    InvalidDistanceRange { min: f32, max: f32 },
    #[error("{what} must be positive, got {value}")]
    NonPositive { what: &'static str, value: f32 },
    #[error("focus standoff length {length} lies outside the distance range [{min}, {max}]")]
    StandoffOutOfRange { length: f32, min: f32, max: f32 },
}

pub(crate) fn ensure_finite(value: f32, what: &'static str) -> CameraResult<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CameraError::NonFinite { what })
    }
}

pub(crate) fn ensure_finite_vec(value: Vec3, what: &'static str) -> CameraResult<Vec3> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CameraError::NonFinite { what })
    }
}

pub(crate) fn ensure_positive(value: f32, what: &'static str) -> CameraResult<f32> {
    let value = ensure_finite(value, what)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(CameraError::NonPositive { what, value })
    }
}

pub(crate) fn ensure_distance_range(min: f32, max: f32) -> CameraResult<(f32, f32)> {
    let min = ensure_finite(min, "minimum distance")?;
    let max = ensure_finite(max, "maximum distance")?;
    if min <= 0.0 || min > max {
        return Err(CameraError::InvalidDistanceRange { min, max });
    }
    Ok((min, max))
}
