use glam::{Mat4, Vec2, Vec3};
use settings::LensSettings;

pub(crate) const WORLD_UP: Vec3 = Vec3::Y;

/// Closest the eye may get to the point it looks at.
pub const MIN_SEPARATION: f32 = 1e-3;

/// Resolved camera placement handed to the renderer once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    position: Vec3,
    target: Vec3,
}

impl CameraPose {
    /// Build a pose looking from `position` at `target`.
    ///
    /// If the two points (nearly) coincide the eye is pushed back along +Z so
    /// the view direction stays defined.
    pub fn look_at(position: Vec3, target: Vec3) -> Self {
        let position = if position.distance_squared(target) < MIN_SEPARATION * MIN_SEPARATION {
            target + Vec3::Z * MIN_SEPARATION
        } else {
            position
        };
        Self { position, target }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }

    /// Unit right axis, `forward × world_up`. Falls back to +X when looking
    /// straight up or down.
    pub fn right(&self) -> Vec3 {
        right_from_forward(self.forward(), Vec3::X)
    }

    /// Unit camera up axis (no roll).
    pub fn up(&self) -> Vec3 {
        let forward = self.forward();
        self.right().cross(forward).normalize_or(WORLD_UP)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up())
    }

    pub fn view_projection(&self, aspect: f32, lens: &LensSettings) -> Mat4 {
        let proj = Mat4::perspective_rh(
            lens.fov_degrees.to_radians(),
            aspect.max(0.001),
            lens.near,
            lens.far,
        );
        proj * self.view_matrix()
    }

    /// World-space ray through a cursor position given in pixels, origin at
    /// the top-left of a viewport of `viewport` pixels.
    pub fn screen_ray(&self, cursor: Vec2, viewport: Vec2, lens: &LensSettings) -> Option<Ray> {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return None;
        }
        let ndc_x = 2.0 * cursor.x / viewport.x - 1.0;
        let ndc_y = 1.0 - 2.0 * cursor.y / viewport.y;

        let inverse = self
            .view_projection(viewport.x / viewport.y, lens)
            .inverse();
        let near = inverse.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));

        let direction = (far - near).try_normalize()?;
        if !near.is_finite() {
            return None;
        }
        Some(Ray {
            origin: near,
            direction,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

/// `forward × world_up`, or `fallback` when the two are (nearly) parallel.
pub(crate) fn right_from_forward(forward: Vec3, fallback: Vec3) -> Vec3 {
    let right = forward.cross(WORLD_UP);
    if right.length_squared() > 1e-6 {
        right.normalize()
    } else {
        fallback
    }
}
