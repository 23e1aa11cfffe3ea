use std::{fs, path::Path};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Convenience alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate body name `{0}`")]
    DuplicateName(String),
    #[error("body `{name}` is invalid: {reason}")]
    InvalidBody { name: String, reason: &'static str },
}

/// A clickable body in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub name: String,
    pub position: [f32; 3],
    pub radius: f32,
    /// sRGB hex, e.g. `#4a90e2`.
    pub color: String,
}

impl Body {
    pub fn new(name: impl Into<String>, position: [f32; 3], radius: f32, color: &str) -> Self {
        Self {
            name: name.into(),
            position,
            radius,
            color: color.to_string(),
        }
    }

    pub fn center(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    /// Distance along the ray to the nearest hit, if any. `direction` must be
    /// unit length.
    pub fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let to_center = self.center() - origin;
        let along = to_center.dot(direction);
        let closest_sq = to_center.length_squared() - along * along;
        let radius_sq = self.radius * self.radius;
        if closest_sq > radius_sq {
            return None;
        }
        let half_chord = (radius_sq - closest_sq).sqrt();
        let near = along - half_chord;
        let far = along + half_chord;
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            Some(0.0)
        } else {
            None
        }
    }

    fn validate(&self) -> CatalogResult<()> {
        let invalid = |reason| CatalogError::InvalidBody {
            name: self.name.clone(),
            reason,
        };
        if self.name.trim().is_empty() {
            return Err(invalid("name is empty"));
        }
        if !self.center().is_finite() {
            return Err(invalid("position must be finite"));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(invalid("radius must be positive"));
        }
        Ok(())
    }
}

/// Source of focus targets keyed by body name.
pub trait FocusLookup {
    fn focus_target(&self, name: &str) -> Option<Vec3>;
}

/// Named bodies with positions, looked up case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyCatalog {
    bodies: Vec<Body>,
}

impl BodyCatalog {
    pub fn new(bodies: Vec<Body>) -> CatalogResult<Self> {
        for (index, body) in bodies.iter().enumerate() {
            body.validate()?;
            if bodies[..index]
                .iter()
                .any(|other| other.name.eq_ignore_ascii_case(&body.name))
            {
                return Err(CatalogError::DuplicateName(body.name.clone()));
            }
        }
        Ok(Self { bodies })
    }

    /// The inner solar system laid out along +X.
    pub fn solar_system() -> Self {
        Self {
            bodies: vec![
                Body::new("Sun", [0.0, 0.0, 0.0], 0.8, "#ffd700"),
                Body::new("Mercury", [2.0, 0.0, 0.0], 0.15, "#8c7853"),
                Body::new("Venus", [3.0, 0.0, 0.0], 0.2, "#ffc649"),
                Body::new("Earth", [4.0, 0.0, 0.0], 0.25, "#4a90e2"),
                Body::new("Mars", [5.5, 0.0, 0.0], 0.2, "#cd5c5c"),
                Body::new("Jupiter", [8.0, 0.0, 0.0], 0.6, "#d2691e"),
                Body::new("Saturn", [12.0, 0.0, 0.0], 0.5, "#fad5a5"),
            ],
        }
    }

    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        let parsed: BodyCatalog = serde_json::from_str(json)?;
        Self::new(parsed.bodies)
    }

    pub fn load(path: &Path) -> CatalogResult<Self> {
        let text = fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&text)?;
        debug!(path = %path.display(), bodies = catalog.len(), "loaded body catalog");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    pub fn find(&self, name: &str) -> Option<&Body> {
        self.bodies
            .iter()
            .find(|body| body.name.eq_ignore_ascii_case(name))
    }

    /// Nearest body hit by a ray, with the hit distance.
    pub fn pick(&self, origin: Vec3, direction: Vec3) -> Option<(&Body, f32)> {
        self.bodies
            .iter()
            .filter_map(|body| body.intersect(origin, direction).map(|t| (body, t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

impl FocusLookup for BodyCatalog {
    fn focus_target(&self, name: &str) -> Option<Vec3> {
        self.find(name).map(Body::center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solar_system_lookup_is_case_insensitive() {
        let catalog = BodyCatalog::solar_system();
        assert_eq!(catalog.len(), 7);
        assert_eq!(catalog.focus_target("earth"), Some(Vec3::new(4.0, 0.0, 0.0)));
        assert_eq!(catalog.focus_target("SATURN"), Some(Vec3::new(12.0, 0.0, 0.0)));
        assert_eq!(catalog.focus_target("Pluto"), None);
    }

    #[test]
    fn solar_system_is_ordered_from_the_sun() {
        let catalog = BodyCatalog::solar_system();
        let names: Vec<&str> = catalog.bodies().map(|body| body.name.as_str()).collect();
        assert_eq!(
            names,
            ["Sun", "Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn"]
        );
        assert_eq!(
            catalog.find("sun").map(|body| body.color.as_str()),
            Some("#ffd700")
        );
    }

    #[test]
    fn pick_returns_nearest_hit() {
        let catalog = BodyCatalog::solar_system();
        let (body, t) = catalog
            .pick(Vec3::new(-5.0, 0.0, 0.0), Vec3::X)
            .expect("ray along the ecliptic hits the sun first");
        assert_eq!(body.name, "Sun");
        assert!((t - 4.2).abs() < 1e-5);

        let (body, _) = catalog
            .pick(Vec3::new(4.0, 0.0, 5.0), Vec3::NEG_Z)
            .unwrap();
        assert_eq!(body.name, "Earth");
    }

    #[test]
    fn pick_misses_and_ignores_bodies_behind() {
        let catalog = BodyCatalog::solar_system();
        assert!(catalog.pick(Vec3::new(0.0, 5.0, 0.0), Vec3::Y).is_none());
        assert!(catalog.pick(Vec3::new(20.0, 0.0, 0.0), Vec3::X).is_none());
    }

    #[test]
    fn ray_from_inside_hits_at_zero() {
        let sun = Body::new("Sun", [0.0, 0.0, 0.0], 0.8, "#ffd700");
        assert_eq!(sun.intersect(Vec3::ZERO, Vec3::Z), Some(0.0));
    }

    #[test]
    fn json_catalog_is_validated() {
        let json = r##"{ "bodies": [
            { "name": "Moon", "position": [4.3, 0.0, 0.0], "radius": 0.07, "color": "#cccccc" }
        ] }"##;
        let catalog = BodyCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.find("moon").map(|b| b.radius), Some(0.07));

        let duplicate = r##"{ "bodies": [
            { "name": "Moon", "position": [0.0, 0.0, 0.0], "radius": 1.0, "color": "#fff" },
            { "name": "moon", "position": [1.0, 0.0, 0.0], "radius": 1.0, "color": "#fff" }
        ] }"##;
        assert!(matches!(
            BodyCatalog::from_json_str(duplicate),
            Err(CatalogError::DuplicateName(_))
        ));

        let flat = r##"{ "bodies": [
            { "name": "Dust", "position": [0.0, 0.0, 0.0], "radius": 0.0, "color": "#fff" }
        ] }"##;
        assert!(matches!(
            BodyCatalog::from_json_str(flat),
            Err(CatalogError::InvalidBody { .. })
        ));
    }
}
