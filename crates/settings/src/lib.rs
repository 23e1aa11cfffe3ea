use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
};
use thiserror::Error;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "orrery";
const APPLICATION: &str = "orrery";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("unable to resolve platform config directory")]
    MissingProjectDirs,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub camera: CameraSettings,
    /// Optional FPS cap. 0.0 = uncapped (driven by vsync / driver).
    pub fps_cap: f32,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            camera: CameraSettings::default(),
            fps_cap: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Point the camera orbits around at startup.
    pub pivot: [f32; 3],
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Radians of yaw/pitch per dragged pixel.
    pub orbit_sensitivity: f32,
    /// World units of pivot travel per dragged pixel.
    pub pan_speed: f32,
    /// World units of distance per wheel pixel.
    pub zoom_speed: f32,
    /// Free-fly speed in world units per second. Zoom keys use twice this.
    pub fly_speed: f32,
    pub focus: FocusSettings,
    pub lens: LensSettings,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            pivot: [4.0, 0.0, 0.0],
            distance: 3.0,
            min_distance: 0.5,
            max_distance: 30.0,
            orbit_sensitivity: 0.01,
            pan_speed: 0.01,
            zoom_speed: 0.001,
            fly_speed: 3.0,
            focus: FocusSettings::default(),
            lens: LensSettings::default(),
        }
    }
}

/// Tuning for the animated flight toward a focused body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusSettings {
    /// Distance under which the camera counts as arrived.
    pub arrival_epsilon: f32,
    /// Fraction of the remaining distance covered each frame.
    pub closing_factor: f32,
    /// Upper bound on the distance covered in a single frame.
    pub max_step: f32,
    /// Offset from the target where the camera settles on arrival.
    pub standoff: [f32; 3],
}

impl Default for FocusSettings {
    fn default() -> Self {
        Self {
            arrival_epsilon: 0.5,
            closing_factor: 0.05,
            max_step: 0.2,
            standoff: [0.0, 0.0, 0.8],
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct LensSettings {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for LensSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new() -> Result<Self, SettingsError> {
        let dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or(SettingsError::MissingProjectDirs)?;
        let config_dir = dirs.config_dir();
        fs::create_dir_all(config_dir)?;
        let path = config_dir.join(SETTINGS_FILE);
        Ok(Self { path })
    }

    /// Store backed by an explicit file instead of the platform config dir.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<UserSettings, SettingsError> {
        if !self.path.exists() {
            return Ok(UserSettings::default());
        }
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let settings = serde_json::from_reader(reader)?;
        Ok(settings)
    }

    pub fn save(&self, settings: &UserSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(file, settings)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Clone for SettingsStore {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("orrery-settings-{}-{name}", std::process::id()))
            .join(SETTINGS_FILE)
    }

    #[test]
    fn missing_file_loads_defaults() {
        let store = SettingsStore::at(scratch_path("missing"));
        let settings = store.load().unwrap();
        assert_eq!(settings.camera.distance, 3.0);
        assert_eq!(settings.camera.focus.standoff, [0.0, 0.0, 0.8]);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let json = r#"{ "camera": { "distance": 8.0, "focus": { "max_step": 0.5 } } }"#;
        let settings: UserSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.camera.distance, 8.0);
        assert_eq!(settings.camera.min_distance, 0.5);
        assert_eq!(settings.camera.focus.max_step, 0.5);
        assert_eq!(settings.camera.focus.arrival_epsilon, 0.5);
        assert_eq!(settings.fps_cap, 0.0);
    }

    #[test]
    fn saved_settings_are_reloaded() {
        let path = scratch_path("saved");
        let store = SettingsStore::at(&path);
        let mut settings = UserSettings::default();
        settings.camera.fly_speed = 7.5;
        settings.fps_cap = 60.0;
        store.save(&settings).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.camera.fly_speed, 7.5);
        assert_eq!(loaded.fps_cap, 60.0);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn corrupt_file_is_a_json_error() {
        let path = scratch_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        let err = SettingsStore::at(&path).load().unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
