/// RON configuration for both scenes
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::material::{Color, PhongMaterial};
use crate::model::BLOCK_SIZE;
use crate::projection::ProjectionConfig;

/// Environment variable naming a config file when no path is given explicitly.
pub const CONFIG_PATH_ENV: &str = "RIG3D_CONFIG_PATH";
/// File picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "rig3d.ron";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub figure: FigureConfig,
    pub moon: MoonConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub projection: ProjectionConfig,
    pub eye: [f32; 3],
    /// Degrees added or removed per key press
    pub joint_step: f32,
    /// Phase change per frame while walking
    pub gait_step: f32,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            projection: ProjectionConfig {
                fov_degrees: 90.0,
                near: 0.5,
                far: 200.0,
            },
            eye: [0.0, BLOCK_SIZE * 12.0 / 2.0, 100.0],
            joint_step: 5.0,
            gait_step: 0.1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MoonConfig {
    pub projection: ProjectionConfig,
    pub eye: [f32; 3],
    pub radius: f32,
    pub material: PhongMaterial,
    pub light: LightConfig,
}

impl Default for MoonConfig {
    fn default() -> Self {
        Self {
            projection: ProjectionConfig {
                fov_degrees: 60.0,
                near: 0.5,
                far: 5000.0,
            },
            eye: [0.0, 0.0, 1000.0],
            radius: 500.0,
            material: PhongMaterial::default(),
            light: LightConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// Milliseconds per orbit of the distant light
    pub period_ms: u64,
    pub distance: f32,
    pub ambient: Color,
    pub color: Color,
}

impl LightConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms.max(1))
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            period_ms: 5000,
            distance: 10000.0,
            ambient: [0.1, 0.1, 0.1],
            color: [1.0, 1.0, 1.0],
        }
    }
}

impl Config {
    /// Resolve the config the way the binaries do: explicit path, then
    /// `RIG3D_CONFIG_PATH`, then `./rig3d.ron` if it exists, then defaults.
    pub fn load_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::load(PathBuf::from(path));
        }
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::load(local);
        }
        tracing::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::parse(&text)?;
        tracing::info!("config loaded");
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }
}
