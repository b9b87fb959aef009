//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`CL_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

use coasterlab_core::{SpeedMode, ViewMode};
use coasterlab_physics::{FlockParams, MassSpringConfig, SpringParams};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Which demo runs and for how long
    #[serde(default)]
    pub demo: DemoConfig,
    /// Coaster track and ride settings
    #[serde(default)]
    pub coaster: CoasterConfig,
    /// Camera and orbit input settings
    #[serde(default)]
    pub camera: CameraConfig,
    /// Mass-spring demo settings
    #[serde(default)]
    pub mass_spring: MassSpringDemoConfig,
    /// Flocking demo settings
    #[serde(default)]
    pub boids: BoidsConfig,
    /// Curve tool settings
    #[serde(default)]
    pub curve: CurveConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`CL_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Optional user overrides
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // CL_DEMO__FRAMES=100 -> demo.frames = 100
        figment = figment.merge(Env::prefixed("CL_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Which demo `main` runs when none is given on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoKind {
    #[default]
    Coaster,
    Springs,
    Boids,
    Curve,
}

impl DemoKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "coaster" => Some(DemoKind::Coaster),
            "springs" => Some(DemoKind::Springs),
            "boids" => Some(DemoKind::Boids),
            "curve" => Some(DemoKind::Curve),
            _ => None,
        }
    }
}

/// Demo loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub kind: DemoKind,
    /// Number of frames to run
    pub frames: u32,
    /// Simulated frame time in seconds
    pub frame_dt: f32,
    /// Fixed simulation step in seconds
    pub step: f32,
    /// Log a status line every this many frames (0 = only the summary)
    pub report_every: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            kind: DemoKind::Coaster,
            frames: 600,
            frame_dt: 1.0 / 60.0,
            step: 1.0 / 120.0,
            report_every: 120,
        }
    }
}

/// Coaster configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoasterConfig {
    /// Track curve file (text curve or `.obj`)
    pub track: String,
    /// Subdivision levels applied to the track before riding
    pub subdivisions: u32,
    pub mode: SpeedMode,
    /// Number of cars in the train
    pub cars: usize,
    /// Arc length between consecutive cars
    pub car_spacing: f32,
    /// Scripted key presses, by `KeyCode` name, one every `key_interval` frames
    pub keys: Vec<String>,
    pub key_interval: u32,
}

impl Default for CoasterConfig {
    fn default() -> Self {
        Self {
            track: "assets/curves/hill.curve".to_string(),
            subdivisions: 3,
            mode: SpeedMode::default(),
            cars: 4,
            car_spacing: 1.5,
            keys: Vec::new(),
            key_interval: 60,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting view
    pub view: ViewMode,
    /// Field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Eye height above the track in the ride view
    pub ride_height: f32,
    /// Distance behind the lead car in the follow view
    pub follow_distance: f32,
    /// Height above the lead car in the follow view
    pub follow_height: f32,
    /// Orbit target movement speed (units per second)
    pub move_speed: f32,
    /// Radians per pixel of drag
    pub orbit_sensitivity: f32,
    /// Units per pixel of drag
    pub pan_sensitivity: f32,
    /// Zoom factor per scroll line
    pub zoom_step: f32,
    /// Input smoothing half-life in seconds (lower = more responsive)
    pub smoothing_half_life: f32,
    /// Enable input smoothing by default
    pub smoothing_enabled: bool,
    /// Simulated left-drag per frame in pixels, for a slow automatic orbit
    pub auto_orbit: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            view: ViewMode::Orbit,
            fov: 45.0,
            near: 0.1,
            far: 500.0,
            ride_height: 0.8,
            follow_distance: 6.0,
            follow_height: 2.5,
            move_speed: 5.0,
            orbit_sensitivity: 0.005,
            pan_sensitivity: 0.01,
            zoom_step: 0.9,
            smoothing_half_life: 0.05,
            smoothing_enabled: false,
            auto_orbit: 2.0,
        }
    }
}

/// Which built-in topology the springs demo builds when no rig file is given
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpringPreset {
    #[default]
    Cloth,
    Chain,
}

/// Mass-spring demo configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MassSpringDemoConfig {
    /// RON rig file; the preset is used when empty
    pub rig: String,
    pub preset: SpringPreset,
    /// Cloth columns and rows, or chain segments (`cols`)
    pub cols: usize,
    pub rows: usize,
    pub spacing: f32,
    pub params: SpringParams,
    pub system: MassSpringConfig,
    /// Fixed step for the spring integrator (explicit Euler wants it small)
    pub step: f32,
}

impl Default for MassSpringDemoConfig {
    fn default() -> Self {
        Self {
            rig: String::new(),
            preset: SpringPreset::Cloth,
            cols: 8,
            rows: 8,
            spacing: 0.25,
            params: SpringParams::default(),
            system: MassSpringConfig {
                floor: Some(-2.0),
                ..MassSpringConfig::default()
            },
            step: 0.001,
        }
    }
}

/// Flocking demo configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoidsConfig {
    pub count: usize,
    /// Radius of the sphere the boids start on
    pub spawn_radius: f32,
    pub flock: FlockParams,
}

impl Default for BoidsConfig {
    fn default() -> Self {
        Self {
            count: 80,
            spawn_radius: 5.0,
            flock: FlockParams::default(),
        }
    }
}

/// Curve tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// Input curve file (text curve or `.obj`)
    pub path: String,
    pub subdivisions: u32,
    /// Resample to this spacing after subdividing (0 = keep points)
    pub resample: f32,
    /// Treat OBJ vertex lists as closed loops
    pub obj_closed: bool,
    /// Where to write the result; nothing is written when empty
    pub output: String,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            path: "assets/curves/loop.curve".to_string(),
            subdivisions: 2,
            resample: 0.0,
            obj_closed: true,
            output: String::new(),
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
