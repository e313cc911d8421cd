//! Demo configuration
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables: `SHATTER_FRAMES`, `SHATTER_SEED`
//! 2. Config file named by `SHATTER_CONFIG`, else `shatter.toml` if present
//! 3. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! [run]
//! frames = 600
//! fixed_dt = 0.0166667
//! realtime = false
//! stats_every = 60
//!
//! [[shots]]
//! frame = 30
//! x = 0.0
//! y = 0.05
//!
//! [sim.fracture]
//! impulse_threshold = 250.0
//! seed = 7
//!
//! [sim.physics]
//! gravity = [0.0, -7.8, 0.0]
//! ```

use serde::{Deserialize, Serialize};
use shatter_sim::SimConfig;
use std::path::Path;
use thiserror::Error;

const DEFAULT_PATH: &str = "shatter.toml";

/// Errors while loading the demo configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
}

/// How the headless loop runs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Frames to simulate
    pub frames: u64,
    /// Frame delta when not running in real time
    pub fixed_dt: f32,
    /// Use wall-clock deltas and pace frames to `fixed_dt`
    pub realtime: bool,
    /// Log stats every this many frames; 0 disables
    pub stats_every: u64,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            frames: 600,
            fixed_dt: 1.0 / 60.0,
            realtime: false,
            stats_every: 60,
        }
    }
}

/// Scripted pointer press
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub frame: u64,
    /// Normalized device coordinates
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub run: RunSettings,
    pub sim: SimConfig,
    pub shots: Vec<Shot>,
    #[serde(skip)]
    pub config_path: Option<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            run: RunSettings::default(),
            sim: SimConfig::default(),
            // The first two drop onto the tops of the left end cups, which
            // pins them against what they stand on.
            shots: vec![
                Shot { frame: 30, x: -0.25, y: 0.045 },
                Shot { frame: 90, x: -0.22, y: 0.175 },
                Shot { frame: 150, x: 0.0, y: 0.1 },
            ],
            config_path: None,
        }
    }
}

impl DemoConfig {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var("SHATTER_CONFIG").ok();
        let mut config = match explicit.as_deref() {
            Some(path) => Self::load_from_file(path)?,
            None if Path::new(DEFAULT_PATH).exists() => Self::load_from_file(DEFAULT_PATH)?,
            None => Self::default(),
        };

        if let Ok(frames) = std::env::var("SHATTER_FRAMES") {
            config.run.frames = frames
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { name: "SHATTER_FRAMES", value: frames })?;
        }
        if let Ok(seed) = std::env::var("SHATTER_SEED") {
            let seed = seed
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { name: "SHATTER_SEED", value: seed })?;
            config.sim.fracture.seed = Some(seed);
        }

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.config_path = Some(path.to_string());
        log::info!("Loaded demo config from {}", path);
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Shots scheduled for `frame`
    pub fn shots_at(&self, frame: u64) -> impl Iterator<Item = &Shot> {
        self.shots.iter().filter(move |s| s.frame == frame)
    }

    pub fn print_summary(&self) {
        log::info!("Demo Configuration:");
        log::info!(
            "  Frames: {} (dt {:.4}s, realtime: {})",
            self.run.frames,
            self.run.fixed_dt,
            self.run.realtime
        );
        log::info!("  Shots: {}", self.shots.len());
        log::info!(
            "  Fracture: impulse > {}, seed {:?}",
            self.sim.fracture.impulse_threshold,
            self.sim.fracture.seed
        );
        if let Some(path) = &self.config_path {
            log::info!("  Config: {}", path);
        }
    }
}
