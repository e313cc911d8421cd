//! Simulation configuration

use serde::{Deserialize, Serialize};
use shatter_fracture::{BreakerConfig, SubdivisionLimits};
use shatter_physics::PhysicsConfig;

/// Impulse a contact must strictly exceed before a breakable body fractures
pub const FRACTURE_IMPULSE: f32 = 250.0;

/// Top-level simulation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub physics: PhysicsConfig,
    pub fracture: FractureSettings,
    pub projectile: ProjectileSettings,
    pub camera: CameraSettings,
    pub pyramid: PyramidSettings,
}

impl SimConfig {
    /// Same configuration with a fixed fracture seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.fracture.seed = Some(seed);
        self
    }
}

/// When and how bodies break
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct FractureSettings {
    /// Contact impulse that must be strictly exceeded
    pub impulse_threshold: f32,
    pub radial_iterations: u32,
    pub random_iterations: u32,
    /// Debris below this diameter cannot break again
    pub min_size_for_break: f32,
    /// Fixed RNG seed for reproducible debris
    pub seed: Option<u64>,
}

impl Default for FractureSettings {
    fn default() -> Self {
        Self {
            impulse_threshold: FRACTURE_IMPULSE,
            radial_iterations: 1,
            random_iterations: 2,
            min_size_for_break: 1.4,
            seed: None,
        }
    }
}

impl FractureSettings {
    pub fn limits(&self) -> SubdivisionLimits {
        SubdivisionLimits {
            radial_iterations: self.radial_iterations,
            random_iterations: self.random_iterations,
        }
    }

    pub fn breaker_config(&self) -> BreakerConfig {
        BreakerConfig {
            min_size_for_break: self.min_size_for_break,
            seed: self.seed,
            ..BreakerConfig::default()
        }
    }
}

/// Ball fired on pointer input
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileSettings {
    pub mass: f32,
    pub radius: f32,
    pub speed: f32,
    pub color: u32,
}

impl Default for ProjectileSettings {
    fn default() -> Self {
        Self {
            mass: 35.0,
            radius: 0.4,
            speed: 24.0,
            color: 0x202020,
        }
    }
}

/// Viewpoint used to turn pointer positions into rays
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: [-14.0, 8.0, 16.0],
            target: [0.0, 2.0, 0.0],
            fov_degrees: 60.0,
            aspect: 16.0 / 9.0,
            near: 0.2,
            far: 2000.0,
        }
    }
}

/// Demo scene: a ground slab with a pyramid of cups on it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PyramidSettings {
    pub ground_size: [f32; 3],
    pub ground_position: [f32; 3],
    pub ground_color: u32,
    pub levels: u32,
    /// Cups on the bottom row; each level above has one fewer
    pub base_cups: u32,
    /// Center distance as a multiple of the top diameter
    pub spacing_factor: f32,
    pub cup: CupSettings,
    /// Cycled per level
    pub level_colors: Vec<u32>,
}

impl Default for PyramidSettings {
    fn default() -> Self {
        Self {
            ground_size: [40.0, 1.0, 40.0],
            ground_position: [0.0, -0.5, 0.0],
            ground_color: 0xffffff,
            levels: 8,
            base_cups: 8,
            spacing_factor: 1.05,
            cup: CupSettings::default(),
            level_colors: vec![0xfdd835, 0xe53935, 0x1e88e5, 0x43a047],
        }
    }
}

/// Truncated cone approximating a cup
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CupSettings {
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub segments: u32,
    pub mass: f32,
}

impl Default for CupSettings {
    fn default() -> Self {
        Self {
            radius_top: 0.8,
            radius_bottom: 0.6,
            height: 1.2,
            segments: 16,
            mass: 5.0,
        }
    }
}
