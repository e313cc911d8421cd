//! Physics configuration

use crate::error::{PhysicsError, Result};
use serde::{Deserialize, Serialize};

/// Internal step budget per `advance` unless configured otherwise
pub const MAX_SUBSTEPS: u32 = 10;

/// Physics world configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -7.8 in Y)
    pub gravity: [f32; 3],

    /// Fixed internal timestep
    pub timestep: f32,

    /// Maximum number of internal substeps per `advance`
    pub max_substeps: u32,

    /// Friction coefficient applied to every collider
    pub friction: f32,

    /// Restitution applied to every collider
    pub restitution: f32,

    /// Uniform collision margin added to every shape
    pub collision_margin: f32,

    /// Solver iterations for velocity
    pub solver_iterations: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -7.8, 0.0],
            timestep: 1.0 / 60.0,
            max_substeps: MAX_SUBSTEPS,
            friction: 0.5,
            restitution: 0.0,
            collision_margin: 0.05,
            solver_iterations: 4,
        }
    }
}

impl PhysicsConfig {
    /// Set timestep
    pub fn with_timestep(mut self, timestep: f32) -> Self {
        self.timestep = timestep;
        self
    }

    /// Check that the configuration can drive a simulation
    pub fn validate(&self) -> Result<()> {
        if !(self.timestep > 0.0) || !self.timestep.is_finite() {
            return Err(PhysicsError::InvalidConfig(format!(
                "timestep must be positive, got {}",
                self.timestep
            )));
        }
        if self.max_substeps == 0 {
            return Err(PhysicsError::InvalidConfig("max_substeps must be at least 1".into()));
        }
        if self.collision_margin < 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "collision margin must not be negative, got {}",
                self.collision_margin
            )));
        }
        if self.solver_iterations == 0 {
            return Err(PhysicsError::InvalidConfig("solver_iterations must be at least 1".into()));
        }
        Ok(())
    }
}
