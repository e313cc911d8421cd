//! Error types for the simulation core

use crate::entity::EntityId;
use shatter_fracture::FractureError;
use shatter_physics::PhysicsError;
use thiserror::Error;

/// Simulation errors
#[derive(Debug, Error)]
pub enum SimError {
    /// Shape cannot become a collision shape; nothing was registered
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    /// Mass is negative or not finite
    #[error("Invalid mass: {0}")]
    InvalidMass(f32),

    /// Dynamics engine failed its startup check
    #[error("Dynamics engine unavailable: {0}")]
    EngineUnavailable(#[source] PhysicsError),

    /// Entity not tracked by the registry
    #[error("Entity not found: {0:?}")]
    EntityNotFound(EntityId),

    /// Dynamics engine error
    #[error(transparent)]
    Physics(#[from] PhysicsError),

    /// Fracture geometry error
    #[error(transparent)]
    Fracture(#[from] FractureError),
}

impl SimError {
    /// Lift shape failures out of engine errors
    pub(crate) fn from_engine(err: PhysicsError) -> Self {
        match err {
            PhysicsError::InvalidShape(msg) => Self::InvalidShape(msg),
            other => Self::Physics(other),
        }
    }
}

/// Result type for simulation operations
pub type Result<T> = std::result::Result<T, SimError>;
