//! Error types for fracture geometry

use thiserror::Error;

/// Fracture geometry errors
#[derive(Debug, Error)]
pub enum FractureError {
    /// The point cloud does not span a volume
    #[error("Degenerate convex hull: {0}")]
    DegenerateHull(String),

    /// Impact point or normal cannot define a cut plane
    #[error("Impact point or normal is not usable")]
    InvalidImpact,
}

/// Result type for fracture operations
pub type Result<T> = std::result::Result<T, FractureError>;
