//! Shatter Fracture - convex subdivision of breakable bodies
//!
//! Given the convex point cloud of a body (in its local frame) and an impact,
//! produce convex fragments that together make up the body. The simulation
//! core only sees [`FractureGeometry`]; [`ConvexBreaker`] is the default
//! implementation.

pub mod breaker;
pub mod error;
pub mod hull;
pub mod plane;

use glam::Vec3;
use serde::{Deserialize, Serialize};

pub use breaker::{BreakerConfig, ConvexBreaker};
pub use error::{FractureError, Result};
pub use hull::ConvexHull;
pub use plane::Plane;

/// Iteration budget of one subdivision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubdivisionLimits {
    /// Cuts rotated about the impact normal
    pub radial_iterations: u32,
    /// Further cuts through piece centroids
    pub random_iterations: u32,
}

impl Default for SubdivisionLimits {
    fn default() -> Self {
        Self {
            radial_iterations: 1,
            random_iterations: 2,
        }
    }
}

/// One convex piece of a subdivided body
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Hull points relative to `centroid`
    pub points: Vec<Vec3>,
    /// Centroid in the parent's local frame
    pub centroid: Vec3,
    /// Share of the parent's mass
    pub mass_fraction: f32,
    /// Large enough to be broken again
    pub breakable: bool,
}

/// Splits convex bodies into convex fragments
pub trait FractureGeometry {
    /// Subdivide `points` (parent-local) around an impact given in the same frame.
    ///
    /// Mass fractions of the returned fragments sum to at most one.
    fn subdivide(
        &mut self,
        points: &[Vec3],
        impact_point: Vec3,
        impact_normal: Vec3,
        limits: SubdivisionLimits,
    ) -> Result<Vec<Fragment>>;
}
