//! Collision shape descriptions

use crate::error::{PhysicsError, Result};
use rapier3d::parry::transformation::try_convex_hull;
use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

const MIN_VOLUME: f32 = 1.0e-9;

/// Collision shape type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeDesc {
    /// Box with half-extents
    Cuboid {
        half_extents: [f32; 3],
    },
    /// Sphere with radius
    Ball {
        radius: f32,
    },
    /// Convex hull from points in body-local space
    ConvexHull {
        points: Vec<[f32; 3]>,
    },
}

impl ShapeDesc {
    /// Create a box shape from half-extents
    pub fn cuboid(hx: f32, hy: f32, hz: f32) -> Self {
        Self::Cuboid {
            half_extents: [hx, hy, hz],
        }
    }

    /// Create a box shape from full size
    pub fn from_size(width: f32, height: f32, depth: f32) -> Self {
        Self::cuboid(width * 0.5, height * 0.5, depth * 0.5)
    }

    /// Create a sphere shape
    pub fn ball(radius: f32) -> Self {
        Self::Ball { radius }
    }

    /// Create a convex hull shape
    pub fn convex_hull(points: Vec<[f32; 3]>) -> Self {
        Self::ConvexHull { points }
    }

    /// Cheap structural check, done before anything touches the engine
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Cuboid { half_extents } => {
                if half_extents.iter().any(|e| !(*e > 0.0)) {
                    return Err(PhysicsError::InvalidShape(format!(
                        "cuboid half extents must be positive, got {half_extents:?}"
                    )));
                }
            }
            Self::Ball { radius } => {
                if !(*radius > 0.0) {
                    return Err(PhysicsError::InvalidShape(format!(
                        "ball radius must be positive, got {radius}"
                    )));
                }
            }
            Self::ConvexHull { points } => {
                if points.is_empty() {
                    return Err(PhysicsError::InvalidShape("empty point cloud".into()));
                }
                if points.iter().flatten().any(|c| !c.is_finite()) {
                    return Err(PhysicsError::InvalidShape("non-finite point in point cloud".into()));
                }
            }
        }
        Ok(())
    }

    /// Build a Rapier shared shape with the collision margin applied
    pub(crate) fn to_rapier(&self, margin: f32) -> Result<rapier::SharedShape> {
        self.validate()?;

        let shape = match self {
            Self::Cuboid { half_extents } => {
                // Shrink by the margin so the rounded border keeps the outer size.
                let [hx, hy, hz] = half_extents.map(|e| e - margin);
                if margin > 0.0 && hx > 0.0 && hy > 0.0 && hz > 0.0 {
                    rapier::SharedShape::round_cuboid(hx, hy, hz, margin)
                } else {
                    rapier::SharedShape::cuboid(half_extents[0], half_extents[1], half_extents[2])
                }
            }
            Self::Ball { radius } => rapier::SharedShape::ball(*radius),
            Self::ConvexHull { points } => {
                let (vertices, indices) = hull_of(points)?;
                let hull = if margin > 0.0 {
                    rapier::SharedShape::round_convex_mesh(vertices, &indices, margin)
                } else {
                    rapier::SharedShape::convex_mesh(vertices, &indices)
                };
                hull.ok_or_else(|| {
                    PhysicsError::InvalidShape(format!(
                        "degenerate convex hull from {} points",
                        points.len()
                    ))
                })?
            }
        };

        Ok(shape)
    }

    /// Principal inertia of this shape for the given mass
    pub(crate) fn local_inertia(&self, mass: f32, margin: f32) -> Result<[f32; 3]> {
        let shape = self.to_rapier(margin)?;
        if mass <= 0.0 {
            return Ok([0.0; 3]);
        }

        // Unit density gives the volume as mass; rescale to the requested mass.
        let unit = shape.mass_properties(1.0);
        let volume = unit.mass();
        if !(volume > MIN_VOLUME) {
            return Err(PhysicsError::InvalidShape(format!("shape has no volume ({volume})")));
        }

        let inertia = unit.principal_inertia() * (mass / volume);
        Ok([inertia.x, inertia.y, inertia.z])
    }
}

/// Triangulated hull of a point cloud; flat or collinear clouds are rejected
fn hull_of(points: &[[f32; 3]]) -> Result<(Vec<rapier::Point<f32>>, Vec<[u32; 3]>)> {
    let input: Vec<_> = points
        .iter()
        .map(|p| rapier::Point::new(p[0], p[1], p[2]))
        .collect();
    let (vertices, indices) = try_convex_hull(&input)
        .map_err(|e| PhysicsError::InvalidShape(format!("convex hull failed: {e:?}")))?;

    let volume: f32 = indices
        .iter()
        .map(|&[a, b, c]| {
            let (a, b, c) = (vertices[a as usize], vertices[b as usize], vertices[c as usize]);
            a.coords.dot(&b.coords.cross(&c.coords)) / 6.0
        })
        .sum();
    if !(volume.abs() > MIN_VOLUME) {
        return Err(PhysicsError::InvalidShape(format!(
            "convex hull of {} points has no volume",
            points.len()
        )));
    }

    Ok((vertices, indices))
}
