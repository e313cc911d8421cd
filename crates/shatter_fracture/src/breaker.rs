//! Radial plane-cut subdivision of convex bodies
//!
//! The first cut runs through the impact point, the body origin and the
//! impact normal. Each resulting piece is cut again, first by planes rotated
//! about the impact normal inside the piece's angular sector, then by planes
//! through the piece's own centroid. Recursion stops at random with a
//! probability that grows with depth, or when the iteration budget runs out.

use crate::error::{FractureError, Result};
use crate::hull::ConvexHull;
use crate::plane::Plane;
use crate::{Fragment, FractureGeometry, SubdivisionLimits};
use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Breaker tuning
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// Fragments with a smaller bounding diameter are not breakable again
    pub min_size_for_break: f32,
    /// Vertices closer than this to a cut plane go to both sides
    pub small_delta: f32,
    /// Fixed RNG seed; entropy when absent
    pub seed: Option<u64>,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            min_size_for_break: 1.4,
            small_delta: 1.0e-4,
            seed: None,
        }
    }
}

/// Piece of the body being subdivided, in the body's local frame
#[derive(Debug, Clone)]
struct Piece {
    hull: ConvexHull,
    mass_fraction: f32,
}

impl Piece {
    fn centroid(&self) -> Vec3 {
        self.hull.centroid()
    }

    fn into_fragment(self, min_size_for_break: f32) -> Fragment {
        let centroid = self.hull.centroid();
        let radius = self.hull.radius_about(centroid);
        Fragment {
            points: self.hull.vertices().iter().map(|v| *v - centroid).collect(),
            centroid,
            mass_fraction: self.mass_fraction,
            breakable: 2.0 * radius > min_size_for_break,
        }
    }
}

/// Shared state of one `subdivide` call
struct Impact {
    point: Vec3,
    normal: Vec3,
    first_plane: Plane,
    limits: SubdivisionLimits,
}

impl Impact {
    /// Plane through `anchor` containing the impact normal, for collinear inputs
    fn fallback_plane(&self, anchor: Vec3) -> Plane {
        Plane::from_normal_and_point(self.normal.any_orthonormal_vector(), anchor)
    }
}

/// Default fracture geometry
pub struct ConvexBreaker {
    config: BreakerConfig,
    rng: StdRng,
}

impl ConvexBreaker {
    pub fn new(config: BreakerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &BreakerConfig {
        &self.config
    }

    /// Split a hull in two. Either side is `None` when it keeps too few points
    /// or collapses to a flat hull.
    pub fn cut_by_plane(&self, hull: &ConvexHull, plane: &Plane) -> (Option<ConvexHull>, Option<ConvexHull>) {
        let delta = self.config.small_delta;
        let mut front = Vec::new();
        let mut back = Vec::new();

        for &v in hull.vertices() {
            let d = plane.distance_to_point(v);
            if d > delta {
                front.push(v);
            } else if d < -delta {
                back.push(v);
            } else {
                front.push(v);
                back.push(v);
            }
        }

        for (a, b) in hull.edges() {
            let da = plane.distance_to_point(a);
            let db = plane.distance_to_point(b);
            let crosses = (da > delta && db < -delta) || (da < -delta && db > delta);
            if !crosses {
                continue;
            }
            if let Some(p) = plane.intersect_segment(a, b) {
                front.push(p);
                back.push(p);
            }
        }

        (side_hull(&front), side_hull(&back))
    }

    fn subdivide_radial(
        &mut self,
        piece: Piece,
        start_angle: f32,
        end_angle: f32,
        iteration: u32,
        impact: &Impact,
        debris: &mut Vec<Piece>,
    ) {
        let max_iterations = impact.limits.radial_iterations + impact.limits.random_iterations;
        if self.rng.gen::<f32>() < iteration as f32 * 0.05 || iteration > max_iterations {
            debris.push(piece);
            return;
        }

        let mut angle = PI;
        let plane = if iteration == 0 {
            impact.first_plane
        } else if iteration <= impact.limits.radial_iterations {
            // Rotate the cut about the impact normal, anchored at the impact point.
            angle = (end_angle - start_angle) * (0.2 + 0.6 * self.rng.gen::<f32>()) + start_angle;
            let swept = Quat::from_axis_angle(impact.normal, angle) * (Vec3::ZERO - impact.point) + impact.point;
            Plane::from_coplanar_points(impact.point, impact.point + impact.normal, swept)
                .unwrap_or_else(|| impact.fallback_plane(impact.point))
        } else {
            // Cut through the piece's own centroid.
            let centroid = piece.centroid();
            angle = (0.5 * (iteration & 1) as f32 + 0.2 * (2.0 - self.rng.gen::<f32>())) * PI;
            let swept = Quat::from_axis_angle(impact.normal, angle) * (impact.point - centroid) + centroid;
            Plane::from_coplanar_points(centroid, impact.normal + centroid, swept)
                .unwrap_or_else(|| impact.fallback_plane(centroid))
        };

        match self.cut_by_plane(&piece.hull, &plane) {
            (Some(front), Some(back)) => {
                let half = piece.mass_fraction * 0.5;
                self.subdivide_radial(Piece { hull: front, mass_fraction: half }, start_angle, angle, iteration + 1, impact, debris);
                self.subdivide_radial(Piece { hull: back, mass_fraction: half }, angle, end_angle, iteration + 1, impact, debris);
            }
            (Some(hull), None) | (None, Some(hull)) => {
                let mass_fraction = piece.mass_fraction * 0.5;
                self.subdivide_radial(Piece { hull, mass_fraction }, start_angle, angle, iteration + 1, impact, debris);
            }
            (None, None) => {
                log::trace!("cut at iteration {iteration} left no usable side; keeping piece whole");
                debris.push(piece);
            }
        }
    }
}

impl Default for ConvexBreaker {
    fn default() -> Self {
        Self::new(BreakerConfig::default())
    }
}

impl FractureGeometry for ConvexBreaker {
    fn subdivide(
        &mut self,
        points: &[Vec3],
        impact_point: Vec3,
        impact_normal: Vec3,
        limits: SubdivisionLimits,
    ) -> Result<Vec<Fragment>> {
        if !impact_point.is_finite() {
            return Err(FractureError::InvalidImpact);
        }
        let normal = impact_normal.try_normalize().ok_or(FractureError::InvalidImpact)?;

        let root = Piece {
            hull: ConvexHull::from_points(points)?,
            mass_fraction: 1.0,
        };

        let first_plane = Plane::from_coplanar_points(impact_point, Vec3::ZERO, impact_point + normal)
            .unwrap_or_else(|| Plane::from_normal_and_point(normal.any_orthonormal_vector(), impact_point));
        let impact = Impact {
            point: impact_point,
            normal,
            first_plane,
            limits,
        };

        let mut debris = Vec::new();
        self.subdivide_radial(root, 0.0, TAU, 0, &impact, &mut debris);

        let min_size = self.config.min_size_for_break;
        Ok(debris.into_iter().map(|p| p.into_fragment(min_size)).collect())
    }
}

/// Hull for one side of a cut, if it keeps enough points
fn side_hull(points: &[Vec3]) -> Option<ConvexHull> {
    if points.len() <= 4 {
        return None;
    }
    ConvexHull::from_points(points).ok()
}
