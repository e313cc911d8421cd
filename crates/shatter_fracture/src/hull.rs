//! Convex hulls of fragment point clouds

use crate::error::{FractureError, Result};
use glam::Vec3;
use rapier3d::na::Point3;
use rapier3d::parry::transformation::try_convex_hull;

const MIN_VOLUME: f32 = 1.0e-7;
const WELD_DISTANCE_SQ: f32 = 1.0e-10;

/// Triangulated convex hull
#[derive(Debug, Clone)]
pub struct ConvexHull {
    vertices: Vec<Vec3>,
    faces: Vec<[u32; 3]>,
}

impl ConvexHull {
    /// Hull of a point cloud; fails when the points do not span a volume
    pub fn from_points(points: &[Vec3]) -> Result<Self> {
        let points = weld(points);
        if points.len() < 4 {
            return Err(FractureError::DegenerateHull(format!(
                "need at least 4 distinct points, got {}",
                points.len()
            )));
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(FractureError::DegenerateHull("non-finite point".into()));
        }

        let input: Vec<Point3<f32>> = points.iter().map(|p| Point3::new(p.x, p.y, p.z)).collect();
        let (vertices, faces) =
            try_convex_hull(&input).map_err(|e| FractureError::DegenerateHull(format!("{e:?}")))?;

        let hull = Self {
            vertices: vertices.iter().map(|p| Vec3::new(p.x, p.y, p.z)).collect(),
            faces,
        };

        let volume = hull.volume();
        if !(volume > MIN_VOLUME) {
            return Err(FractureError::DegenerateHull(format!("hull volume {volume}")));
        }
        Ok(hull)
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Unique undirected edges
    pub fn edges(&self) -> Vec<(Vec3, Vec3)> {
        let mut pairs: Vec<(u32, u32)> = self
            .faces
            .iter()
            .flat_map(|&[a, b, c]| [(a, b), (b, c), (c, a)])
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        pairs.sort_unstable();
        pairs.dedup();

        pairs
            .into_iter()
            .map(|(a, b)| (self.vertices[a as usize], self.vertices[b as usize]))
            .collect()
    }

    /// Mean of the hull vertices
    pub fn centroid(&self) -> Vec3 {
        let sum: Vec3 = self.vertices.iter().copied().sum();
        sum / self.vertices.len() as f32
    }

    /// Largest distance from `center` to a vertex
    pub fn radius_about(&self, center: Vec3) -> f32 {
        self.vertices
            .iter()
            .map(|v| v.distance(center))
            .fold(0.0, f32::max)
    }

    /// Enclosed volume
    pub fn volume(&self) -> f32 {
        let origin = self.vertices.first().copied().unwrap_or(Vec3::ZERO);
        let six_v: f32 = self
            .faces
            .iter()
            .map(|&[a, b, c]| {
                let a = self.vertices[a as usize] - origin;
                let b = self.vertices[b as usize] - origin;
                let c = self.vertices[c as usize] - origin;
                a.dot(b.cross(c))
            })
            .sum();
        six_v.abs() / 6.0
    }
}

/// Drop near-duplicate points
fn weld(points: &[Vec3]) -> Vec<Vec3> {
    let mut out: Vec<Vec3> = Vec::with_capacity(points.len());
    for p in points {
        if !out.iter().any(|q| q.distance_squared(*p) < WELD_DISTANCE_SQ) {
            out.push(*p);
        }
    }
    out
}
