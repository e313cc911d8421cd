//! Cut planes

use glam::Vec3;

const MIN_CROSS_LENGTH_SQ: f32 = 1.0e-12;

/// Plane `normal · p + constant = 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub constant: f32,
}

impl Plane {
    /// Plane with the given normal passing through `point`
    pub fn from_normal_and_point(normal: Vec3, point: Vec3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            constant: -point.dot(normal),
        }
    }

    /// Plane through three points, `None` if they are collinear
    pub fn from_coplanar_points(a: Vec3, b: Vec3, c: Vec3) -> Option<Self> {
        let normal = (c - b).cross(a - b);
        if normal.length_squared() < MIN_CROSS_LENGTH_SQ || !normal.is_finite() {
            return None;
        }
        Some(Self::from_normal_and_point(normal, a))
    }

    /// Signed distance from the plane
    #[inline]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.constant
    }

    /// Point where segment `a..b` crosses the plane
    pub fn intersect_segment(&self, a: Vec3, b: Vec3) -> Option<Vec3> {
        let da = self.distance_to_point(a);
        let db = self.distance_to_point(b);
        if da * db > 0.0 || da == db {
            return None;
        }
        let t = da / (da - db);
        Some(a + (b - a) * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_coplanar_points() {
        let plane = Plane::from_coplanar_points(Vec3::X, Vec3::ZERO, Vec3::Y).unwrap();
        assert_relative_eq!(plane.normal.z.abs(), 1.0);
        assert_relative_eq!(plane.distance_to_point(Vec3::new(3.0, -2.0, 0.0)), 0.0);
    }

    #[test]
    fn test_collinear_points_have_no_plane() {
        assert!(Plane::from_coplanar_points(Vec3::X, Vec3::ZERO, -Vec3::X).is_none());
    }

    #[test]
    fn test_segment_intersection() {
        let plane = Plane::from_normal_and_point(Vec3::Y, Vec3::new(0.0, 1.0, 0.0));
        let hit = plane.intersect_segment(Vec3::ZERO, Vec3::new(0.0, 4.0, 2.0)).unwrap();
        assert_relative_eq!(hit.y, 1.0);
        assert_relative_eq!(hit.z, 0.5);
        assert!(plane.intersect_segment(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 3.0, 0.0)).is_none());
    }
}
