//! Turns a fracturing entity into debris descriptors
//!
//! Fracture geometry works in the parent's local frame. This adapter moves the
//! impact into that frame and places the resulting fragments back in the
//! world, carrying the parent's velocity over unchanged.

use crate::entity::{Pose, SimEntity};
use crate::error::Result;
use glam::Vec3;
use shatter_fracture::{FractureGeometry, SubdivisionLimits};
use shatter_physics::{BodyVelocity, ShapeDesc};
use std::f32::consts::{PI, TAU};

const BALL_SEGMENTS: u32 = 14;
const BALL_RINGS: u32 = 10;

/// One piece of debris ready to be turned into a body
#[derive(Debug, Clone, PartialEq)]
pub struct DebrisDescriptor {
    /// Hull points relative to the debris origin
    pub points: Vec<Vec3>,
    pub mass_fraction: f32,
    /// Parent mass times `mass_fraction`
    pub mass: f32,
    /// World pose of the debris origin
    pub pose: Pose,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub breakable: bool,
}

pub struct FractureAdapter {
    geometry: Box<dyn FractureGeometry>,
    limits: SubdivisionLimits,
}

impl FractureAdapter {
    pub fn new(geometry: Box<dyn FractureGeometry>, limits: SubdivisionLimits) -> Self {
        Self { geometry, limits }
    }

    pub fn limits(&self) -> SubdivisionLimits {
        self.limits
    }

    /// Subdivide `parent` around a world-space impact
    pub fn subdivide(
        &mut self,
        parent: &SimEntity,
        velocity: BodyVelocity,
        impact_point: Vec3,
        impact_normal: Vec3,
    ) -> Result<Vec<DebrisDescriptor>> {
        let pose = parent.pose();
        let points = point_cloud(parent.shape());
        let local_point = pose.inverse_transform_point(impact_point);
        let local_normal = pose.inverse_transform_vector(impact_normal);

        let fragments = self
            .geometry
            .subdivide(&points, local_point, local_normal, self.limits)?;

        let linear_velocity = Vec3::from_array(velocity.linear);
        let angular_velocity = Vec3::from_array(velocity.angular);
        Ok(fragments
            .into_iter()
            .map(|fragment| DebrisDescriptor {
                pose: Pose::new(pose.transform_point(fragment.centroid), pose.orientation),
                mass: parent.mass() * fragment.mass_fraction,
                mass_fraction: fragment.mass_fraction,
                points: fragment.points,
                linear_velocity,
                angular_velocity,
                breakable: fragment.breakable,
            })
            .collect())
    }
}

/// Local-space points whose hull is the shape
pub fn point_cloud(shape: &ShapeDesc) -> Vec<Vec3> {
    match shape {
        ShapeDesc::ConvexHull { points } => points.iter().map(|p| Vec3::from_array(*p)).collect(),
        ShapeDesc::Cuboid { half_extents } => {
            let half = Vec3::from_array(*half_extents);
            let mut corners = Vec::with_capacity(8);
            for sx in [-1.0f32, 1.0] {
                for sy in [-1.0f32, 1.0] {
                    for sz in [-1.0f32, 1.0] {
                        corners.push(Vec3::new(sx, sy, sz) * half);
                    }
                }
            }
            corners
        }
        ShapeDesc::Ball { radius } => {
            let radius = *radius;
            let mut points = vec![Vec3::new(0.0, radius, 0.0), Vec3::new(0.0, -radius, 0.0)];
            for ring in 1..BALL_RINGS {
                let theta = PI * ring as f32 / BALL_RINGS as f32;
                for segment in 0..BALL_SEGMENTS {
                    let phi = TAU * segment as f32 / BALL_SEGMENTS as f32;
                    points.push(
                        Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin()) * radius,
                    );
                }
            }
            points
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{BodyKind, EntityId};
    use approx::assert_relative_eq;
    use glam::Quat;
    use shatter_fracture::{BreakerConfig, ConvexBreaker};
    use shatter_physics::BodyHandle;
    use std::f32::consts::FRAC_PI_2;

    fn cup(pose: Pose) -> SimEntity {
        SimEntity {
            id: EntityId(0),
            body: BodyHandle::from_raw_parts(0, 0),
            kind: BodyKind::Dynamic,
            pose,
            mass: 5.0,
            shape: ShapeDesc::cuboid(0.8, 0.6, 0.8),
            local_inertia: Vec3::ONE,
            breakable: true,
            collided_this_pass: false,
            initial_velocity: None,
            initial_angular_velocity: None,
            color: 0xe53935,
        }
    }

    fn adapter(seed: u64) -> FractureAdapter {
        let breaker = ConvexBreaker::new(BreakerConfig {
            seed: Some(seed),
            ..Default::default()
        });
        FractureAdapter::new(Box::new(breaker), SubdivisionLimits::default())
    }

    #[test]
    fn test_debris_scales_mass_and_keeps_velocity() {
        let parent = cup(Pose::new(Vec3::new(2.0, 1.0, -3.0), Quat::from_rotation_y(FRAC_PI_2)));
        let velocity = BodyVelocity::new([3.0, -1.5, 0.25], [0.0, 2.0, 0.0]);

        let debris = adapter(5)
            .subdivide(&parent, velocity, Vec3::new(2.0, 1.5, -2.2), Vec3::new(0.0, 0.0, -1.0))
            .unwrap();

        assert!(!debris.is_empty());
        let total: f32 = debris.iter().map(|d| d.mass).sum();
        assert!(total > 0.0 && total <= parent.mass() + 1e-4);
        for d in &debris {
            assert_relative_eq!(d.mass, parent.mass() * d.mass_fraction, epsilon = 1e-5);
            assert_eq!(d.linear_velocity, Vec3::new(3.0, -1.5, 0.25));
            assert_eq!(d.angular_velocity, Vec3::new(0.0, 2.0, 0.0));
            assert_eq!(d.pose.orientation, parent.pose().orientation);
        }
    }

    #[test]
    fn test_debris_stays_inside_parent_bounds() {
        let parent = cup(Pose::from_position(Vec3::new(0.0, 5.0, 0.0)));
        let debris = adapter(11)
            .subdivide(&parent, BodyVelocity::ZERO, Vec3::new(0.8, 5.0, 0.0), Vec3::NEG_X)
            .unwrap();

        for d in &debris {
            for p in &d.points {
                let world = d.pose.transform_point(*p);
                assert!((world.y - 5.0).abs() <= 0.6 + 1e-4);
                assert!(world.x.abs() <= 0.8 + 1e-4);
            }
        }
    }

    #[test]
    fn test_point_clouds() {
        assert_eq!(point_cloud(&ShapeDesc::cuboid(1.0, 2.0, 3.0)).len(), 8);
        let ball = point_cloud(&ShapeDesc::ball(0.4));
        assert!(ball.iter().all(|p| (p.length() - 0.4).abs() < 1e-5));
    }
}
