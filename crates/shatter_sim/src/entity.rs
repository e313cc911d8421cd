//! Simulation entities: one body, one visual

use glam::{Quat, Vec3};
use shatter_physics::{BodyHandle, BodyTransform, ShapeDesc};

/// Stable identifier of a simulation entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) u64);

impl EntityId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// World-space placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self { position, orientation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Local point to world space
    #[inline]
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.orientation * local
    }

    /// World point to local space
    #[inline]
    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        self.orientation.inverse() * (world - self.position)
    }

    /// World direction to local space
    #[inline]
    pub fn inverse_transform_vector(&self, world: Vec3) -> Vec3 {
        self.orientation.inverse() * world
    }
}

impl From<BodyTransform> for Pose {
    fn from(t: BodyTransform) -> Self {
        Self {
            position: Vec3::from_array(t.position),
            orientation: Quat::from_array(t.rotation),
        }
    }
}

impl From<Pose> for BodyTransform {
    fn from(pose: Pose) -> Self {
        BodyTransform::new(pose.position.to_array(), pose.orientation.to_array())
    }
}

/// Static bodies never move and never break
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Static,
    Dynamic,
}

impl BodyKind {
    pub fn from_mass(mass: f32) -> Self {
        if mass > 0.0 {
            Self::Dynamic
        } else {
            Self::Static
        }
    }
}

/// A tracked body and its bookkeeping
#[derive(Debug, Clone)]
pub struct SimEntity {
    pub(crate) id: EntityId,
    pub(crate) body: BodyHandle,
    pub(crate) kind: BodyKind,
    pub(crate) pose: Pose,
    pub(crate) mass: f32,
    pub(crate) shape: ShapeDesc,
    pub(crate) local_inertia: Vec3,
    pub(crate) breakable: bool,
    pub(crate) collided_this_pass: bool,
    pub(crate) initial_velocity: Option<Vec3>,
    pub(crate) initial_angular_velocity: Option<Vec3>,
    pub(crate) color: u32,
}

impl SimEntity {
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    /// Last pose read back from the engine
    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn shape(&self) -> &ShapeDesc {
        &self.shape
    }

    pub fn local_inertia(&self) -> Vec3 {
        self.local_inertia
    }

    /// Marked breakable at creation; static bodies never are
    pub fn is_breakable(&self) -> bool {
        self.breakable && self.kind == BodyKind::Dynamic
    }

    /// Already fractured during the current scan
    pub fn collided_this_pass(&self) -> bool {
        self.collided_this_pass
    }

    pub fn initial_velocity(&self) -> Option<Vec3> {
        self.initial_velocity
    }

    pub fn initial_angular_velocity(&self) -> Option<Vec3> {
        self.initial_angular_velocity
    }

    pub fn color(&self) -> u32 {
        self.color
    }

    pub fn visual(&self) -> crate::presentation::VisualHandle {
        crate::presentation::VisualHandle(self.id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_pose_round_trip_through_local_space() {
        let pose = Pose::new(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_y(FRAC_PI_2));
        let local = Vec3::new(0.5, -0.25, 2.0);
        let back = pose.inverse_transform_point(pose.transform_point(local));
        assert_relative_eq!(back.distance(local), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_transform_conversion() {
        let t = BodyTransform::new([1.0, 2.0, 3.0], [0.0, 0.0, 0.0, 1.0]);
        let pose = Pose::from(t);
        assert_eq!(pose, Pose::from_position(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(BodyTransform::from(pose), t);
    }

    #[test]
    fn test_kind_from_mass() {
        assert_eq!(BodyKind::from_mass(0.0), BodyKind::Static);
        assert_eq!(BodyKind::from_mass(5.0), BodyKind::Dynamic);
    }
}
