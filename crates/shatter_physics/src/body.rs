//! Rigid body handles and descriptions

use crate::shape::ShapeDesc;
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Handle to a rigid body in the dynamics engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub(crate) rapier::RigidBodyHandle);

impl BodyHandle {
    /// Create from an arena index and generation
    pub fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self(rapier::RigidBodyHandle::from_raw_parts(index, generation))
    }
}

/// Whether the engine may put a near-motionless body to sleep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActivationPolicy {
    /// Engine may deactivate the body when it comes to rest
    #[default]
    AllowSleep,
    /// Body stays active regardless of velocity
    NeverSleep,
}

/// Position and orientation of a body (quaternion: x, y, z, w)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyTransform {
    pub position: [f32; 3],
    pub rotation: [f32; 4],
}

impl Default for BodyTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl BodyTransform {
    pub const IDENTITY: Self = Self {
        position: [0.0, 0.0, 0.0],
        rotation: [0.0, 0.0, 0.0, 1.0],
    };

    pub fn new(position: [f32; 3], rotation: [f32; 4]) -> Self {
        Self { position, rotation }
    }

    pub(crate) fn to_isometry(self) -> rapier::Isometry<f32> {
        let [x, y, z, w] = self.rotation;
        rapier::Isometry::from_parts(
            rapier::Translation::new(self.position[0], self.position[1], self.position[2]),
            UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z)),
        )
    }

    pub(crate) fn read_isometry(&mut self, iso: &rapier::Isometry<f32>) {
        let pos = iso.translation.vector;
        let rot = iso.rotation;
        self.position = [pos.x, pos.y, pos.z];
        self.rotation = [rot.i, rot.j, rot.k, rot.w];
    }
}

/// Linear and angular velocity of a body
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BodyVelocity {
    pub linear: [f32; 3],
    pub angular: [f32; 3],
}

impl BodyVelocity {
    pub const ZERO: Self = Self {
        linear: [0.0; 3],
        angular: [0.0; 3],
    };

    pub fn new(linear: [f32; 3], angular: [f32; 3]) -> Self {
        Self { linear, angular }
    }

    /// Magnitude of the linear velocity
    pub fn speed(&self) -> f32 {
        let [x, y, z] = self.linear;
        (x * x + y * y + z * z).sqrt()
    }
}

/// Description for creating a rigid body with its collider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyDesc {
    /// Collision shape (margin is applied by the engine)
    pub shape: ShapeDesc,
    /// Mass; zero makes the body static
    pub mass: f32,
    /// Initial pose
    pub transform: BodyTransform,
    /// Sleep policy for dynamic bodies
    pub activation: ActivationPolicy,
}

impl BodyDesc {
    /// Create a static body description
    pub fn fixed(shape: ShapeDesc) -> Self {
        Self {
            shape,
            mass: 0.0,
            transform: BodyTransform::IDENTITY,
            activation: ActivationPolicy::AllowSleep,
        }
    }

    /// Create a dynamic body description
    pub fn dynamic(shape: ShapeDesc, mass: f32) -> Self {
        Self {
            mass,
            ..Self::fixed(shape)
        }
    }

    /// Set pose
    pub fn with_transform(mut self, transform: BodyTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Set position
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.position = [x, y, z];
        self
    }

    /// Set sleep policy
    pub fn with_activation(mut self, activation: ActivationPolicy) -> Self {
        self.activation = activation;
        self
    }

    /// Whether this body takes part in dynamics
    pub fn is_dynamic(&self) -> bool {
        self.mass > 0.0
    }

    /// Build a Rapier rigid body builder, at rest
    pub(crate) fn to_rapier_builder(&self) -> rapier::RigidBodyBuilder {
        let builder = if self.is_dynamic() {
            rapier::RigidBodyBuilder::dynamic()
        } else {
            rapier::RigidBodyBuilder::fixed()
        };

        builder
            .position(self.transform.to_isometry())
            .can_sleep(self.activation == ActivationPolicy::AllowSleep)
    }
}
