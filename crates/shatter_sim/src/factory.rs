//! Body creation
//!
//! Every body in the world, from the ground slab to the smallest piece of
//! debris, goes through [`SimulationWorld::create_body`].

use crate::entity::{BodyKind, EntityId, Pose, SimEntity};
use crate::error::{Result, SimError};
use crate::presentation::{Presentation, VisualDesc};
use crate::world::SimulationWorld;
use glam::Vec3;
use shatter_physics::{ActivationPolicy, BodyDesc, BodyVelocity, DynamicsEngine, ShapeDesc};

/// Where a new body is placed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoseSource {
    Explicit(Pose),
    /// Current pose of an existing entity
    VisualOf(EntityId),
}

/// Everything needed to create a body
#[derive(Debug, Clone)]
pub struct BodySpec {
    pub shape: ShapeDesc,
    /// Zero makes the body static
    pub mass: f32,
    pub pose: PoseSource,
    pub initial_velocity: Option<Vec3>,
    pub initial_angular_velocity: Option<Vec3>,
    pub breakable: bool,
    pub color: u32,
}

impl BodySpec {
    pub fn new(shape: ShapeDesc, mass: f32, pose: Pose) -> Self {
        Self {
            shape,
            mass,
            pose: PoseSource::Explicit(pose),
            initial_velocity: None,
            initial_angular_velocity: None,
            breakable: false,
            color: 0xffffff,
        }
    }

    /// Place the body where `entity` currently is
    pub fn at_entity(mut self, entity: EntityId) -> Self {
        self.pose = PoseSource::VisualOf(entity);
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.initial_velocity = Some(velocity);
        self
    }

    pub fn with_angular_velocity(mut self, angular: Vec3) -> Self {
        self.initial_angular_velocity = Some(angular);
        self
    }

    pub fn breakable(mut self, breakable: bool) -> Self {
        self.breakable = breakable;
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }
}

impl<E: DynamicsEngine, P: Presentation> SimulationWorld<E, P> {
    /// Create a body in the engine, track it, and add its visual.
    ///
    /// Dynamic bodies never sleep. Shape problems are reported before
    /// anything is registered.
    pub fn create_body(&mut self, spec: BodySpec) -> Result<EntityId> {
        spec.shape.validate().map_err(SimError::from_engine)?;
        if !spec.mass.is_finite() || spec.mass < 0.0 {
            return Err(SimError::InvalidMass(spec.mass));
        }

        let pose = match spec.pose {
            PoseSource::Explicit(pose) => pose,
            PoseSource::VisualOf(id) => self.registry.get(id).ok_or(SimError::EntityNotFound(id))?.pose,
        };
        let kind = BodyKind::from_mass(spec.mass);

        // Recorded on the entity; the engine derives its own inertia from the
        // collider mass, which gives the same tensor.
        let local_inertia = self
            .engine
            .compute_local_inertia(&spec.shape, spec.mass)
            .map_err(SimError::from_engine)?;

        let activation = match kind {
            BodyKind::Dynamic => ActivationPolicy::NeverSleep,
            BodyKind::Static => ActivationPolicy::AllowSleep,
        };
        let desc = BodyDesc {
            shape: spec.shape.clone(),
            mass: spec.mass,
            transform: pose.into(),
            activation,
        };
        let body = self.engine.add_body(&desc).map_err(SimError::from_engine)?;

        if kind == BodyKind::Dynamic
            && (spec.initial_velocity.is_some() || spec.initial_angular_velocity.is_some())
        {
            let velocity = BodyVelocity::new(
                spec.initial_velocity.unwrap_or(Vec3::ZERO).to_array(),
                spec.initial_angular_velocity.unwrap_or(Vec3::ZERO).to_array(),
            );
            if let Err(e) = self.engine.set_velocity(body, velocity) {
                if let Err(cleanup) = self.engine.remove_body(body) {
                    log::warn!("Failed to discard half-created body: {}", cleanup);
                }
                return Err(e.into());
            }
        }

        let entity = SimEntity {
            id: self.registry.allocate_id(),
            body,
            kind,
            pose,
            mass: spec.mass,
            shape: spec.shape,
            local_inertia: Vec3::from_array(local_inertia),
            breakable: spec.breakable,
            collided_this_pass: false,
            initial_velocity: spec.initial_velocity,
            initial_angular_velocity: spec.initial_angular_velocity,
            color: spec.color,
        };

        let visual = entity.visual();
        self.presentation.add_to_scene(
            visual,
            &VisualDesc {
                shape: entity.shape.clone(),
                color: entity.color,
            },
        );
        self.presentation.update_transform(visual, pose.position, pose.orientation);

        log::trace!("Created {:?} entity {:?} (mass {})", kind, entity.id, entity.mass);
        Ok(self.registry.register(entity))
    }
}
