//! Physics world - Rapier-backed dynamics engine

use crate::body::{ActivationPolicy, BodyDesc, BodyHandle, BodyTransform, BodyVelocity};
use crate::config::PhysicsConfig;
use crate::engine::DynamicsEngine;
use crate::error::{PhysicsError, Result};
use crate::manifold::{ContactManifold, ContactPoint};
use crate::shape::ShapeDesc;
use rapier3d::prelude as rapier;
use std::collections::HashMap;
use std::num::NonZeroUsize;

/// The main physics world containing all simulation state
pub struct PhysicsWorld {
    /// Configuration
    config: PhysicsConfig,

    /// Rapier physics pipeline
    pipeline: rapier::PhysicsPipeline,

    /// Gravity
    gravity: rapier::Vector<f32>,

    /// Integration parameters
    integration_params: rapier::IntegrationParameters,

    /// Island manager
    islands: rapier::IslandManager,

    /// Broad phase
    broad_phase: rapier::DefaultBroadPhase,

    /// Narrow phase
    narrow_phase: rapier::NarrowPhase,

    /// Impulse joint set
    impulse_joints: rapier::ImpulseJointSet,

    /// Multibody joint set
    multibody_joints: rapier::MultibodyJointSet,

    /// CCD solver
    ccd_solver: rapier::CCDSolver,

    /// Rigid body set
    bodies: rapier::RigidBodySet,

    /// Collider set
    colliders: rapier::ColliderSet,

    /// Sleep policy per body
    activation: HashMap<BodyHandle, ActivationPolicy>,

    /// Accumulated time for fixed timestep
    accumulated_time: f32,

    /// Internal steps taken since creation
    steps_taken: u64,
}

impl PhysicsWorld {
    /// Create a new physics world
    pub fn new(config: PhysicsConfig) -> Result<Self> {
        config.validate()?;

        let gravity = rapier::Vector::new(config.gravity[0], config.gravity[1], config.gravity[2]);

        let mut integration_params = rapier::IntegrationParameters::default();
        integration_params.dt = config.timestep;
        integration_params.num_solver_iterations =
            NonZeroUsize::new(config.solver_iterations).unwrap_or(NonZeroUsize::MIN);

        log::info!(
            "Physics world created: timestep {:.4}s, up to {} substeps, gravity {:?}",
            config.timestep,
            config.max_substeps,
            config.gravity
        );

        Ok(Self {
            config,
            pipeline: rapier::PhysicsPipeline::new(),
            gravity,
            integration_params,
            islands: rapier::IslandManager::new(),
            broad_phase: rapier::DefaultBroadPhase::new(),
            narrow_phase: rapier::NarrowPhase::new(),
            impulse_joints: rapier::ImpulseJointSet::new(),
            multibody_joints: rapier::MultibodyJointSet::new(),
            ccd_solver: rapier::CCDSolver::new(),
            bodies: rapier::RigidBodySet::new(),
            colliders: rapier::ColliderSet::new(),
            activation: HashMap::new(),
            accumulated_time: 0.0,
            steps_taken: 0,
        })
    }

    /// Get the physics configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Step with the configured substep budget
    pub fn step(&mut self, delta_time: f32) -> u32 {
        self.advance(delta_time, self.config.max_substeps)
    }

    /// Internal steps taken since creation
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Get number of colliders
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    fn body(&self, handle: BodyHandle) -> Result<&rapier::RigidBody> {
        self.bodies.get(handle.0).ok_or(PhysicsError::BodyNotFound(handle))
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut rapier::RigidBody> {
        self.bodies.get_mut(handle.0).ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Internal fixed timestep
    fn step_internal(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
        self.steps_taken += 1;
    }

    /// Flatten one contact pair into engine-neutral manifolds
    fn collect_pair(&self, pair: &rapier::ContactPair, out: &mut Vec<ContactManifold>) {
        let (Some(c1), Some(c2)) = (self.colliders.get(pair.collider1), self.colliders.get(pair.collider2))
        else {
            return;
        };
        let (Some(b1), Some(b2)) = (c1.parent(), c2.parent()) else {
            return;
        };

        for manifold in &pair.manifolds {
            if manifold.points.is_empty() {
                continue;
            }

            let n = manifold.data.normal;
            let mut contact = ContactManifold::new(BodyHandle(b1), BodyHandle(b2));
            for point in &manifold.points {
                let world = c2.position() * point.local_p2;
                contact.points.push(ContactPoint {
                    distance: point.dist,
                    applied_impulse: point.data.impulse,
                    position: [world.x, world.y, world.z],
                    normal: [n.x, n.y, n.z],
                });
            }
            out.push(contact);
        }
    }
}

impl DynamicsEngine for PhysicsWorld {
    fn advance(&mut self, dt: f32, max_substeps: u32) -> u32 {
        if !(dt > 0.0) {
            return 0;
        }

        self.accumulated_time += dt;

        let timestep = self.config.timestep;
        let mut steps = 0;
        while self.accumulated_time >= timestep && steps < max_substeps {
            self.step_internal();
            self.accumulated_time -= timestep;
            steps += 1;
        }

        // Time beyond the substep budget is dropped rather than carried over.
        if self.accumulated_time >= timestep {
            log::trace!(
                "Dropping {:.4}s of simulation time beyond {} substeps",
                self.accumulated_time - self.accumulated_time % timestep,
                max_substeps
            );
            self.accumulated_time %= timestep;
        }

        steps
    }

    fn add_body(&mut self, desc: &BodyDesc) -> Result<BodyHandle> {
        let shape = desc.shape.to_rapier(self.config.collision_margin)?;

        let handle = self.bodies.insert(desc.to_rapier_builder());

        let mut collider = rapier::ColliderBuilder::new(shape)
            .friction(self.config.friction)
            .restitution(self.config.restitution);
        if desc.is_dynamic() {
            collider = collider.mass(desc.mass);
        }
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);

        let handle = BodyHandle(handle);
        self.activation.insert(handle, desc.activation);
        Ok(handle)
    }

    fn remove_body(&mut self, handle: BodyHandle) -> Result<()> {
        self.activation.remove(&handle);
        self.bodies
            .remove(
                handle.0,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true, // Remove attached colliders
            )
            .map(|_| ())
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    fn manifolds(&self) -> Vec<ContactManifold> {
        let mut manifolds = Vec::new();
        for pair in self.narrow_phase.contact_pairs() {
            self.collect_pair(pair, &mut manifolds);
        }
        manifolds
    }

    fn compute_local_inertia(&self, shape: &ShapeDesc, mass: f32) -> Result<[f32; 3]> {
        shape.local_inertia(mass, self.config.collision_margin)
    }

    fn read_transform(&self, handle: BodyHandle, out: &mut BodyTransform) -> Result<()> {
        let body = self.body(handle)?;
        out.read_isometry(body.position());
        Ok(())
    }

    fn velocity(&self, handle: BodyHandle) -> Result<BodyVelocity> {
        let body = self.body(handle)?;
        let lin = body.linvel();
        let ang = body.angvel();
        Ok(BodyVelocity::new([lin.x, lin.y, lin.z], [ang.x, ang.y, ang.z]))
    }

    fn set_velocity(&mut self, handle: BodyHandle, velocity: BodyVelocity) -> Result<()> {
        let body = self.body_mut(handle)?;
        let [lx, ly, lz] = velocity.linear;
        let [ax, ay, az] = velocity.angular;
        body.set_linvel(rapier::Vector::new(lx, ly, lz), true);
        body.set_angvel(rapier::Vector::new(ax, ay, az), true);
        Ok(())
    }

    fn activation_policy(&self, handle: BodyHandle) -> Result<ActivationPolicy> {
        self.activation
            .get(&handle)
            .copied()
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    fn set_activation_policy(&mut self, handle: BodyHandle, policy: ActivationPolicy) -> Result<()> {
        let body = self.body_mut(handle)?;
        *body.activation_mut() = match policy {
            ActivationPolicy::AllowSleep => rapier::RigidBodyActivation::active(),
            ActivationPolicy::NeverSleep => rapier::RigidBodyActivation::cannot_sleep(),
        };
        body.wake_up(true);
        self.activation.insert(handle, policy);
        Ok(())
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> PhysicsWorld {
        PhysicsWorld::new(PhysicsConfig::default()).unwrap()
    }

    #[test]
    fn test_create_world() {
        let world = world();
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.collider_count(), 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = PhysicsConfig::default().with_timestep(-1.0);
        assert!(matches!(PhysicsWorld::new(config), Err(PhysicsError::InvalidConfig(_))));
    }

    #[test]
    fn test_add_and_remove_body() {
        let mut world = world();

        let body = world
            .add_body(&BodyDesc::dynamic(ShapeDesc::ball(1.0), 1.0).with_position(0.0, 10.0, 0.0))
            .unwrap();
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.collider_count(), 1);

        world.remove_body(body).unwrap();
        assert_eq!(world.body_count(), 0);
        assert!(world.remove_body(body).is_err());
    }

    #[test]
    fn test_degenerate_hull_adds_nothing() {
        let mut world = world();
        let desc = BodyDesc::dynamic(ShapeDesc::convex_hull(vec![[0.0; 3], [1.0, 0.0, 0.0]]), 1.0);
        assert!(world.add_body(&desc).is_err());
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_gravity_fall() {
        let mut world = world();

        let body = world
            .add_body(&BodyDesc::dynamic(ShapeDesc::ball(1.0), 1.0).with_position(0.0, 10.0, 0.0))
            .unwrap();

        let mut transform = BodyTransform::IDENTITY;
        world.read_transform(body, &mut transform).unwrap();
        let initial_y = transform.position[1];

        for _ in 0..60 {
            world.step(1.0 / 60.0);
        }

        world.read_transform(body, &mut transform).unwrap();
        assert!(transform.position[1] < initial_y, "Body should fall due to gravity");
    }

    #[test]
    fn test_substep_budget() {
        let mut world = world();
        assert_eq!(world.advance(1.0 / 60.0 * 3.5, 10), 3);
        // A long hitch is clamped to the budget.
        assert_eq!(world.advance(1.0, 10), 10);
        assert_eq!(world.advance(0.0, 10), 0);
        assert_eq!(world.steps_taken(), 13);
    }

    #[test]
    fn test_initial_velocity_and_activation() {
        let mut world = world();
        let desc = BodyDesc::dynamic(ShapeDesc::ball(0.5), 2.0).with_activation(ActivationPolicy::NeverSleep);
        let body = world.add_body(&desc).unwrap();
        assert_eq!(world.velocity(body).unwrap(), BodyVelocity::ZERO);

        world
            .set_velocity(body, BodyVelocity::new([1.0, 2.0, 3.0], [0.0, 1.0, 0.0]))
            .unwrap();

        let velocity = world.velocity(body).unwrap();
        assert_eq!(velocity.linear, [1.0, 2.0, 3.0]);
        assert_eq!(velocity.angular, [0.0, 1.0, 0.0]);
        assert_eq!(world.activation_policy(body).unwrap(), ActivationPolicy::NeverSleep);

        world.set_activation_policy(body, ActivationPolicy::AllowSleep).unwrap();
        assert_eq!(world.activation_policy(body).unwrap(), ActivationPolicy::AllowSleep);
    }

    #[test]
    fn test_collider_mass_matches_local_inertia() {
        let mut world = world();
        let shape = ShapeDesc::convex_hull(vec![
            [-0.5, -0.6, -0.5],
            [0.5, -0.6, -0.5],
            [0.5, -0.6, 0.5],
            [-0.5, -0.6, 0.5],
            [-0.8, 0.6, -0.8],
            [0.8, 0.6, -0.8],
            [0.8, 0.6, 0.8],
            [-0.8, 0.6, 0.8],
        ]);
        let expected = world.compute_local_inertia(&shape, 5.0).unwrap();
        let body = world.add_body(&BodyDesc::dynamic(shape, 5.0)).unwrap();
        world.step(1.0 / 60.0);

        let mprops = world.body(body).unwrap().mass_properties().local_mprops;
        assert!((mprops.mass() - 5.0).abs() < 1e-3);
        let inertia = mprops.principal_inertia();
        let mut actual = [inertia.x, inertia.y, inertia.z];
        let mut expected = expected;
        actual.sort_by(f32::total_cmp);
        expected.sort_by(f32::total_cmp);
        for i in 0..3 {
            assert!((actual[i] - expected[i]).abs() <= expected[i] * 1e-3, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn test_resting_box_reports_contacts() {
        let mut world = world();
        world
            .add_body(&BodyDesc::fixed(ShapeDesc::from_size(40.0, 1.0, 40.0)).with_position(0.0, -0.5, 0.0))
            .unwrap();
        world
            .add_body(&BodyDesc::dynamic(ShapeDesc::from_size(1.0, 1.0, 1.0), 5.0).with_position(0.0, 0.5, 0.0))
            .unwrap();

        for _ in 0..30 {
            world.step(1.0 / 60.0);
        }

        let manifolds = world.manifolds();
        assert!(!manifolds.is_empty());
        assert!(manifolds.iter().all(|m| m.points.iter().all(|p| p.applied_impulse < 250.0)));
    }
}
