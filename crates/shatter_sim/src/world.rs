//! Simulation world and the per-frame step
//!
//! Each step runs these phases in order and never overlaps them:
//!
//! ```text
//! Idle -> AdvancePhysics -> SyncTransforms -> ScanAndFracture
//!      -> ApplyDeferredRemovals -> Present -> Idle
//! ```
//!
//! Bodies fractured during the scan stay in the engine and the registry until
//! `ApplyDeferredRemovals`, so the manifold list being walked is never
//! invalidated underneath the scan.

use crate::config::SimConfig;
use crate::entity::{EntityId, Pose};
use crate::error::{Result, SimError};
use crate::fracture::FractureAdapter;
use crate::input::{Camera, PointerEvent};
use crate::presentation::Presentation;
use crate::registry::BodyRegistry;
use crossbeam_channel::{Receiver, Sender};
use shatter_fracture::{ConvexBreaker, FractureGeometry};
use shatter_physics::{BodyTransform, DynamicsEngine};

/// Phase the world is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepPhase {
    #[default]
    Idle,
    AdvancePhysics,
    SyncTransforms,
    ScanAndFracture,
    ApplyDeferredRemovals,
    Present,
}

/// What one step did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Projectiles fired from queued pointer input
    pub projectiles: usize,
    /// Internal engine steps
    pub substeps: u32,
    /// Bodies broken this step
    pub fractures: usize,
    pub debris_spawned: usize,
    /// Entities removed from the engine and the scene
    pub removed: usize,
    /// Fractures or spawns that failed and were skipped
    pub failures: usize,
}

/// Running totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub frame: u64,
    pub entities: usize,
    pub dynamic_entities: usize,
    pub engine_bodies: usize,
    pub fractures: u64,
    pub debris_spawned: u64,
    pub pending_removals: usize,
}

/// Owns the engine, the presentation and every tracked entity
pub struct SimulationWorld<E: DynamicsEngine, P: Presentation> {
    pub(crate) config: SimConfig,
    pub(crate) engine: E,
    pub(crate) presentation: P,
    pub(crate) registry: BodyRegistry,
    pub(crate) fracture: FractureAdapter,
    pub(crate) removal_queue: Vec<EntityId>,
    pub(crate) camera: Camera,
    input_tx: Sender<PointerEvent>,
    pub(crate) input_rx: Receiver<PointerEvent>,
    scratch: BodyTransform,
    pub(crate) phase: StepPhase,
    pub(crate) stats: WorldStats,
}

impl<E: DynamicsEngine, P: Presentation> SimulationWorld<E, P> {
    /// Create a world breaking bodies with the default [`ConvexBreaker`]
    pub fn new(engine: E, presentation: P, config: SimConfig) -> Result<Self> {
        let breaker = ConvexBreaker::new(config.fracture.breaker_config());
        Self::with_geometry(engine, presentation, config, Box::new(breaker))
    }

    /// Create a world with a custom fracture geometry
    pub fn with_geometry(
        engine: E,
        presentation: P,
        config: SimConfig,
        geometry: Box<dyn FractureGeometry>,
    ) -> Result<Self> {
        engine.ensure_ready().map_err(SimError::EngineUnavailable)?;

        let (input_tx, input_rx) = crossbeam_channel::unbounded();
        let fracture = FractureAdapter::new(geometry, config.fracture.limits());
        let camera = Camera::from_settings(&config.camera);

        log::info!(
            "Simulation world created (fracture impulse > {}, {} substeps max)",
            config.fracture.impulse_threshold,
            config.physics.max_substeps
        );

        Ok(Self {
            config,
            engine,
            presentation,
            registry: BodyRegistry::new(),
            fracture,
            removal_queue: Vec::new(),
            camera,
            input_tx,
            input_rx,
            scratch: BodyTransform::IDENTITY,
            phase: StepPhase::Idle,
            stats: WorldStats::default(),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn phase(&self) -> StepPhase {
        self.phase
    }

    /// Entities fractured this step and not yet removed
    pub fn pending_removals(&self) -> &[EntityId] {
        &self.removal_queue
    }

    /// Sender for pointer input; events are handled at the start of the next step
    pub fn input_sender(&self) -> Sender<PointerEvent> {
        self.input_tx.clone()
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            entities: self.registry.len(),
            dynamic_entities: self.registry.dynamic_count(),
            engine_bodies: self.engine.body_count(),
            pending_removals: self.removal_queue.len(),
            ..self.stats
        }
    }

    /// Run one frame
    pub fn step(&mut self, dt: f32) -> StepReport {
        self.stats.frame += 1;

        let projectiles = self.drain_input();
        let substeps = self.advance_physics(dt);
        self.sync_transforms();
        let mut report = self.scan_and_fracture();
        report.projectiles = projectiles;
        report.substeps = substeps;
        report.removed = self.apply_deferred_removals();
        self.present();

        self.phase = StepPhase::Idle;
        report
    }

    /// Advance the engine by `dt` within the configured step budget
    pub fn advance_physics(&mut self, dt: f32) -> u32 {
        self.phase = StepPhase::AdvancePhysics;
        self.engine.advance(dt, self.config.physics.max_substeps)
    }

    /// Copy engine transforms into entities and visuals; clears collided flags
    pub fn sync_transforms(&mut self) {
        self.phase = StepPhase::SyncTransforms;

        let engine = &self.engine;
        let presentation = &mut self.presentation;
        let scratch = &mut self.scratch;
        self.registry.for_each_dynamic_mut(|entity| {
            match engine.read_transform(entity.body, scratch) {
                Ok(()) => {
                    entity.pose = Pose::from(*scratch);
                    presentation.update_transform(
                        entity.visual(),
                        entity.pose.position,
                        entity.pose.orientation,
                    );
                }
                Err(e) => log::warn!("No transform for entity {:?}: {}", entity.id, e),
            }
            entity.collided_this_pass = false;
        });
    }

    /// Destroy every entity fractured during the scan
    pub fn apply_deferred_removals(&mut self) -> usize {
        self.phase = StepPhase::ApplyDeferredRemovals;

        let mut queue = std::mem::take(&mut self.removal_queue);
        let mut removed = 0;
        for id in queue.drain(..) {
            let Some(entity) = self.registry.unregister(id) else {
                continue;
            };
            if let Err(e) = self.engine.remove_body(entity.body) {
                log::warn!("Failed to remove body of entity {:?}: {}", id, e);
            }
            self.presentation.remove_from_scene(entity.visual());
            removed += 1;
        }
        self.removal_queue = queue;

        if removed > 0 {
            log::debug!("Removed {} fractured entities", removed);
        }
        removed
    }

    /// Hand the frame to the presentation
    pub fn present(&mut self) {
        self.phase = StepPhase::Present;
        self.presentation.render_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::BodySpec;
    use crate::presentation::HeadlessPresentation;
    use crate::testing::ScriptedEngine;
    use glam::Vec3;
    use shatter_physics::ShapeDesc;

    fn world() -> SimulationWorld<ScriptedEngine, HeadlessPresentation> {
        SimulationWorld::new(
            ScriptedEngine::new(),
            HeadlessPresentation::new(),
            SimConfig::default().with_seed(1),
        )
        .unwrap()
    }

    #[test]
    fn test_unready_engine_is_rejected() {
        let result = SimulationWorld::new(
            ScriptedEngine::unavailable(),
            HeadlessPresentation::new(),
            SimConfig::default(),
        );
        assert!(matches!(result, Err(SimError::EngineUnavailable(_))));
    }

    #[test]
    fn test_step_runs_every_phase() {
        let mut world = world();
        let report = world.step(1.0 / 60.0);

        assert_eq!(report.substeps, 1);
        assert_eq!(world.phase(), StepPhase::Idle);
        assert_eq!(world.presentation().frames(), 1);
        assert_eq!(world.stats().frame, 1);
    }

    #[test]
    fn test_sync_is_idempotent() {
        let mut world = world();
        let id = world
            .create_body(
                BodySpec::new(ShapeDesc::ball(0.5), 1.0, Pose::from_position(Vec3::Y))
                    .with_velocity(Vec3::new(1.0, 0.0, 0.0)),
            )
            .unwrap();

        world.advance_physics(0.5);
        world.sync_transforms();
        let visual = world.registry().get(id).unwrap().visual();
        let first = world.presentation().visual(visual).cloned().unwrap();
        let first_pose = world.registry().get(id).unwrap().pose();

        world.sync_transforms();
        let second = world.presentation().visual(visual).cloned().unwrap();

        assert_eq!(first, second);
        assert_eq!(first_pose, world.registry().get(id).unwrap().pose());
        assert_eq!(first.position, Vec3::new(0.5, 1.0, 0.0));
    }

    #[test]
    fn test_static_bodies_are_not_synced() {
        let mut world = world();
        let ground = world
            .create_body(BodySpec::new(ShapeDesc::cuboid(20.0, 0.5, 20.0), 0.0, Pose::IDENTITY))
            .unwrap();

        let before = world.presentation().transform_updates();
        world.step(1.0 / 60.0);
        assert_eq!(world.presentation().transform_updates(), before);
        assert!(world.registry().contains(ground));
    }
}
