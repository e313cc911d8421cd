//! Collision scan and fracture decisions
//!
//! After each engine step, every manifold is examined once. A breakable side
//! fractures when the strongest penetrating contact of the manifold carries an
//! impulse strictly above the threshold. Both sides of one manifold share that
//! impact. A body breaks at most once per scan; its removal is deferred.

use crate::entity::EntityId;
use crate::factory::BodySpec;
use crate::presentation::Presentation;
use crate::world::{StepPhase, StepReport, SimulationWorld};
use glam::Vec3;
use shatter_physics::{BodyHandle, BodyVelocity, ContactManifold, DynamicsEngine, ShapeDesc};

/// Strongest penetrating contact of a manifold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactSample {
    pub impulse: f32,
    /// World space
    pub point: Vec3,
    /// World space
    pub normal: Vec3,
}

impl ImpactSample {
    /// `None` when no point penetrates
    pub fn from_manifold(manifold: &ContactManifold) -> Option<Self> {
        manifold.max_impulse_point().map(|p| Self {
            impulse: p.applied_impulse,
            point: Vec3::from_array(p.position),
            normal: Vec3::from_array(p.normal),
        })
    }

    /// Strictly above `threshold`
    pub fn breaks(&self, threshold: f32) -> bool {
        self.impulse > threshold
    }
}

/// One side of a manifold as seen by the scan
#[derive(Debug, Clone, Copy)]
struct Side {
    entity: Option<EntityId>,
    breakable: bool,
    collided: bool,
}

impl<E: DynamicsEngine, P: Presentation> SimulationWorld<E, P> {
    fn side(&self, body: BodyHandle) -> Side {
        let entity = self.registry.is_tracked(body);
        Side {
            entity: entity.map(|e| e.id()),
            breakable: entity.is_some_and(|e| e.is_breakable()),
            collided: entity.is_some_and(|e| e.collided_this_pass()),
        }
    }

    /// Walk the engine's manifolds and break whatever was hit hard enough
    pub fn scan_and_fracture(&mut self) -> StepReport {
        self.phase = StepPhase::ScanAndFracture;

        let threshold = self.config.fracture.impulse_threshold;
        let mut report = StepReport::default();

        for manifold in self.engine.manifolds() {
            let sides = [self.side(manifold.body0), self.side(manifold.body1)];
            if !sides.iter().any(|s| s.breakable) || sides.iter().all(|s| s.collided) {
                continue;
            }

            let Some(impact) = ImpactSample::from_manifold(&manifold) else {
                continue;
            };
            if !impact.breaks(threshold) {
                continue;
            }

            for side in sides {
                if let (Some(id), true, false) = (side.entity, side.breakable, side.collided) {
                    self.fracture_entity(id, &impact, &mut report);
                }
            }
        }

        if report.fractures > 0 {
            log::debug!(
                "Fractured {} bodies into {} pieces of debris",
                report.fractures,
                report.debris_spawned
            );
        }
        self.stats.fractures += report.fractures as u64;
        self.stats.debris_spawned += report.debris_spawned as u64;
        report
    }

    /// Replace `id` by debris. The parent is consumed even when no debris
    /// could be made.
    fn fracture_entity(&mut self, id: EntityId, impact: &ImpactSample, report: &mut StepReport) {
        let Some(parent) = self.registry.get(id) else {
            return;
        };

        let velocity = self.engine.velocity(parent.body()).unwrap_or_else(|e| {
            log::warn!("No velocity for entity {:?}: {}", id, e);
            BodyVelocity::ZERO
        });
        let color = parent.color();
        let debris = match self.fracture.subdivide(parent, velocity, impact.point, impact.normal) {
            Ok(debris) => {
                log::debug!(
                    "Entity {:?} broke under impulse {:.1} into {} fragments",
                    id,
                    impact.impulse,
                    debris.len()
                );
                debris
            }
            Err(e) => {
                log::warn!("Fracture of entity {:?} failed: {}", id, e);
                report.failures += 1;
                Vec::new()
            }
        };

        for piece in debris {
            let points = piece.points.iter().map(|p| p.to_array()).collect();
            let spec = BodySpec::new(ShapeDesc::convex_hull(points), piece.mass, piece.pose)
                .with_velocity(piece.linear_velocity)
                .with_angular_velocity(piece.angular_velocity)
                .breakable(piece.breakable)
                .with_color(color);
            match self.create_body(spec) {
                Ok(_) => report.debris_spawned += 1,
                Err(e) => {
                    log::warn!("Skipping debris of entity {:?}: {}", id, e);
                    report.failures += 1;
                }
            }
        }

        if let Some(parent) = self.registry.get_mut(id) {
            parent.collided_this_pass = true;
        }
        self.removal_queue.push(id);
        report.fractures += 1;
    }
}
