//! Shatter Sim - fracture-and-rebody simulation core
//!
//! Drives a [`DynamicsEngine`](shatter_physics::DynamicsEngine), watches its
//! contact manifolds, and replaces breakable bodies that were hit hard enough
//! with convex debris. Visual state goes out through [`Presentation`].
//!
//! ```text
//!   pointer ──► input queue
//!                   │
//!   ┌───────────────▼──────────────────────────────────────────┐
//!   │ SimulationWorld::step                                    │
//!   │   advance ─► sync transforms ─► scan & fracture          │
//!   │                                   │ debris ─► factory    │
//!   │                                   ▼                      │
//!   │                       deferred removals ─► present       │
//!   └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use shatter_sim::prelude::*;
//!
//! let engine = PhysicsWorld::new(PhysicsConfig::default())?;
//! let mut world = SimulationWorld::new(engine, HeadlessPresentation::new(), SimConfig::default())?;
//! build_cup_pyramid(&mut world)?;
//!
//! world.input_sender().send(PointerEvent::new(0.0, 0.1))?;
//! let report = world.step(1.0 / 60.0);
//! ```

pub mod clock;
pub mod config;
pub mod entity;
pub mod error;
pub mod factory;
pub mod fracture;
pub mod input;
pub mod presentation;
pub mod registry;
pub mod scan;
pub mod scene;
pub mod world;

#[cfg(test)]
mod testing;

pub mod prelude {
    //! Common imports for driving a simulation
    pub use crate::clock::FrameClock;
    pub use crate::config::{
        CameraSettings, CupSettings, FractureSettings, ProjectileSettings, PyramidSettings, SimConfig,
        FRACTURE_IMPULSE,
    };
    pub use crate::entity::{BodyKind, EntityId, Pose, SimEntity};
    pub use crate::error::SimError;
    pub use crate::factory::{BodySpec, PoseSource};
    pub use crate::fracture::{DebrisDescriptor, FractureAdapter};
    pub use crate::input::{Camera, PointerEvent, Ray};
    pub use crate::presentation::{HeadlessPresentation, Presentation, VisualDesc, VisualHandle};
    pub use crate::registry::BodyRegistry;
    pub use crate::scan::ImpactSample;
    pub use crate::scene::{build_cup_pyramid, PyramidScene};
    pub use crate::world::{SimulationWorld, StepPhase, StepReport, WorldStats};
    pub use shatter_physics::{DynamicsEngine, PhysicsConfig, PhysicsWorld, ShapeDesc, MAX_SUBSTEPS};
}

pub use prelude::*;
