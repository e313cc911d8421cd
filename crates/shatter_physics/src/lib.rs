//! Shatter Physics - Rapier 3D Integration
//!
//! The dynamics engine behind the fracture pipeline. The simulation core only
//! sees the [`DynamicsEngine`] trait; [`PhysicsWorld`] implements it on top of
//! Rapier 3D.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 PhysicsWorld                     │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────┐ │
//! │  │ RigidBodySet│  │ ColliderSet │  │NarrowPh.│ │
//! │  └─────────────┘  └─────────────┘  └─────────┘ │
//! │  ┌─────────────────────────────────────────────┐│
//! │  │           PhysicsPipeline                   ││
//! │  │  (integration, collision, solver)          ││
//! │  └─────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────┘
//!                        │ DynamicsEngine
//!         ┌──────────────┼──────────────┐
//!         ▼              ▼              ▼
//!    ┌─────────┐   ┌──────────┐   ┌──────────┐
//!    │BodyDesc │   │ShapeDesc │   │ Manifold │
//!    └─────────┘   └──────────┘   └──────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use shatter_physics::prelude::*;
//!
//! let mut physics = PhysicsWorld::new(PhysicsConfig::default())?;
//!
//! let ball = physics.add_body(
//!     &BodyDesc::dynamic(ShapeDesc::ball(0.4), 35.0).with_position(0.0, 10.0, 0.0),
//! )?;
//!
//! physics.advance(1.0 / 60.0, 10);
//! for manifold in physics.manifolds() {
//!     // ...
//! }
//! ```

pub mod body;
pub mod config;
pub mod engine;
pub mod error;
pub mod manifold;
pub mod shape;
pub mod world;

pub mod prelude {
    //! Common imports for physics functionality
    pub use crate::body::{ActivationPolicy, BodyDesc, BodyHandle, BodyTransform, BodyVelocity};
    pub use crate::config::{PhysicsConfig, MAX_SUBSTEPS};
    pub use crate::engine::DynamicsEngine;
    pub use crate::error::{PhysicsError, Result};
    pub use crate::manifold::{ContactManifold, ContactPoint};
    pub use crate::shape::ShapeDesc;
    pub use crate::world::PhysicsWorld;
}

pub use prelude::*;
