//! The contract the simulation core drives the dynamics engine through

use crate::body::{ActivationPolicy, BodyDesc, BodyHandle, BodyTransform, BodyVelocity};
use crate::error::Result;
use crate::manifold::ContactManifold;
use crate::shape::ShapeDesc;

/// Rigid-body dynamics as seen by the fracture pipeline.
///
/// Implementations own broadphase, narrowphase and solver. Callers never hold
/// references into engine storage across calls; everything crosses the seam by
/// value or through caller-owned scratch buffers.
pub trait DynamicsEngine {
    /// Fails if the engine cannot run a step at all
    fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }

    /// Advance by `dt` seconds, running at most `max_substeps` internal steps.
    /// Returns the number of internal steps taken.
    fn advance(&mut self, dt: f32, max_substeps: u32) -> u32;

    /// Create a body and its collider
    fn add_body(&mut self, desc: &BodyDesc) -> Result<BodyHandle>;

    /// Remove a body and its collider
    fn remove_body(&mut self, handle: BodyHandle) -> Result<()>;

    /// Contact manifolds produced by the last internal step
    fn manifolds(&self) -> Vec<ContactManifold>;

    /// Principal inertia for `shape` at `mass`, margin included
    fn compute_local_inertia(&self, shape: &ShapeDesc, mass: f32) -> Result<[f32; 3]>;

    /// Copy the body's world transform into `out`
    fn read_transform(&self, handle: BodyHandle, out: &mut BodyTransform) -> Result<()>;

    /// Current linear and angular velocity
    fn velocity(&self, handle: BodyHandle) -> Result<BodyVelocity>;

    /// Overwrite linear and angular velocity
    fn set_velocity(&mut self, handle: BodyHandle, velocity: BodyVelocity) -> Result<()>;

    /// Current sleep policy
    fn activation_policy(&self, handle: BodyHandle) -> Result<ActivationPolicy>;

    /// Change the sleep policy
    fn set_activation_policy(&mut self, handle: BodyHandle, policy: ActivationPolicy) -> Result<()>;

    /// Number of bodies in the engine, static ones included
    fn body_count(&self) -> usize;
}
