//! Test doubles for the engine and fracture seams

use glam::Vec3;
use shatter_fracture::{Fragment, FractureError, FractureGeometry, SubdivisionLimits};
use shatter_physics::{
    ActivationPolicy, BodyDesc, BodyHandle, BodyTransform, BodyVelocity, ContactManifold, ContactPoint,
    DynamicsEngine, PhysicsError, ShapeDesc,
};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::sync::{Mutex, Once};

/// Penetrating-or-not contact with an upward normal
pub(crate) fn contact(distance: f32, applied_impulse: f32, position: [f32; 3]) -> ContactPoint {
    ContactPoint {
        distance,
        applied_impulse,
        position,
        normal: [0.0, 1.0, 0.0],
    }
}

#[derive(Debug, Clone)]
struct ScriptedBody {
    mass: f32,
    transform: BodyTransform,
    velocity: BodyVelocity,
    activation: ActivationPolicy,
}

/// Engine without collision detection. Dynamic bodies drift at their
/// velocity; manifolds are whatever the test pushed.
#[derive(Debug, Default)]
pub(crate) struct ScriptedEngine {
    bodies: HashMap<BodyHandle, ScriptedBody>,
    manifolds: Vec<ContactManifold>,
    next_index: u32,
    unavailable: bool,
}

impl ScriptedEngine {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub(crate) fn push_manifold(&mut self, manifold: ContactManifold) {
        self.manifolds.push(manifold);
    }

    pub(crate) fn clear_manifolds(&mut self) {
        self.manifolds.clear();
    }

    pub(crate) fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains_key(&handle)
    }

    fn body(&self, handle: BodyHandle) -> shatter_physics::Result<&ScriptedBody> {
        self.bodies.get(&handle).ok_or(PhysicsError::BodyNotFound(handle))
    }

    fn body_mut(&mut self, handle: BodyHandle) -> shatter_physics::Result<&mut ScriptedBody> {
        self.bodies.get_mut(&handle).ok_or(PhysicsError::BodyNotFound(handle))
    }
}

impl DynamicsEngine for ScriptedEngine {
    fn ensure_ready(&self) -> shatter_physics::Result<()> {
        if self.unavailable {
            return Err(PhysicsError::InvalidConfig("scripted engine disabled".into()));
        }
        Ok(())
    }

    fn advance(&mut self, dt: f32, max_substeps: u32) -> u32 {
        if dt <= 0.0 || max_substeps == 0 {
            return 0;
        }
        for body in self.bodies.values_mut().filter(|b| b.mass > 0.0) {
            for (p, v) in body.transform.position.iter_mut().zip(body.velocity.linear) {
                *p += v * dt;
            }
        }
        1
    }

    fn add_body(&mut self, desc: &BodyDesc) -> shatter_physics::Result<BodyHandle> {
        desc.shape.validate()?;
        let handle = BodyHandle::from_raw_parts(self.next_index, 0);
        self.next_index += 1;
        self.bodies.insert(
            handle,
            ScriptedBody {
                mass: desc.mass,
                transform: desc.transform,
                velocity: BodyVelocity::ZERO,
                activation: desc.activation,
            },
        );
        Ok(handle)
    }

    fn remove_body(&mut self, handle: BodyHandle) -> shatter_physics::Result<()> {
        self.bodies
            .remove(&handle)
            .map(|_| ())
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    fn manifolds(&self) -> Vec<ContactManifold> {
        self.manifolds.clone()
    }

    fn compute_local_inertia(&self, shape: &ShapeDesc, mass: f32) -> shatter_physics::Result<[f32; 3]> {
        shape.validate()?;
        Ok([mass * 0.1; 3])
    }

    fn read_transform(&self, handle: BodyHandle, out: &mut BodyTransform) -> shatter_physics::Result<()> {
        *out = self.body(handle)?.transform;
        Ok(())
    }

    fn velocity(&self, handle: BodyHandle) -> shatter_physics::Result<BodyVelocity> {
        Ok(self.body(handle)?.velocity)
    }

    fn set_velocity(&mut self, handle: BodyHandle, velocity: BodyVelocity) -> shatter_physics::Result<()> {
        self.body_mut(handle)?.velocity = velocity;
        Ok(())
    }

    fn activation_policy(&self, handle: BodyHandle) -> shatter_physics::Result<ActivationPolicy> {
        Ok(self.body(handle)?.activation)
    }

    fn set_activation_policy(&mut self, handle: BodyHandle, policy: ActivationPolicy) -> shatter_physics::Result<()> {
        self.body_mut(handle)?.activation = policy;
        Ok(())
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

/// Impacts seen by a [`RecordingGeometry`], in the parent's local frame
pub(crate) type ImpactLog = Rc<RefCell<Vec<(Vec3, Vec3)>>>;

/// Geometry that records impacts and produces no debris
#[derive(Debug, Default)]
pub(crate) struct RecordingGeometry {
    calls: ImpactLog,
}

impl RecordingGeometry {
    pub(crate) fn calls(&self) -> ImpactLog {
        Rc::clone(&self.calls)
    }
}

impl FractureGeometry for RecordingGeometry {
    fn subdivide(
        &mut self,
        _points: &[Vec3],
        impact_point: Vec3,
        impact_normal: Vec3,
        _limits: SubdivisionLimits,
    ) -> shatter_fracture::Result<Vec<Fragment>> {
        self.calls.borrow_mut().push((impact_point, impact_normal));
        Ok(Vec::new())
    }
}

/// One scripted answer of a [`ScriptedGeometry`]
#[derive(Debug, Clone)]
pub(crate) enum Outcome {
    Fail,
    Fragments(Vec<Fragment>),
}

/// Geometry that answers calls from a script, in call order; produces no
/// debris once the script runs out
#[derive(Debug, Default)]
pub(crate) struct ScriptedGeometry {
    outcomes: VecDeque<Outcome>,
}

impl ScriptedGeometry {
    pub(crate) fn new(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        Self {
            outcomes: outcomes.into_iter().collect(),
        }
    }
}

impl FractureGeometry for ScriptedGeometry {
    fn subdivide(
        &mut self,
        _points: &[Vec3],
        _impact_point: Vec3,
        _impact_normal: Vec3,
        _limits: SubdivisionLimits,
    ) -> shatter_fracture::Result<Vec<Fragment>> {
        match self.outcomes.pop_front() {
            Some(Outcome::Fail) => Err(FractureError::InvalidImpact),
            Some(Outcome::Fragments(fragments)) => Ok(fragments),
            None => Ok(Vec::new()),
        }
    }
}

/// Cube fragment centred on `centroid`
pub(crate) fn cube_fragment(half: f32, centroid: Vec3, mass_fraction: f32) -> Fragment {
    let mut points = Vec::with_capacity(8);
    for x in [-half, half] {
        for y in [-half, half] {
            for z in [-half, half] {
                points.push(Vec3::new(x, y, z));
            }
        }
    }
    Fragment {
        points,
        centroid,
        mass_fraction,
        breakable: false,
    }
}

static RECORDS: Mutex<Vec<(log::Level, String)>> = Mutex::new(Vec::new());

/// Logger that keeps every record for later inspection
struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        if let Ok(mut records) = RECORDS.lock() {
            records.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

/// Route `log` output of this test binary into memory
pub(crate) fn capture_logs() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });
}

/// Whether a record at `level` containing `needle` was logged
pub(crate) fn logged(level: log::Level, needle: &str) -> bool {
    RECORDS
        .lock()
        .map(|records| records.iter().any(|(l, message)| *l == level && message.contains(needle)))
        .unwrap_or(false)
}
