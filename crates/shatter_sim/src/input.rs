//! Pointer input and projectiles
//!
//! Pointer events arrive on a channel and are handled at the start of the
//! next step, before the engine advances.

use crate::config::CameraSettings;
use crate::entity::{EntityId, Pose};
use crate::error::Result;
use crate::factory::BodySpec;
use crate::presentation::Presentation;
use crate::world::SimulationWorld;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use shatter_physics::{DynamicsEngine, ShapeDesc};

/// Pointer press in normalized device coordinates (-1..1, y up)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// From window pixels, origin top-left
    pub fn from_screen(px: f32, py: f32, width: f32, height: f32) -> Self {
        Self {
            x: px / width * 2.0 - 1.0,
            y: -(py / height) * 2.0 + 1.0,
        }
    }
}

/// World-space ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length
    pub direction: Vec3,
}

/// Perspective camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self {
            position: Vec3::from_array(settings.position),
            target: Vec3::from_array(settings.target),
            up: Vec3::Y,
            fov_y: settings.fov_degrees.to_radians(),
            aspect: settings.aspect,
            near: settings.near,
            far: settings.far,
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        let projection = Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far);
        projection * Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Ray from the eye through a point in normalized device coordinates
    pub fn ray(&self, x: f32, y: f32) -> Ray {
        let through = self.view_projection().inverse().project_point3(Vec3::new(x, y, 0.5));
        Ray {
            origin: self.position,
            direction: (through - self.position).normalize_or_zero(),
        }
    }
}

impl<E: DynamicsEngine, P: Presentation> SimulationWorld<E, P> {
    /// Fire a ball along the pointer ray. It starts one unit in front of the
    /// eye and never breaks.
    pub fn fire_projectile(&mut self, event: PointerEvent) -> Result<EntityId> {
        let ray = self.camera.ray(event.x, event.y);
        let settings = self.config.projectile;

        let spec = BodySpec::new(
            ShapeDesc::ball(settings.radius),
            settings.mass,
            Pose::from_position(ray.origin + ray.direction),
        )
        .with_velocity(ray.direction * settings.speed)
        .with_color(settings.color);

        let id = self.create_body(spec)?;
        log::info!("Projectile {:?} fired along {:?}", id, ray.direction);
        Ok(id)
    }

    /// Fire one projectile per queued pointer event
    pub(crate) fn drain_input(&mut self) -> usize {
        let mut fired = 0;
        while let Ok(event) = self.input_rx.try_recv() {
            match self.fire_projectile(event) {
                Ok(_) => fired += 1,
                Err(e) => log::warn!("Dropped pointer event {:?}: {}", event, e),
            }
        }
        fired
    }
}
