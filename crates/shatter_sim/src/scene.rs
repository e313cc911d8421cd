//! Demo scene: a pyramid of breakable cups on a static ground slab

use crate::config::{CupSettings, PyramidSettings};
use crate::entity::{EntityId, Pose};
use crate::error::Result;
use crate::factory::BodySpec;
use crate::presentation::Presentation;
use crate::world::SimulationWorld;
use glam::Vec3;
use shatter_physics::{DynamicsEngine, ShapeDesc};
use std::f32::consts::TAU;

/// Entities created by [`build_cup_pyramid`]
#[derive(Debug, Clone, Default)]
pub struct PyramidScene {
    pub ground: Option<EntityId>,
    /// Bottom row first
    pub cups: Vec<EntityId>,
}

/// Hull points of a truncated cone centered on its origin, axis along Y
pub fn cup_points(cup: &CupSettings) -> Vec<[f32; 3]> {
    let half = cup.height * 0.5;
    let segments = cup.segments.max(3);
    let mut points = Vec::with_capacity(2 * segments as usize);
    for (y, radius) in [(half, cup.radius_top), (-half, cup.radius_bottom)] {
        for i in 0..segments {
            let theta = TAU * i as f32 / segments as f32;
            points.push([radius * theta.sin(), y, radius * theta.cos()]);
        }
    }
    points
}

/// Cup centers, level by level from the bottom
pub fn cup_positions(settings: &PyramidSettings) -> Vec<(u32, Vec3)> {
    let spacing = settings.cup.radius_top * 2.0 * settings.spacing_factor;
    let height = settings.cup.height;

    let mut positions = Vec::new();
    for level in 0..settings.levels.min(settings.base_cups) {
        let count = settings.base_cups - level;
        let start_x = -((count - 1) as f32 * spacing) / 2.0;
        let y = level as f32 * height + height / 2.0;
        for i in 0..count {
            positions.push((level, Vec3::new(start_x + i as f32 * spacing, y, 0.0)));
        }
    }
    positions
}

/// Populate `world` with the ground slab and the cup pyramid
pub fn build_cup_pyramid<E: DynamicsEngine, P: Presentation>(
    world: &mut SimulationWorld<E, P>,
) -> Result<PyramidScene> {
    let settings = world.config().pyramid.clone();
    let [sx, sy, sz] = settings.ground_size;

    let ground = world.create_body(
        BodySpec::new(
            ShapeDesc::from_size(sx, sy, sz),
            0.0,
            Pose::from_position(Vec3::from_array(settings.ground_position)),
        )
        .with_color(settings.ground_color),
    )?;

    let shape = ShapeDesc::convex_hull(cup_points(&settings.cup));
    let mut cups = Vec::new();
    for (level, position) in cup_positions(&settings) {
        let color = match settings.level_colors.as_slice() {
            [] => 0xffffff,
            colors => colors[level as usize % colors.len()],
        };
        let cup = world.create_body(
            BodySpec::new(shape.clone(), settings.cup.mass, Pose::from_position(position))
                .breakable(true)
                .with_color(color),
        )?;
        cups.push(cup);
    }

    log::info!("Built cup pyramid: {} cups over {} levels", cups.len(), settings.levels);
    Ok(PyramidScene {
        ground: Some(ground),
        cups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::presentation::HeadlessPresentation;
    use crate::testing::ScriptedEngine;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_pyramid_layout() {
        let positions = cup_positions(&PyramidSettings::default());
        assert_eq!(positions.len(), 36);

        let bottom: Vec<_> = positions.iter().filter(|(level, _)| *level == 0).collect();
        assert_eq!(bottom.len(), 8);
        assert_relative_eq!(bottom[0].1.y, 0.6);
        assert_relative_eq!(bottom[1].1.x - bottom[0].1.x, 0.8 * 2.0 * 1.05, epsilon = 1e-5);

        let (top_level, top) = positions.last().unwrap();
        assert_eq!(*top_level, 7);
        assert_relative_eq!(top.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(top.y, 7.0 * 1.2 + 0.6, epsilon = 1e-4);
    }

    #[test]
    fn test_cup_points() {
        let points = cup_points(&CupSettings::default());
        assert_eq!(points.len(), 32);
        assert!(points.iter().all(|p| p[1].abs() == 0.6));
    }

    #[test]
    fn test_build_registers_every_cup() {
        let mut world =
            SimulationWorld::new(ScriptedEngine::new(), HeadlessPresentation::new(), SimConfig::default()).unwrap();
        let scene = build_cup_pyramid(&mut world).unwrap();

        assert_eq!(scene.cups.len(), 36);
        assert_eq!(world.registry().len(), 37);
        assert_eq!(world.registry().dynamic_count(), 36);
        assert!(scene
            .cups
            .iter()
            .all(|id| world.registry().get(*id).unwrap().is_breakable()));

        let ground = world.registry().get(scene.ground.unwrap()).unwrap();
        assert!(!ground.is_breakable());
        assert_eq!(ground.color(), 0xffffff);
        assert_eq!(world.registry().get(scene.cups[8]).unwrap().color(), 0xe53935);
    }
}
