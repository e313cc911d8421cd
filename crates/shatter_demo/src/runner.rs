//! Headless demo loop

use crate::config::{ConfigError, DemoConfig};
use shatter_physics::{PhysicsError, PhysicsWorld};
use shatter_sim::{build_cup_pyramid, FrameClock, HeadlessPresentation, PointerEvent, SimError, SimulationWorld};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),

    #[error("Input queue closed")]
    InputClosed,
}

/// Totals over a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub projectiles: usize,
    pub fractures: usize,
    pub debris_spawned: usize,
    pub failures: usize,
    pub final_entities: usize,
}

/// Build the cup pyramid and run it for the configured number of frames
pub fn run(config: &DemoConfig) -> Result<RunSummary, DemoError> {
    let engine = PhysicsWorld::new(config.sim.physics.clone())?;
    let mut world = SimulationWorld::new(engine, HeadlessPresentation::new(), config.sim.clone())?;
    let scene = build_cup_pyramid(&mut world)?;
    log::info!("Scene ready: {} cups", scene.cups.len());

    let input = world.input_sender();
    let mut clock = FrameClock::new();
    let mut summary = RunSummary::default();
    let pace = Duration::try_from_secs_f32(config.run.fixed_dt).unwrap_or_default();

    for frame in 0..config.run.frames {
        for shot in config.shots_at(frame) {
            input
                .send(PointerEvent::new(shot.x, shot.y))
                .map_err(|_| DemoError::InputClosed)?;
        }

        let dt = if config.run.realtime {
            let elapsed = clock.delta();
            if let Some(rest) = pace.checked_sub(Duration::from_secs_f32(elapsed)) {
                std::thread::sleep(rest);
            }
            elapsed + clock.delta()
        } else {
            config.run.fixed_dt
        };

        let report = world.step(dt);
        summary.frames += 1;
        summary.projectiles += report.projectiles;
        summary.fractures += report.fractures;
        summary.debris_spawned += report.debris_spawned;
        summary.failures += report.failures;

        if report.fractures > 0 {
            log::info!(
                "Frame {}: {} fractures, {} debris",
                frame,
                report.fractures,
                report.debris_spawned
            );
        }
        if config.run.stats_every > 0 && (frame + 1) % config.run.stats_every == 0 {
            let stats = world.stats();
            log::info!(
                "Frame {}: {} entities ({} dynamic), {} fractures so far",
                stats.frame,
                stats.entities,
                stats.dynamic_entities,
                stats.fractures
            );
        }
    }

    summary.final_entities = world.registry().len();
    Ok(summary)
}
