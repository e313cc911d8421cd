//! Shatter demo
//!
//! Builds a pyramid of breakable cups, fires scripted projectiles into it and
//! logs what breaks. Runs headless.
//!
//! Run with: cargo run -p shatter_demo
//!       or: SHATTER_CONFIG=demo.toml RUST_LOG=debug cargo run --bin shatter

mod config;
mod runner;

use config::DemoConfig;
use runner::{DemoError, RunSummary};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match load_and_run() {
        Ok(summary) => {
            log::info!(
                "Done: {} frames, {} projectiles, {} fractures, {} debris, {} entities left",
                summary.frames,
                summary.projectiles,
                summary.fractures,
                summary.debris_spawned,
                summary.final_entities
            );
            if summary.failures > 0 {
                log::warn!("{} fracture steps were skipped", summary.failures);
            }
        }
        Err(DemoError::Config(e)) => {
            log::error!("Failed to load configuration: {}", e);
            std::process::exit(2);
        }
        Err(e) => {
            log::error!("Simulation failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_and_run() -> Result<RunSummary, DemoError> {
    let config = DemoConfig::load()?;
    config.print_summary();
    runner::run(&config)
}
