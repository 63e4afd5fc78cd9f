//! Sprig runtime
//!
//! Headless Space Invaders host. Loads settings (optional JSON path as the
//! first argument), builds the world and runs the frame loop on scripted
//! input.

mod collision;
mod components;
mod game;
mod render;
mod world;

use anyhow::{ensure, Context, Result};
use sprig_services::{ScriptedInput, Settings};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Sprig v{}", sprig_core::VERSION);

    let settings = match std::env::args_os().nth(1) {
        Some(path) => Settings::load(&path).context("failed to load settings")?,
        None => Settings::default(),
    };
    ensure!(
        settings.simulation.slice > 0.0,
        "simulation.slice must be positive, got {}",
        settings.simulation.slice
    );
    ensure!(
        settings.window.width > 0.0 && settings.window.height > 0.0,
        "window size must be positive"
    );
    tracing::debug!(?settings, "using settings");

    let mut game = game::Game::new(&settings, Box::new(ScriptedInput::patrol()));
    let outcome = game.run();
    tracing::info!(
        ?outcome,
        frames = game.frames(),
        ships_destroyed = game.ships_destroyed(),
        "shutting down"
    );
    Ok(())
}
