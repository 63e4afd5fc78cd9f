//! Sprig Engine Core
//!
//! Contains the fundamental simulation pieces:
//! - Entity Component System (ECS) with group buckets and deferred reclamation
//! - Fixed-step simulation clock
//! - Math re-exports
//! - Seeded randomness

pub mod ecs;
pub mod math;
pub mod rng;
pub mod time;

pub use glam;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
