//! Sprig Services Layer
//!
//! Host-side collaborators of the engine: settings and input.

pub mod input;
pub mod settings;

pub use input::{InputSource, InputState, ScriptedInput};
pub use settings::{Settings, SettingsError, SimulationSettings, WindowSettings};
