//! Math utilities
//!
//! Re-exports glam for vectors and transforms.

pub use glam::*;
