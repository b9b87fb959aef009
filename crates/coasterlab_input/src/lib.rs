//! Coaster Input Handling
//!
//! This crate maps keyboard and mouse input to orbit camera motion and to
//! coaster playback actions.

mod actions;
mod orbit_controller;

pub use actions::{ActionMapper, CoasterAction};
pub use orbit_controller::{OrbitControl, OrbitController};
