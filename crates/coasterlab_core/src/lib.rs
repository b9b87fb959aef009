//! Core types for the coasterlab demos
//!
//! - [`CoasterRide`] - A train moving along a curve by arc length
//! - [`OrbitCamera`] - Orbit camera plus ride and follow views
//! - [`CurveEditor`] - Control point editing with undo
//! - [`RigTemplate`] - Loadable/saveable mass-spring rig
//! - [`FixedTimestep`] - Frame time to fixed simulation steps

pub mod camera;
mod coaster;
mod curve_editor;
mod rig;
mod timestep;

pub use camera::{follow_view, ride_view, OrbitCamera, Projection, ViewMode};
pub use coaster::{CoasterRide, SpeedMode};
pub use curve_editor::CurveEditor;
pub use rig::{ParticleTemplate, RigError, RigTemplate, SpringTemplate};
pub use timestep::{FixedTimestep, MAX_FRAME_DT};

// Re-export commonly used types for convenience
pub use coasterlab_math::{Curve, CurveFrame, GeometryError, Vec3};
pub use coasterlab_physics::{Flock, FlockParams, MassSpringConfig, MassSpringSystem};
