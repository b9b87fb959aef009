//! 3D Mathematics Library
//!
//! This crate provides the vector, matrix and curve types shared by the
//! coasterlab demos.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Mat4`] - 4x4 column-major matrix for transformations
//!
//! ## Curves
//!
//! - [`Curve`] - Ordered point list with B-spline subdivision
//! - [`ArcLengthTable`] - Sample a curve by distance travelled
//! - [`curve_io`] - Plain-text curve files
//! - [`obj`] - Vertex positions from OBJ files

mod vec3;
pub mod arc_length;
pub mod curve;
pub mod curve_io;
pub mod error;
pub mod geometry;
pub mod mat4;
pub mod obj;

pub use arc_length::{ArcLengthTable, CurveFrame, CurveSample};
pub use curve::{Curve, NearestPoint};
pub use error::GeometryError;
pub use geometry::Aabb3;
pub use mat4::Mat4;
pub use vec3::Vec3;
