//! Simulation for the coasterlab demos
//!
//! This crate provides:
//! - A mass-spring system with damped springs under gravity, advanced with
//!   fixed explicit Euler steps
//! - Chain and cloth builders for common spring topologies
//! - Boid flocking (separation, alignment, cohesion, containment)

pub mod boids;
pub mod builders;
pub mod mass_spring;

// Re-export commonly used types
pub use boids::{Boid, Flock, FlockParams};
pub use builders::SpringParams;
pub use mass_spring::{
    MassSpringConfig, MassSpringSystem, Particle, ParticleFlags, ParticleKey, Spring, SpringError,
};
