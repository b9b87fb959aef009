//! Mass-spring system integrated with explicit Euler steps
//!
//! Particles live in a [`SlotMap`] so springs can refer to them by
//! generational key. Removing a particle also removes every spring attached
//! to it.

use bitflags::bitflags;
use coasterlab_math::Vec3;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use std::fmt;

new_key_type! {
    /// Key to a particle in a mass-spring system
    pub struct ParticleKey;
}

bitflags! {
    /// Per-particle simulation flags
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ParticleFlags: u8 {
        /// Fixed in place; ignores all forces
        const PINNED = 1 << 0;
        /// Not pulled by gravity
        const NO_GRAVITY = 1 << 1;
    }
}

/// Smallest mass a particle may have
const MIN_MASS: f32 = 1e-4;

/// Springs shorter than this have no defined direction
const MIN_SPRING_LENGTH: f32 = 1e-6;

/// A point mass
#[derive(Clone, Debug)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Force accumulated during the current step
    pub force: Vec3,
    pub mass: f32,
    pub flags: ParticleFlags,
}

impl Particle {
    pub fn new(position: Vec3, mass: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            mass: mass.max(MIN_MASS),
            flags: ParticleFlags::empty(),
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_flags(mut self, flags: ParticleFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Pin the particle in place
    pub fn pinned(self) -> Self {
        let flags = self.flags | ParticleFlags::PINNED;
        self.with_flags(flags)
    }

    pub fn is_pinned(&self) -> bool {
        self.flags.contains(ParticleFlags::PINNED)
    }
}

/// Damped spring between two particles
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    pub a: ParticleKey,
    pub b: ParticleKey,
    pub rest_length: f32,
    /// Hooke constant
    pub stiffness: f32,
    /// Damping along the spring axis
    pub damping: f32,
}

/// Global simulation parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MassSpringConfig {
    /// Gravitational acceleration
    pub gravity: Vec3,
    /// Linear drag coefficient (force = -drag * velocity)
    pub drag: f32,
    /// Optional ground plane height; particles never sink below it
    #[serde(default)]
    pub floor: Option<f32>,
}

impl Default for MassSpringConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            drag: 0.02,
            floor: None,
        }
    }
}

/// Errors from building a mass-spring topology
#[derive(Debug, Clone, PartialEq)]
pub enum SpringError {
    /// A spring endpoint does not exist in the system
    UnknownParticle,
    /// Both endpoints are the same particle
    SameParticle,
    /// Rest length is negative, or zero because the endpoints coincide
    InvalidRestLength(f32),
}

impl fmt::Display for SpringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpringError::UnknownParticle => write!(f, "Spring endpoint is not in the system"),
            SpringError::SameParticle => write!(f, "Spring endpoints must be different particles"),
            SpringError::InvalidRestLength(len) => write!(f, "Invalid spring rest length: {}", len),
        }
    }
}

impl std::error::Error for SpringError {}

/// Particles connected by damped springs, advanced with fixed explicit Euler steps
pub struct MassSpringSystem {
    particles: SlotMap<ParticleKey, Particle>,
    springs: Vec<Spring>,
    pub config: MassSpringConfig,
    time: f32,
}

impl Default for MassSpringSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MassSpringSystem {
    pub fn new() -> Self {
        Self::with_config(MassSpringConfig::default())
    }

    pub fn with_config(config: MassSpringConfig) -> Self {
        Self {
            particles: SlotMap::with_key(),
            springs: Vec::new(),
            config,
            time: 0.0,
        }
    }

    /// Simulated time in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn add_particle(&mut self, particle: Particle) -> ParticleKey {
        self.particles.insert(particle)
    }

    /// Remove a particle and every spring attached to it
    pub fn remove_particle(&mut self, key: ParticleKey) -> Option<Particle> {
        let removed = self.particles.remove(key)?;
        self.springs.retain(|s| s.a != key && s.b != key);
        Some(removed)
    }

    pub fn particle(&self, key: ParticleKey) -> Option<&Particle> {
        self.particles.get(key)
    }

    pub fn particle_mut(&mut self, key: ParticleKey) -> Option<&mut Particle> {
        self.particles.get_mut(key)
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> impl Iterator<Item = (ParticleKey, &Particle)> {
        self.particles.iter()
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    /// Connect two particles; the rest length is their current distance
    pub fn add_spring(
        &mut self,
        a: ParticleKey,
        b: ParticleKey,
        stiffness: f32,
        damping: f32,
    ) -> Result<usize, SpringError> {
        if a == b {
            return Err(SpringError::SameParticle);
        }
        let (pa, pb) = match (self.particles.get(a), self.particles.get(b)) {
            (Some(pa), Some(pb)) => (pa.position, pb.position),
            _ => return Err(SpringError::UnknownParticle),
        };
        let rest_length = pa.distance(pb);
        if rest_length < MIN_SPRING_LENGTH {
            return Err(SpringError::InvalidRestLength(rest_length));
        }
        self.add_spring_with_rest_length(a, b, rest_length, stiffness, damping)
    }

    /// Connect two particles with an explicit rest length
    pub fn add_spring_with_rest_length(
        &mut self,
        a: ParticleKey,
        b: ParticleKey,
        rest_length: f32,
        stiffness: f32,
        damping: f32,
    ) -> Result<usize, SpringError> {
        if a == b {
            return Err(SpringError::SameParticle);
        }
        if !self.particles.contains_key(a) || !self.particles.contains_key(b) {
            return Err(SpringError::UnknownParticle);
        }
        if !(rest_length >= 0.0) {
            return Err(SpringError::InvalidRestLength(rest_length));
        }

        self.springs.push(Spring {
            a,
            b,
            rest_length,
            stiffness,
            damping,
        });
        Ok(self.springs.len() - 1)
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// This performs:
    /// 1. Force reset, then gravity on every free particle
    /// 2. Spring forces (Hooke + axial damping), equal and opposite
    /// 3. Linear drag
    /// 4. Explicit Euler: position from the old velocity, then velocity
    /// 5. Floor clamp, when a floor is configured
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        // Phase 1: reset and gravity
        for (_key, p) in &mut self.particles {
            p.force = Vec3::ZERO;
            if !p.flags.intersects(ParticleFlags::PINNED | ParticleFlags::NO_GRAVITY) {
                p.force += self.config.gravity * p.mass;
            }
        }

        // Phase 2: springs
        for spring in &self.springs {
            let (Some(pa), Some(pb)) =
                (self.particles.get(spring.a), self.particles.get(spring.b))
            else {
                continue;
            };
            let f = spring_force(spring, pa, pb);
            if let Some(pa) = self.particles.get_mut(spring.a) {
                pa.force += f;
            }
            if let Some(pb) = self.particles.get_mut(spring.b) {
                pb.force -= f;
            }
        }

        // Phases 3-5: drag, integration, floor
        let drag = self.config.drag;
        let floor = self.config.floor;
        for (_key, p) in &mut self.particles {
            if p.is_pinned() {
                p.velocity = Vec3::ZERO;
                continue;
            }

            p.force -= p.velocity * drag;

            let acceleration = p.force / p.mass;
            p.position += p.velocity * dt;
            p.velocity += acceleration * dt;

            if let Some(floor_y) = floor {
                if p.position.y < floor_y {
                    p.position.y = floor_y;
                    if p.velocity.y < 0.0 {
                        p.velocity.y = 0.0;
                    }
                }
            }
        }

        self.time += dt;
    }

    /// Total kinetic energy
    pub fn kinetic_energy(&self) -> f32 {
        self.particles
            .values()
            .map(|p| 0.5 * p.mass * p.velocity.length_squared())
            .sum()
    }

    /// Gravitational plus elastic potential energy
    pub fn potential_energy(&self) -> f32 {
        let gravity: f32 = self
            .particles
            .values()
            .filter(|p| !p.flags.intersects(ParticleFlags::PINNED | ParticleFlags::NO_GRAVITY))
            .map(|p| -p.mass * self.config.gravity.dot(p.position))
            .sum();

        let elastic: f32 = self
            .springs
            .iter()
            .filter_map(|s| {
                let pa = self.particles.get(s.a)?;
                let pb = self.particles.get(s.b)?;
                let stretch = pa.position.distance(pb.position) - s.rest_length;
                Some(0.5 * s.stiffness * stretch * stretch)
            })
            .sum();

        gravity + elastic
    }

    pub fn total_energy(&self) -> f32 {
        self.kinetic_energy() + self.potential_energy()
    }

    /// Mass-weighted center, `None` without particles
    pub fn center_of_mass(&self) -> Option<Vec3> {
        let total_mass: f32 = self.particles.values().map(|p| p.mass).sum();
        if self.particles.is_empty() || total_mass <= 0.0 {
            return None;
        }
        let weighted: Vec3 = self.particles.values().map(|p| p.position * p.mass).sum();
        Some(weighted / total_mass)
    }
}

/// Force the spring applies to its `a` endpoint (the `b` endpoint gets the negation)
fn spring_force(spring: &Spring, pa: &Particle, pb: &Particle) -> Vec3 {
    let delta = pb.position - pa.position;
    let length = delta.length();
    if length < MIN_SPRING_LENGTH {
        return Vec3::ZERO;
    }
    let dir = delta / length;
    let elastic = spring.stiffness * (length - spring.rest_length);
    let damping = spring.damping * (pb.velocity - pa.velocity).dot(dir);
    dir * (elastic + damping)
}
