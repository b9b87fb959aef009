//! Rig templates
//!
//! A rig is a mass-spring setup stored as RON: particles in order, springs
//! referring to them by index, and the simulation settings. Templates are
//! plain data; [`RigTemplate::instantiate`] builds the live system.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use coasterlab_math::Vec3;
use coasterlab_physics::{MassSpringConfig, MassSpringSystem, Particle, ParticleKey, SpringError};

/// One particle of a rig
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleTemplate {
    pub position: Vec3,
    pub mass: f32,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub velocity: Vec3,
}

/// A spring between two particles, by index into the particle list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpringTemplate {
    pub a: usize,
    pub b: usize,
    pub stiffness: f32,
    pub damping: f32,
    /// Defaults to the distance between the endpoints
    #[serde(default)]
    pub rest_length: Option<f32>,
}

/// A serializable mass-spring rig
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RigTemplate {
    /// Rig name (for display/debugging)
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub config: MassSpringConfig,
    #[serde(default)]
    pub particles: Vec<ParticleTemplate>,
    #[serde(default)]
    pub springs: Vec<SpringTemplate>,
}

impl RigTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse a rig from RON text
    pub fn from_ron(contents: &str) -> Result<Self, RigError> {
        Ok(ron::from_str(contents)?)
    }

    pub fn to_ron(&self) -> Result<String, RigError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Load a rig from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RigError> {
        let path = path.as_ref();
        let rig = Self::from_ron(&fs::read_to_string(path)?)?;
        log::debug!(
            "Loaded rig '{}' from {}: {} particles, {} springs",
            rig.name,
            path.display(),
            rig.particles.len(),
            rig.springs.len()
        );
        Ok(rig)
    }

    /// Save a rig to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RigError> {
        fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Append a particle, returning its index
    pub fn add_particle(&mut self, position: Vec3, mass: f32, pinned: bool) -> usize {
        self.particles.push(ParticleTemplate {
            position,
            mass,
            pinned,
            velocity: Vec3::ZERO,
        });
        self.particles.len() - 1
    }

    pub fn add_spring(&mut self, a: usize, b: usize, stiffness: f32, damping: f32) {
        self.springs.push(SpringTemplate {
            a,
            b,
            stiffness,
            damping,
            rest_length: None,
        });
    }

    /// Build the live system. Keys are returned in template order.
    pub fn instantiate(&self) -> Result<(MassSpringSystem, Vec<ParticleKey>), RigError> {
        let mut system = MassSpringSystem::with_config(self.config.clone());

        let keys: Vec<ParticleKey> = self
            .particles
            .iter()
            .map(|p| {
                let mut particle = Particle::new(p.position, p.mass).with_velocity(p.velocity);
                if p.pinned {
                    particle = particle.pinned();
                }
                system.add_particle(particle)
            })
            .collect();

        for (index, spring) in self.springs.iter().enumerate() {
            let endpoint = |i: usize| {
                keys.get(i).copied().ok_or(RigError::BadIndex {
                    spring: index,
                    particle: i,
                })
            };
            let a = endpoint(spring.a)?;
            let b = endpoint(spring.b)?;
            let result = match spring.rest_length {
                Some(rest) => {
                    system.add_spring_with_rest_length(a, b, rest, spring.stiffness, spring.damping)
                }
                None => system.add_spring(a, b, spring.stiffness, spring.damping),
            };
            result.map_err(|source| RigError::Spring { index, source })?;
        }

        Ok((system, keys))
    }
}

/// Error loading, saving or instantiating a rig
#[derive(Debug)]
pub enum RigError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
    /// Serialization error
    Serialize(ron::Error),
    /// A spring refers to a particle index that does not exist
    BadIndex { spring: usize, particle: usize },
    /// A spring was rejected by the system
    Spring { index: usize, source: SpringError },
}

impl From<io::Error> for RigError {
    fn from(e: io::Error) -> Self {
        RigError::Io(e)
    }
}

impl From<ron::error::SpannedError> for RigError {
    fn from(e: ron::error::SpannedError) -> Self {
        RigError::Parse(e)
    }
}

impl From<ron::Error> for RigError {
    fn from(e: ron::Error) -> Self {
        RigError::Serialize(e)
    }
}

impl std::fmt::Display for RigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RigError::Io(e) => write!(f, "IO error: {}", e),
            RigError::Parse(e) => write!(f, "Parse error: {}", e),
            RigError::Serialize(e) => write!(f, "Serialize error: {}", e),
            RigError::BadIndex { spring, particle } => {
                write!(f, "Spring {} refers to missing particle {}", spring, particle)
            }
            RigError::Spring { index, source } => write!(f, "Spring {}: {}", index, source),
        }
    }
}

impl std::error::Error for RigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RigError::Io(e) => Some(e),
            RigError::Parse(e) => Some(e),
            RigError::Serialize(e) => Some(e),
            RigError::Spring { source, .. } => Some(source),
            RigError::BadIndex { .. } => None,
        }
    }
}
