//! Mass-spring demo: a rig file or a built-in cloth/chain under gravity

use std::path::Path;

use coasterlab_core::RigTemplate;
use coasterlab_math::Vec3;
use coasterlab_physics::MassSpringSystem;

use super::{Demo, DemoError};
use crate::config::{MassSpringDemoConfig, SpringPreset};

#[derive(Debug, Clone)]
pub struct SpringSummary {
    pub frames: u32,
    pub particles: usize,
    pub springs: usize,
    pub initial_energy: f32,
    pub final_energy: f32,
    /// Lowest particle height at the end of the run
    pub lowest: f32,
    pub center_of_mass: Option<Vec3>,
}

impl std::fmt::Display for SpringSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "springs: {} frames, {} particles, {} springs, energy {:.3} -> {:.3}, lowest {:.3}",
            self.frames,
            self.particles,
            self.springs,
            self.initial_energy,
            self.final_energy,
            self.lowest
        )
    }
}

pub struct SpringsDemo {
    system: MassSpringSystem,
    initial_energy: f32,
}

impl SpringsDemo {
    /// Load `rig` when given, otherwise build the configured preset
    pub fn from_config(
        rig: Option<&Path>,
        config: &MassSpringDemoConfig,
    ) -> Result<Self, DemoError> {
        let system = match rig {
            Some(path) => {
                let template = RigTemplate::load(path)?;
                log::info!("Loaded rig '{}' from {}", template.name, path.display());
                template.instantiate()?.0
            }
            None => Self::preset(config),
        };
        Ok(Self::new(system))
    }

    pub fn new(system: MassSpringSystem) -> Self {
        let initial_energy = system.total_energy();
        log::info!(
            "Mass-spring system: {} particles, {} springs",
            system.particle_count(),
            system.springs().len()
        );
        Self { system, initial_energy }
    }

    fn preset(config: &MassSpringDemoConfig) -> MassSpringSystem {
        let mut system = MassSpringSystem::with_config(config.system.clone());
        match config.preset {
            SpringPreset::Cloth => {
                let width = config.cols.saturating_sub(1) as f32 * config.spacing;
                let origin = Vec3::new(-width * 0.5, 1.0, 0.0);
                system.add_cloth(origin, config.cols, config.rows, config.spacing, config.params);
            }
            SpringPreset::Chain => {
                let start = Vec3::new(0.0, 1.0, 0.0);
                let end = start + Vec3::X * (config.cols as f32 * config.spacing);
                system.add_chain(start, end, config.cols, config.params);
            }
        }
        system
    }

    pub fn system(&self) -> &MassSpringSystem {
        &self.system
    }

    fn lowest(&self) -> f32 {
        self.system
            .particles()
            .map(|(_, p)| p.position.y)
            .fold(f32::INFINITY, f32::min)
    }

    pub fn summary(&self, frames: u32) -> SpringSummary {
        SpringSummary {
            frames,
            particles: self.system.particle_count(),
            springs: self.system.springs().len(),
            initial_energy: self.initial_energy,
            final_energy: self.system.total_energy(),
            lowest: self.lowest(),
            center_of_mass: self.system.center_of_mass(),
        }
    }
}

impl Demo for SpringsDemo {
    fn step(&mut self, dt: f32) {
        self.system.step(dt);
    }

    fn status(&self) -> String {
        format!(
            "t {:.2}s, energy {:.3}, lowest {:.3}",
            self.system.time(),
            self.system.total_energy(),
            self.lowest()
        )
    }
}
