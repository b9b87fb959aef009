//! Ready-made mass-spring topologies: hanging chains and cloth sheets

use coasterlab_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::mass_spring::{MassSpringSystem, Particle, ParticleKey};

/// Material used by the builders for every particle and spring
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringParams {
    /// Mass of each particle
    pub mass: f32,
    pub stiffness: f32,
    pub damping: f32,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            mass: 0.1,
            stiffness: 50.0,
            damping: 0.5,
        }
    }
}

impl MassSpringSystem {
    /// Add a chain of `segments` springs from `start` to `end`.
    ///
    /// The first particle is pinned. Returns the particle keys in order.
    pub fn add_chain(
        &mut self,
        start: Vec3,
        end: Vec3,
        segments: usize,
        params: SpringParams,
    ) -> Vec<ParticleKey> {
        let mut keys = Vec::with_capacity(segments + 1);
        keys.push(self.add_particle(Particle::new(start, params.mass).pinned()));

        for i in 1..=segments {
            let t = i as f32 / segments as f32;
            let key = self.add_particle(Particle::new(start.lerp(end, t), params.mass));
            let prev = keys[i - 1];
            if let Err(e) = self.add_spring(prev, key, params.stiffness, params.damping) {
                log::warn!("Skipping chain link {}: {}", i, e);
            }
            keys.push(key);
        }

        keys
    }

    /// Add a horizontal cloth of `cols` x `rows` particles spaced `spacing` apart.
    ///
    /// Columns run along +X from `origin` and rows along +Z. Row 0 is pinned.
    /// Structural springs join direct neighbours, shear springs the diagonals
    /// and bend springs every second particle. Returns keys in row-major order.
    pub fn add_cloth(
        &mut self,
        origin: Vec3,
        cols: usize,
        rows: usize,
        spacing: f32,
        params: SpringParams,
    ) -> Vec<ParticleKey> {
        let mut keys = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let position = origin + Vec3::new(col as f32 * spacing, 0.0, row as f32 * spacing);
                let particle = Particle::new(position, params.mass);
                let particle = if row == 0 { particle.pinned() } else { particle };
                keys.push(self.add_particle(particle));
            }
        }

        let at = |col: usize, row: usize| keys[row * cols + col];
        let mut links = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                // Structural
                if col + 1 < cols {
                    links.push((at(col, row), at(col + 1, row)));
                }
                if row + 1 < rows {
                    links.push((at(col, row), at(col, row + 1)));
                }
                // Shear
                if col + 1 < cols && row + 1 < rows {
                    links.push((at(col, row), at(col + 1, row + 1)));
                    links.push((at(col + 1, row), at(col, row + 1)));
                }
                // Bend
                if col + 2 < cols {
                    links.push((at(col, row), at(col + 2, row)));
                }
                if row + 2 < rows {
                    links.push((at(col, row), at(col, row + 2)));
                }
            }
        }

        for (a, b) in links {
            if let Err(e) = self.add_spring(a, b, params.stiffness, params.damping) {
                log::warn!("Skipping cloth spring: {}", e);
            }
        }

        log::debug!(
            "Built {}x{} cloth: {} particles, {} springs",
            cols,
            rows,
            self.particle_count(),
            self.springs().len()
        );
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mass_spring::MassSpringConfig;

    #[test]
    fn test_chain_topology() {
        let mut system = MassSpringSystem::new();
        let keys =
            system.add_chain(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), 5, SpringParams::default());
        assert_eq!(keys.len(), 6);
        assert_eq!(system.springs().len(), 5);
        assert!(system.particle(keys[0]).unwrap().is_pinned());
        assert!(!system.particle(keys[5]).unwrap().is_pinned());
        for spring in system.springs() {
            assert!((spring.rest_length - 1.0).abs() < 0.0001);
        }
    }

    #[test]
    fn test_chain_hangs_from_pin() {
        let mut system = MassSpringSystem::with_config(MassSpringConfig {
            drag: 0.05,
            ..Default::default()
        });
        let keys =
            system.add_chain(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 4, SpringParams::default());

        for _ in 0..1000 {
            system.step(0.001);
        }

        assert_eq!(system.particle(keys[0]).unwrap().position, Vec3::ZERO);
        let tip = system.particle(keys[4]).unwrap().position;
        assert!(tip.y < -0.1, "tip should swing down, got {:?}", tip);
        assert!(tip.is_finite());
    }

    #[test]
    fn test_cloth_spring_counts() {
        let mut system = MassSpringSystem::new();
        let keys = system.add_cloth(Vec3::ZERO, 3, 3, 1.0, SpringParams::default());
        assert_eq!(keys.len(), 9);
        // 12 structural + 8 shear + 6 bend
        assert_eq!(system.springs().len(), 26);

        let pinned = system.particles().filter(|(_, p)| p.is_pinned()).count();
        assert_eq!(pinned, 3);
    }

    #[test]
    fn test_single_column_cloth() {
        let mut system = MassSpringSystem::new();
        let keys = system.add_cloth(Vec3::ZERO, 1, 4, 0.5, SpringParams::default());
        assert_eq!(keys.len(), 4);
        // 3 structural + 2 bend
        assert_eq!(system.springs().len(), 5);
    }
}
