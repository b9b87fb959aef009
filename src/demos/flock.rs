//! Flocking demo

use coasterlab_math::Vec3;
use coasterlab_physics::Flock;

use super::Demo;
use crate::config::BoidsConfig;

#[derive(Debug, Clone)]
pub struct FlockSummary {
    pub frames: u32,
    pub boids: usize,
    pub centroid: Option<Vec3>,
    pub average_speed: f32,
    pub spread: f32,
    pub nearest_neighbor: Option<f32>,
}

impl std::fmt::Display for FlockSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "boids: {} frames, {} boids, speed {:.2}, spread {:.2}",
            self.frames, self.boids, self.average_speed, self.spread
        )?;
        if let Some(d) = self.nearest_neighbor {
            write!(f, ", closest pair {:.2}", d)?;
        }
        Ok(())
    }
}

pub struct FlockDemo {
    flock: Flock,
}

impl FlockDemo {
    /// Spawn the configured number of boids around the center of the bounds
    pub fn from_config(config: &BoidsConfig) -> Self {
        let mut flock = Flock::new(config.flock.clone());
        let center = flock.params.bounds.center();
        flock.spawn_spiral(config.count, center, config.spawn_radius);
        log::info!("Spawned {} boids", flock.len());
        Self { flock }
    }

    pub fn flock(&self) -> &Flock {
        &self.flock
    }

    pub fn summary(&self, frames: u32) -> FlockSummary {
        FlockSummary {
            frames,
            boids: self.flock.len(),
            centroid: self.flock.centroid(),
            average_speed: self.flock.average_speed(),
            spread: self.flock.spread(),
            nearest_neighbor: self.flock.nearest_neighbor_distance(),
        }
    }
}

impl Demo for FlockDemo {
    fn step(&mut self, dt: f32) {
        self.flock.step(dt);
    }

    fn status(&self) -> String {
        format!(
            "speed {:.2}, spread {:.2}",
            self.flock.average_speed(),
            self.flock.spread()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DemoConfig;
    use crate::demos::run_frames;

    #[test]
    fn test_flock_demo_runs() {
        let config = BoidsConfig {
            count: 30,
            ..BoidsConfig::default()
        };
        let mut demo = FlockDemo::from_config(&config);
        let frames = DemoConfig {
            frames: 120,
            report_every: 0,
            ..DemoConfig::default()
        };
        run_frames(&mut demo, &frames, frames.step);

        let summary = demo.summary(120);
        assert_eq!(summary.boids, 30);
        assert!(summary.average_speed > 0.0);
        assert!(summary.average_speed <= config.flock.max_speed + 1e-3);
        assert!(summary.spread.is_finite());
        assert!(summary.to_string().starts_with("boids: 120 frames, 30 boids"));
    }

    #[test]
    fn test_empty_flock() {
        let config = BoidsConfig {
            count: 0,
            ..BoidsConfig::default()
        };
        let demo = FlockDemo::from_config(&config);
        let summary = demo.summary(0);
        assert!(summary.centroid.is_none());
        assert!(summary.nearest_neighbor.is_none());
    }
}
