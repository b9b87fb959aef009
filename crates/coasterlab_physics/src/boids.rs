//! Boid flocking
//!
//! Classic Reynolds steering: separation, alignment and cohesion, plus a
//! containment force keeping the flock inside a bounding box. Steering for
//! every boid is computed from a snapshot of the previous state, so the
//! update order does not matter.

use coasterlab_math::{Aabb3, Vec3};
use serde::{Deserialize, Serialize};

/// A single flocking agent
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Boid {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Steering force from the last step
    #[serde(skip)]
    pub force: Vec3,
}

impl Boid {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            force: Vec3::ZERO,
        }
    }
}

/// Tuning for the flock's steering rules
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockParams {
    /// Neighbours within this distance count for alignment and cohesion
    pub neighbor_radius: f32,
    /// Neighbours within this distance are pushed away
    pub separation_radius: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub max_speed: f32,
    /// Upper bound on each rule's steering force
    pub max_force: f32,
    /// Region the flock is steered back into
    pub bounds: Aabb3,
    pub boundary_weight: f32,
}

impl Default for FlockParams {
    fn default() -> Self {
        Self {
            neighbor_radius: 2.5,
            separation_radius: 1.0,
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            max_speed: 4.0,
            max_force: 8.0,
            bounds: Aabb3::from_center_half_extents(Vec3::ZERO, Vec3::splat(10.0)),
            boundary_weight: 2.0,
        }
    }
}

/// A group of boids sharing one set of parameters
#[derive(Clone, Debug, Default)]
pub struct Flock {
    pub boids: Vec<Boid>,
    pub params: FlockParams,
}

impl Flock {
    pub fn new(params: FlockParams) -> Self {
        Self {
            boids: Vec::new(),
            params,
        }
    }

    pub fn add(&mut self, boid: Boid) {
        self.boids.push(boid);
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    /// Place `count` boids on a Fibonacci sphere of `radius` around `center`.
    ///
    /// Each boid starts moving around the vertical axis at half the maximum
    /// speed. The layout is deterministic.
    pub fn spawn_spiral(&mut self, count: usize, center: Vec3, radius: f32) {
        let golden_angle = std::f32::consts::PI * (3.0 - 5.0f32.sqrt());
        let speed = self.params.max_speed * 0.5;

        for i in 0..count {
            let y = 1.0 - 2.0 * (i as f32 + 0.5) / count as f32;
            let ring = (1.0 - y * y).max(0.0).sqrt();
            let phi = i as f32 * golden_angle;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let offset = Vec3::new(cos_phi * ring, y, sin_phi * ring) * radius;
            let velocity = Vec3::new(-sin_phi, 0.0, cos_phi) * speed;
            self.boids.push(Boid::new(center + offset, velocity));
        }
    }

    /// Advance every boid by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 || self.boids.is_empty() {
            return;
        }

        let snapshot: Vec<(Vec3, Vec3)> =
            self.boids.iter().map(|b| (b.position, b.velocity)).collect();
        let params = &self.params;

        for (i, boid) in self.boids.iter_mut().enumerate() {
            let (position, velocity) = snapshot[i];
            let force = steering(i, position, velocity, &snapshot, params);

            boid.force = force;
            boid.velocity = (velocity + force * dt).clamp_length(params.max_speed);
            boid.position = position + boid.velocity * dt;
        }
    }

    /// Mean position, `None` for an empty flock
    pub fn centroid(&self) -> Option<Vec3> {
        if self.boids.is_empty() {
            return None;
        }
        let sum: Vec3 = self.boids.iter().map(|b| b.position).sum();
        Some(sum / self.boids.len() as f32)
    }

    pub fn average_speed(&self) -> f32 {
        if self.boids.is_empty() {
            return 0.0;
        }
        let total: f32 = self.boids.iter().map(|b| b.velocity.length()).sum();
        total / self.boids.len() as f32
    }

    /// Largest distance of any boid from the centroid
    pub fn spread(&self) -> f32 {
        match self.centroid() {
            Some(c) => self
                .boids
                .iter()
                .map(|b| b.position.distance(c))
                .fold(0.0, f32::max),
            None => 0.0,
        }
    }

    /// Smallest distance between any two boids, `None` with fewer than two
    pub fn nearest_neighbor_distance(&self) -> Option<f32> {
        let mut best: Option<f32> = None;
        for (i, a) in self.boids.iter().enumerate() {
            for b in &self.boids[i + 1..] {
                let d = a.position.distance(b.position);
                best = Some(best.map_or(d, |cur| cur.min(d)));
            }
        }
        best
    }
}

/// Combined, clamped steering force for boid `index`
fn steering(
    index: usize,
    position: Vec3,
    velocity: Vec3,
    snapshot: &[(Vec3, Vec3)],
    params: &FlockParams,
) -> Vec3 {
    let mut away = Vec3::ZERO;
    let mut away_count = 0usize;
    let mut heading = Vec3::ZERO;
    let mut center = Vec3::ZERO;
    let mut neighbor_count = 0usize;

    for (j, &(other_pos, other_vel)) in snapshot.iter().enumerate() {
        if j == index {
            continue;
        }
        let offset = position - other_pos;
        let distance = offset.length();
        if distance <= 0.0 {
            continue;
        }
        if distance < params.separation_radius {
            // Closer neighbours push harder
            away += offset.normalized() / distance;
            away_count += 1;
        }
        if distance < params.neighbor_radius {
            heading += other_vel;
            center += other_pos;
            neighbor_count += 1;
        }
    }

    let mut force = Vec3::ZERO;

    if away_count > 0 {
        let desired = (away / away_count as f32).normalized() * params.max_speed;
        force += (desired - velocity).clamp_length(params.max_force) * params.separation_weight;
    }

    if neighbor_count > 0 {
        let n = neighbor_count as f32;
        let desired = (heading / n).normalized() * params.max_speed;
        force += (desired - velocity).clamp_length(params.max_force) * params.alignment_weight;

        force += seek(position, velocity, center / n, params) * params.cohesion_weight;
    }

    if !params.bounds.contains(position) {
        force += seek(position, velocity, params.bounds.center(), params) * params.boundary_weight;
    }

    force.clamp_length(params.max_force)
}

fn seek(position: Vec3, velocity: Vec3, target: Vec3, params: &FlockParams) -> Vec3 {
    let desired = (target - position).normalized() * params.max_speed;
    (desired - velocity).clamp_length(params.max_force)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only(separation: f32, alignment: f32, cohesion: f32) -> FlockParams {
        FlockParams {
            separation_weight: separation,
            alignment_weight: alignment,
            cohesion_weight: cohesion,
            ..Default::default()
        }
    }

    #[test]
    fn test_lone_boid_coasts() {
        let mut flock = Flock::new(FlockParams::default());
        flock.add(Boid::new(Vec3::ZERO, Vec3::X));
        flock.step(0.5);
        assert_eq!(flock.boids[0].position, Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(flock.boids[0].force, Vec3::ZERO);
    }

    #[test]
    fn test_speed_is_clamped() {
        let mut flock = Flock::new(FlockParams::default());
        flock.add(Boid::new(Vec3::ZERO, Vec3::X * 100.0));
        flock.step(0.1);
        assert!(flock.boids[0].velocity.length() <= flock.params.max_speed + 0.0001);
    }

    #[test]
    fn test_separation_pushes_apart() {
        let mut flock = Flock::new(only(1.0, 0.0, 0.0));
        flock.add(Boid::new(Vec3::ZERO, Vec3::ZERO));
        flock.add(Boid::new(Vec3::new(0.2, 0.0, 0.0), Vec3::ZERO));
        let before = flock.nearest_neighbor_distance().unwrap();
        flock.step(0.1);
        assert!(flock.nearest_neighbor_distance().unwrap() > before);
    }

    #[test]
    fn test_cohesion_pulls_together() {
        let mut flock = Flock::new(only(0.0, 0.0, 1.0));
        flock.add(Boid::new(Vec3::ZERO, Vec3::ZERO));
        flock.add(Boid::new(Vec3::new(2.0, 0.0, 0.0), Vec3::ZERO));
        flock.step(0.1);
        assert!(flock.nearest_neighbor_distance().unwrap() < 2.0);
    }

    #[test]
    fn test_alignment_matches_headings() {
        let mut flock = Flock::new(only(0.0, 1.0, 0.0));
        flock.add(Boid::new(Vec3::ZERO, Vec3::X));
        flock.add(Boid::new(Vec3::new(2.0, 0.0, 0.0), Vec3::Z));
        let before = flock.boids[0].velocity.normalized().dot(flock.boids[1].velocity.normalized());
        flock.step(0.1);
        let after = flock.boids[0].velocity.normalized().dot(flock.boids[1].velocity.normalized());
        assert!(after > before);
    }

    #[test]
    fn test_boundary_steers_back() {
        let mut flock = Flock::new(FlockParams::default());
        flock.add(Boid::new(Vec3::new(15.0, 0.0, 0.0), Vec3::X * 2.0));
        flock.step(0.1);
        let boid = flock.boids[0];
        assert!(boid.force.x < 0.0);
        assert!(boid.velocity.x < 2.0);
    }

    #[test]
    fn test_spawn_spiral() {
        let mut flock = Flock::new(FlockParams::default());
        let center = Vec3::new(1.0, 2.0, 3.0);
        flock.spawn_spiral(50, center, 4.0);
        assert_eq!(flock.len(), 50);
        for boid in &flock.boids {
            assert!((boid.position.distance(center) - 4.0).abs() < 0.001);
            assert!((boid.velocity.length() - 2.0).abs() < 0.001);
        }
        assert!(flock.nearest_neighbor_distance().unwrap() > 0.1);
    }

    #[test]
    fn test_update_order_does_not_matter() {
        let mut forward = Flock::new(FlockParams::default());
        forward.spawn_spiral(12, Vec3::ZERO, 1.5);
        let mut backward = forward.clone();
        backward.boids.reverse();

        for _ in 0..10 {
            forward.step(0.05);
            backward.step(0.05);
        }

        for (a, b) in forward.boids.iter().zip(backward.boids.iter().rev()) {
            assert!(a.position.distance(b.position) < 0.001);
        }
    }

    #[test]
    fn test_empty_flock_stats() {
        let mut flock = Flock::default();
        flock.step(0.1);
        assert!(flock.centroid().is_none());
        assert_eq!(flock.average_speed(), 0.0);
        assert_eq!(flock.spread(), 0.0);
        assert!(flock.nearest_neighbor_distance().is_none());
    }
}
