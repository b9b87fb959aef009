//! Coaster ride: a train of cars moving along a curve by arc length
//!
//! Speed is either constant or derived from energy conservation, so the
//! train crawls over the crests and races through the dips.

use coasterlab_math::{ArcLengthTable, Curve, CurveFrame, GeometryError, Vec3};
use serde::{Deserialize, Serialize};

/// Limits for the playback speed multiplier
const MIN_SPEED_SCALE: f32 = 0.125;
const MAX_SPEED_SCALE: f32 = 8.0;
const SPEED_SCALE_STEP: f32 = 1.25;

/// How the ride's speed is determined
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpeedMode {
    /// Fixed speed in units per second
    Constant { speed: f32 },
    /// `sqrt(2 g (h_max - h)) + min_speed`, with `h_max` the highest point of the track
    Gravity { gravity: f32, min_speed: f32 },
}

impl Default for SpeedMode {
    fn default() -> Self {
        SpeedMode::Gravity {
            gravity: 9.81,
            min_speed: 1.0,
        }
    }
}

/// Playback state of a train riding a curve
#[derive(Clone, Debug)]
pub struct CoasterRide {
    table: ArcLengthTable,
    top_height: f32,
    distance: f32,
    speed: f32,
    /// +1 forward, -1 reversed
    direction: f32,
    laps: u32,
    pub playing: bool,
    /// Multiplier applied on top of the mode's speed
    pub speed_scale: f32,
    pub mode: SpeedMode,
}

impl CoasterRide {
    /// Start a ride at the beginning of `curve`
    pub fn new(curve: &Curve, mode: SpeedMode) -> Result<Self, GeometryError> {
        let table = ArcLengthTable::new(curve)?;
        let top_height = curve.max_height().unwrap_or(0.0);
        let mut ride = Self {
            table,
            top_height,
            distance: 0.0,
            speed: 0.0,
            direction: 1.0,
            laps: 0,
            playing: true,
            speed_scale: 1.0,
            mode,
        };
        ride.speed = ride.speed_at(0.0);
        Ok(ride)
    }

    /// Swap in an edited track, keeping the train's distance where possible
    pub fn rebuild(&mut self, curve: &Curve) -> Result<(), GeometryError> {
        self.table = ArcLengthTable::new(curve)?;
        self.top_height = curve.max_height().unwrap_or(0.0);
        self.distance = self.table.normalize_distance(self.distance);
        self.speed = self.speed_at(self.distance);
        log::debug!("Rebuilt coaster track: length {:.2}", self.table.total());
        Ok(())
    }

    pub fn track_length(&self) -> f32 {
        self.table.total()
    }

    /// Distance of the lead car from the start of the track
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Current speed (before the playback multiplier)
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Completed laps (closed tracks only)
    pub fn laps(&self) -> u32 {
        self.laps
    }

    pub fn is_reversed(&self) -> bool {
        self.direction < 0.0
    }

    /// Fraction of the track covered, in [0, 1]
    pub fn progress(&self) -> f32 {
        let total = self.table.total();
        if total > 0.0 {
            self.distance / total
        } else {
            0.0
        }
    }

    fn speed_at(&self, distance: f32) -> f32 {
        match self.mode {
            SpeedMode::Constant { speed } => speed.max(0.0),
            SpeedMode::Gravity { gravity, min_speed } => {
                let height = self.table.sample(distance).position.y;
                let drop = (self.top_height - height).max(0.0);
                (2.0 * gravity.max(0.0) * drop).sqrt() + min_speed.max(0.0)
            }
        }
    }

    /// Advance the train by `dt` seconds of playback
    pub fn update(&mut self, dt: f32) {
        if !self.playing || dt <= 0.0 {
            return;
        }
        let total = self.table.total();
        if total <= 0.0 {
            return;
        }

        self.speed = self.speed_at(self.distance);
        let travelled = self.distance + self.speed * self.speed_scale * dt * self.direction;

        if self.table.is_closed() {
            if travelled >= total || travelled < 0.0 {
                self.laps += (travelled / total).floor().abs().max(1.0) as u32;
                log::debug!("Coaster completed lap {}", self.laps);
            }
            self.distance = travelled.rem_euclid(total);
        } else {
            self.distance = travelled.clamp(0.0, total);
            let at_end = if self.is_reversed() {
                self.distance <= 0.0
            } else {
                self.distance >= total
            };
            if at_end {
                log::info!("Coaster reached the end of an open track");
                self.playing = false;
            }
        }
    }

    /// Frame of the lead car
    pub fn frame(&self, up: Vec3) -> CurveFrame {
        let mut frame = self.table.frame(self.distance, up);
        if self.is_reversed() {
            frame.tangent = -frame.tangent;
            frame.binormal = -frame.binormal;
        }
        frame
    }

    /// One frame per car, the lead car first, each `spacing` behind the previous
    pub fn car_frames(&self, count: usize, spacing: f32, up: Vec3) -> Vec<CurveFrame> {
        (0..count)
            .map(|k| {
                let s = self.distance - k as f32 * spacing * self.direction;
                let mut frame = self.table.frame(s, up);
                if self.is_reversed() {
                    frame.tangent = -frame.tangent;
                    frame.binormal = -frame.binormal;
                }
                frame
            })
            .collect()
    }

    pub fn toggle_play(&mut self) {
        self.playing = !self.playing;
    }

    pub fn speed_up(&mut self) {
        self.speed_scale = (self.speed_scale * SPEED_SCALE_STEP).min(MAX_SPEED_SCALE);
    }

    pub fn slow_down(&mut self) {
        self.speed_scale = (self.speed_scale / SPEED_SCALE_STEP).max(MIN_SPEED_SCALE);
    }

    pub fn reverse(&mut self) {
        self.direction = -self.direction;
        if !self.table.is_closed() {
            self.playing = true;
        }
    }

    /// Back to the start, facing forward
    pub fn reset(&mut self) {
        self.distance = 0.0;
        self.laps = 0;
        self.direction = 1.0;
        self.playing = true;
        self.speed = self.speed_at(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.001;

    fn flat_square() -> Curve {
        Curve::closed(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 10.0),
            Vec3::new(0.0, 0.0, 10.0),
        ])
    }

    fn square_ride(speed: f32) -> CoasterRide {
        CoasterRide::new(&flat_square(), SpeedMode::Constant { speed }).unwrap()
    }

    /// Closed track with its crest at the start and a 5 unit drop halfway
    fn hill() -> Curve {
        Curve::closed(vec![
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 10.0),
            Vec3::new(0.0, 0.0, 10.0),
        ])
    }

    #[test]
    fn test_constant_speed_moves_and_wraps() {
        let mut ride = square_ride(10.0);
        ride.update(1.5);
        assert!((ride.distance() - 15.0).abs() < EPSILON);
        assert_eq!(ride.laps(), 0);

        ride.update(3.0);
        assert!((ride.distance() - 5.0).abs() < EPSILON);
        assert_eq!(ride.laps(), 1);
    }

    #[test]
    fn test_paused_ride_stays() {
        let mut ride = square_ride(10.0);
        ride.toggle_play();
        ride.update(1.0);
        assert_eq!(ride.distance(), 0.0);
    }

    #[test]
    fn test_gravity_speed_from_drop() {
        let mode = SpeedMode::Gravity {
            gravity: 10.0,
            min_speed: 0.5,
        };
        let ride = CoasterRide::new(&hill(), mode).unwrap();
        // At the crest only the minimum speed remains
        assert!((ride.speed() - 0.5).abs() < EPSILON);
        // Bottom: sqrt(2 * 10 * 5) + 0.5
        let bottom = ride.speed_at(ride.track_length() * 0.5);
        assert!((bottom - 10.5).abs() < EPSILON);
    }

    #[test]
    fn test_speed_scale_and_limits() {
        let mut ride = square_ride(2.0);
        ride.speed_up();
        assert!((ride.speed_scale - 1.25).abs() < EPSILON);
        ride.update(1.0);
        assert!((ride.distance() - 2.5).abs() < EPSILON);

        for _ in 0..50 {
            ride.speed_up();
        }
        assert_eq!(ride.speed_scale, MAX_SPEED_SCALE);
        for _ in 0..50 {
            ride.slow_down();
        }
        assert_eq!(ride.speed_scale, MIN_SPEED_SCALE);
    }

    #[test]
    fn test_open_track_stops_at_end() {
        let track = Curve::open(vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)]);
        let mut ride = CoasterRide::new(&track, SpeedMode::Constant { speed: 4.0 }).unwrap();
        ride.update(5.0);
        assert_eq!(ride.distance(), 10.0);
        assert!(!ride.playing);
        assert!((ride.progress() - 1.0).abs() < EPSILON);

        ride.reverse();
        assert!(ride.playing);
        ride.update(1.0);
        assert!((ride.distance() - 6.0).abs() < EPSILON);
    }

    #[test]
    fn test_reverse_on_closed_track_wraps_backward() {
        let mut ride = square_ride(10.0);
        ride.reverse();
        ride.update(0.5);
        assert!((ride.distance() - 35.0).abs() < EPSILON);
        assert_eq!(ride.laps(), 1);
        assert!(ride.frame(Vec3::Y).tangent.z > 0.9);
    }

    #[test]
    fn test_car_frames_trail_the_lead() {
        let mut ride = square_ride(1.0);
        ride.update(5.0);
        let cars = ride.car_frames(3, 2.0, Vec3::Y);
        assert_eq!(cars.len(), 3);
        assert!((cars[0].position - Vec3::new(5.0, 0.0, 0.0)).length() < EPSILON);
        assert!((cars[2].position - Vec3::new(1.0, 0.0, 0.0)).length() < EPSILON);
    }

    #[test]
    fn test_rebuild_and_reset() {
        let mut ride = square_ride(1.0);
        ride.update(30.0);
        let short = Curve::closed(vec![
            Vec3::ZERO,
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 3.0),
        ]);
        ride.rebuild(&short).unwrap();
        assert!((ride.track_length() - 12.0).abs() < EPSILON);
        assert!((ride.distance() - 6.0).abs() < EPSILON);

        assert!(ride.rebuild(&Curve::new()).is_err());

        ride.reset();
        assert_eq!(ride.distance(), 0.0);
        assert_eq!(ride.laps(), 0);
    }
}
