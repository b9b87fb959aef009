//! Coaster demo: a train riding a track while the camera watches
//!
//! Playback keys can be scripted from config; they go through the same
//! [`ActionMapper`] a windowed front end would use.

use std::path::Path;

use coasterlab_core::{follow_view, ride_view, CoasterRide, OrbitCamera, Projection, ViewMode};
use coasterlab_input::{ActionMapper, CoasterAction, OrbitController};
use coasterlab_math::{mat4, Curve, Mat4, Vec3};
use winit::event::{ElementState, MouseButton};

use super::{load_track, Demo, DemoError};
use crate::config::{AppConfig, CameraConfig, CoasterConfig};

/// End-of-run statistics
#[derive(Debug, Clone)]
pub struct CoasterSummary {
    pub frames: u32,
    pub track_length: f32,
    pub laps: u32,
    pub distance: f32,
    pub top_speed: f32,
    pub view: ViewMode,
    /// Frames in which the lead car was in front of the camera
    pub visible_frames: u32,
}

impl std::fmt::Display for CoasterSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "coaster: {} frames, track {:.1}, {} laps, at {:.1}, top speed {:.2}",
            self.frames, self.track_length, self.laps, self.distance, self.top_speed
        )?;
        write!(
            f,
            ", view {:?}, car visible {}/{}",
            self.view, self.visible_frames, self.frames
        )
    }
}

pub struct CoasterDemo {
    ride: CoasterRide,
    camera: OrbitCamera,
    controller: OrbitController,
    projection: Projection,
    view: ViewMode,
    keys: Vec<String>,
    key_interval: u32,
    cars: usize,
    car_spacing: f32,
    camera_config: CameraConfig,
    top_speed: f32,
    visible_frames: u32,
}

impl CoasterDemo {
    /// Load and smooth the track, then place the train at its start
    pub fn from_config(track: &Path, config: &AppConfig) -> Result<Self, DemoError> {
        let curve = load_track(track, true)?.subdivided(config.coaster.subdivisions);
        log::info!(
            "Loaded track {} ({} points after {} subdivisions)",
            track.display(),
            curve.len(),
            config.coaster.subdivisions
        );
        Self::new(&curve, &config.coaster, &config.camera)
    }

    pub fn new(
        curve: &Curve,
        coaster: &CoasterConfig,
        camera_config: &CameraConfig,
    ) -> Result<Self, DemoError> {
        let ride = CoasterRide::new(curve, coaster.mode)?;

        let mut camera = OrbitCamera::default();
        if let Some(bounds) = curve.bounds() {
            camera.frame_bounds(bounds.center(), bounds.extent().length() * 0.5);
        }

        let mut controller = OrbitController::new()
            .with_move_speed(camera_config.move_speed)
            .with_orbit_sensitivity(camera_config.orbit_sensitivity)
            .with_pan_sensitivity(camera_config.pan_sensitivity)
            .with_zoom_step(camera_config.zoom_step)
            .with_smoothing(camera_config.smoothing_enabled);
        controller.smoothing_half_life = camera_config.smoothing_half_life;
        if camera_config.auto_orbit != 0.0 {
            controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        }

        Ok(Self {
            ride,
            camera,
            controller,
            projection: Projection {
                fov: camera_config.fov,
                near: camera_config.near,
                far: camera_config.far,
            },
            view: camera_config.view,
            keys: coaster.keys.clone(),
            key_interval: coaster.key_interval.max(1),
            cars: coaster.cars.max(1),
            car_spacing: coaster.car_spacing,
            camera_config: camera_config.clone(),
            top_speed: 0.0,
            visible_frames: 0,
        })
    }

    pub fn ride(&self) -> &CoasterRide {
        &self.ride
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    /// Apply a playback action; returns false for [`CoasterAction::Exit`]
    pub fn apply(&mut self, action: CoasterAction) -> bool {
        log::debug!("Action {:?}", action);
        match action {
            CoasterAction::TogglePlay => self.ride.toggle_play(),
            CoasterAction::SpeedUp => self.ride.speed_up(),
            CoasterAction::SlowDown => self.ride.slow_down(),
            CoasterAction::CycleView => {
                self.view = self.view.next();
                log::info!("View: {:?}", self.view);
            }
            CoasterAction::ResetRide => self.ride.reset(),
            CoasterAction::ReverseDirection => self.ride.reverse(),
            CoasterAction::ToggleSmoothing => {
                let enabled = self.controller.toggle_smoothing();
                log::info!("Orbit smoothing: {}", if enabled { "ON" } else { "OFF" });
            }
            CoasterAction::Exit => return false,
        }
        true
    }

    /// Current view matrix for the active mode
    pub fn view_matrix(&self) -> Mat4 {
        match self.view {
            ViewMode::Orbit => self.camera.view_matrix(),
            ViewMode::Ride => ride_view(&self.ride.frame(Vec3::Y), self.camera_config.ride_height),
            ViewMode::Follow => follow_view(
                &self.ride.frame(Vec3::Y),
                self.camera_config.follow_distance,
                self.camera_config.follow_height,
            ),
        }
    }

    /// Press the scripted key for this frame, if any
    fn scripted_action(&self, index: u32) -> Option<CoasterAction> {
        if index == 0 || index % self.key_interval != 0 {
            return None;
        }
        let name = self.keys.get((index / self.key_interval - 1) as usize)?;
        let action = ActionMapper::map_key_name(name);
        if action.is_none() {
            log::warn!("Scripted key '{}' is not bound to any action", name);
        }
        action
    }

    pub fn summary(&self, frames: u32) -> CoasterSummary {
        CoasterSummary {
            frames,
            track_length: self.ride.track_length(),
            laps: self.ride.laps(),
            distance: self.ride.distance(),
            top_speed: self.top_speed,
            view: self.view,
            visible_frames: self.visible_frames,
        }
    }
}

impl Demo for CoasterDemo {
    fn step(&mut self, dt: f32) {
        self.ride.update(dt);
        self.top_speed = self.top_speed.max(self.ride.speed());
    }

    fn frame(&mut self, index: u32, dt: f32) -> bool {
        if let Some(action) = self.scripted_action(index) {
            if !self.apply(action) {
                return false;
            }
        }

        if self.view == ViewMode::Orbit && self.camera_config.auto_orbit != 0.0 {
            self.controller.process_mouse_motion(f64::from(self.camera_config.auto_orbit), 0.0);
        }
        self.controller.update(&mut self.camera, dt);

        // Lead car in clip space; in front of the camera when w > 0
        let view_proj = mat4::mul(self.projection.matrix(16.0 / 9.0), self.view_matrix());
        let cars = self.ride.car_frames(self.cars, self.car_spacing, Vec3::Y);
        if let Some(lead) = cars.first() {
            let p = lead.position;
            let clip_w = view_proj[0][3] * p.x
                + view_proj[1][3] * p.y
                + view_proj[2][3] * p.z
                + view_proj[3][3];
            if clip_w > 0.0 {
                self.visible_frames += 1;
            }
            log::trace!("frame {}: lead car at {:?}, clip w {:.2}", index, p, clip_w);
        }
        true
    }

    fn status(&self) -> String {
        format!(
            "distance {:.1}/{:.1}, speed {:.2} x{:.2}, laps {}, {}",
            self.ride.distance(),
            self.ride.track_length(),
            self.ride.speed(),
            self.ride.speed_scale,
            self.ride.laps(),
            if self.ride.playing { "playing" } else { "paused" }
        )
    }
}
