//! Orbit camera controller for the coaster viewer
//!
//! Controls:
//! - Left mouse drag: orbit around the target
//! - Right mouse drag: pan the target
//! - Scroll: zoom in/out
//! - W/S/A/D: move the target forward/back/left/right
//! - Q/E: move the target down/up

use coasterlab_math::Vec3;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Trait for orbit-style cameras
/// Allows the controller to drive any camera that circles a target
pub trait OrbitControl {
    fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32);
    /// Multiply the distance to the target by `factor`
    fn zoom(&mut self, factor: f32);
    /// Shift the target in the camera's screen plane
    fn pan(&mut self, right: f32, up: f32);
    /// Shift the target in the horizontal plane relative to the view direction
    fn move_target(&mut self, forward: f32, right: f32, up: f32);
    fn target(&self) -> Vec3;
}

/// Accumulates raw mouse and keyboard input and applies it to an [`OrbitControl`]
pub struct OrbitController {
    // Movement state
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,

    // Mouse state
    orbiting: bool,
    panning: bool,
    pending_x: f32,
    pending_y: f32,
    pending_scroll: f32,

    // Input smoothing state
    smooth_x: f32,
    smooth_y: f32,

    // Configuration
    pub move_speed: f32,
    pub orbit_sensitivity: f32,
    pub pan_sensitivity: f32,
    /// Zoom factor per scroll line (below 1 zooms in)
    pub zoom_step: f32,
    pub smoothing_half_life: f32,
    pub smoothing_enabled: bool,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitController {
    pub fn new() -> Self {
        Self {
            forward: false,
            backward: false,
            left: false,
            right: false,
            up: false,
            down: false,

            orbiting: false,
            panning: false,
            pending_x: 0.0,
            pending_y: 0.0,
            pending_scroll: 0.0,

            smooth_x: 0.0,
            smooth_y: 0.0,

            move_speed: 5.0,
            orbit_sensitivity: 0.005,
            pan_sensitivity: 0.01,
            zoom_step: 0.9,
            smoothing_half_life: 0.05,
            smoothing_enabled: false,
        }
    }

    /// Process keyboard input; returns true if the key was consumed
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        let pressed = state == ElementState::Pressed;

        match key {
            KeyCode::KeyW => { self.forward = pressed; true }
            KeyCode::KeyS => { self.backward = pressed; true }
            KeyCode::KeyA => { self.left = pressed; true }
            KeyCode::KeyD => { self.right = pressed; true }
            KeyCode::KeyE => { self.up = pressed; true }
            KeyCode::KeyQ => { self.down = pressed; true }
            _ => false,
        }
    }

    /// Process mouse button input
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;

        match button {
            MouseButton::Left => self.orbiting = pressed,
            MouseButton::Right => self.panning = pressed,
            _ => {}
        }
    }

    /// Process mouse movement
    pub fn process_mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        self.pending_x += delta_x as f32;
        self.pending_y += delta_y as f32;
    }

    /// Process scroll wheel input in lines (positive = away from the user)
    pub fn process_scroll(&mut self, lines: f32) {
        self.pending_scroll += lines;
    }

    /// Apply accumulated input to the camera
    pub fn update<C: OrbitControl>(&mut self, camera: &mut C, dt: f32) -> Vec3 {
        let fwd = (self.forward as i32 - self.backward as i32) as f32;
        let rgt = (self.right as i32 - self.left as i32) as f32;
        let up = (self.up as i32 - self.down as i32) as f32;
        let step = self.move_speed * dt;
        if fwd != 0.0 || rgt != 0.0 || up != 0.0 {
            camera.move_target(fwd * step, rgt * step, up * step);
        }

        // factor = 2^(-dt / half_life), so smaller half_life = faster response
        let (dx, dy) = if self.smoothing_enabled && dt > 0.0 {
            let factor = 2.0f32.powf(-dt / self.smoothing_half_life);
            self.smooth_x = self.smooth_x * factor + self.pending_x * (1.0 - factor);
            self.smooth_y = self.smooth_y * factor + self.pending_y * (1.0 - factor);
            (self.smooth_x, self.smooth_y)
        } else {
            (self.pending_x, self.pending_y)
        };

        if self.panning {
            // Dragging right moves the scene right, so the target goes left
            camera.pan(-dx * self.pan_sensitivity, dy * self.pan_sensitivity);
        } else if self.orbiting {
            // Mouse down (positive delta_y) tilts the camera up over the target
            camera.orbit(-dx * self.orbit_sensitivity, dy * self.orbit_sensitivity);
        }

        if self.pending_scroll != 0.0 {
            camera.zoom(self.zoom_step.powf(self.pending_scroll));
        }

        self.pending_x = 0.0;
        self.pending_y = 0.0;
        self.pending_scroll = 0.0;

        camera.target()
    }

    pub fn is_moving(&self) -> bool {
        self.forward || self.backward || self.left || self.right || self.up || self.down
    }

    /// Toggle input smoothing on/off
    pub fn toggle_smoothing(&mut self) -> bool {
        self.smoothing_enabled = !self.smoothing_enabled;
        self.smooth_x = 0.0;
        self.smooth_y = 0.0;
        self.smoothing_enabled
    }

    /// Builder: set target movement speed
    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }

    /// Builder: set orbit sensitivity (radians per pixel)
    pub fn with_orbit_sensitivity(mut self, sensitivity: f32) -> Self {
        self.orbit_sensitivity = sensitivity;
        self
    }

    /// Builder: set pan sensitivity (units per pixel)
    pub fn with_pan_sensitivity(mut self, sensitivity: f32) -> Self {
        self.pan_sensitivity = sensitivity;
        self
    }

    /// Builder: set zoom factor per scroll line
    pub fn with_zoom_step(mut self, step: f32) -> Self {
        self.zoom_step = step;
        self
    }

    /// Builder: enable or disable smoothing
    pub fn with_smoothing(mut self, enabled: bool) -> Self {
        self.smoothing_enabled = enabled;
        self
    }
}
