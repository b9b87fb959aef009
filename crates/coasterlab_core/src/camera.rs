//! Cameras for watching the coaster
//!
//! The orbit camera circles a target point and is driven by the input
//! crate through [`OrbitControl`]. The ride and follow views are computed
//! from a car's [`CurveFrame`] each frame.

use coasterlab_input::OrbitControl;
use coasterlab_math::{mat4, CurveFrame, Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Pitch is kept just short of straight up/down
const PITCH_LIMIT: f32 = 1.5;

/// Below this chase distance the follow camera looks straight down the normal
const MIN_FOLLOW_BACK: f32 = 1e-3;

/// Which camera drives the view
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Free orbit around a target point
    #[default]
    Orbit,
    /// First person, sitting on the lead car
    Ride,
    /// Chase camera behind the lead car
    Follow,
}

impl ViewMode {
    /// Next mode in the cycle orbit -> ride -> follow -> orbit
    pub fn next(self) -> Self {
        match self {
            ViewMode::Orbit => ViewMode::Ride,
            ViewMode::Ride => ViewMode::Follow,
            ViewMode::Follow => ViewMode::Orbit,
        }
    }
}

/// Perspective projection settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov: 45.0,
            near: 0.1,
            far: 500.0,
        }
    }
}

impl Projection {
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        mat4::perspective(self.fov.to_radians(), aspect.max(f32::EPSILON), self.near, self.far)
    }
}

/// Camera circling a target at a distance
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    /// Rotation about +Y, 0 looks down -Z
    pub yaw: f32,
    /// Elevation above the horizontal plane
    pub pitch: f32,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 30.0)
    }
}

impl OrbitCamera {
    pub fn new(target: Vec3, distance: f32) -> Self {
        Self {
            target,
            yaw: 0.0,
            pitch: 0.4,
            distance,
            min_distance: 1.0,
            max_distance: 400.0,
        }
    }

    /// Unit vector from the target toward the eye
    fn offset_dir(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(cp * sy, sp, cp * cy)
    }

    pub fn eye(&self) -> Vec3 {
        self.target + self.offset_dir() * self.distance
    }

    /// Horizontal view direction
    fn forward_flat(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(-sy, 0.0, -cy)
    }

    fn right_flat(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(cy, 0.0, -sy)
    }

    pub fn view_matrix(&self) -> Mat4 {
        mat4::look_at(self.eye(), self.target, Vec3::Y)
    }

    /// Frame the whole track: center on it and back off far enough to see it
    pub fn frame_bounds(&mut self, center: Vec3, radius: f32) {
        self.target = center;
        self.distance = (radius * 2.5).clamp(self.min_distance, self.max_distance);
    }
}

impl OrbitControl for OrbitCamera {
    fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    fn zoom(&mut self, factor: f32) {
        self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
    }

    fn pan(&mut self, right: f32, up: f32) {
        let back = self.offset_dir();
        let screen_right = Vec3::Y.cross(back).normalized();
        let screen_up = back.cross(screen_right).normalized();
        self.target += (screen_right * right + screen_up * up) * (self.distance * 0.1);
    }

    fn move_target(&mut self, forward: f32, right: f32, up: f32) {
        self.target += self.forward_flat() * forward + self.right_flat() * right + Vec3::Y * up;
    }

    fn target(&self) -> Vec3 {
        self.target
    }
}

/// First person view from a car, `height` above the track
pub fn ride_view(frame: &CurveFrame, height: f32) -> Mat4 {
    let eye = frame.position + frame.normal * height;
    mat4::look_at(eye, eye + frame.tangent, frame.normal)
}

/// Chase view `back` units behind and `height` above a car, looking at it
pub fn follow_view(frame: &CurveFrame, back: f32, height: f32) -> Mat4 {
    let eye = frame.position - frame.tangent * back + frame.normal * height;
    // Looking along the normal: keep the track ahead at the top of the screen
    let up = if back.abs() < MIN_FOLLOW_BACK {
        frame.tangent
    } else {
        frame.normal
    };
    mat4::look_at(eye, frame.position, up)
}
