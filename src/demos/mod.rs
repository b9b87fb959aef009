//! Headless demo runners
//!
//! Each demo owns its simulation state and is driven frame by frame through
//! [`Demo`]. Frame time is turned into fixed steps with a [`FixedTimestep`].

mod coaster;
mod curve_tool;
mod flock;
mod springs;

use std::path::{Path, PathBuf};

use coasterlab_core::{FixedTimestep, GeometryError, RigError, MAX_FRAME_DT};
use coasterlab_math::{curve_io, obj, Curve};

use crate::config::{AppConfig, DemoConfig, DemoKind};

pub use coaster::{CoasterDemo, CoasterSummary};
pub use curve_tool::{run_curve_tool, CurveSummary};
pub use flock::{FlockDemo, FlockSummary};
pub use springs::{SpringSummary, SpringsDemo};

/// A frame-driven simulation
pub trait Demo {
    /// Advance the simulation by one fixed step
    fn step(&mut self, dt: f32);

    /// Called once per frame after its steps; return false to stop early
    fn frame(&mut self, _index: u32, _dt: f32) -> bool {
        true
    }

    /// One-line status for periodic logging
    fn status(&self) -> String;
}

/// Run `config.frames` frames of `config.frame_dt`, in fixed steps of `step`.
/// Returns the number of frames actually run.
pub fn run_frames<D: Demo>(demo: &mut D, config: &DemoConfig, step: f32) -> u32 {
    // Enough steps per frame to keep up with real time
    let per_frame = (config.frame_dt.min(MAX_FRAME_DT) / step.max(1e-5)).ceil() as u32 + 1;
    let mut timestep = FixedTimestep::new(step).with_max_steps(per_frame.max(16));
    let mut steps: u64 = 0;

    for index in 0..config.frames {
        let count = timestep.advance(config.frame_dt);
        for _ in 0..count {
            demo.step(timestep.step());
        }
        steps += u64::from(count);

        if config.report_every > 0 && (index + 1) % config.report_every == 0 {
            log::info!("[frame {}] {}", index + 1, demo.status());
        }
        if !demo.frame(index, config.frame_dt) {
            log::info!("Demo stopped at frame {}", index + 1);
            return index + 1;
        }
    }

    log::debug!("Ran {} frames, {} fixed steps", config.frames, steps);
    config.frames
}

/// Result of one demo run
#[derive(Debug, Clone)]
pub enum DemoSummary {
    Coaster(CoasterSummary),
    Springs(SpringSummary),
    Boids(FlockSummary),
    Curve(CurveSummary),
}

impl std::fmt::Display for DemoSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DemoSummary::Coaster(s) => write!(f, "{}", s),
            DemoSummary::Springs(s) => write!(f, "{}", s),
            DemoSummary::Boids(s) => write!(f, "{}", s),
            DemoSummary::Curve(s) => write!(f, "{}", s),
        }
    }
}

/// Run a demo to completion. `path` overrides the demo's configured input file.
pub fn run_demo(
    kind: DemoKind,
    config: &AppConfig,
    path: Option<&Path>,
) -> Result<DemoSummary, DemoError> {
    log::info!("Running {:?} demo", kind);
    let summary = match kind {
        DemoKind::Coaster => {
            let track = path
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(&config.coaster.track));
            let mut demo = CoasterDemo::from_config(&track, config)?;
            let frames = run_frames(&mut demo, &config.demo, config.demo.step);
            DemoSummary::Coaster(demo.summary(frames))
        }
        DemoKind::Springs => {
            let rig = path
                .map(Path::to_path_buf)
                .or_else(|| {
                    (!config.mass_spring.rig.is_empty())
                        .then(|| PathBuf::from(&config.mass_spring.rig))
                });
            let mut demo = SpringsDemo::from_config(rig.as_deref(), &config.mass_spring)?;
            let frames = run_frames(&mut demo, &config.demo, config.mass_spring.step);
            DemoSummary::Springs(demo.summary(frames))
        }
        DemoKind::Boids => {
            let mut demo = FlockDemo::from_config(&config.boids);
            let frames = run_frames(&mut demo, &config.demo, config.demo.step);
            DemoSummary::Boids(demo.summary(frames))
        }
        DemoKind::Curve => {
            let input = path
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(&config.curve.path));
            DemoSummary::Curve(run_curve_tool(&input, &config.curve)?)
        }
    };
    log::info!("{}", summary);
    Ok(summary)
}

/// Load a curve from a text curve file, or from the vertices of an `.obj`
pub fn load_track(path: &Path, obj_closed: bool) -> Result<Curve, GeometryError> {
    let is_obj = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("obj"));
    if is_obj {
        obj::load_obj_curve(path, obj_closed)
    } else {
        curve_io::load_curve(path)
    }
}

/// Error running a demo
#[derive(Debug)]
pub enum DemoError {
    /// Curve or OBJ loading failed
    Geometry(GeometryError),
    /// Rig loading or instantiation failed
    Rig(RigError),
}

impl From<GeometryError> for DemoError {
    fn from(e: GeometryError) -> Self {
        DemoError::Geometry(e)
    }
}

impl From<RigError> for DemoError {
    fn from(e: RigError) -> Self {
        DemoError::Rig(e)
    }
}

impl std::fmt::Display for DemoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DemoError::Geometry(e) => write!(f, "Curve error: {}", e),
            DemoError::Rig(e) => write!(f, "Rig error: {}", e),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DemoError::Geometry(e) => Some(e),
            DemoError::Rig(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        steps: u32,
        stop_at: Option<u32>,
    }

    impl Demo for Counter {
        fn step(&mut self, _dt: f32) {
            self.steps += 1;
        }

        fn frame(&mut self, index: u32, _dt: f32) -> bool {
            self.stop_at != Some(index)
        }

        fn status(&self) -> String {
            format!("{} steps", self.steps)
        }
    }

    fn demo_config(frames: u32) -> DemoConfig {
        DemoConfig {
            frames,
            frame_dt: 0.02,
            step: 0.01,
            report_every: 0,
            ..DemoConfig::default()
        }
    }

    #[test]
    fn test_run_frames_steps_per_frame() {
        let mut counter = Counter { steps: 0, stop_at: None };
        let frames = run_frames(&mut counter, &demo_config(10), 0.005);
        assert_eq!(frames, 10);
        // 4 steps per frame, give or take rounding in the accumulator
        assert!((39..=40).contains(&counter.steps), "steps {}", counter.steps);
    }

    #[test]
    fn test_run_frames_stops_early() {
        let mut counter = Counter { steps: 0, stop_at: Some(2) };
        assert_eq!(run_frames(&mut counter, &demo_config(10), 0.01), 3);
    }

    #[test]
    fn test_load_track_missing_file() {
        let err = load_track(Path::new("/nonexistent/track.curve"), true).unwrap_err();
        assert!(matches!(err, GeometryError::Io(_)));
        let err = DemoError::from(err);
        assert!(err.to_string().starts_with("Curve error"));
    }
}
