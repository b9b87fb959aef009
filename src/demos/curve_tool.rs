//! Curve tool: load a curve, refine it and optionally write it back out
//!
//! Refinement goes through [`CurveEditor`] so the same commands (and undo
//! history) serve an interactive panel and this batch tool.

use std::path::Path;

use coasterlab_core::CurveEditor;
use coasterlab_math::{curve_io, Aabb3};

use super::{load_track, DemoError};
use crate::config::CurveConfig;

#[derive(Debug, Clone)]
pub struct CurveSummary {
    pub input_points: usize,
    pub output_points: usize,
    pub closed: bool,
    pub input_length: f32,
    pub output_length: f32,
    pub bounds: Option<Aabb3>,
    /// Set when the result was written
    pub output: Option<String>,
}

impl std::fmt::Display for CurveSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "curve: {} -> {} points ({}), length {:.3} -> {:.3}",
            self.input_points,
            self.output_points,
            if self.closed { "closed" } else { "open" },
            self.input_length,
            self.output_length
        )?;
        if let Some(path) = &self.output {
            write!(f, ", written to {}", path)?;
        }
        Ok(())
    }
}

pub fn run_curve_tool(input: &Path, config: &CurveConfig) -> Result<CurveSummary, DemoError> {
    let curve = load_track(input, config.obj_closed)?;
    let input_points = curve.len();
    let input_length = curve.length();
    log::info!("Loaded {} ({} points)", input.display(), input_points);

    let mut editor = CurveEditor::new(curve);
    for level in 0..config.subdivisions {
        editor.subdivide();
        log::debug!("Subdivision {}: {} points", level + 1, editor.curve().len());
    }
    if config.resample > 0.0 {
        let resampled = editor.curve().resample(config.resample);
        editor.reset(resampled);
        log::debug!("Resampled to {} points", editor.curve().len());
    }

    let result = editor.curve();
    let output = if config.output.is_empty() {
        None
    } else {
        curve_io::save_curve(&config.output, result)?;
        log::info!("Wrote {}", config.output);
        Some(config.output.clone())
    };

    Ok(CurveSummary {
        input_points,
        output_points: result.len(),
        closed: result.closed,
        input_length,
        output_length: result.length(),
        bounds: result.bounds(),
        output,
    })
}
