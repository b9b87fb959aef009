//! Arc-length parameterization and moving frames along a curve

use crate::curve::Curve;
use crate::error::GeometryError;
use crate::Vec3;

/// Position and direction at a given distance along a curve
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveSample {
    pub position: Vec3,
    /// Unit tangent in the direction of travel
    pub tangent: Vec3,
    /// Index of the segment's first point
    pub segment: usize,
    /// Position within the segment in [0, 1]
    pub t: f32,
}

/// Orthonormal frame riding on the curve
///
/// `normal` is the local "up" of the track and `binormal` points to the right
/// of the direction of travel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveFrame {
    pub position: Vec3,
    pub tangent: Vec3,
    pub normal: Vec3,
    pub binormal: Vec3,
}

/// Cumulative distance table for sampling a curve by arc length
#[derive(Clone, Debug)]
pub struct ArcLengthTable {
    points: Vec<Vec3>,
    closed: bool,
    /// `cumulative[i]` is the distance from the start to the beginning of segment `i`.
    /// One longer than the number of segments; the last entry is the total length.
    cumulative: Vec<f32>,
}

impl ArcLengthTable {
    /// Build the table for a curve. Fails only for an empty curve.
    pub fn new(curve: &Curve) -> Result<Self, GeometryError> {
        if curve.is_empty() {
            return Err(GeometryError::Empty);
        }

        let mut cumulative = Vec::with_capacity(curve.segment_count() + 1);
        let mut total = 0.0;
        cumulative.push(total);
        for (a, b) in curve.segments() {
            total += a.distance(b);
            cumulative.push(total);
        }

        Ok(Self {
            points: curve.points.clone(),
            closed: curve.closed,
            cumulative,
        })
    }

    /// Total arc length
    pub fn total(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn segment_count(&self) -> usize {
        self.cumulative.len() - 1
    }

    fn segment_points(&self, segment: usize) -> (Vec3, Vec3) {
        let n = self.points.len();
        (self.points[segment], self.points[(segment + 1) % n])
    }

    /// Map any distance onto the curve: wrap for closed curves, clamp for open ones
    pub fn normalize_distance(&self, s: f32) -> f32 {
        let total = self.total();
        if total <= 0.0 {
            0.0
        } else if self.closed {
            s.rem_euclid(total)
        } else {
            s.clamp(0.0, total)
        }
    }

    fn locate(&self, s: f32) -> (usize, f32) {
        let s = self.normalize_distance(s);
        let count = self.segment_count();
        if count == 0 {
            return (0, 0.0);
        }
        let segment = (self.cumulative.partition_point(|&c| c <= s).max(1) - 1).min(count - 1);
        let start = self.cumulative[segment];
        let len = self.cumulative[segment + 1] - start;
        let t = if len > 0.0 { ((s - start) / len).clamp(0.0, 1.0) } else { 0.0 };
        (segment, t)
    }

    /// Direction of a segment, falling back to the nearest non-degenerate one
    fn segment_direction(&self, segment: usize) -> Vec3 {
        let count = self.segment_count();
        for offset in 0..count {
            for candidate in [segment + offset, segment + count - offset] {
                let (a, b) = self.segment_points(candidate % count);
                let dir = (b - a).normalized();
                if dir != Vec3::ZERO {
                    return dir;
                }
            }
        }
        Vec3::Z
    }

    /// Sample position and tangent at distance `s`
    pub fn sample(&self, s: f32) -> CurveSample {
        if self.segment_count() == 0 {
            return CurveSample {
                position: self.points[0],
                tangent: Vec3::Z,
                segment: 0,
                t: 0.0,
            };
        }

        let (segment, t) = self.locate(s);
        let (a, b) = self.segment_points(segment);
        CurveSample {
            position: a.lerp(b, t),
            tangent: self.segment_direction(segment),
            segment,
            t,
        }
    }

    /// Fractional point index at distance `s` (segment index plus t)
    pub fn parameter_at(&self, s: f32) -> f32 {
        let (segment, t) = self.locate(s);
        segment as f32 + t
    }

    /// Frame at distance `s` whose normal leans toward `up`
    pub fn frame(&self, s: f32, up: Vec3) -> CurveFrame {
        let sample = self.sample(s);
        let normal = orthogonal_normal(sample.tangent, up);
        CurveFrame {
            position: sample.position,
            tangent: sample.tangent,
            normal,
            binormal: sample.tangent.cross(normal),
        }
    }

    /// `count` evenly spaced frames using parallel transport.
    ///
    /// The first frame's normal leans toward `up`; each following normal is
    /// the previous one projected onto the new tangent's normal plane, so the
    /// frame never flips through vertical sections of track.
    pub fn frames(&self, count: usize, up: Vec3) -> Vec<CurveFrame> {
        if count == 0 {
            return Vec::new();
        }
        let total = self.total();
        let step = if self.closed {
            total / count as f32
        } else if count > 1 {
            total / (count - 1) as f32
        } else {
            0.0
        };

        let mut frames = Vec::with_capacity(count);
        let mut prev = self.frame(0.0, up);
        frames.push(prev);

        for k in 1..count {
            let s = k as f32 * step;
            let sample = self.sample(s);
            let projected = prev.normal - sample.tangent * prev.normal.dot(sample.tangent);
            let normal = if projected.length_squared() > 1e-8 {
                projected.normalized()
            } else {
                orthogonal_normal(sample.tangent, up)
            };
            let frame = CurveFrame {
                position: sample.position,
                tangent: sample.tangent,
                normal,
                binormal: sample.tangent.cross(normal),
            };
            frames.push(frame);
            prev = frame;
        }

        frames
    }
}

/// Unit vector perpendicular to `tangent`, as close to `up` as possible
fn orthogonal_normal(tangent: Vec3, up: Vec3) -> Vec3 {
    for candidate in [up, Vec3::X, Vec3::Z] {
        let n = candidate - tangent * candidate.dot(tangent);
        if n.length_squared() > 1e-8 {
            return n.normalized();
        }
    }
    Vec3::Y
}
