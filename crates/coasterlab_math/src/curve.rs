//! Polyline curves and B-spline subdivision
//!
//! A [`Curve`] is an ordered list of control points, optionally closed so the
//! last point connects back to the first. Smooth tracks are produced by
//! repeatedly calling [`Curve::subdivide`], which converges to the uniform
//! cubic B-spline of the control polygon.

use serde::{Deserialize, Serialize};

use crate::arc_length::ArcLengthTable;
use crate::geometry::{closest_point_on_segment, Aabb3};
use crate::Vec3;

/// Ordered sequence of 3D points, optionally closed
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub points: Vec<Vec3>,
    #[serde(default)]
    pub closed: bool,
}

/// Result of a nearest-point query against a curve
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NearestPoint {
    /// Index of the segment's first point
    pub segment: usize,
    /// Position along the segment in [0, 1]
    pub t: f32,
    pub point: Vec3,
    pub distance: f32,
}

impl Curve {
    /// Empty open curve
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(points: Vec<Vec3>) -> Self {
        Self { points, closed: false }
    }

    pub fn closed(points: Vec<Vec3>) -> Self {
        Self { points, closed: true }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point by index. Closed curves wrap, open curves clamp to the ends.
    pub fn point(&self, index: isize) -> Option<Vec3> {
        let n = self.points.len() as isize;
        if n == 0 {
            return None;
        }
        let i = if self.closed {
            index.rem_euclid(n)
        } else {
            index.clamp(0, n - 1)
        };
        Some(self.points[i as usize])
    }

    /// Number of straight segments the polyline is made of
    pub fn segment_count(&self) -> usize {
        match self.points.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }

    /// Iterate over segments as (start, end) pairs
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        let n = self.points.len();
        (0..self.segment_count()).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Total polyline arc length
    pub fn length(&self) -> f32 {
        self.segments().map(|(a, b)| a.distance(b)).sum()
    }

    /// One round of cubic B-spline refinement.
    ///
    /// Pass one inserts the midpoint of every segment. Pass two averages the
    /// doubled sequence with its neighbours twice, which moves each original
    /// point to `(p[i-1] + 6 p[i] + p[i+1]) / 8` and leaves the inserted
    /// points on the segment midpoints. Closed curves wrap and end up with
    /// `2n` points; open curves keep both end points and end up with `2n - 1`.
    pub fn subdivide(&self) -> Curve {
        if self.points.len() < 2 {
            return self.clone();
        }

        let doubled = self.insert_midpoints();
        let points = if self.closed {
            average_closed(&doubled)
        } else {
            average_open(&doubled)
        };

        Curve {
            points,
            closed: self.closed,
        }
    }

    /// Apply [`subdivide`](Self::subdivide) `levels` times
    pub fn subdivided(&self, levels: u32) -> Curve {
        let mut curve = self.clone();
        for _ in 0..levels {
            curve = curve.subdivide();
        }
        curve
    }

    fn insert_midpoints(&self) -> Vec<Vec3> {
        let mut out = Vec::with_capacity(self.points.len() * 2);
        for (a, b) in self.segments() {
            out.push(a);
            out.push(a.lerp(b, 0.5));
        }
        if !self.closed {
            if let Some(last) = self.points.last() {
                out.push(*last);
            }
        }
        out
    }

    /// Resample at (approximately) uniform arc-length spacing.
    ///
    /// The spacing is adjusted so the samples divide the curve evenly. Open
    /// curves keep both end points. Curves shorter than one spacing, or with
    /// a non-positive spacing, come back unchanged.
    pub fn resample(&self, spacing: f32) -> Curve {
        let table = match ArcLengthTable::new(self) {
            Ok(table) => table,
            Err(_) => return self.clone(),
        };
        let total = table.total();
        if spacing <= 0.0 || total < spacing {
            return self.clone();
        }

        let segments = (total / spacing).round().max(1.0) as usize;
        let step = total / segments as f32;
        let count = if self.closed { segments.max(3) } else { segments + 1 };
        let step = if self.closed { total / count as f32 } else { step };

        let points = (0..count)
            .map(|k| table.sample(k as f32 * step).position)
            .collect();

        Curve {
            points,
            closed: self.closed,
        }
    }

    pub fn bounds(&self) -> Option<Aabb3> {
        Aabb3::from_points(&self.points)
    }

    /// Highest y coordinate of any point
    pub fn max_height(&self) -> Option<f32> {
        self.points.iter().map(|p| p.y).reduce(f32::max)
    }

    pub fn translate(&mut self, offset: Vec3) {
        for p in &mut self.points {
            *p += offset;
        }
    }

    /// Uniformly scale every point about `pivot`
    pub fn scale_about(&mut self, pivot: Vec3, factor: f32) {
        for p in &mut self.points {
            *p = pivot + (*p - pivot) * factor;
        }
    }

    /// Same curve traversed in the opposite direction
    pub fn reversed(&self) -> Curve {
        let mut points = self.points.clone();
        points.reverse();
        Curve {
            points,
            closed: self.closed,
        }
    }

    /// Closest location on the polyline to `p`
    pub fn nearest_point(&self, p: Vec3) -> Option<NearestPoint> {
        if self.points.len() == 1 {
            let point = self.points[0];
            return Some(NearestPoint {
                segment: 0,
                t: 0.0,
                point,
                distance: point.distance(p),
            });
        }

        self.segments()
            .enumerate()
            .map(|(segment, (a, b))| {
                let (point, t) = closest_point_on_segment(p, a, b);
                NearestPoint {
                    segment,
                    t,
                    point,
                    distance: point.distance(p),
                }
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

fn average_closed(q: &[Vec3]) -> Vec<Vec3> {
    let n = q.len();
    let forward: Vec<Vec3> = (0..n).map(|j| (q[j] + q[(j + 1) % n]) * 0.5).collect();
    (0..n)
        .map(|j| (forward[(j + n - 1) % n] + forward[j]) * 0.5)
        .collect()
}

fn average_open(q: &[Vec3]) -> Vec<Vec3> {
    let n = q.len();
    let forward: Vec<Vec3> = q.windows(2).map(|w| (w[0] + w[1]) * 0.5).collect();
    let mut out = Vec::with_capacity(n);
    out.push(q[0]);
    for j in 1..n - 1 {
        out.push((forward[j - 1] + forward[j]) * 0.5);
    }
    out.push(q[n - 1]);
    out
}
