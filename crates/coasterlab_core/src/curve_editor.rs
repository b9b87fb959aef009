//! Curve editing model
//!
//! Holds the control points behind the curve panel: a selection, a set of
//! editing commands and an undo history. Every change bumps
//! [`CurveEditor::revision`] so anything derived from the curve (the
//! coaster's arc-length table, a smoothed preview) knows to rebuild.

use coasterlab_math::{Curve, Vec3};

/// Maximum number of undo snapshots kept
const UNDO_LIMIT: usize = 64;

#[derive(Clone, Debug)]
struct Snapshot {
    curve: Curve,
    selected: Option<usize>,
}

/// Editable curve with selection and undo
#[derive(Clone, Debug)]
pub struct CurveEditor {
    curve: Curve,
    selected: Option<usize>,
    history: Vec<Snapshot>,
    revision: u64,
}

impl CurveEditor {
    pub fn new(curve: Curve) -> Self {
        Self {
            curve,
            selected: None,
            history: Vec::new(),
            revision: 0,
        }
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Incremented on every change to the curve
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    fn checkpoint(&mut self) {
        if self.history.len() == UNDO_LIMIT {
            self.history.remove(0);
        }
        self.history.push(Snapshot {
            curve: self.curve.clone(),
            selected: self.selected,
        });
    }

    fn changed(&mut self) {
        self.revision += 1;
    }

    /// Select a control point by index; out-of-range clears the selection
    pub fn select(&mut self, index: Option<usize>) -> bool {
        self.selected = index.filter(|&i| i < self.curve.len());
        self.selected.is_some() || index.is_none()
    }

    /// Select the control point closest to `point`, if within `radius`
    pub fn select_nearest(&mut self, point: Vec3, radius: f32) -> Option<usize> {
        let nearest = self
            .curve
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.distance(point)))
            .filter(|&(_, d)| d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i);
        self.selected = nearest;
        nearest
    }

    /// Replace a control point
    pub fn set_point(&mut self, index: usize, position: Vec3) -> bool {
        if index >= self.curve.len() {
            return false;
        }
        self.checkpoint();
        self.curve.points[index] = position;
        self.changed();
        true
    }

    /// Move the selected point by `delta`
    pub fn move_selected(&mut self, delta: Vec3) -> bool {
        match self.selected {
            Some(i) => {
                let position = self.curve.points[i] + delta;
                self.set_point(i, position)
            }
            None => false,
        }
    }

    /// Insert a point after the selection (or after the last point without one).
    ///
    /// The new point goes halfway to the successor. At the end of an open
    /// curve it extends the last segment instead. The new point becomes the
    /// selection; its index is returned.
    pub fn insert_after_selected(&mut self) -> usize {
        let n = self.curve.len();
        let position = match n {
            0 => Vec3::ZERO,
            1 => self.curve.points[0] + Vec3::X,
            _ => {
                let i = self.selected.unwrap_or(n - 1);
                let current = self.curve.points[i];
                if i + 1 < n {
                    current.lerp(self.curve.points[i + 1], 0.5)
                } else if self.curve.closed {
                    current.lerp(self.curve.points[0], 0.5)
                } else {
                    current + (current - self.curve.points[i - 1])
                }
            }
        };

        let index = match (n, self.selected) {
            (0, _) => 0,
            (_, Some(i)) => i + 1,
            (_, None) => n,
        };

        self.checkpoint();
        self.curve.points.insert(index, position);
        self.selected = Some(index);
        self.changed();
        index
    }

    /// Delete the selected point; the selection moves to its neighbour
    pub fn delete_selected(&mut self) -> bool {
        let Some(i) = self.selected else {
            return false;
        };
        self.checkpoint();
        self.curve.points.remove(i);
        self.selected = if self.curve.is_empty() {
            None
        } else {
            Some(i.min(self.curve.len() - 1))
        };
        self.changed();
        true
    }

    pub fn toggle_closed(&mut self) -> bool {
        self.checkpoint();
        self.curve.closed = !self.curve.closed;
        self.changed();
        self.curve.closed
    }

    /// Refine the control points one level; clears the selection
    pub fn subdivide(&mut self) {
        self.checkpoint();
        self.curve = self.curve.subdivide();
        self.selected = None;
        self.changed();
    }

    /// Start over with a new curve (undoable)
    pub fn reset(&mut self, curve: Curve) {
        self.checkpoint();
        self.curve = curve;
        self.selected = None;
        self.changed();
    }

    /// Revert the last change
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(snapshot) => {
                self.curve = snapshot.curve;
                self.selected = snapshot.selected;
                self.changed();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Curve {
        Curve::open(vec![Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 0.0)])
    }

    #[test]
    fn test_select() {
        let mut editor = CurveEditor::new(line());
        assert!(editor.select(Some(1)));
        assert_eq!(editor.selected(), Some(1));
        assert!(!editor.select(Some(9)));
        assert_eq!(editor.selected(), None);
        assert!(editor.select(None));
    }

    #[test]
    fn test_select_nearest_within_radius() {
        let mut editor = CurveEditor::new(line());
        assert_eq!(editor.select_nearest(Vec3::new(2.2, 0.1, 0.0), 0.5), Some(1));
        assert_eq!(editor.select_nearest(Vec3::new(1.0, 5.0, 0.0), 0.5), None);
        assert_eq!(editor.selected(), None);
    }

    #[test]
    fn test_move_selected_bumps_revision() {
        let mut editor = CurveEditor::new(line());
        assert!(!editor.move_selected(Vec3::Y));
        assert_eq!(editor.revision(), 0);

        editor.select(Some(2));
        assert!(editor.move_selected(Vec3::Y));
        assert_eq!(editor.curve().points[2], Vec3::new(4.0, 1.0, 0.0));
        assert_eq!(editor.revision(), 1);
    }

    #[test]
    fn test_insert_midpoint_and_extend() {
        let mut editor = CurveEditor::new(line());
        editor.select(Some(0));
        let index = editor.insert_after_selected();
        assert_eq!(index, 1);
        assert_eq!(editor.curve().points[1], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(editor.selected(), Some(1));

        // At the open end the last segment is extended
        editor.select(Some(3));
        let index = editor.insert_after_selected();
        assert_eq!(index, 4);
        assert_eq!(editor.curve().points[4], Vec3::new(6.0, 0.0, 0.0));
    }

    #[test]
    fn test_insert_on_closed_curve_wraps() {
        let mut editor = CurveEditor::new(Curve::closed(line().points));
        editor.select(Some(2));
        editor.insert_after_selected();
        assert_eq!(editor.curve().points[3], Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_insert_into_empty_and_single() {
        let mut editor = CurveEditor::new(Curve::new());
        assert_eq!(editor.insert_after_selected(), 0);
        assert_eq!(editor.insert_after_selected(), 1);
        assert_eq!(editor.curve().points, vec![Vec3::ZERO, Vec3::X]);
    }

    #[test]
    fn test_delete_selected() {
        let mut editor = CurveEditor::new(line());
        assert!(!editor.delete_selected());
        editor.select(Some(2));
        assert!(editor.delete_selected());
        assert_eq!(editor.curve().len(), 2);
        assert_eq!(editor.selected(), Some(1));

        editor.delete_selected();
        editor.delete_selected();
        assert!(editor.curve().is_empty());
        assert_eq!(editor.selected(), None);
    }

    #[test]
    fn test_undo_restores_curve_and_selection() {
        let mut editor = CurveEditor::new(line());
        editor.select(Some(1));
        editor.move_selected(Vec3::Z);
        editor.toggle_closed();
        editor.subdivide();
        assert_eq!(editor.selected(), None);

        assert!(editor.undo());
        assert!(editor.curve().closed);
        assert!(editor.undo());
        assert!(!editor.curve().closed);
        assert!(editor.undo());
        assert_eq!(editor.curve(), &line());
        assert_eq!(editor.selected(), Some(1));
        assert!(!editor.undo());
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_undo_history_is_bounded() {
        let mut editor = CurveEditor::new(line());
        for i in 0..(UNDO_LIMIT + 10) {
            editor.set_point(0, Vec3::splat(i as f32));
        }
        let mut undone = 0;
        while editor.undo() {
            undone += 1;
        }
        assert_eq!(undone, UNDO_LIMIT);
    }

    #[test]
    fn test_reset() {
        let mut editor = CurveEditor::new(line());
        editor.select(Some(0));
        editor.reset(Curve::closed(vec![Vec3::ONE]));
        assert_eq!(editor.curve().len(), 1);
        assert_eq!(editor.selected(), None);
        assert!(editor.undo());
        assert_eq!(editor.curve(), &line());
    }
}
