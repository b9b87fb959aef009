//! Curve text file format
//!
//! One point per line as three whitespace-separated floats. `#` starts a
//! comment that runs to the end of the line; blank and comment-only lines
//! are skipped. A comment reading `# closed` marks the curve as closed.
//!
//! ```text
//! # coaster track
//! # closed
//! 0.0 1.0 0.0
//! 4.0 2.5 -1.0   # crest
//! ```

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::curve::Curve;
use crate::error::GeometryError;
use crate::Vec3;

const CLOSED_MARKER: &str = "closed";

/// Parse curve text. An input without any points is `GeometryError::Empty`.
pub fn parse_curve(text: &str) -> Result<Curve, GeometryError> {
    let mut curve = Curve::new();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let (data, comment) = match raw.split_once('#') {
            Some((data, comment)) => (data, Some(comment)),
            None => (raw, None),
        };

        if let Some(comment) = comment {
            if data.trim().is_empty() && comment.trim().eq_ignore_ascii_case(CLOSED_MARKER) {
                curve.closed = true;
            }
        }

        let data = data.trim();
        if data.is_empty() {
            continue;
        }

        curve.points.push(parse_point(data, line_no)?);
    }

    if curve.is_empty() {
        return Err(GeometryError::Empty);
    }
    Ok(curve)
}

fn parse_point(data: &str, line_no: usize) -> Result<Vec3, GeometryError> {
    let mut coords = [0.0f32; 3];
    let mut tokens = data.split_whitespace();

    for (axis, slot) in coords.iter_mut().enumerate() {
        let token = tokens.next().ok_or_else(|| {
            GeometryError::parse(line_no, format!("expected 3 coordinates, found {}", axis))
        })?;
        *slot = token
            .parse()
            .map_err(|_| GeometryError::parse(line_no, format!("invalid number '{}'", token)))?;
    }

    if let Some(extra) = tokens.next() {
        return Err(GeometryError::parse(
            line_no,
            format!("unexpected token '{}' after 3 coordinates", extra),
        ));
    }

    Ok(Vec3::from(coords))
}

/// Render a curve in the text format
pub fn format_curve(curve: &Curve) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {} points", curve.len());
    if curve.closed {
        let _ = writeln!(out, "# {}", CLOSED_MARKER);
    }
    for p in &curve.points {
        let _ = writeln!(out, "{} {} {}", p.x, p.y, p.z);
    }
    out
}

/// Load a curve file from disk
pub fn load_curve<P: AsRef<Path>>(path: P) -> Result<Curve, GeometryError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let curve = parse_curve(&text)?;
    log::debug!(
        "Loaded curve '{}' ({} points, closed: {})",
        path.display(),
        curve.len(),
        curve.closed,
    );
    Ok(curve)
}

/// Write a curve file to disk
pub fn save_curve<P: AsRef<Path>>(path: P, curve: &Curve) -> Result<(), GeometryError> {
    let path = path.as_ref();
    fs::write(path, format_curve(curve))?;
    log::debug!("Saved curve '{}' ({} points)", path.display(), curve.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let curve = parse_curve("0 0 0\n1 2 3\n-1.5 0.25 4e1\n").unwrap();
        assert_eq!(curve.len(), 3);
        assert!(!curve.closed);
        assert_eq!(curve.points[2], Vec3::new(-1.5, 0.25, 40.0));
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let text = "# header\n\n   \n1 1 1  # trailing comment\n\t# indented comment\n2 2 2\n";
        let curve = parse_curve(text).unwrap();
        assert_eq!(curve.points, vec![Vec3::ONE, Vec3::splat(2.0)]);
    }

    #[test]
    fn test_closed_marker() {
        let curve = parse_curve("#  Closed \n0 0 0\n1 0 0\n0 0 1\n").unwrap();
        assert!(curve.closed);

        // Marker only counts on a comment-only line
        let curve = parse_curve("0 0 0 # closed\n1 0 0\n").unwrap();
        assert!(!curve.closed);
    }

    #[test]
    fn test_missing_coordinate_reports_line() {
        let err = parse_curve("0 0 0\n1 2\n").unwrap_err();
        match err {
            GeometryError::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("found 2"));
            }
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_number_and_extra_token() {
        assert!(matches!(
            parse_curve("1 x 3\n"),
            Err(GeometryError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            parse_curve("# a\n1 2 3 4\n"),
            Err(GeometryError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse_curve(""), Err(GeometryError::Empty)));
        assert!(matches!(parse_curve("# only comments\n\n"), Err(GeometryError::Empty)));
    }

    #[test]
    fn test_save_load_round_trip() {
        let curve = Curve::closed(vec![
            Vec3::new(0.0, 1.0, 2.0),
            Vec3::new(-3.5, 0.125, 7.0),
            Vec3::new(1e-3, 100.0, -0.5),
        ]);
        let path = std::env::temp_dir()
            .join(format!("coasterlab_round_trip_{}.curve", std::process::id()));

        save_curve(&path, &curve).unwrap();
        let loaded = load_curve(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, curve);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_curve("definitely/not/here.curve").unwrap_err();
        assert!(matches!(err, GeometryError::Io(_)));
    }
}
