//! Minimal Wavefront OBJ reader
//!
//! Only vertex positions are read: lines whose first token is exactly `v`.
//! Normals, texture coordinates, faces, groups and everything else are ignored.

use std::fs;
use std::path::Path;

use crate::curve::Curve;
use crate::error::GeometryError;
use crate::Vec3;

/// Parse the `v x y z [w]` lines of an OBJ document
pub fn parse_obj_vertices(text: &str) -> Result<Vec<Vec3>, GeometryError> {
    let mut vertices = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("v") {
            continue;
        }

        let mut coords = [0.0f32; 3];
        for slot in coords.iter_mut() {
            let token = tokens
                .next()
                .ok_or_else(|| GeometryError::parse(index + 1, "vertex needs 3 coordinates"))?;
            *slot = token.parse().map_err(|_| {
                GeometryError::parse(index + 1, format!("invalid vertex coordinate '{}'", token))
            })?;
        }
        vertices.push(Vec3::from(coords));
    }

    Ok(vertices)
}

/// Read the vertex positions of an OBJ file
pub fn load_obj_vertices<P: AsRef<Path>>(path: P) -> Result<Vec<Vec3>, GeometryError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let vertices = parse_obj_vertices(&text)?;
    log::debug!("Read {} vertices from '{}'", vertices.len(), path.display());
    Ok(vertices)
}

/// Use the vertices of an OBJ file, in order, as curve control points
pub fn load_obj_curve<P: AsRef<Path>>(path: P, closed: bool) -> Result<Curve, GeometryError> {
    let points = load_obj_vertices(path)?;
    if points.is_empty() {
        return Err(GeometryError::Empty);
    }
    Ok(Curve { points, closed })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUBE_FRAGMENT: &str = "\
# exported
o Cube
v 1.0 1.0 -1.0
v 1.0 -1.0 -1.0 1.0
vn 0.0 1.0 0.0
vt 0.5 0.5
f 1/1/1 2/1/1 1/1/1
s off
v -1 2 3
";

    #[test]
    fn test_reads_only_vertex_lines() {
        let vertices = parse_obj_vertices(CUBE_FRAGMENT).unwrap();
        assert_eq!(
            vertices,
            vec![
                Vec3::new(1.0, 1.0, -1.0),
                Vec3::new(1.0, -1.0, -1.0),
                Vec3::new(-1.0, 2.0, 3.0),
            ]
        );
    }

    #[test]
    fn test_vertex_with_bad_coordinate() {
        let err = parse_obj_vertices("v 1 2\n").unwrap_err();
        assert!(matches!(err, GeometryError::Parse { line: 1, .. }));

        let err = parse_obj_vertices("o x\nv 1 nope 2\n").unwrap_err();
        assert!(matches!(err, GeometryError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_no_vertices_is_ok_but_empty() {
        assert!(parse_obj_vertices("vn 0 1 0\nf 1 2 3\n").unwrap().is_empty());
    }

    #[test]
    fn test_load_obj_curve() {
        let path = std::env::temp_dir().join(format!("coasterlab_obj_{}.obj", std::process::id()));
        std::fs::write(&path, CUBE_FRAGMENT).unwrap();
        let curve = load_obj_curve(&path, true).unwrap();
        let _ = std::fs::remove_file(&path);

        assert!(curve.closed);
        assert_eq!(curve.len(), 3);
    }
}
