//! Wavefront OBJ reader.
//!
//! Reads the subset of the format produced by scan pipelines: `v` records
//! for positions and `f` records for faces. Faces may use the `v`, `v/vt`,
//! `v//vn`, and `v/vt/vn` index forms; polygons with more than three
//! vertices are fan-triangulated. Texture coordinates, normals, groups,
//! and material statements are skipped.

use std::fs;
use std::path::Path;

use crate::error::MeshError;
use crate::TriangleMesh;

/// Load an OBJ file from disk.
pub fn load_obj(path: impl AsRef<Path>) -> Result<TriangleMesh, MeshError> {
    let text = fs::read_to_string(path)?;
    parse_obj(&text)
}

/// Parse OBJ text into a triangle mesh.
pub fn parse_obj(text: &str) -> Result<TriangleMesh, MeshError> {
    let mut mesh = TriangleMesh::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        match fields.next() {
            Some("v") => {
                let mut coords = [0.0f32; 3];
                for coord in &mut coords {
                    let field = fields
                        .next()
                        .ok_or_else(|| MeshError::parse(line_no, "vertex needs 3 coordinates"))?;
                    *coord = field.parse().map_err(|_| {
                        MeshError::parse(line_no, format!("bad coordinate `{}`", field))
                    })?;
                }
                // A fourth (w) coordinate is legal; ignore it.
                mesh.vertices.extend_from_slice(&coords);
            }
            Some("f") => {
                let mut face = Vec::with_capacity(4);
                for field in fields {
                    face.push(parse_face_index(field, line_no, mesh.num_vertices())?);
                }
                if face.len() < 3 {
                    return Err(MeshError::parse(line_no, "face needs at least 3 vertices"));
                }
                for i in 1..face.len() - 1 {
                    mesh.indices.push(face[0]);
                    mesh.indices.push(face[i]);
                    mesh.indices.push(face[i + 1]);
                }
            }
            // vt/vn/g/o/s/usemtl/mtllib and anything else are skipped.
            _ => {}
        }
    }

    if mesh.indices.is_empty() {
        return Err(MeshError::Empty);
    }
    Ok(mesh)
}

/// Parse one face field (`7`, `7/1`, `7//3`, `7/1/3`, or `-1`) into a
/// zero-based vertex index.
fn parse_face_index(field: &str, line: usize, count: usize) -> Result<u32, MeshError> {
    let vertex_part = field.split('/').next().unwrap_or(field);
    let index: i64 = vertex_part
        .parse()
        .map_err(|_| MeshError::parse(line, format!("bad face index `{}`", field)))?;

    // OBJ indices are 1-based; negative indices count back from the end.
    let resolved = if index > 0 {
        index - 1
    } else if index < 0 {
        count as i64 + index
    } else {
        return Err(MeshError::parse(line, "face index 0 is not valid"));
    };

    if resolved < 0 || resolved as usize >= count {
        return Err(MeshError::IndexOutOfRange { line, index, count });
    }
    Ok(resolved as u32)
}
