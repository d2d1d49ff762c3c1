//! Vertex deduplication: `RawMesh` -> `IndexedMesh`.
//!
//! Every triangle corner is resolved to a full [`Vertex`] and looked up in a
//! hash map keyed on its exact component values. Reused corners share an
//! index; new ones are appended. The output vertex order is first-reference
//! order, which callers must not depend on.

use std::collections::HashMap;

use gloom_math::{Vec2, Vec3};

use super::types::{FaceCorner, RawMesh};
use crate::mesh::{IndexedMesh, Vertex};

/// Hash key with the same equality as `f32 ==` on all eight components.
///
/// Only valid for NaN-free vertices; bit equality would merge NaNs that
/// `==` keeps apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct VertexKey([u32; 8]);

impl From<&Vertex> for VertexKey {
    fn from(vertex: &Vertex) -> Self {
        // Adding +0.0 folds -0.0 into +0.0, which compare equal as floats
        Self(vertex.components().map(|c| (c + 0.0).to_bits()))
    }
}

/// Resolve one corner against the raw arrays.
///
/// Absent texcoord/normal references resolve to zero. Returns `None` when a
/// present index is out of range.
fn resolve_corner(raw: &RawMesh, corner: &FaceCorner) -> Option<Vertex> {
    let position = raw.positions.get(corner.position as usize)?.truncate();

    let texcoord = match corner.texcoord {
        Some(i) => raw.texcoords.get(i as usize)?.truncate(),
        None => Vec2::ZERO,
    };

    let normal = match corner.normal {
        Some(i) => *raw.normals.get(i as usize)?,
        None => Vec3::ZERO,
    };

    Some(Vertex::new(position, texcoord, normal))
}

/// Build a deduplicated indexed mesh from raw OBJ data.
///
/// Triangles with an out-of-range index are dropped whole so the index
/// buffer stays a multiple of three.
pub fn index_mesh(raw: &RawMesh) -> IndexedMesh {
    let mut lookup: HashMap<VertexKey, u32> = HashMap::new();
    let mut vertices: Vec<Vertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::with_capacity(raw.triangle_count() * 3);
    let mut dropped = 0usize;

    for face in &raw.faces {
        for triangle in face.triangles() {
            let resolved = [
                resolve_corner(raw, &triangle[0]),
                resolve_corner(raw, &triangle[1]),
                resolve_corner(raw, &triangle[2]),
            ];
            let [Some(a), Some(b), Some(c)] = resolved else {
                dropped += 1;
                continue;
            };

            for vertex in [a, b, c] {
                let index = if vertex.components().iter().any(|c| c.is_nan()) {
                    // NaN never equals itself, so such a corner is always new
                    vertices.push(vertex);
                    (vertices.len() - 1) as u32
                } else {
                    *lookup.entry(VertexKey::from(&vertex)).or_insert_with(|| {
                        vertices.push(vertex);
                        (vertices.len() - 1) as u32
                    })
                };
                indices.push(index);
            }
        }
    }

    if dropped > 0 {
        log::warn!("Dropped {} triangles with out-of-range indices", dropped);
    }

    IndexedMesh::from_parts(vertices, indices)
}
