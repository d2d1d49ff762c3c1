//! Indexed mesh geometry for the gloom scene graph.
//!
//! An [`IndexedMesh`] is the deduplicated, triangle-indexed form of a loaded
//! model. It is built once at load time and never modified afterwards, so its
//! vertex and index buffers can be uploaded to the GPU a single time and
//! shared read-only between consumers.

use bytemuck::{Pod, Zeroable};
use gloom_math::{Aabb, Vec2, Vec3};
use thiserror::Error;

/// One unique mesh corner: position, texture coordinate and normal.
///
/// Equality is exact floating-point equality on every component. There is
/// no epsilon; two corners that differ in the last bit are distinct vertices.
/// Fields are private so a vertex cannot be altered after construction.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    position: [f32; 3],
    texcoord: [f32; 2],
    normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: Vec3, texcoord: Vec2, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            texcoord: texcoord.to_array(),
            normal: normal.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn texcoord(&self) -> Vec2 {
        Vec2::from_array(self.texcoord)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }

    /// All eight components in declaration order.
    pub(crate) fn components(&self) -> [f32; 8] {
        let [px, py, pz] = self.position;
        let [u, v] = self.texcoord;
        let [nx, ny, nz] = self.normal;
        [px, py, pz, u, v, nx, ny, nz]
    }
}

/// Violations of the [`IndexedMesh`] invariants.
#[derive(Error, Debug, PartialEq)]
pub enum MeshError {
    #[error("Index count {0} is not a multiple of 3")]
    NotTriangles(usize),

    #[error("Index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

/// A deduplicated vertex buffer, a triangle index buffer and the tight
/// local-space bounds of the vertices.
///
/// Invariants:
/// - every index is `< vertices.len()`
/// - `indices.len() % 3 == 0`
/// - `bounds` is the tight bound of the vertex positions, or empty when
///   there are no vertices
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexedMesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    bounds: Aabb,
}

impl IndexedMesh {
    /// Build a mesh from already-indexed buffers, checking the invariants.
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::NotTriangles(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            });
        }
        Ok(Self::from_parts(vertices, indices))
    }

    /// Trusted constructor for the indexer, which upholds the invariants
    /// by construction.
    pub(crate) fn from_parts(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        debug_assert!(indices.len() % 3 == 0);
        debug_assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));

        let bounds = Self::compute_bounds(&vertices);
        Self {
            vertices,
            indices,
            bounds,
        }
    }

    /// A mesh with no geometry. Its bounds are empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compute axis-aligned bounding box from vertex positions.
    fn compute_bounds(vertices: &[Vertex]) -> Aabb {
        Aabb::from_positions(vertices.iter().map(Vertex::position))
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Local-space bounds. Empty when the mesh has no vertices; callers must
    /// treat that as "no collidable volume".
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// True when there are no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Get the number of unique vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the mesh center (center of bounding box).
    pub fn center(&self) -> Vec3 {
        self.bounds.centroid()
    }

    /// Get the mesh size (diagonal length of bounding box), zero when empty.
    pub fn size(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        self.bounds.extent().length()
    }

    /// Iterate triangles as resolved vertex triplets.
    pub fn triangles(&self) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }

    /// Raw bytes of the vertex buffer, for a one-time GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw bytes of the index buffer (u32 indices).
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
