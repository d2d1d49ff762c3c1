//! Intermediate OBJ types, produced by the parser and consumed by the indexer.

use gloom_math::{Vec3, Vec4};

/// One face corner: 0-based indices into the position, texcoord and normal
/// arrays. Texcoord and normal references are optional.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FaceCorner {
    /// Position index (always present)
    pub position: u32,

    /// Texture coordinate index, `None` for `v` and `v//vn` groups
    pub texcoord: Option<u32>,

    /// Normal index, `None` for `v` and `v/vt` groups
    pub normal: Option<u32>,
}

impl FaceCorner {
    pub fn new(position: u32, texcoord: Option<u32>, normal: Option<u32>) -> Self {
        Self {
            position,
            texcoord,
            normal,
        }
    }

    /// The corner as a `(position, texcoord, normal)` triplet with `-1`
    /// marking an absent reference.
    pub fn to_sentinel_triplet(&self) -> (i64, i64, i64) {
        let slot = |index: Option<u32>| index.map_or(-1, i64::from);
        (
            i64::from(self.position),
            slot(self.texcoord),
            slot(self.normal),
        )
    }
}

/// A parsed `f` record with one to four corners.
///
/// Only triangles and quads produce geometry. Points and lines are kept so
/// the record count matches the document, but triangulate to nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceRecord {
    Point(FaceCorner),
    Line([FaceCorner; 2]),
    Triangle([FaceCorner; 3]),
    Quad([FaceCorner; 4]),
}

impl FaceRecord {
    /// Build a record from 1-4 corners. Returns `None` for any other count.
    pub fn from_corners(corners: &[FaceCorner]) -> Option<Self> {
        match *corners {
            [a] => Some(Self::Point(a)),
            [a, b] => Some(Self::Line([a, b])),
            [a, b, c] => Some(Self::Triangle([a, b, c])),
            [a, b, c, d] => Some(Self::Quad([a, b, c, d])),
            _ => None,
        }
    }

    /// The corners in face order.
    pub fn corners(&self) -> &[FaceCorner] {
        match self {
            Self::Point(c) => std::slice::from_ref(c),
            Self::Line(c) => c,
            Self::Triangle(c) => c,
            Self::Quad(c) => c,
        }
    }

    /// Triangles of this face, in face winding.
    ///
    /// A quad `A,B,C,D` is split along its `A-C` diagonal into `(A,B,C)` and
    /// `(A,C,D)`. This assumes a convex, planar quad; concave or non-planar
    /// quads are not corrected.
    pub fn triangles(&self) -> impl Iterator<Item = [FaceCorner; 3]> {
        let (first, second) = match *self {
            Self::Point(_) | Self::Line(_) => (None, None),
            Self::Triangle(tri) => (Some(tri), None),
            Self::Quad([a, b, c, d]) => (Some([a, b, c]), Some([a, c, d])),
        };
        first.into_iter().chain(second)
    }
}

/// Raw attribute arrays and face records of one OBJ document, before
/// deduplication.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawMesh {
    /// `v` records (x, y, z, w). A missing w is stored as 0.
    pub positions: Vec<Vec4>,

    /// `vt` records (u, v, w). Missing components are stored as 0.
    pub texcoords: Vec<Vec3>,

    /// `vn` records
    pub normals: Vec<Vec3>,

    /// `f` records in document order
    pub faces: Vec<FaceRecord>,
}

impl RawMesh {
    /// Number of triangles the faces will produce.
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(|f| f.triangles().count()).sum()
    }
}
