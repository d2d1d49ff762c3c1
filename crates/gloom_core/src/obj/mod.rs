//! Wavefront OBJ support for gloom.
//!
//! This module reads the geometric subset of OBJ text files and converts it
//! to a deduplicated [`IndexedMesh`](crate::mesh::IndexedMesh).
//!
//! ## Supported Records
//!
//! - `v`, `vt`, `vn` attribute records
//! - `f` faces with 1-4 groups in `v`, `v/vt`, `v//vn` or `v/vt/vn` form;
//!   quads are split into two triangles
//!
//! ## Not Supported
//!
//! - Materials (`mtllib`, `usemtl`)
//! - Groups, objects and smoothing groups
//! - Negative (relative) indices
//! - Faces with more than four corners (extra corners are ignored)
//!
//! # Example
//!
//! ```ignore
//! use gloom_core::obj::{parse_obj_str, index_mesh};
//!
//! let raw = parse_obj_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
//! let mesh = index_mesh(&raw);
//! assert_eq!(mesh.triangle_count(), 1);
//! ```

mod face;
mod indexer;
mod loader;
mod parser;
mod types;

pub use face::*;
pub use indexer::*;
pub use loader::*;
pub use parser::*;
pub use types::*;
