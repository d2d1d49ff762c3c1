//! High-level OBJ loading: open, parse, deduplicate.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::mesh::IndexedMesh;
use crate::obj::indexer::index_mesh;
use crate::obj::parser::{parse_obj, parse_obj_str};
use crate::obj::types::RawMesh;

/// Errors that abort loading one document.
///
/// Malformed lines are not errors; they are skipped during parsing.
#[derive(Error, Debug)]
pub enum ObjError {
    #[error("Cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error while reading: {0}")]
    Read(#[from] std::io::Error),
}

/// Result type for loading operations.
pub type ObjResult<T> = Result<T, ObjError>;

/// Load and index an OBJ file.
///
/// # Example
///
/// ```ignore
/// use gloom_core::obj::load_obj;
///
/// let mesh = load_obj("assets/crate.obj")?;
/// println!("{} vertices, {} triangles", mesh.vertex_count(), mesh.triangle_count());
/// ```
pub fn load_obj<P: AsRef<Path>>(path: P) -> ObjResult<IndexedMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ObjError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mesh = load_obj_from_reader(BufReader::new(file))?;
    log::info!(
        "Loaded {}: {} unique vertices, {} triangles",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Load and index OBJ text from a buffered reader.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> ObjResult<IndexedMesh> {
    let raw = parse_obj(reader)?;
    Ok(index_raw(&raw))
}

/// Load and index OBJ text held in memory.
pub fn load_obj_from_str(content: &str) -> IndexedMesh {
    index_raw(&parse_obj_str(content))
}

fn index_raw(raw: &RawMesh) -> IndexedMesh {
    log::debug!(
        "Parsed {} positions, {} texcoords, {} normals, {} faces",
        raw.positions.len(),
        raw.texcoords.len(),
        raw.normals.len(),
        raw.faces.len()
    );
    index_mesh(raw)
}
