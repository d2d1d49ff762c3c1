//! Line-oriented OBJ reader producing a [`RawMesh`].
//!
//! # Supported Records
//!
//! - `v x y z [w]` - position, w defaults to 0
//! - `vt u [v] [w]` - texture coordinate, missing components default to 0
//! - `vn x y z` - normal
//! - `f g1 [g2 [g3 [g4]]]` - face, see [`parse_face`]
//!
//! Every other leading token, comments included, is ignored. A malformed
//! line is logged and skipped; it never disturbs data parsed before it.

use std::io::BufRead;

use gloom_math::{Vec3, Vec4};
use thiserror::Error;

use super::face::{parse_face, FaceError};
use super::types::RawMesh;

/// Reasons a single line is skipped.
#[derive(Error, Debug, PartialEq)]
pub enum LineError {
    #[error("Expected at least {expected} numbers, found {found}")]
    MissingComponents { expected: usize, found: usize },

    #[error("Invalid number format: {0}")]
    InvalidNumber(String),

    #[error("Bad face record: {0}")]
    Face(#[from] FaceError),
}

/// Accumulates records line by line.
#[derive(Debug, Default)]
pub struct ObjParser {
    mesh: RawMesh,
    skipped_lines: usize,
}

impl ObjParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line. `line_number` is 1-based and only used for logging.
    pub fn parse_line(&mut self, line_number: usize, line: &str) {
        if let Err(err) = self.try_parse_line(line) {
            self.skipped_lines += 1;
            log::debug!("Skipping OBJ line {}: {} ({:?})", line_number, err, line.trim());
        }
    }

    fn try_parse_line(&mut self, line: &str) -> Result<(), LineError> {
        let trimmed = line.trim();
        let (token, rest) = match trimmed.split_once(|c: char| c.is_ascii_whitespace()) {
            Some((token, rest)) => (token, rest),
            None => (trimmed, ""),
        };

        match token {
            "v" => {
                let [x, y, z, w] = parse_floats::<4>(rest, 3)?;
                self.mesh.positions.push(Vec4::new(x, y, z, w));
            }
            "vt" => {
                let [u, v, w] = parse_floats::<3>(rest, 1)?;
                self.mesh.texcoords.push(Vec3::new(u, v, w));
            }
            "vn" => {
                let [x, y, z] = parse_floats::<3>(rest, 3)?;
                self.mesh.normals.push(Vec3::new(x, y, z));
            }
            "f" => {
                let face = parse_face(rest)?;
                self.mesh.faces.push(face);
            }
            _ => {}
        }
        Ok(())
    }

    /// Number of recognised lines that were skipped as malformed.
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    pub fn finish(self) -> RawMesh {
        self.mesh
    }
}

/// Parse up to `N` whitespace-separated floats, requiring at least `required`.
/// Missing trailing components are 0; anything past `N` is ignored.
fn parse_floats<const N: usize>(text: &str, required: usize) -> Result<[f32; N], LineError> {
    let mut values = [0.0; N];
    let mut found = 0;

    for (slot, token) in values.iter_mut().zip(text.split_ascii_whitespace()) {
        *slot = token
            .parse()
            .map_err(|_| LineError::InvalidNumber(token.to_string()))?;
        found += 1;
    }

    if found < required {
        return Err(LineError::MissingComponents {
            expected: required,
            found,
        });
    }
    Ok(values)
}

/// Parse OBJ text from any buffered reader.
///
/// Only I/O failures are errors. Lines that are not valid UTF-8 are decoded
/// lossily rather than aborting the load.
pub fn parse_obj<R: BufRead>(reader: R) -> std::io::Result<RawMesh> {
    let mut parser = ObjParser::new();

    for (i, line) in reader.split(b'\n').enumerate() {
        let line = line?;
        parser.parse_line(i + 1, &String::from_utf8_lossy(&line));
    }

    log_skipped(&parser);
    Ok(parser.finish())
}

/// Parse OBJ text held in memory.
pub fn parse_obj_str(content: &str) -> RawMesh {
    let mut parser = ObjParser::new();

    for (i, line) in content.lines().enumerate() {
        parser.parse_line(i + 1, line);
    }

    log_skipped(&parser);
    parser.finish()
}

fn log_skipped(parser: &ObjParser) {
    if parser.skipped_lines() > 0 {
        log::warn!("Skipped {} malformed OBJ lines", parser.skipped_lines());
    }
}
