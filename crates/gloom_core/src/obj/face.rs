//! Face record parsing.
//!
//! A face line remainder holds up to four whitespace-separated index groups.
//! Each group is tried against four layouts in precedence order:
//!
//! 1. `v/vt/vn`
//! 2. `v//vn`
//! 3. `v/vt`
//! 4. `v`
//!
//! The first layout that matches wins, and the cursor advances past exactly
//! the bytes it consumed so the next group is read from the right offset.
//! Indices are 1-based in the document and converted to 0-based here.

use thiserror::Error;

use super::types::{FaceCorner, FaceRecord};

/// Maximum number of corners read from one face record.
pub const MAX_FACE_CORNERS: usize = 4;

/// Recoverable face parse failures. The record is skipped.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FaceError {
    #[error("Face record has no index groups")]
    Empty,

    #[error("Group {group} matches no index layout: {text:?}")]
    Malformed { group: usize, text: String },

    #[error("Group {group} uses index 0; indices are 1-based")]
    ZeroIndex { group: usize },
}

/// Result type for face parsing.
pub type FaceResult<T> = Result<T, FaceError>;

/// Byte cursor over one face line.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.bytes.get(self.pos).is_some_and(u8::is_ascii_whitespace) {
            self.pos += 1;
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// True when the cursor sits on a group boundary.
    fn at_boundary(&self) -> bool {
        self.bytes
            .get(self.pos)
            .map_or(true, u8::is_ascii_whitespace)
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.bytes.get(self.pos) == Some(&byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Read an unsigned decimal integer. Leaves the cursor untouched on failure.
    fn read_index(&mut self) -> Option<u32> {
        let start = self.pos;
        let mut value: u32 = 0;
        while let Some(&b) = self.bytes.get(self.pos) {
            if !b.is_ascii_digit() {
                break;
            }
            value = match value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u32::from(b - b'0')))
            {
                Some(v) => v,
                None => {
                    self.pos = start;
                    return None;
                }
            };
            self.pos += 1;
        }
        (self.pos > start).then_some(value)
    }

    fn remainder(&self) -> String {
        let rest = &self.bytes[self.pos..];
        let end = rest
            .iter()
            .position(u8::is_ascii_whitespace)
            .unwrap_or(rest.len());
        String::from_utf8_lossy(&rest[..end]).into_owned()
    }
}

/// 1-based indices of one group as they appear in the document.
type GroupIndices = (u32, Option<u32>, Option<u32>);

/// `v/vt/vn`
fn scan_full(c: &mut Cursor) -> Option<GroupIndices> {
    let v = c.read_index()?;
    if !c.eat(b'/') {
        return None;
    }
    let vt = c.read_index()?;
    if !c.eat(b'/') {
        return None;
    }
    let vn = c.read_index()?;
    Some((v, Some(vt), Some(vn)))
}

/// `v//vn`
fn scan_position_normal(c: &mut Cursor) -> Option<GroupIndices> {
    let v = c.read_index()?;
    if !(c.eat(b'/') && c.eat(b'/')) {
        return None;
    }
    let vn = c.read_index()?;
    Some((v, None, Some(vn)))
}

/// `v/vt`
fn scan_position_texcoord(c: &mut Cursor) -> Option<GroupIndices> {
    let v = c.read_index()?;
    if !c.eat(b'/') {
        return None;
    }
    let vt = c.read_index()?;
    Some((v, Some(vt), None))
}

/// `v`
fn scan_position(c: &mut Cursor) -> Option<GroupIndices> {
    c.read_index().map(|v| (v, None, None))
}

const LAYOUTS: [fn(&mut Cursor) -> Option<GroupIndices>; 4] = [
    scan_full,
    scan_position_normal,
    scan_position_texcoord,
    scan_position,
];

/// Parse one group at the cursor, trying each layout from the group start.
fn parse_group(cursor: &mut Cursor, group: usize) -> FaceResult<FaceCorner> {
    let start = cursor.pos;

    for layout in LAYOUTS {
        cursor.pos = start;
        if let Some((v, vt, vn)) = layout(cursor) {
            if !cursor.at_boundary() {
                // Layout matched a prefix only, e.g. "1/2/x"
                continue;
            }
            return to_corner(v, vt, vn, group);
        }
    }

    cursor.pos = start;
    Err(FaceError::Malformed {
        group,
        text: cursor.remainder(),
    })
}

fn to_corner(v: u32, vt: Option<u32>, vn: Option<u32>, group: usize) -> FaceResult<FaceCorner> {
    let zero_based = |i: u32| i.checked_sub(1).ok_or(FaceError::ZeroIndex { group });
    Ok(FaceCorner::new(
        zero_based(v)?,
        vt.map(zero_based).transpose()?,
        vn.map(zero_based).transpose()?,
    ))
}

/// Parse the remainder of an `f` line into a face record.
///
/// Groups past the fourth are not read.
pub fn parse_face(text: &str) -> FaceResult<FaceRecord> {
    let mut cursor = Cursor::new(text);
    let mut corners = Vec::with_capacity(MAX_FACE_CORNERS);

    while corners.len() < MAX_FACE_CORNERS {
        cursor.skip_whitespace();
        if cursor.at_end() {
            break;
        }
        corners.push(parse_group(&mut cursor, corners.len())?);
    }

    cursor.skip_whitespace();
    if !cursor.at_end() {
        log::debug!("Face record has more than {} groups, extra groups ignored", MAX_FACE_CORNERS);
    }

    FaceRecord::from_corners(&corners).ok_or(FaceError::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(text: &str) -> FaceCorner {
        match parse_face(text).unwrap() {
            FaceRecord::Point(c) => c,
            other => panic!("expected a single corner, got {:?}", other),
        }
    }

    #[test]
    fn test_full_group() {
        assert_eq!(single("1/2/3").to_sentinel_triplet(), (0, 1, 2));
    }

    #[test]
    fn test_position_normal_group() {
        assert_eq!(single("1//3").to_sentinel_triplet(), (0, -1, 2));
    }

    #[test]
    fn test_position_texcoord_group() {
        assert_eq!(single("1/2").to_sentinel_triplet(), (0, 1, -1));
    }

    #[test]
    fn test_bare_group() {
        assert_eq!(single("1").to_sentinel_triplet(), (0, -1, -1));
    }

    #[test]
    fn test_triangle_mixed_layouts() {
        let face = parse_face(" 1/1/1   2//2 3/3 ").unwrap();
        assert_eq!(
            face,
            FaceRecord::Triangle([
                FaceCorner::new(0, Some(0), Some(0)),
                FaceCorner::new(1, None, Some(1)),
                FaceCorner::new(2, Some(2), None),
            ])
        );
    }

    #[test]
    fn test_quad() {
        let face = parse_face("4 3 2 1").unwrap();
        let positions: Vec<u32> = face.corners().iter().map(|c| c.position).collect();

        assert!(matches!(face, FaceRecord::Quad(_)));
        assert_eq!(positions, vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_extra_groups_ignored() {
        let face = parse_face("1 2 3 4 5 6").unwrap();
        assert_eq!(face.corners().len(), 4);
    }

    #[test]
    fn test_malformed_group() {
        assert_eq!(
            parse_face("1 x 3"),
            Err(FaceError::Malformed {
                group: 1,
                text: "x".to_string()
            })
        );
    }

    #[test]
    fn test_partial_match_is_malformed() {
        assert!(matches!(parse_face("1/2/x 2 3"), Err(FaceError::Malformed { group: 0, .. })));
        assert!(matches!(parse_face("1 2 3/"), Err(FaceError::Malformed { group: 2, .. })));
    }

    #[test]
    fn test_negative_index_rejected() {
        assert!(matches!(parse_face("-1 -2 -3"), Err(FaceError::Malformed { .. })));
    }

    #[test]
    fn test_zero_index_rejected() {
        assert_eq!(parse_face("1 0 2"), Err(FaceError::ZeroIndex { group: 1 }));
        assert_eq!(parse_face("1//0"), Err(FaceError::ZeroIndex { group: 0 }));
    }

    #[test]
    fn test_empty_record() {
        assert_eq!(parse_face(""), Err(FaceError::Empty));
        assert_eq!(parse_face("   \t"), Err(FaceError::Empty));
    }

    #[test]
    fn test_overflowing_index_rejected() {
        assert!(matches!(parse_face("99999999999"), Err(FaceError::Malformed { .. })));
    }
}
