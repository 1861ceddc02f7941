use std::fmt;

use crate::table::TableTag;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontError {
    /// A fixed-layout record needs more bytes than remain at the cursor
    UnexpectedEof {
        needed: usize,
        available: usize,
    },
    /// An offset or index falls outside the addressable buffer
    OffsetOutOfBounds {
        offset: usize,
        buffer_len: usize,
    },
    /// The file does not begin with a recognized sfnt signature
    InvalidSignature {
        found: u32,
    },
    UnsupportedVersion {
        tag: TableTag,
        found: u32,
    },
    MalformedTable {
        tag: TableTag,
        reason: &'static str,
    },
    /// Two glyphs claim the same PostScript name, making the glyph
    /// order ambiguous
    DuplicateGlyphName {
        name: String,
    },
    ChecksumMismatch {
        tag: TableTag,
        stored: u32,
        computed: u32,
    },
    UnrecognizedVariant {
        ty: &'static str,
        found: u32,
    },
}

pub type FontResult<T> = Result<T, FontError>;

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontError::UnexpectedEof { needed, available } => {
                write!(
                    f,
                    "unexpected eof: record needs {} byte(s), {} available",
                    needed, available
                )
            }
            FontError::OffsetOutOfBounds { offset, buffer_len } => {
                write!(
                    f,
                    "offset {} out of bounds for buffer of {} byte(s)",
                    offset, buffer_len
                )
            }
            FontError::InvalidSignature { found } => {
                write!(f, "invalid sfnt signature 0x{:08X}", found)
            }
            FontError::UnsupportedVersion { tag, found } => {
                write!(f, "unsupported version 0x{:08X} for {:?} table", found, tag)
            }
            FontError::MalformedTable { tag, reason } => {
                write!(f, "malformed {:?} table: {}", tag, reason)
            }
            FontError::DuplicateGlyphName { name } => {
                write!(f, "duplicate glyph name {:?}", name)
            }
            FontError::ChecksumMismatch {
                tag,
                stored,
                computed,
            } => {
                write!(
                    f,
                    "checksum mismatch for {:?} table: stored 0x{:08X}, computed 0x{:08X}",
                    tag, stored, computed
                )
            }
            FontError::UnrecognizedVariant { ty, found } => {
                write!(f, "unrecognized {}: {}", ty, found)
            }
        }
    }
}

impl std::error::Error for FontError {}
