//! Read-only access to the metadata tables of OpenType/TrueType fonts.
//!
//! Opening a byte buffer with [`FontFile::new`] parses only the table
//! directory; the tables a caller actually needs (`head`, `cmap`, `post`,
//! `name`, `hhea`, `hmtx`, `maxp`) are parsed on first access and cached.

mod data_types;
mod embedding;
mod encoding;
mod error;
mod font_file;
mod parse;
mod records;
pub mod table;

pub use data_types::{FWord, Fixed, LongDateTime};
pub use embedding::FontProgram;
pub use encoding::{
    decode_string, encoding_for, EncodingMapRecord, PlatformId, TextEncoding, ENCODING_MAP,
};
pub use error::{FontError, FontResult};
pub use font_file::FontFile;
pub use records::RecordList;
