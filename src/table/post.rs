use std::collections::HashMap;

use crate::{
    data_types::{Fixed, FWord},
    error::{FontError, FontResult},
    parse::FontParser,
    table::{mac_glyphs, TableTag},
};

pub const VERSION_1_0: Fixed = Fixed::from_bits(0x0001_0000);
pub const VERSION_2_0: Fixed = Fixed::from_bits(0x0002_0000);
pub const VERSION_2_5: Fixed = Fixed::from_bits(0x0002_5000);
pub const VERSION_3_0: Fixed = Fixed::from_bits(0x0003_0000);
pub const VERSION_4_0: Fixed = Fixed::from_bits(0x0004_0000);

/// The interpreter memory requirements the table advertises for Type 42 and
/// Type 1 downloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryHints {
    pub min_type42: u32,
    pub max_type42: u32,
    pub min_type1: u32,
    pub max_type1: u32,
}

/// The PostScript table.
///
/// Versions 2.0 and 2.5 carry an explicit glyph-name mapping; versions 1.0,
/// 3.0, and 4.0 fall back to the standard Macintosh glyph ordering for name
/// lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostScriptTable {
    pub version: Fixed,
    pub italic_angle: Fixed,
    pub underline_position: FWord,
    pub underline_thickness: FWord,
    pub is_fixed_pitch: bool,
    pub memory_hints: MemoryHints,
    glyph_names: Option<GlyphNameMap>,
}

/// Bidirectional glyph-index/glyph-name mapping for versions 2.0 and 2.5.
///
/// Duplicate names are rejected at construction: a name claimed by two
/// glyphs makes the glyph order ambiguous, and silently picking either
/// candidate would corrupt later name lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GlyphNameMap {
    name_by_index: HashMap<u16, String>,
    index_by_name: HashMap<String, u16>,
}

impl GlyphNameMap {
    fn new(pairs: Vec<(u16, String)>) -> FontResult<Self> {
        let mut name_by_index = HashMap::with_capacity(pairs.len());
        let mut index_by_name = HashMap::with_capacity(pairs.len());

        for (index, name) in pairs {
            if index_by_name.contains_key(&name) {
                return Err(FontError::DuplicateGlyphName { name });
            }

            index_by_name.insert(name.clone(), index);
            name_by_index.insert(index, name);
        }

        Ok(Self {
            name_by_index,
            index_by_name,
        })
    }
}

impl PostScriptTable {
    pub const TAG: TableTag = TableTag::new(*b"post");

    pub fn new(
        version: Fixed,
        italic_angle: Fixed,
        underline_position: FWord,
        underline_thickness: FWord,
        is_fixed_pitch: bool,
        memory_hints: MemoryHints,
        glyph_names: Option<Vec<(u16, String)>>,
    ) -> FontResult<Self> {
        let has_name_mapping = version == VERSION_2_0 || version == VERSION_2_5;

        if !has_name_mapping
            && version != VERSION_1_0
            && version != VERSION_3_0
            && version != VERSION_4_0
        {
            return Err(FontError::UnsupportedVersion {
                tag: Self::TAG,
                found: version.to_bits() as u32,
            });
        }

        let glyph_names = match (has_name_mapping, glyph_names) {
            (true, Some(pairs)) => Some(GlyphNameMap::new(pairs)?),
            (false, None) => None,
            (true, None) => {
                return Err(FontError::MalformedTable {
                    tag: Self::TAG,
                    reason: "version requires a glyph name mapping",
                })
            }
            (false, Some(_)) => {
                return Err(FontError::MalformedTable {
                    tag: Self::TAG,
                    reason: "version does not carry a glyph name mapping",
                })
            }
        };

        Ok(Self {
            version,
            italic_angle,
            underline_position,
            underline_thickness,
            is_fixed_pitch,
            memory_hints,
            glyph_names,
        })
    }

    pub(crate) fn parse(data: &[u8]) -> FontResult<Self> {
        let mut parser = FontParser::new(data);
        parser.expect_record(32)?;

        let version = parser.read_fixed()?;
        let italic_angle = parser.read_fixed()?;
        let underline_position = parser.read_fword()?;
        let underline_thickness = parser.read_fword()?;
        let is_fixed_pitch = parser.read_u32()? != 0;
        let memory_hints = MemoryHints {
            min_type42: parser.read_u32()?,
            max_type42: parser.read_u32()?,
            min_type1: parser.read_u32()?,
            max_type1: parser.read_u32()?,
        };

        let glyph_names = if version == VERSION_2_0 {
            Some(Self::parse_name_pairs(&mut parser)?)
        } else if version == VERSION_2_5 {
            Some(Self::parse_name_offsets(&mut parser)?)
        } else {
            None
        };

        Self::new(
            version,
            italic_angle,
            underline_position,
            underline_thickness,
            is_fixed_pitch,
            memory_hints,
            glyph_names,
        )
    }

    /// Version 2.0: per-glyph indices into the standard ordering, with
    /// indices of 258 and above selecting Pascal strings appended after the
    /// index array
    fn parse_name_pairs(parser: &mut FontParser) -> FontResult<Vec<(u16, String)>> {
        let num_glyphs = parser.read_u16()?;

        let mut indices = Vec::with_capacity(usize::from(num_glyphs));
        for _ in 0..num_glyphs {
            indices.push(parser.read_u16()?);
        }

        let mut custom_names = Vec::new();
        while parser.available() > 0 {
            let length = parser.read_u8()?;
            let bytes = parser.get_byte_range(usize::from(length))?;

            custom_names.push(String::from_utf8_lossy(bytes).into_owned());
        }

        let mut pairs = Vec::with_capacity(indices.len());
        for (glyph, index) in indices.into_iter().enumerate() {
            let name = if usize::from(index) < mac_glyphs::MACINTOSH_GLYPH_ORDER.len() {
                mac_glyphs::MACINTOSH_GLYPH_ORDER[usize::from(index)].to_owned()
            } else {
                custom_names
                    .get(usize::from(index) - mac_glyphs::MACINTOSH_GLYPH_ORDER.len())
                    .cloned()
                    .ok_or(FontError::MalformedTable {
                        tag: Self::TAG,
                        reason: "glyph name index past the string data",
                    })?
            };

            pairs.push((glyph as u16, name));
        }

        Ok(pairs)
    }

    /// Version 2.5: per-glyph signed deltas re-ordering the standard list
    fn parse_name_offsets(parser: &mut FontParser) -> FontResult<Vec<(u16, String)>> {
        let num_glyphs = parser.read_u16()?;

        let mut pairs = Vec::with_capacity(usize::from(num_glyphs));
        for glyph in 0..num_glyphs {
            let delta = parser.read_u8()? as i8;
            let index = i32::from(glyph) + i32::from(delta);

            let name = usize::try_from(index)
                .ok()
                .and_then(|index| mac_glyphs::MACINTOSH_GLYPH_ORDER.get(index))
                .ok_or(FontError::MalformedTable {
                    tag: Self::TAG,
                    reason: "glyph name delta leaves the standard ordering",
                })?;

            pairs.push((glyph, (*name).to_owned()));
        }

        Ok(pairs)
    }

    /// Whether this version carries its own glyph-name mapping
    pub fn has_glyph_names(&self) -> bool {
        self.glyph_names.is_some()
    }

    /// Resolves a PostScript glyph name to a glyph identifier.
    ///
    /// Versions with their own mapping consult only that mapping; the
    /// versions without one resolve the name to its position in the standard
    /// Macintosh ordering. An unknown name is `None`, never an error.
    pub fn glyph_by_name(&self, name: &str) -> Option<u16> {
        match &self.glyph_names {
            Some(map) => map.index_by_name.get(name).copied(),
            None => mac_glyphs::standard_glyph_position(name),
        }
    }

    /// The name of a glyph, when this version knows one
    pub fn glyph_name(&self, glyph_id: u16) -> Option<&str> {
        match &self.glyph_names {
            Some(map) => map.name_by_index.get(&glyph_id).map(String::as_str),
            None if self.version == VERSION_1_0 => mac_glyphs::MACINTOSH_GLYPH_ORDER
                .get(usize::from(glyph_id))
                .copied(),
            None => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn plain_table(version: Fixed, names: Option<Vec<(u16, String)>>) -> FontResult<PostScriptTable> {
        PostScriptTable::new(
            version,
            Fixed::ZERO,
            FWord(-100),
            FWord(50),
            false,
            MemoryHints::default(),
            names,
        )
    }

    fn pairs(names: &[&str]) -> Vec<(u16, String)> {
        names
            .iter()
            .enumerate()
            .map(|(glyph, name)| (glyph as u16, (*name).to_owned()))
            .collect()
    }

    #[test]
    fn duplicate_names_fail_at_construction() {
        let result = plain_table(VERSION_2_0, Some(pairs(&[".notdef", "alpha", "alpha"])));

        assert_eq!(
            result,
            Err(FontError::DuplicateGlyphName {
                name: "alpha".to_owned(),
            })
        );
    }

    #[test]
    fn override_mapping_shadows_the_standard_list() {
        let table = plain_table(VERSION_2_0, Some(pairs(&[".notdef", "alpha", "beta"]))).unwrap();

        assert_eq!(table.glyph_by_name("beta"), Some(2));
        assert_eq!(table.glyph_by_name(".notdef"), Some(0));
        // present in the standard ordering, absent from the override
        assert_eq!(table.glyph_by_name("space"), None);
        assert_eq!(table.glyph_by_name("A"), None);
    }

    #[test]
    fn standard_versions_use_list_positions() {
        for version in [VERSION_1_0, VERSION_3_0, VERSION_4_0] {
            let table = plain_table(version, None).unwrap();

            assert_eq!(table.glyph_by_name(".notdef"), Some(0));
            assert_eq!(table.glyph_by_name("space"), Some(3));
            assert_eq!(table.glyph_by_name("A"), Some(36));
            assert_eq!(table.glyph_by_name("no-such-glyph"), None);
        }
    }

    #[test]
    fn rejects_versions_outside_the_legacy_set() {
        let result = plain_table(Fixed::from_bits(0x0002_8000), None);

        assert!(matches!(
            result,
            Err(FontError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn mapping_presence_must_match_version() {
        assert!(matches!(
            plain_table(VERSION_2_0, None),
            Err(FontError::MalformedTable { .. })
        ));
        assert!(matches!(
            plain_table(VERSION_3_0, Some(pairs(&[".notdef"]))),
            Err(FontError::MalformedTable { .. })
        ));
    }

    fn version_2_bytes() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend([0x00, 0x02, 0x00, 0x00]); // version 2.0
        data.extend([0xFF, 0xF8, 0x00, 0x00]); // italic angle -8.0
        data.extend([0xFF, 0x9C]); // underline position -100
        data.extend([0x00, 0x32]); // underline thickness 50
        data.extend([0x00, 0x00, 0x00, 0x01]); // fixed pitch
        data.extend([0x00; 16]); // memory hints
        data.extend([0x00, 0x03]); // num glyphs
        data.extend([0x00, 0x00]); // glyph 0: .notdef
        data.extend([0x01, 0x03]); // glyph 1: custom name 1
        data.extend([0x01, 0x02]); // glyph 2: custom name 0
        data.extend([2, b'h', b'i']); // custom name 0
        data.extend([4, b'f', b'i', b'v', b'e']); // custom name 1
        data
    }

    #[test]
    fn parses_version_2_pascal_strings() {
        let table = PostScriptTable::parse(&version_2_bytes()).unwrap();

        assert_eq!(table.version, VERSION_2_0);
        assert_eq!(table.italic_angle, Fixed::from_bits(-0x0008_0000));
        assert!(table.is_fixed_pitch);
        assert!(table.has_glyph_names());
        assert_eq!(table.glyph_by_name(".notdef"), Some(0));
        assert_eq!(table.glyph_by_name("five"), Some(1));
        assert_eq!(table.glyph_by_name("hi"), Some(2));
        assert_eq!(table.glyph_name(1), Some("five"));
    }

    #[test]
    fn version_2_index_past_string_data_is_malformed() {
        let mut data = version_2_bytes();
        // glyph 1 now references custom name 2, which does not exist
        data[37] = 0x04;

        assert!(matches!(
            PostScriptTable::parse(&data),
            Err(FontError::MalformedTable { .. })
        ));
    }

    #[test]
    fn parses_version_2_5_deltas() {
        let mut data = Vec::new();
        data.extend([0x00, 0x02, 0x50, 0x00]); // version 2.5
        data.extend([0x00; 28]); // angle, underline, pitch, memory hints
        data.extend([0x00, 0x03]); // num glyphs
        data.extend([0x00]); // glyph 0 -> .notdef
        data.extend([0x02]); // glyph 1 -> space
        data.extend([0xFF]); // glyph 2 -> .null

        let table = PostScriptTable::parse(&data).unwrap();

        assert_eq!(table.glyph_by_name(".notdef"), Some(0));
        assert_eq!(table.glyph_by_name("space"), Some(1));
        assert_eq!(table.glyph_by_name(".null"), Some(2));
    }

    #[test]
    fn truncated_header_is_precondition_failure() {
        let data = [0x00, 0x03, 0x00, 0x00, 0x00, 0x00];

        assert_eq!(
            PostScriptTable::parse(&data),
            Err(FontError::UnexpectedEof {
                needed: 32,
                available: 6,
            })
        );
    }
}
