use crate::{
    data_types::Fixed,
    error::{FontError, FontResult},
    parse::FontParser,
    table::TableTag,
};

/// The maximum profile table.
///
/// Version 0.5 carries only the glyph count; version 1.0 adds the full
/// TrueType limits profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaximumProfileTable {
    pub version: Fixed,
    /// the number of glyphs in the font
    pub num_glyphs: u16,
    pub profile: Option<MaxpLimits>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxpLimits {
    /// points in non-compound glyph
    pub max_points: u16,
    /// contours in non-compound glyph
    pub max_contours: u16,
    /// points in compound glyph
    pub max_component_points: u16,
    /// contours in compound glyph
    pub max_component_contours: u16,
    /// set to 2
    pub max_zones: u16,
    /// points used in Twilight Zone (Z0)
    pub max_twilight_points: u16,
    /// number of Storage Area locations
    pub max_storage: u16,
    /// number of FDEFs
    pub max_function_defs: u16,
    /// number of IDEFs
    pub max_instruction_defs: u16,
    /// maximum stack depth
    pub max_stack_elements: u16,
    /// byte count for glyph instructions
    pub max_size_of_instructions: u16,
    /// number of glyphs referenced at top level
    pub max_component_elements: u16,
    /// levels of recursion, set to 0 if font has only simple glyphs
    pub max_component_depth: u16,
}

const VERSION_0_5: Fixed = Fixed::from_bits(0x0000_5000);
const VERSION_1_0: Fixed = Fixed::from_bits(0x0001_0000);

impl MaximumProfileTable {
    pub const TAG: TableTag = TableTag::new(*b"maxp");

    pub(crate) fn parse(data: &[u8]) -> FontResult<Self> {
        let mut parser = FontParser::new(data);

        let version = parser.read_fixed()?;
        let num_glyphs = parser.read_u16()?;

        let profile = if version == VERSION_0_5 {
            None
        } else if version == VERSION_1_0 {
            Some(MaxpLimits {
                max_points: parser.read_u16()?,
                max_contours: parser.read_u16()?,
                max_component_points: parser.read_u16()?,
                max_component_contours: parser.read_u16()?,
                max_zones: parser.read_u16()?,
                max_twilight_points: parser.read_u16()?,
                max_storage: parser.read_u16()?,
                max_function_defs: parser.read_u16()?,
                max_instruction_defs: parser.read_u16()?,
                max_stack_elements: parser.read_u16()?,
                max_size_of_instructions: parser.read_u16()?,
                max_component_elements: parser.read_u16()?,
                max_component_depth: parser.read_u16()?,
            })
        } else {
            return Err(FontError::UnsupportedVersion {
                tag: Self::TAG,
                found: version.to_bits() as u32,
            });
        };

        Ok(Self {
            version,
            num_glyphs,
            profile,
        })
    }
}
