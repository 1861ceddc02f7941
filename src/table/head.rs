use crate::{
    data_types::{Fixed, FWord, LongDateTime},
    error::{FontError, FontResult},
    parse::FontParser,
    table::TableTag,
};

/// The font header table
///
/// Every field is set once at construction from the table's fixed 54-byte
/// layout and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderTable {
    pub version_major: u16,
    pub version_minor: u16,
    pub font_revision: Fixed,
    pub checksum_adjustment: u32,
    pub magic_number: u32,
    pub flags: HeadFlags,
    /// Granularity of the em square, in font units. The PDF embedding layer
    /// divides by this to scale glyph metrics into text space
    pub units_per_em: u16,
    pub created: LongDateTime,
    pub modified: LongDateTime,
    pub x_min: FWord,
    pub y_min: FWord,
    pub x_max: FWord,
    pub y_max: FWord,
    pub mac_style: MacStyle,
    /// Smallest readable size in pixels
    pub lowest_rec_ppem: u16,
    pub font_direction_hint: i16,
    /// Whether glyph-location offsets elsewhere in the font use the long
    /// (32-bit) form rather than the short (16-bit) form
    pub long_loca_offsets: bool,
    pub glyph_data_format: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadFlags(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacStyle(pub u16);

impl MacStyle {
    pub fn is_bold(self) -> bool {
        self.0 & 0b01 != 0
    }

    pub fn is_italic(self) -> bool {
        self.0 & 0b10 != 0
    }
}

const MAGIC_NUMBER: u32 = 0x5F0F3CF5;

impl HeaderTable {
    pub const TAG: TableTag = TableTag::new(*b"head");

    pub(crate) fn parse(data: &[u8]) -> FontResult<Self> {
        let mut parser = FontParser::new(data);
        parser.expect_record(54)?;

        let version_major = parser.read_u16()?;
        let version_minor = parser.read_u16()?;
        if version_major != 1 {
            return Err(FontError::UnsupportedVersion {
                tag: Self::TAG,
                found: (u32::from(version_major) << 16) | u32::from(version_minor),
            });
        }

        let font_revision = parser.read_fixed()?;
        let checksum_adjustment = parser.read_u32()?;
        let magic_number = parser.read_u32()?;
        if magic_number != MAGIC_NUMBER {
            return Err(FontError::MalformedTable {
                tag: Self::TAG,
                reason: "bad magic number",
            });
        }

        let flags = HeadFlags(parser.read_u16()?);
        let units_per_em = parser.read_u16()?;
        let created = parser.read_long_date_time()?;
        let modified = parser.read_long_date_time()?;
        let x_min = parser.read_fword()?;
        let y_min = parser.read_fword()?;
        let x_max = parser.read_fword()?;
        let y_max = parser.read_fword()?;
        let mac_style = MacStyle(parser.read_u16()?);
        let lowest_rec_ppem = parser.read_u16()?;
        let font_direction_hint = parser.read_i16()?;
        let long_loca_offsets = match parser.read_i16()? {
            0 => false,
            1 => true,
            _ => {
                return Err(FontError::MalformedTable {
                    tag: Self::TAG,
                    reason: "index-to-location format is neither short nor long",
                })
            }
        };
        let glyph_data_format = parser.read_i16()?;

        Ok(Self {
            version_major,
            version_minor,
            font_revision,
            checksum_adjustment,
            magic_number,
            flags,
            units_per_em,
            created,
            modified,
            x_min,
            y_min,
            x_max,
            y_max,
            mac_style,
            lowest_rec_ppem,
            font_direction_hint,
            long_loca_offsets,
            glyph_data_format,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn head_bytes() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend([0x00, 0x01, 0x00, 0x00]); // version 1.0
        data.extend([0x00, 0x01, 0x80, 0x00]); // revision 1.5
        data.extend([0xDE, 0xAD, 0xBE, 0xEF]); // checksum adjustment
        data.extend([0x5F, 0x0F, 0x3C, 0xF5]); // magic
        data.extend([0x00, 0x0B]); // flags
        data.extend([0x03, 0xE8]); // units per em = 1000
        data.extend([0x00; 8]); // created
        data.extend([0x00; 8]); // modified
        data.extend([0xFF, 0x38]); // x min = -200
        data.extend([0xFE, 0x0C]); // y min = -500
        data.extend([0x03, 0xE8]); // x max = 1000
        data.extend([0x03, 0xB6]); // y max = 950
        data.extend([0x00, 0x03]); // mac style: bold | italic
        data.extend([0x00, 0x08]); // lowest rec ppem
        data.extend([0x00, 0x02]); // direction hint
        data.extend([0x00, 0x01]); // long loca offsets
        data.extend([0x00, 0x00]); // glyph data format
        data
    }

    #[test]
    fn parses_all_fields() {
        let head = HeaderTable::parse(&head_bytes()).unwrap();

        assert_eq!(head.version_major, 1);
        assert_eq!(head.font_revision, Fixed::from_bits(0x0001_8000));
        assert_eq!(head.checksum_adjustment, 0xDEADBEEF);
        assert_eq!(head.units_per_em, 1000);
        assert_eq!(head.x_min, FWord(-200));
        assert_eq!(head.y_min, FWord(-500));
        assert_eq!(head.x_max, FWord(1000));
        assert_eq!(head.y_max, FWord(950));
        assert!(head.mac_style.is_bold());
        assert!(head.mac_style.is_italic());
        assert_eq!(head.lowest_rec_ppem, 8);
        assert!(head.long_loca_offsets);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut data = head_bytes();
        data[12] = 0x00;

        assert_eq!(
            HeaderTable::parse(&data),
            Err(FontError::MalformedTable {
                tag: HeaderTable::TAG,
                reason: "bad magic number",
            })
        );
    }

    #[test]
    fn rejects_unknown_loca_format() {
        let mut data = head_bytes();
        data[51] = 0x02;

        assert!(matches!(
            HeaderTable::parse(&data),
            Err(FontError::MalformedTable { .. })
        ));
    }

    #[test]
    fn truncated_table_is_precondition_failure() {
        let data = &head_bytes()[..40];

        assert_eq!(
            HeaderTable::parse(data),
            Err(FontError::UnexpectedEof {
                needed: 54,
                available: 40,
            })
        );
    }
}
