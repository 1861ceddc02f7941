use crate::{
    encoding::{decode_string, encoding_for},
    error::FontResult,
    parse::FontParser,
    records::RecordList,
    table::TableTag,
};

/// Well-known semantic name identifiers
pub mod name_id {
    pub const FAMILY: u16 = 1;
    pub const SUBFAMILY: u16 = 2;
    pub const UNIQUE_ID: u16 = 3;
    pub const FULL_NAME: u16 = 4;
    pub const VERSION: u16 = 5;
    pub const POSTSCRIPT_NAME: u16 = 6;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRecord {
    /// Platform identifier code.
    pub platform_id: u16,
    /// Platform-specific encoding identifier.
    pub encoding_id: u16,
    /// Language identifier.
    pub language_id: u16,
    /// Name identifier.
    pub name_id: u16,
    /// The record's decoded text content
    pub value: String,
    /// Set when the record's (platform, encoding) pair has no decoder and
    /// `value` is placeholder content rather than meaningful text
    pub is_filler: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTable {
    pub format: u16,
    records: RecordList<NameRecord>,
}

impl NameTable {
    pub const TAG: TableTag = TableTag::new(*b"name");

    pub(crate) fn parse(data: &[u8]) -> FontResult<Self> {
        let mut parser = FontParser::new(data);

        let format = parser.read_u16()?;
        let count = parser.read_u16()?;
        let string_offset = parser.read_u16()?;

        let mut records = Vec::with_capacity(usize::from(count));

        for _ in 0..count {
            let platform_id = parser.read_u16()?;
            let encoding_id = parser.read_u16()?;
            let language_id = parser.read_u16()?;
            let name_id = parser.read_u16()?;
            let length = parser.read_u16()?;
            let offset = parser.read_u16()?;

            let storage_offset = usize::from(string_offset) + usize::from(offset);
            let record = match encoding_for(platform_id, encoding_id) {
                Some(encoding) => {
                    let bytes = parser.subslice(storage_offset, usize::from(length))?;

                    NameRecord {
                        platform_id,
                        encoding_id,
                        language_id,
                        name_id,
                        value: decode_string(encoding, bytes),
                        is_filler: false,
                    }
                }
                None => NameRecord {
                    platform_id,
                    encoding_id,
                    language_id,
                    name_id,
                    value: String::new(),
                    is_filler: true,
                },
            };

            records.push(record);
        }

        Ok(Self {
            format,
            records: RecordList::new(records),
        })
    }

    pub fn records(&self) -> &RecordList<NameRecord> {
        &self.records
    }

    /// The first meaningful record carrying the given name identifier
    pub fn name(&self, name_id: u16) -> Option<&str> {
        self.records
            .iter()
            .find(|record| record.name_id == name_id && !record.is_filler)
            .map(|record| record.value.as_str())
    }

    pub fn postscript_name(&self) -> Option<&str> {
        self.name(name_id::POSTSCRIPT_NAME)
    }

    pub fn family_name(&self) -> Option<&str> {
        self.name(name_id::FAMILY)
    }

    pub fn subfamily_name(&self) -> Option<&str> {
        self.name(name_id::SUBFAMILY)
    }

    pub fn full_name(&self) -> Option<&str> {
        self.name(name_id::FULL_NAME)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::FontError;

    fn name_table_bytes() -> Vec<u8> {
        let storage: &[u8] = &[
            0x00, b'R', 0x00, b'e', 0x00, b'g', // "Reg" in UTF-16BE
            b'S', b'p', b'h', b'i', b'n', b'x', // "Sphinx" in Mac Roman
        ];

        let mut data = Vec::new();
        data.extend([0x00, 0x00]); // format 0
        data.extend([0x00, 0x03]); // count
        data.extend([0x00, 0x2A]); // string storage offset: 6 + 3 * 12

        // windows, UTF-16BE subfamily
        data.extend([0x00, 0x03, 0x00, 0x01, 0x04, 0x09]);
        data.extend([0x00, 0x02, 0x00, 0x06, 0x00, 0x00]);
        // macintosh, roman family
        data.extend([0x00, 0x01, 0x00, 0x00, 0x00, 0x00]);
        data.extend([0x00, 0x01, 0x00, 0x06, 0x00, 0x06]);
        // windows, ShiftJIS: no decoder
        data.extend([0x00, 0x03, 0x00, 0x02, 0x04, 0x11]);
        data.extend([0x00, 0x04, 0x00, 0x01, 0x00, 0x00]);

        data.extend(storage);
        data
    }

    #[test]
    fn decodes_per_platform_encodings() {
        let name = NameTable::parse(&name_table_bytes()).unwrap();

        assert_eq!(name.records().len(), 3);
        assert_eq!(name.subfamily_name(), Some("Reg"));
        assert_eq!(name.family_name(), Some("Sphinx"));
    }

    #[test]
    fn undecodable_records_become_filler() {
        let name = NameTable::parse(&name_table_bytes()).unwrap();
        let filler = &name.records()[2];

        assert!(filler.is_filler);
        assert_eq!(filler.value, "");
        assert_eq!(filler.name_id, name_id::FULL_NAME);
        // filler content never satisfies a lookup
        assert_eq!(name.full_name(), None);
    }

    #[test]
    fn string_past_storage_is_range_failure() {
        let mut data = name_table_bytes();
        // stretch the subfamily record's length past the storage end
        data[14] = 0x40;

        assert!(matches!(
            NameTable::parse(&data),
            Err(FontError::UnexpectedEof { .. }) | Err(FontError::OffsetOutOfBounds { .. })
        ));
    }
}
