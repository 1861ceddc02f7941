use log::warn;

use crate::{
    error::{FontError, FontResult},
    parse::FontParser,
    records::RecordList,
    table::TableTag,
};

/// One subheader of the high-byte mapping subformat.
///
/// The on-disk record stores its glyph-index offset relative to the record's
/// own storage location; [`HighByteSubheaderRecord::from_bytes`] undoes that
/// indirection so `start_index` is a plain index into the subtable's shared
/// glyph-index array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HighByteSubheaderRecord {
    pub first_byte: u8,
    pub last_byte: u8,
    pub id_delta: i16,
    pub start_index: i32,
}

impl HighByteSubheaderRecord {
    pub const ENCODED_SIZE: usize = 8;

    /// Assembles a subheader from the 8 bytes at `offset`, where `index` is
    /// the record's position within the subheader array.
    ///
    /// An offset at or past the end of the buffer is an out-of-bounds
    /// failure; an in-bounds offset with fewer than 8 bytes remaining is an
    /// eof failure. The two stay distinct so diagnostics can tell a
    /// truncated record apart from a wild offset.
    pub fn from_bytes(buffer: &[u8], offset: usize, index: usize) -> FontResult<Self> {
        if offset >= buffer.len() {
            return Err(FontError::OffsetOutOfBounds {
                offset,
                buffer_len: buffer.len(),
            });
        }

        let available = buffer.len() - offset;
        if available < Self::ENCODED_SIZE {
            return Err(FontError::UnexpectedEof {
                needed: Self::ENCODED_SIZE,
                available,
            });
        }

        let first_byte = buffer[offset + 1];
        let range_length = buffer[offset + 3];
        let id_delta = i16::from_be_bytes([buffer[offset + 4], buffer[offset + 5]]);
        let raw_range_offset = u16::from_be_bytes([buffer[offset + 6], buffer[offset + 7]]);

        Ok(Self {
            first_byte,
            last_byte: first_byte.wrapping_add(range_length),
            id_delta,
            start_index: i32::from(raw_range_offset) - index as i32,
        })
    }
}

/// One contiguous code range of the segment mapping subformat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentSubheaderRecord {
    pub start_code: u16,
    pub end_code: u16,
    pub id_delta: i16,
    pub id_range_offset: u16,
}

/// One contiguous code range mapped to sequentially increasing glyph
/// identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequentialMapGroupRecord {
    pub start_code: u32,
    pub end_code: u32,
    pub start_glyph_id: u32,
}

impl SequentialMapGroupRecord {
    pub fn glyph_id(&self, code: u32) -> Option<u32> {
        if code < self.start_code || code > self.end_code {
            return None;
        }

        self.start_glyph_id.checked_add(code - self.start_code)
    }
}

/// A character-to-glyph mapping subtable.
///
/// The subformat backing a subtable is an implementation detail; callers see
/// only the common platform/encoding/language header and glyph resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmapSubtable {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language: u16,
    mapping: Subformat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Subformat {
    /// Format 0: a flat byte-indexed glyph array
    ByteEncoding {
        glyph_ids: Box<[u8]>,
    },
    /// Format 2: lead-byte subheader keys over a shared glyph-index array
    HighByte {
        subheader_keys: Box<[u16]>,
        subheaders: RecordList<HighByteSubheaderRecord>,
        glyph_indices: Box<[u16]>,
    },
    /// Format 4: delta-mapped segments over a trailing glyph-index array
    Segment {
        segments: RecordList<SegmentSubheaderRecord>,
        glyph_indices: Box<[u16]>,
    },
    /// Format 6: a dense range starting at one code
    Trimmed {
        first_code: u16,
        glyph_ids: Box<[u16]>,
    },
    /// Format 12: sequential map groups
    SequentialGroups {
        groups: RecordList<SequentialMapGroupRecord>,
    },
}

impl CmapSubtable {
    pub(crate) fn byte_encoding(
        platform_id: u16,
        encoding_id: u16,
        language: u16,
        glyph_ids: Vec<u8>,
    ) -> Self {
        Self {
            platform_id,
            encoding_id,
            language,
            mapping: Subformat::ByteEncoding {
                glyph_ids: glyph_ids.into_boxed_slice(),
            },
        }
    }

    pub(crate) fn high_byte(
        platform_id: u16,
        encoding_id: u16,
        language: u16,
        subheader_keys: Vec<u16>,
        subheaders: Vec<HighByteSubheaderRecord>,
        glyph_indices: Vec<u16>,
    ) -> Self {
        Self {
            platform_id,
            encoding_id,
            language,
            mapping: Subformat::HighByte {
                subheader_keys: subheader_keys.into_boxed_slice(),
                subheaders: RecordList::new(subheaders),
                glyph_indices: glyph_indices.into_boxed_slice(),
            },
        }
    }

    pub(crate) fn segmented(
        platform_id: u16,
        encoding_id: u16,
        language: u16,
        segments: Vec<SegmentSubheaderRecord>,
        glyph_indices: Vec<u16>,
    ) -> Self {
        Self {
            platform_id,
            encoding_id,
            language,
            mapping: Subformat::Segment {
                segments: RecordList::new(segments),
                glyph_indices: glyph_indices.into_boxed_slice(),
            },
        }
    }

    pub(crate) fn trimmed(
        platform_id: u16,
        encoding_id: u16,
        language: u16,
        first_code: u16,
        glyph_ids: Vec<u16>,
    ) -> Self {
        Self {
            platform_id,
            encoding_id,
            language,
            mapping: Subformat::Trimmed {
                first_code,
                glyph_ids: glyph_ids.into_boxed_slice(),
            },
        }
    }

    pub(crate) fn sequential_groups(
        platform_id: u16,
        encoding_id: u16,
        language: u16,
        groups: Vec<SequentialMapGroupRecord>,
    ) -> Self {
        Self {
            platform_id,
            encoding_id,
            language,
            mapping: Subformat::SequentialGroups {
                groups: RecordList::new(groups),
            },
        }
    }

    /// Translates a character code to a glyph identifier.
    ///
    /// A code no subrange covers, or that resolves to glyph zero, is
    /// unmapped and yields `None`.
    pub fn glyph_id(&self, code: u32) -> Option<u16> {
        match &self.mapping {
            Subformat::ByteEncoding { glyph_ids } => {
                let glyph = *glyph_ids.get(usize::try_from(code).ok()?)?;

                (glyph != 0).then_some(u16::from(glyph))
            }
            Subformat::HighByte {
                subheader_keys,
                subheaders,
                glyph_indices,
            } => Self::high_byte_glyph_id(code, subheader_keys, subheaders, glyph_indices),
            Subformat::Segment {
                segments,
                glyph_indices,
            } => Self::segment_glyph_id(code, segments, glyph_indices),
            Subformat::Trimmed {
                first_code,
                glyph_ids,
            } => {
                let code = u16::try_from(code).ok()?;
                let index = code.checked_sub(*first_code)?;
                let glyph = *glyph_ids.get(usize::from(index))?;

                (glyph != 0).then_some(glyph)
            }
            Subformat::SequentialGroups { groups } => {
                let glyph = groups.iter().find_map(|group| group.glyph_id(code))?;

                u16::try_from(glyph).ok().filter(|&glyph| glyph != 0)
            }
        }
    }

    fn high_byte_glyph_id(
        code: u32,
        subheader_keys: &[u16],
        subheaders: &RecordList<HighByteSubheaderRecord>,
        glyph_indices: &[u16],
    ) -> Option<u16> {
        let code = u16::try_from(code).ok()?;
        let [high, low] = code.to_be_bytes();

        // key 0 is the single-byte subheader; it resolves one-byte codes
        // only, and a two-byte code whose lead byte maps to it is unmapped
        let subheader_index = usize::from(*subheader_keys.get(usize::from(high))?) / 8;
        let (subheader, byte) = if high == 0 {
            let key = usize::from(*subheader_keys.get(usize::from(low))?) / 8;
            if key != 0 {
                return None;
            }

            (subheaders.get(0)?, low)
        } else {
            if subheader_index == 0 {
                return None;
            }

            (subheaders.get(subheader_index)?, low)
        };

        if byte < subheader.first_byte || byte > subheader.last_byte {
            return None;
        }

        let index = subheader.start_index + i32::from(byte - subheader.first_byte);
        let raw = *glyph_indices.get(usize::try_from(index).ok()?)?;
        if raw == 0 {
            return None;
        }

        Some(raw.wrapping_add(subheader.id_delta as u16))
    }

    fn segment_glyph_id(
        code: u32,
        segments: &RecordList<SegmentSubheaderRecord>,
        glyph_indices: &[u16],
    ) -> Option<u16> {
        let code = u16::try_from(code).ok()?;

        let (position, segment) = segments
            .iter()
            .enumerate()
            .find(|(_, segment)| segment.start_code <= code && code <= segment.end_code)?;

        if segment.id_range_offset == 0 {
            let glyph = code.wrapping_add(segment.id_delta as u16);

            return (glyph != 0).then_some(glyph);
        }

        // the stored range offset is relative to its own position within the
        // segment array; the glyph-index array begins where that array ends
        let index = i64::from(segment.id_range_offset / 2)
            + i64::from(code - segment.start_code)
            + position as i64
            - segments.len() as i64;

        let raw = *glyph_indices.get(usize::try_from(index).ok()?)?;
        if raw == 0 {
            return None;
        }

        Some(raw.wrapping_add(segment.id_delta as u16))
    }
}

/// The character-to-glyph mapping table: an ordered sequence of subtables.
///
/// Real fonts declare redundant subtables for compatibility, so the sequence
/// may contain several entries sharing one platform/encoding pair; the first
/// declared subtable is normative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmapTable {
    pub version: u16,
    subtables: Vec<CmapSubtable>,
}

impl CmapTable {
    pub const TAG: TableTag = TableTag::new(*b"cmap");

    pub fn new(subtables: Vec<CmapSubtable>) -> Self {
        Self {
            version: 0,
            subtables,
        }
    }

    /// The subtables in the exact order the sequence supplied them
    pub fn mappings(&self) -> &[CmapSubtable] {
        &self.subtables
    }

    /// The first subtable whose platform and encoding both match.
    ///
    /// Earliest-inserted wins when duplicates exist; `None` when no subtable
    /// matches both fields.
    pub fn select_exact_mapping(&self, platform_id: u16, encoding_id: u16) -> Option<&CmapSubtable> {
        self.subtables
            .iter()
            .find(|subtable| {
                subtable.platform_id == platform_id && subtable.encoding_id == encoding_id
            })
    }

    pub(crate) fn parse(data: &[u8]) -> FontResult<Self> {
        let mut parser = FontParser::new(data);

        let version = parser.read_u16()?;
        if version != 0 {
            return Err(FontError::MalformedTable {
                tag: Self::TAG,
                reason: "nonzero table version",
            });
        }

        let subtable_count = parser.read_u16()?;
        let mut encodings = Vec::with_capacity(usize::from(subtable_count));

        for _ in 0..subtable_count {
            let platform_id = parser.read_u16()?;
            let encoding_id = parser.read_u16()?;
            let offset = parser.read_u32()?;

            encodings.push((platform_id, encoding_id, offset as usize));
        }

        let mut subtables = Vec::with_capacity(encodings.len());
        for (platform_id, encoding_id, offset) in encodings {
            if let Some(subtable) = Self::parse_subtable(data, offset, platform_id, encoding_id)? {
                subtables.push(subtable);
            }
        }

        Ok(Self { version, subtables })
    }

    fn parse_subtable(
        data: &[u8],
        offset: usize,
        platform_id: u16,
        encoding_id: u16,
    ) -> FontResult<Option<CmapSubtable>> {
        if offset >= data.len() {
            return Err(FontError::OffsetOutOfBounds {
                offset,
                buffer_len: data.len(),
            });
        }

        let subtable_data = &data[offset..];
        let mut parser = FontParser::new(subtable_data);
        let format = parser.read_u16()?;

        let subtable = match format {
            0 => Self::parse_byte_encoding(&mut parser, platform_id, encoding_id)?,
            2 => Self::parse_high_byte(subtable_data, platform_id, encoding_id)?,
            4 => Self::parse_segmented(&mut parser, platform_id, encoding_id)?,
            6 => Self::parse_trimmed(&mut parser, platform_id, encoding_id)?,
            12 => Self::parse_sequential_groups(&mut parser, platform_id, encoding_id)?,
            8 | 10 | 13 | 14 => {
                warn!(
                    "skipping cmap subtable format {} for platform {} encoding {}",
                    format, platform_id, encoding_id
                );
                return Ok(None);
            }
            _ => {
                return Err(FontError::UnrecognizedVariant {
                    ty: "cmap subtable format",
                    found: u32::from(format),
                })
            }
        };

        Ok(Some(subtable))
    }

    fn parse_byte_encoding(
        parser: &mut FontParser,
        platform_id: u16,
        encoding_id: u16,
    ) -> FontResult<CmapSubtable> {
        let _length = parser.read_u16()?;
        let language = parser.read_u16()?;
        let glyph_ids = parser.get_byte_range(256)?.to_vec();

        Ok(CmapSubtable::byte_encoding(
            platform_id,
            encoding_id,
            language,
            glyph_ids,
        ))
    }

    fn parse_high_byte(
        subtable_data: &[u8],
        platform_id: u16,
        encoding_id: u16,
    ) -> FontResult<CmapSubtable> {
        let mut parser = FontParser::new(subtable_data);

        let _format = parser.read_u16()?;
        let length = usize::from(parser.read_u16()?);
        let language = parser.read_u16()?;

        let mut subheader_keys = Vec::with_capacity(256);
        let mut max_subheader = 0;
        for _ in 0..256 {
            let key = parser.read_u16()?;

            max_subheader = max_subheader.max(key / 8);
            subheader_keys.push(key);
        }

        let subheader_base = parser.cursor;
        let subheader_count = usize::from(max_subheader) + 1;

        let mut subheaders = Vec::with_capacity(subheader_count);
        for index in 0..subheader_count {
            subheaders.push(HighByteSubheaderRecord::from_bytes(
                subtable_data,
                subheader_base + index * HighByteSubheaderRecord::ENCODED_SIZE,
                index,
            )?);
        }

        parser.seek_to(subheader_base + subheader_count * HighByteSubheaderRecord::ENCODED_SIZE)?;

        let glyph_data_end = length.min(subtable_data.len());
        let mut glyph_indices = Vec::new();
        while parser.cursor + 2 <= glyph_data_end {
            glyph_indices.push(parser.read_u16()?);
        }

        Ok(CmapSubtable::high_byte(
            platform_id,
            encoding_id,
            language,
            subheader_keys,
            subheaders,
            glyph_indices,
        ))
    }

    fn parse_segmented(
        parser: &mut FontParser,
        platform_id: u16,
        encoding_id: u16,
    ) -> FontResult<CmapSubtable> {
        let subtable_start = parser.cursor - 2;
        let length = usize::from(parser.read_u16()?);
        let language = parser.read_u16()?;

        let seg_count_x2 = parser.read_u16()?;
        if seg_count_x2 % 2 != 0 {
            return Err(FontError::MalformedTable {
                tag: Self::TAG,
                reason: "odd doubled segment count",
            });
        }
        let seg_count = usize::from(seg_count_x2 / 2);

        let _search_range = parser.read_u16()?;
        let _entry_selector = parser.read_u16()?;
        let _range_shift = parser.read_u16()?;

        let mut end_codes = Vec::with_capacity(seg_count);
        for _ in 0..seg_count {
            end_codes.push(parser.read_u16()?);
        }

        if end_codes.last() != Some(&0xFFFF) {
            return Err(FontError::MalformedTable {
                tag: Self::TAG,
                reason: "final segment does not end at 0xFFFF",
            });
        }

        let _reserved_pad = parser.read_u16()?;

        let mut start_codes = Vec::with_capacity(seg_count);
        for _ in 0..seg_count {
            start_codes.push(parser.read_u16()?);
        }

        let mut id_deltas = Vec::with_capacity(seg_count);
        for _ in 0..seg_count {
            id_deltas.push(parser.read_i16()?);
        }

        let mut id_range_offsets = Vec::with_capacity(seg_count);
        for _ in 0..seg_count {
            id_range_offsets.push(parser.read_u16()?);
        }

        let segments = end_codes
            .into_iter()
            .zip(start_codes)
            .zip(id_deltas)
            .zip(id_range_offsets)
            .map(
                |(((end_code, start_code), id_delta), id_range_offset)| SegmentSubheaderRecord {
                    start_code,
                    end_code,
                    id_delta,
                    id_range_offset,
                },
            )
            .collect();

        let glyph_data_end = (subtable_start + length).min(parser.buffer.len());
        let mut glyph_indices = Vec::new();
        while parser.cursor + 2 <= glyph_data_end {
            glyph_indices.push(parser.read_u16()?);
        }

        Ok(CmapSubtable::segmented(
            platform_id,
            encoding_id,
            language,
            segments,
            glyph_indices,
        ))
    }

    fn parse_trimmed(
        parser: &mut FontParser,
        platform_id: u16,
        encoding_id: u16,
    ) -> FontResult<CmapSubtable> {
        let _length = parser.read_u16()?;
        let language = parser.read_u16()?;
        let first_code = parser.read_u16()?;
        let entry_count = parser.read_u16()?;

        let mut glyph_ids = Vec::with_capacity(usize::from(entry_count));
        for _ in 0..entry_count {
            glyph_ids.push(parser.read_u16()?);
        }

        Ok(CmapSubtable::trimmed(
            platform_id,
            encoding_id,
            language,
            first_code,
            glyph_ids,
        ))
    }

    fn parse_sequential_groups(
        parser: &mut FontParser,
        platform_id: u16,
        encoding_id: u16,
    ) -> FontResult<CmapSubtable> {
        let _reserved = parser.read_u16()?;
        let _length = parser.read_u32()?;
        let language = parser.read_u32()?;
        let group_count = parser.read_u32()?;

        let mut groups = Vec::with_capacity(group_count as usize);
        for _ in 0..group_count {
            let start_code = parser.read_u32()?;
            let end_code = parser.read_u32()?;
            let start_glyph_id = parser.read_u32()?;

            groups.push(SequentialMapGroupRecord {
                start_code,
                end_code,
                start_glyph_id,
            });
        }

        Ok(CmapSubtable::sequential_groups(
            platform_id,
            encoding_id,
            language as u16,
            groups,
        ))
    }
}
