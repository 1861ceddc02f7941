use once_cell::sync::OnceCell;

use crate::{
    error::{FontError, FontResult},
    parse::FontParser,
    table::{
        CmapTable, FontKind, HeaderTable, HorizontalHeaderTable, HorizontalMetricsTable,
        MaximumProfileTable, NameTable, OffsetTable, PostScriptTable, Table, TableIndexRecord,
        TableKind, TableTag,
    },
};

/// A font file's table directory with lazy, memoized access to table bodies.
///
/// Opening a font parses only the fixed-size offset table and its index
/// records; each table body is parsed on first request and cached in a
/// one-shot cell for the lifetime of the font, so repeated or concurrent
/// reads share one parse. A failed table stays failed without disturbing
/// any other table.
#[derive(Debug)]
pub struct FontFile<'a> {
    buffer: &'a [u8],
    offset_table: OffsetTable,
    records: Vec<TableIndexRecord>,
    cache: Vec<OnceCell<Table>>,
}

impl<'a> FontFile<'a> {
    pub fn new(buffer: &'a [u8]) -> FontResult<Self> {
        let mut parser = FontParser::new(buffer);

        let offset_table = OffsetTable::parse(&mut parser)?;

        let mut records = Vec::with_capacity(usize::from(offset_table.num_tables));
        for _ in 0..offset_table.num_tables {
            records.push(TableIndexRecord::parse(&mut parser)?);
        }

        let cache = records.iter().map(|_| OnceCell::new()).collect();

        Ok(Self {
            buffer,
            offset_table,
            records,
            cache,
        })
    }

    pub fn kind(&self) -> FontKind {
        self.offset_table.kind
    }

    pub fn offset_table(&self) -> &OffsetTable {
        &self.offset_table
    }

    /// Every table the font declares, parsed or not
    pub fn records(&self) -> &[TableIndexRecord] {
        &self.records
    }

    pub fn index_record(&self, tag: TableTag) -> Option<&TableIndexRecord> {
        self.records.iter().find(|record| record.tag == tag)
    }

    /// The parsed table carrying `tag`.
    ///
    /// `Ok(None)` covers the not-an-error absences: a tag the font does not
    /// declare, a record without a physical offset, and a declared table
    /// this crate has no parser for. Parse failures are per-table and leave
    /// every other table loadable.
    pub fn table(&self, tag: TableTag) -> FontResult<Option<&Table>> {
        let Some(position) = self.records.iter().position(|record| record.tag == tag) else {
            return Ok(None);
        };

        let record = &self.records[position];
        let (Some(kind), Some(offset)) = (record.kind, record.offset) else {
            return Ok(None);
        };

        let table = self.cache[position]
            .get_or_try_init(|| self.load(kind, offset as usize, record.length as usize))?;

        Ok(Some(table))
    }

    fn load(&self, kind: TableKind, offset: usize, length: usize) -> FontResult<Table> {
        let data = FontParser::new(self.buffer).subslice(offset, length)?;

        Ok(match kind {
            TableKind::Header => Table::Header(HeaderTable::parse(data)?),
            TableKind::CharacterMapping => Table::CharacterMapping(CmapTable::parse(data)?),
            TableKind::HorizontalHeader => {
                Table::HorizontalHeader(HorizontalHeaderTable::parse(data)?)
            }
            TableKind::MaximumProfile => Table::MaximumProfile(MaximumProfileTable::parse(data)?),
            TableKind::Naming => Table::Naming(NameTable::parse(data)?),
            TableKind::PostScript => Table::PostScript(PostScriptTable::parse(data)?),
            TableKind::HorizontalMetrics => {
                let number_of_h_metrics = self
                    .hhea()?
                    .ok_or(FontError::MalformedTable {
                        tag: HorizontalMetricsTable::TAG,
                        reason: "horizontal metrics need the hhea table",
                    })?
                    .number_of_h_metrics;

                let num_glyphs = self
                    .maxp()?
                    .ok_or(FontError::MalformedTable {
                        tag: HorizontalMetricsTable::TAG,
                        reason: "horizontal metrics need the maxp table",
                    })?
                    .num_glyphs;

                Table::HorizontalMetrics(HorizontalMetricsTable::parse(
                    data,
                    number_of_h_metrics,
                    num_glyphs,
                )?)
            }
        })
    }

    pub fn head(&self) -> FontResult<Option<&HeaderTable>> {
        Ok(match self.table(HeaderTable::TAG)? {
            Some(Table::Header(head)) => Some(head),
            _ => None,
        })
    }

    pub fn cmap(&self) -> FontResult<Option<&CmapTable>> {
        Ok(match self.table(CmapTable::TAG)? {
            Some(Table::CharacterMapping(cmap)) => Some(cmap),
            _ => None,
        })
    }

    pub fn hhea(&self) -> FontResult<Option<&HorizontalHeaderTable>> {
        Ok(match self.table(HorizontalHeaderTable::TAG)? {
            Some(Table::HorizontalHeader(hhea)) => Some(hhea),
            _ => None,
        })
    }

    pub fn hmtx(&self) -> FontResult<Option<&HorizontalMetricsTable>> {
        Ok(match self.table(HorizontalMetricsTable::TAG)? {
            Some(Table::HorizontalMetrics(hmtx)) => Some(hmtx),
            _ => None,
        })
    }

    pub fn maxp(&self) -> FontResult<Option<&MaximumProfileTable>> {
        Ok(match self.table(MaximumProfileTable::TAG)? {
            Some(Table::MaximumProfile(maxp)) => Some(maxp),
            _ => None,
        })
    }

    pub fn name(&self) -> FontResult<Option<&NameTable>> {
        Ok(match self.table(NameTable::TAG)? {
            Some(Table::Naming(name)) => Some(name),
            _ => None,
        })
    }

    pub fn post(&self) -> FontResult<Option<&PostScriptTable>> {
        Ok(match self.table(PostScriptTable::TAG)? {
            Some(Table::PostScript(post)) => Some(post),
            _ => None,
        })
    }

    /// Verifies every physically present table against its stored checksum
    pub fn verify_checksums(&self) -> FontResult<()> {
        for record in &self.records {
            record.verify_checksum(self.buffer)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::table::table_checksum;

    fn head_body() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend([0x00, 0x01, 0x00, 0x00]); // version 1.0
        data.extend([0x00, 0x01, 0x00, 0x00]); // revision 1.0
        data.extend([0x12, 0x34, 0x56, 0x78]); // checksum adjustment
        data.extend([0x5F, 0x0F, 0x3C, 0xF5]); // magic
        data.extend([0x00, 0x00]); // flags
        data.extend([0x08, 0x00]); // units per em = 2048
        data.extend([0x00; 16]); // created + modified
        data.extend([0x00; 8]); // bounding box
        data.extend([0x00, 0x00]); // mac style
        data.extend([0x00, 0x08]); // lowest rec ppem
        data.extend([0x00, 0x00]); // direction hint
        data.extend([0x00, 0x00]); // short loca offsets
        data.extend([0x00, 0x00]); // glyph data format
        data
    }

    fn hhea_body(number_of_h_metrics: u16) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend([0x00, 0x01, 0x00, 0x00]); // version 1.0
        data.extend([0x00; 30]);
        data.extend(number_of_h_metrics.to_be_bytes());
        data
    }

    fn maxp_body(num_glyphs: u16) -> Vec<u8> {
        let mut data = vec![0x00, 0x00, 0x50, 0x00];
        data.extend(num_glyphs.to_be_bytes());
        data
    }

    fn post_body() -> Vec<u8> {
        let mut data = vec![0x00, 0x03, 0x00, 0x00]; // version 3.0
        data.extend([0x00; 28]);
        data
    }

    fn build_font(tables: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
        let num_tables = tables.len() as u16;
        let pow2: u16 = if num_tables == 0 {
            1
        } else {
            1 << (15 - num_tables.leading_zeros().min(15))
        };

        let mut data = Vec::new();
        data.extend(0x0001_0000u32.to_be_bytes());
        data.extend(num_tables.to_be_bytes());
        data.extend((pow2 * 16).to_be_bytes());
        data.extend((pow2.trailing_zeros() as u16).to_be_bytes());
        data.extend((num_tables * 16 - pow2 * 16).to_be_bytes());

        let mut offset = 12 + 16 * tables.len();
        for (tag, body) in tables {
            let mut checksum = table_checksum(body);
            if tag == b"head" && body.len() >= 12 {
                let adjustment = u32::from_be_bytes([body[8], body[9], body[10], body[11]]);
                checksum = checksum.wrapping_sub(adjustment);
            }

            data.extend(tag);
            data.extend(checksum.to_be_bytes());
            data.extend((offset as u32).to_be_bytes());
            data.extend((body.len() as u32).to_be_bytes());

            offset += body.len() + (4 - body.len() % 4) % 4;
        }

        for (_, body) in tables {
            data.extend(body);
            data.extend(std::iter::repeat(0u8).take((4 - body.len() % 4) % 4));
        }

        data
    }

    #[test]
    fn parses_directory_without_touching_bodies() {
        let data = build_font(&[(*b"head", head_body()), (*b"maxp", maxp_body(7))]);
        let font = FontFile::new(&data).unwrap();

        assert_eq!(font.kind(), FontKind::TrueType);
        assert_eq!(font.offset_table().num_tables, 2);
        assert_eq!(font.records().len(), 2);
        assert_eq!(font.records()[0].tag, TableTag::new(*b"head"));
        assert_eq!(font.records()[1].tag, TableTag::new(*b"maxp"));
        assert!(font.records().iter().all(|record| record.offset.is_some()));
    }

    #[test]
    fn loads_tables_lazily_and_once() {
        let data = build_font(&[(*b"head", head_body())]);
        let font = FontFile::new(&data).unwrap();

        let head = font.head().unwrap().unwrap();
        assert_eq!(head.units_per_em, 2048);
        assert_eq!(head.checksum_adjustment, 0x12345678);

        let first = font.table(HeaderTable::TAG).unwrap().unwrap() as *const Table;
        let second = font.table(HeaderTable::TAG).unwrap().unwrap() as *const Table;
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn undeclared_tag_is_absent_not_an_error() {
        let data = build_font(&[(*b"head", head_body())]);
        let font = FontFile::new(&data).unwrap();

        assert_eq!(font.table(TableTag::new(*b"cmap")).unwrap(), None);
        assert!(font.cmap().unwrap().is_none());
    }

    #[test]
    fn zero_offset_means_declared_but_unavailable() {
        let mut data = build_font(&[(*b"head", head_body()), (*b"maxp", maxp_body(7))]);
        // zero out the maxp record's offset field
        let record_start = 12 + 16;
        data[record_start + 8..record_start + 12].fill(0);

        let font = FontFile::new(&data).unwrap();
        let record = font.index_record(TableTag::new(*b"maxp")).unwrap();

        assert_eq!(record.offset, None);
        assert_eq!(font.maxp().unwrap(), None);
    }

    #[test]
    fn declared_table_without_a_parser_is_skipped() {
        let data = build_font(&[(*b"glyf", vec![0u8; 8]), (*b"head", head_body())]);
        let font = FontFile::new(&data).unwrap();

        assert_eq!(font.table(TableTag::new(*b"glyf")).unwrap(), None);
        assert!(font.head().unwrap().is_some());
    }

    #[test]
    fn hmtx_resolves_hhea_and_maxp_through_the_lazy_path() {
        let hmtx_body = vec![
            0x02, 0x58, 0x00, 0x0A, // advance 600, lsb 10
            0x00, 0x14, // lsb-only 20
        ];
        let data = build_font(&[
            (*b"hhea", hhea_body(1)),
            (*b"hmtx", hmtx_body),
            (*b"maxp", maxp_body(2)),
        ]);
        let font = FontFile::new(&data).unwrap();

        let hmtx = font.hmtx().unwrap().unwrap();
        assert_eq!(hmtx.advance_width(0), Some(600));
        assert_eq!(hmtx.advance_width(1), Some(600));
        assert_eq!(hmtx.metric(1).unwrap().left_side_bearing, 20);
    }

    #[test]
    fn hmtx_without_hhea_is_malformed() {
        let data = build_font(&[
            (*b"hmtx", vec![0x00, 0x64, 0x00, 0x00]),
            (*b"maxp", maxp_body(1)),
        ]);
        let font = FontFile::new(&data).unwrap();

        assert_eq!(
            font.hmtx(),
            Err(FontError::MalformedTable {
                tag: HorizontalMetricsTable::TAG,
                reason: "horizontal metrics need the hhea table",
            })
        );
    }

    #[test]
    fn failures_stay_per_table() {
        let bad_post = vec![0x00, 0x05, 0x00, 0x00]; // version 5.0
        let data = build_font(&[(*b"head", head_body()), (*b"post", bad_post)]);
        let font = FontFile::new(&data).unwrap();

        assert!(font.post().is_err());
        // an unrelated table still parses
        assert_eq!(font.head().unwrap().unwrap().units_per_em, 2048);
    }

    #[test]
    fn verifies_stored_checksums() {
        let data = build_font(&[(*b"head", head_body()), (*b"maxp", maxp_body(7))]);
        let font = FontFile::new(&data).unwrap();

        assert!(font.verify_checksums().is_ok());
    }

    #[test]
    fn corrupted_body_fails_checksum_verification() {
        let mut data = build_font(&[(*b"maxp", maxp_body(7))]);
        let body_start = 12 + 16;
        data[body_start + 5] ^= 0xFF;

        let font = FontFile::new(&data).unwrap();

        assert!(matches!(
            font.verify_checksums(),
            Err(FontError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn rejects_unknown_signatures() {
        let data = b"ttcf\x00\x01\x00\x00".to_vec();

        assert_eq!(
            FontFile::new(&data).unwrap_err(),
            FontError::InvalidSignature {
                found: u32::from_be_bytes(*b"ttcf"),
            }
        );
    }

    #[test]
    fn truncated_directory_is_eof() {
        let data = build_font(&[(*b"head", head_body())]);

        assert!(matches!(
            FontFile::new(&data[..20]),
            Err(FontError::UnexpectedEof { .. })
        ));
    }
}
