use crate::{error::FontResult, parse::FontParser, records::RecordList, table::TableTag};

/// One glyph's horizontal metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HorizontalMetricRecord {
    pub advance_width: u16,
    pub left_side_bearing: i16,
}

/// The horizontal metrics table.
///
/// The file stores `number_of_h_metrics` full records followed by bare
/// side bearings for the remaining glyphs, which all share the final advance
/// width. Parsing materializes one record per glyph so callers can index by
/// glyph identifier directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HorizontalMetricsTable {
    metrics: RecordList<HorizontalMetricRecord>,
}

impl HorizontalMetricsTable {
    pub const TAG: TableTag = TableTag::new(*b"hmtx");

    pub(crate) fn parse(
        data: &[u8],
        number_of_h_metrics: u16,
        num_glyphs: u16,
    ) -> FontResult<Self> {
        let mut parser = FontParser::new(data);
        let mut metrics = Vec::with_capacity(usize::from(num_glyphs));

        let mut last_advance = 0;
        for _ in 0..number_of_h_metrics.min(num_glyphs) {
            let advance_width = parser.read_u16()?;
            let left_side_bearing = parser.read_i16()?;

            last_advance = advance_width;
            metrics.push(HorizontalMetricRecord {
                advance_width,
                left_side_bearing,
            });
        }

        while metrics.len() < usize::from(num_glyphs) {
            let left_side_bearing = parser.read_i16()?;

            metrics.push(HorizontalMetricRecord {
                advance_width: last_advance,
                left_side_bearing,
            });
        }

        Ok(Self {
            metrics: RecordList::new(metrics),
        })
    }

    pub fn metrics(&self) -> &RecordList<HorizontalMetricRecord> {
        &self.metrics
    }

    pub fn metric(&self, glyph_id: u16) -> Option<&HorizontalMetricRecord> {
        self.metrics.get(usize::from(glyph_id))
    }

    pub fn advance_width(&self, glyph_id: u16) -> Option<u16> {
        self.metric(glyph_id).map(|metric| metric.advance_width)
    }
}
