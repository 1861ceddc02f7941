use std::fmt;

use crate::{
    data_types::{Fixed, FWord, LongDateTime},
    error::{FontError, FontResult},
    table::TableTag,
};

/// Big-endian cursor over a font byte buffer.
///
/// Every read is bounds-checked: running off the end of the buffer mid-record
/// is [`FontError::UnexpectedEof`], while seeking or slicing outside the
/// buffer entirely is [`FontError::OffsetOutOfBounds`].
pub(crate) struct FontParser<'a> {
    pub buffer: &'a [u8],
    pub cursor: usize,
}

impl fmt::Debug for FontParser<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontParser")
            .field("cursor", &self.cursor)
            .field("buffer", &format!("[ {} bytes ]", self.buffer.len()))
            .finish()
    }
}

impl<'a> FontParser<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    pub fn available(&self) -> usize {
        self.buffer.len().saturating_sub(self.cursor)
    }

    fn next(&mut self) -> FontResult<u8> {
        self.buffer
            .get(self.cursor)
            .map(|b| {
                self.cursor += 1;
                *b
            })
            .ok_or(FontError::UnexpectedEof {
                needed: 1,
                available: 0,
            })
    }

    /// Checks up front that a whole fixed-size record fits, so a too-short
    /// buffer fails before any field is consumed
    pub fn expect_record(&self, size: usize) -> FontResult<()> {
        let available = self.available();

        if available < size {
            return Err(FontError::UnexpectedEof {
                needed: size,
                available,
            });
        }

        Ok(())
    }

    pub fn seek_to(&mut self, offset: usize) -> FontResult<()> {
        if offset > self.buffer.len() {
            return Err(FontError::OffsetOutOfBounds {
                offset,
                buffer_len: self.buffer.len(),
            });
        }

        self.cursor = offset;

        Ok(())
    }

    pub fn read_u8(&mut self) -> FontResult<u8> {
        self.next()
    }

    pub fn read_u16(&mut self) -> FontResult<u16> {
        let b1 = self.next()?;
        let b2 = self.next()?;

        Ok(u16::from_be_bytes([b1, b2]))
    }

    pub fn read_i16(&mut self) -> FontResult<i16> {
        let b1 = self.next()?;
        let b2 = self.next()?;

        Ok(i16::from_be_bytes([b1, b2]))
    }

    pub fn read_u32(&mut self) -> FontResult<u32> {
        let b1 = self.next()?;
        let b2 = self.next()?;
        let b3 = self.next()?;
        let b4 = self.next()?;

        Ok(u32::from_be_bytes([b1, b2, b3, b4]))
    }

    pub fn read_i64(&mut self) -> FontResult<i64> {
        let b1 = self.next()?;
        let b2 = self.next()?;
        let b3 = self.next()?;
        let b4 = self.next()?;
        let b5 = self.next()?;
        let b6 = self.next()?;
        let b7 = self.next()?;
        let b8 = self.next()?;

        Ok(i64::from_be_bytes([b1, b2, b3, b4, b5, b6, b7, b8]))
    }

    pub fn read_fixed(&mut self) -> FontResult<Fixed> {
        let n = self.read_u32()?;

        Ok(Fixed::from_bits(i32::from_be_bytes(n.to_be_bytes())))
    }

    pub fn read_fword(&mut self) -> FontResult<FWord> {
        Ok(FWord(self.read_i16()?))
    }

    pub fn read_long_date_time(&mut self) -> FontResult<LongDateTime> {
        Ok(LongDateTime(self.read_i64()?))
    }

    pub fn read_tag(&mut self) -> FontResult<TableTag> {
        let b1 = self.next()?;
        let b2 = self.next()?;
        let b3 = self.next()?;
        let b4 = self.next()?;

        Ok(TableTag::new([b1, b2, b3, b4]))
    }

    /// Consumes `length` bytes starting at the cursor
    pub fn get_byte_range(&mut self, length: usize) -> FontResult<&'a [u8]> {
        self.expect_record(length)?;

        let range = &self.buffer[self.cursor..self.cursor + length];
        self.cursor += length;

        Ok(range)
    }

    /// Borrows `length` bytes at an absolute offset without moving the cursor
    pub fn subslice(&self, offset: usize, length: usize) -> FontResult<&'a [u8]> {
        if offset > self.buffer.len() {
            return Err(FontError::OffsetOutOfBounds {
                offset,
                buffer_len: self.buffer.len(),
            });
        }

        let available = self.buffer.len() - offset;
        if available < length {
            return Err(FontError::UnexpectedEof {
                needed: length,
                available,
            });
        }

        Ok(&self.buffer[offset..offset + length])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reads_big_endian_integers() {
        let mut parser = FontParser::new(&[0x00, 0x02, 0xFF, 0xFE, 0x00, 0x01, 0x00, 0x00]);

        assert_eq!(parser.read_u16().unwrap(), 2);
        assert_eq!(parser.read_i16().unwrap(), -2);
        assert_eq!(parser.read_fixed().unwrap(), Fixed::from_bits(0x0001_0000));
        assert_eq!(parser.cursor, 8);
    }

    #[test]
    fn short_buffer_is_unexpected_eof() {
        let mut parser = FontParser::new(&[0x12]);

        assert_eq!(
            parser.read_u16(),
            Err(FontError::UnexpectedEof {
                needed: 1,
                available: 0,
            })
        );
    }

    #[test]
    fn seek_past_end_is_out_of_bounds() {
        let mut parser = FontParser::new(&[0; 4]);

        assert!(parser.seek_to(4).is_ok());
        assert_eq!(
            parser.seek_to(5),
            Err(FontError::OffsetOutOfBounds {
                offset: 5,
                buffer_len: 4,
            })
        );
    }

    #[test]
    fn subslice_distinguishes_range_from_eof() {
        let parser = FontParser::new(&[0; 8]);

        assert_eq!(parser.subslice(2, 6).unwrap().len(), 6);
        assert_eq!(
            parser.subslice(9, 1),
            Err(FontError::OffsetOutOfBounds {
                offset: 9,
                buffer_len: 8,
            })
        );
        assert_eq!(
            parser.subslice(6, 4),
            Err(FontError::UnexpectedEof {
                needed: 4,
                available: 2,
            })
        );
    }

    #[test]
    fn expect_record_reports_both_sizes() {
        let parser = FontParser::new(&[0; 5]);

        assert_eq!(
            parser.expect_record(8),
            Err(FontError::UnexpectedEof {
                needed: 8,
                available: 5,
            })
        );
    }
}
