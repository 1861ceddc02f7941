//! Platform and encoding identifiers for `cmap` and `name` content.
//!
//! The same numeric encoding identifier means different things depending on
//! the platform that produced it, so string decoding always goes through the
//! (platform, encoding) pair.

/// Identifies the origin of a string or character mapping.
///
/// A classification key, never an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformId {
    Unicode = 0,
    Macintosh = 1,
    Iso = 2,
    Windows = 3,
    Custom = 4,
}

impl PlatformId {
    pub fn from_u16(id: u16) -> Option<Self> {
        Some(match id {
            0 => Self::Unicode,
            1 => Self::Macintosh,
            2 => Self::Iso,
            3 => Self::Windows,
            4 => Self::Custom,
            _ => return None,
        })
    }
}

/// The text-decoding scheme a (platform, encoding) pair selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf16Be,
    MacRoman,
    Latin1,
}

/// Maps one platform-specific encoding identifier to its decoding scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingMapRecord {
    pub platform: PlatformId,
    pub encoding_id: u16,
    pub encoding: TextEncoding,
}

const fn record(
    platform: PlatformId,
    encoding_id: u16,
    encoding: TextEncoding,
) -> EncodingMapRecord {
    EncodingMapRecord {
        platform,
        encoding_id,
        encoding,
    }
}

/// Every (platform, encoding) pair this crate knows how to decode.
///
/// The Unicode platform is UTF-16BE for all of its encoding ids; Windows
/// symbol (0), BMP (1), and full-repertoire (10) content is likewise
/// UTF-16BE. Macintosh encoding 0 is Mac OS Roman. ISO 10646 (1) shares the
/// UTF-16BE scheme, while ISO 7-bit ASCII (0) and 8859-1 (2) both fit
/// Latin-1.
pub static ENCODING_MAP: &[EncodingMapRecord] = &[
    record(PlatformId::Unicode, 0, TextEncoding::Utf16Be),
    record(PlatformId::Unicode, 1, TextEncoding::Utf16Be),
    record(PlatformId::Unicode, 2, TextEncoding::Utf16Be),
    record(PlatformId::Unicode, 3, TextEncoding::Utf16Be),
    record(PlatformId::Unicode, 4, TextEncoding::Utf16Be),
    record(PlatformId::Unicode, 5, TextEncoding::Utf16Be),
    record(PlatformId::Unicode, 6, TextEncoding::Utf16Be),
    record(PlatformId::Macintosh, 0, TextEncoding::MacRoman),
    record(PlatformId::Iso, 0, TextEncoding::Latin1),
    record(PlatformId::Iso, 1, TextEncoding::Utf16Be),
    record(PlatformId::Iso, 2, TextEncoding::Latin1),
    record(PlatformId::Windows, 0, TextEncoding::Utf16Be),
    record(PlatformId::Windows, 1, TextEncoding::Utf16Be),
    record(PlatformId::Windows, 10, TextEncoding::Utf16Be),
];

/// Looks up the decoding scheme for a raw (platform, encoding) pair.
///
/// `None` means the pair has no decoder here, not that the pair is invalid.
pub fn encoding_for(platform_id: u16, encoding_id: u16) -> Option<TextEncoding> {
    let platform = PlatformId::from_u16(platform_id)?;

    ENCODING_MAP
        .iter()
        .find(|record| record.platform == platform && record.encoding_id == encoding_id)
        .map(|record| record.encoding)
}

pub fn decode_string(encoding: TextEncoding, bytes: &[u8]) -> String {
    match encoding {
        TextEncoding::Utf16Be => {
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();

            String::from_utf16_lossy(&units)
        }
        TextEncoding::MacRoman => bytes.iter().map(|&b| mac_roman_char(b)).collect(),
        TextEncoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn mac_roman_char(byte: u8) -> char {
    if byte < 0x80 {
        return byte as char;
    }

    MAC_ROMAN_HIGH[(byte - 0x80) as usize]
}

/// Mac OS Roman code points 0x80..=0xFF
#[rustfmt::skip]
static MAC_ROMAN_HIGH: [char; 128] = [
    'Ä', 'Å', 'Ç', 'É', 'Ñ', 'Ö', 'Ü', 'á', 'à', 'â', 'ä', 'ã', 'å', 'ç', 'é', 'è',
    'ê', 'ë', 'í', 'ì', 'î', 'ï', 'ñ', 'ó', 'ò', 'ô', 'ö', 'õ', 'ú', 'ù', 'û', 'ü',
    '†', '°', '¢', '£', '§', '•', '¶', 'ß', '®', '©', '™', '´', '¨', '≠', 'Æ', 'Ø',
    '∞', '±', '≤', '≥', '¥', 'µ', '∂', '∑', '∏', 'π', '∫', 'ª', 'º', 'Ω', 'æ', 'ø',
    '¿', '¡', '¬', '√', 'ƒ', '≈', '∆', '«', '»', '…', '\u{A0}', 'À', 'Ã', 'Õ', 'Œ', 'œ',
    '–', '—', '“', '”', '‘', '’', '÷', '◊', 'ÿ', 'Ÿ', '⁄', '€', '‹', '›', 'ﬁ', 'ﬂ',
    '‡', '·', '‚', '„', '‰', 'Â', 'Ê', 'Á', 'Ë', 'È', 'Í', 'Î', 'Ï', 'Ì', 'Ó', 'Ô',
    '\u{F8FF}', 'Ò', 'Ú', 'Û', 'Ù', 'ı', 'ˆ', '˜', '¯', '˘', '˙', '˚', '¸', '˝', '˛', 'ˇ',
];
