use std::fmt::{self, Write};

/// A 4-byte identifier naming a font table, e.g. the bytes spelling "cmap"
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableTag([u8; 4]);

impl TableTag {
    pub const fn new(tag: [u8; 4]) -> Self {
        Self(tag)
    }

    /// Constructs a tag from a 4-character string. Yields the same tag as
    /// [`TableTag::new`] over the string's bytes
    pub const fn from_str(tag: &str) -> Self {
        let bytes = tag.as_bytes();
        assert!(bytes.len() == 4);

        Self([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    pub const fn as_bytes(self) -> [u8; 4] {
        self.0
    }
}

impl fmt::Debug for TableTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.0[0] as char)?;
        f.write_char(self.0[1] as char)?;
        f.write_char(self.0[2] as char)?;
        f.write_char(self.0[3] as char)?;

        Ok(())
    }
}

impl fmt::Display for TableTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
