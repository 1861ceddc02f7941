//! The classification the PDF embedding pipeline reads off a font program.

/// The font-implementation kinds the embedding pipeline distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontProgram {
    /// An embedded Type 1 font program
    Type1,
    /// One of the built-in standard Type 1 fonts
    StandardType1,
    /// An OpenType/TrueType font program
    OpenType,
    /// A Type 3 glyph-procedure font
    Type3,
}

impl FontProgram {
    /// The canonical embedding subtype name, when one exists.
    ///
    /// Both Type 1 kinds embed as "Type1"; OpenType programs embed as
    /// "TrueType".
    pub fn embedding_subtype(self) -> Option<&'static str> {
        match self {
            Self::Type1 | Self::StandardType1 => Some("Type1"),
            Self::OpenType => Some("TrueType"),
            Self::Type3 => None,
        }
    }

    /// Distinguishes the built-in standard fonts from embedded programs
    pub fn is_standard(self) -> bool {
        matches!(self, Self::StandardType1)
    }
}

#[cfg(test)]
mod test {
    use super::FontProgram;

    #[test]
    fn both_type1_kinds_share_a_subtype_name() {
        assert_eq!(FontProgram::Type1.embedding_subtype(), Some("Type1"));
        assert_eq!(
            FontProgram::StandardType1.embedding_subtype(),
            Some("Type1")
        );
        assert_eq!(FontProgram::OpenType.embedding_subtype(), Some("TrueType"));
        assert_eq!(FontProgram::Type3.embedding_subtype(), None);
    }

    #[test]
    fn only_the_builtin_fonts_are_standard() {
        assert!(FontProgram::StandardType1.is_standard());
        assert!(!FontProgram::Type1.is_standard());
        assert!(!FontProgram::OpenType.is_standard());
    }
}
