//! Character ramp definitions.
//!
//! Every ramp is ordered from background (space) to the densest glyph. The
//! strings are indexed by position, so their length and order must not change.

use std::fmt;
use std::str::FromStr;

/// Halftone ramp (11 levels).
pub const HALFTONE_RAMP: &str = " .·:+*?%S#@";

/// Detail ramp (93 levels). Finest tonal resolution of the set.
pub const DETAIL_RAMP: &str =
    " `.-':_,^=;><+!rc*/z?sLTv)J7(|Fi{C}fI31tlu[neoZ5Yxjya]2ESwqkP6h9d4VpOGbUAKXHm8RD#$Bg0MNWQ%&@$";

/// Classic ASCII ramp (67 levels).
pub const ASCII_RAMP: &str =
    " .`^\",:;Il!i~+_-?][}{1)(|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// Binary ramp (3 levels).
pub const BINARY_RAMP: &str = " 01";

/// Unicode block ramp (5 levels).
pub const BLOCKS_RAMP: &str = " ░▒▓█";

/// Named character ramp used for glyph selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharSet {
    Halftone,
    #[default]
    Detail,
    Ascii,
    Binary,
    Blocks,
}

impl CharSet {
    /// All ramps in display order.
    pub const ALL: [CharSet; 5] = [
        CharSet::Halftone,
        CharSet::Detail,
        CharSet::Ascii,
        CharSet::Binary,
        CharSet::Blocks,
    ];

    /// The literal ramp string.
    pub fn ramp(&self) -> &'static str {
        match self {
            CharSet::Halftone => HALFTONE_RAMP,
            CharSet::Detail => DETAIL_RAMP,
            CharSet::Ascii => ASCII_RAMP,
            CharSet::Binary => BINARY_RAMP,
            CharSet::Blocks => BLOCKS_RAMP,
        }
    }

    /// The ramp as indexable glyphs.
    pub fn glyphs(&self) -> Vec<char> {
        self.ramp().chars().collect()
    }

    /// Number of glyphs in the ramp (not bytes).
    pub fn len(&self) -> usize {
        self.ramp().chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lowercase name used in config files and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            CharSet::Halftone => "halftone",
            CharSet::Detail => "detail",
            CharSet::Ascii => "ascii",
            CharSet::Binary => "binary",
            CharSet::Blocks => "blocks",
        }
    }
}

impl fmt::Display for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown ramp name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown charset '{0}' (expected one of: halftone, detail, ascii, binary, blocks)")]
pub struct UnknownCharSet(pub String);

impl FromStr for CharSet {
    type Err = UnknownCharSet;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        CharSet::ALL
            .into_iter()
            .find(|c| c.name() == lower)
            .ok_or_else(|| UnknownCharSet(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_lengths() {
        assert_eq!(CharSet::Halftone.len(), 11);
        assert_eq!(CharSet::Detail.len(), 93);
        assert_eq!(CharSet::Ascii.len(), 67);
        assert_eq!(CharSet::Binary.len(), 3);
        assert_eq!(CharSet::Blocks.len(), 5);
    }

    #[test]
    fn test_every_ramp_starts_with_space() {
        for charset in CharSet::ALL {
            assert_eq!(charset.glyphs()[0], ' ', "{} should start with space", charset);
        }
    }

    #[test]
    fn test_ramp_endpoints() {
        assert_eq!(CharSet::Halftone.glyphs().last(), Some(&'@'));
        assert_eq!(CharSet::Detail.glyphs().last(), Some(&'$'));
        assert_eq!(CharSet::Ascii.glyphs().last(), Some(&'$'));
        assert_eq!(CharSet::Binary.glyphs().last(), Some(&'1'));
        assert_eq!(CharSet::Blocks.glyphs().last(), Some(&'█'));
    }

    #[test]
    fn test_multibyte_glyphs_are_single_entries() {
        assert_eq!(CharSet::Halftone.glyphs()[2], '·');
        assert_eq!(CharSet::Blocks.glyphs(), vec![' ', '░', '▒', '▓', '█']);
    }

    #[test]
    fn test_ascii_ramp_contains_backslash() {
        let glyphs = CharSet::Ascii.glyphs();
        assert_eq!(glyphs[25], '\\');
        assert_eq!(glyphs[26], '/');
    }

    #[test]
    fn test_from_str_roundtrips_names() {
        for charset in CharSet::ALL {
            assert_eq!(charset.name().parse::<CharSet>(), Ok(charset));
        }
        assert_eq!(" Blocks ".parse::<CharSet>(), Ok(CharSet::Blocks));
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "braille".parse::<CharSet>().unwrap_err();
        assert!(err.to_string().contains("braille"));
    }

    #[test]
    fn test_default_is_detail() {
        assert_eq!(CharSet::default(), CharSet::Detail);
    }
}
