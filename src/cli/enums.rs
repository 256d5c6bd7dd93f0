//! CLI enum types for character set and contrast options.

use clap::ValueEnum;

use ascii_mosaic::ascii;

/// Character ramp used for glyph selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CharacterSet {
    Halftone,
    #[default]
    Detail,
    Ascii,
    Binary,
    Blocks,
}

impl From<CharacterSet> for ascii::CharSet {
    fn from(c: CharacterSet) -> Self {
        match c {
            CharacterSet::Halftone => ascii::CharSet::Halftone,
            CharacterSet::Detail => ascii::CharSet::Detail,
            CharacterSet::Ascii => ascii::CharSet::Ascii,
            CharacterSet::Binary => ascii::CharSet::Binary,
            CharacterSet::Blocks => ascii::CharSet::Blocks,
        }
    }
}

/// Contrast curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ContrastCurve {
    /// Symmetric around mid-gray; 1.0 leaves tones unchanged
    #[default]
    Midpoint,
    /// Raw `contrast * 255` offset; inverts tones above ~1.02
    Legacy,
}

impl From<ContrastCurve> for ascii::ContrastMode {
    fn from(c: ContrastCurve) -> Self {
        match c {
            ContrastCurve::Midpoint => ascii::ContrastMode::Midpoint,
            ContrastCurve::Legacy => ascii::ContrastMode::Legacy,
        }
    }
}
